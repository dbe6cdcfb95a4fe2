use focusview::{Item, Size};
use focusview_adapter::{GestureEvent, ScrollEvent, ScrollOptions, ScrollView};

struct Tile(u32);

impl Item for Tile {
    type Id = u32;

    fn id(&self) -> u32 {
        self.0
    }

    fn size(&self) -> Size {
        Size::new(100.0, 80.0)
    }
}

fn main() {
    // Example: a host frame loop driving inertial scrolling without holding any UI objects.
    //
    // A host would:
    // - forward gesture start/update/end from its input layer
    // - call tick(dt) once per frame and draw each record at `record.offset + frame.position`
    // - react to edge / page / settle events
    let tiles: Vec<Tile> = (0..500).map(Tile).collect();
    let mut view = ScrollView::new(tiles, ScrollOptions::default()).expect("valid options");
    view.set_viewport(Size::new(100.0, 600.0));

    view.on_gesture_start();
    for _ in 0..5 {
        view.on_gesture_update(GestureEvent::touch(-30.0, -2.5));
        view.tick(16.0);
    }
    view.on_gesture_end(GestureEvent::touch(0.0, -2.5));

    let mut frames = 0u32;
    loop {
        frames += 1;
        let frame = view.tick(16.0);
        let mut settled = false;
        for event in view.take_events() {
            match event {
                ScrollEvent::PageChange(p) => println!("t={}ms page -> {:?}", frames * 16, p.index),
                ScrollEvent::OnEdge(e) | ScrollEvent::OffEdge(e) => {
                    println!("t={}ms edge -> {:?}", frames * 16, e.edge)
                }
                ScrollEvent::Settle => settled = true,
            }
        }
        if frames % 10 == 0 {
            println!(
                "t={}ms position={:.1} mounted={}",
                frames * 16,
                frame.position,
                frame.records.len()
            );
        }
        if settled || frames > 1_000 {
            break;
        }
    }

    println!(
        "settled: index={:?} state={:?}",
        view.active_index(),
        view.scroll_state()
    );
}
