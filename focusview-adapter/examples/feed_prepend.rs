use focusview::{Item, Size};
use focusview_adapter::{GestureEvent, ScrollOptions, ScrollView};

#[derive(Debug)]
struct Post {
    id: u64,
    height: f64,
}

impl Item for Post {
    type Id = u64;

    fn id(&self) -> u64 {
        self.id
    }

    fn size(&self) -> Size {
        Size::new(400.0, self.height)
    }
}

fn main() {
    // Example: keep the surface on the same post while older posts load above it.
    //
    // 1) capture an anchor (item identity + position) before the data changes
    // 2) apply the data change
    // 3) apply the anchor so the same post stays in the same place
    let posts: Vec<Post> = (1000..1100).map(|id| Post { id, height: 120.0 }).collect();
    let mut view = ScrollView::new(posts, ScrollOptions::default()).expect("valid options");
    view.set_viewport(Size::new(400.0, 800.0));

    view.scroll_to(40).expect("index in range");
    view.on_gesture_start();
    view.on_gesture_update(GestureEvent::touch(-35.0, 0.0));
    view.on_gesture_end(GestureEvent::touch(0.0, 0.0));

    let anchor = view.capture_anchor().expect("anchor is set");
    println!("before prepend: index={:?} anchor={anchor:?}", view.active_index());

    view.update_sequence(|posts| {
        let newer = std::mem::take(posts);
        posts.extend((900..910).map(|id| Post { id, height: 200.0 }));
        posts.extend(newer);
    });

    let ok = view.apply_anchor(&anchor, |k| match *k {
        900..910 => Some((*k - 900) as usize),
        1000..1100 => Some((*k - 1000) as usize + 10),
        _ => None,
    });
    println!(
        "after prepend: ok={ok} index={:?} position={} events={:?}",
        view.active_index(),
        view.position(),
        view.take_events()
    );
}
