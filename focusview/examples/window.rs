// Example: one layout pass, visibility callbacks and re-anchoring.
use std::cell::Cell;

use focusview::{Cursor, Focusable, Item, LayoutOptions, ScrollLayout, Size, Visibility};

struct Row {
    id: u32,
    height: Cell<f64>,
}

impl Item for Row {
    type Id = u32;

    fn id(&self) -> u32 {
        self.id
    }

    fn size(&self) -> Size {
        Size::new(320.0, self.height.get())
    }

    fn focusable(&self) -> Option<&dyn Focusable> {
        Some(self)
    }
}

impl Focusable for Row {
    fn on_visibility_change(&self, visibility: Visibility, extent: f64) {
        println!("  row {} -> {visibility:?} ({extent})", self.id);
    }
}

fn main() {
    let rows: Vec<Row> = (0..1_000)
        .map(|id| Row {
            id,
            height: Cell::new(40.0 + f64::from(id % 3) * 20.0),
        })
        .collect();
    let viewport = Size::new(320.0, 200.0);

    let mut layout = ScrollLayout::<u32>::new(LayoutOptions::scroll().with_margin(100.0))
        .expect("valid options");
    let Some(mut anchor) = Cursor::first(&rows) else {
        return;
    };

    let mut position = 0.0;
    for step in 0..4 {
        println!("pass {step}: anchor={} position={position}", anchor.index());
        let out = layout.render(&rows, anchor, position, 0.0, viewport);
        println!(
            "  mounted={:?} edge={:?}",
            out.records.iter().map(|r| r.index).collect::<Vec<_>>(),
            out.edge_event.map(|e| e.edge)
        );

        position -= 70.0;
        if let Some(shift) = layout.normalize(&rows, anchor, position, 0.0, viewport) {
            anchor = shift.anchor;
            position += shift.offset;
        }
    }

    // Sizes are read on every pass.
    rows[anchor.index()].height.set(150.0);
    let out = layout.render(&rows, anchor, position, 0.0, viewport);
    println!("after resize: {:?}", out.records.first());
}
