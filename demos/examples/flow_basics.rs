// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Build a small flowchart by dragging templates, with a simple ASCII tree.
//!
//! This example drives the engine with pointer events only and prints the surface
//! commands it returns, then the resulting tree and its arrows.
//!
//! Run:
//! - `cargo run -p understory_flow_demos --example flow_basics`

use kurbo::{Point, Rect, Size};
use understory_flow_drag::{
    CanvasFrame, DownTarget, EngineConfig, FlowEngine, PointerButtons, SurfaceOp,
};
use understory_flow_geometry::ArrowRouting;
use understory_flow_tree::{BlockId, Registry};

/// Template rectangles sit in a sidebar at the right of the canvas.
fn template_rect(row: usize, width: f64) -> Rect {
    Rect::from_origin_size(Point::new(900.0, 40.0 + 60.0 * row as f64), Size::new(width, 30.0))
}

/// Drag a template and release it with the block centered at `at`.
fn drop_template(
    engine: &mut FlowEngine<&'static str>,
    row: usize,
    width: f64,
    at: Point,
) -> Vec<SurfaceOp<&'static str>> {
    let names = ["start", "action", "decision", "end"];
    let rect = template_rect(row, width);
    let down = DownTarget::Template {
        source: names[row % names.len()],
        rect,
    };
    let grab = rect.center();
    let mut ops = engine.pointer_down(down, grab, PointerButtons::PRIMARY);
    // A few intermediate moves, as a real pointer would produce.
    for t in [0.25, 0.5, 0.75] {
        ops.extend(engine.pointer_move(grab.lerp(at, t)));
    }
    ops.extend(engine.pointer_up(at));
    ops
}

fn main() {
    let mut engine = FlowEngine::new(
        EngineConfig::with_padding(20.0, 30.0),
        CanvasFrame::new(Size::new(1000.0, 700.0)),
    );

    let ops = drop_template(&mut engine, 0, 80.0, Point::new(300.0, 60.0));
    println!("== Drop first block ==");
    for op in &ops {
        println!("  {:?}", op);
    }

    // Three steps under the start block, then a decision under the middle one.
    for width in [100.0, 140.0, 100.0] {
        drop_template(&mut engine, 1, width, Point::new(300.0, 65.0));
    }
    let middle = engine.registry().get(BlockId(2)).map_or(Point::ZERO, |b| b.center);
    let ops = drop_template(&mut engine, 2, 120.0, middle);
    println!("\n== Drop onto block #2 ==");
    for op in ops.iter().filter(|op| !matches!(op, SurfaceOp::MoveBlock { .. })) {
        println!("  {:?}", op);
    }

    // Dropped on empty canvas with a root present: discarded.
    let ops = drop_template(&mut engine, 3, 60.0, Point::new(800.0, 600.0));
    assert!(ops.contains(&SurfaceOp::RemoveBlock { id: BlockId(5) }));

    println!();
    print_ascii_tree(engine.registry());

    println!("\n== Arrows ==");
    for (child, arrow) in engine.registry().arrows(engine.config().layout.padding_y) {
        let dir = match arrow.routing {
            ArrowRouting::Leftward => "left ",
            ArrowRouting::Rightward => "right",
        };
        let (s, t) = (arrow.start(), arrow.tip());
        println!(
            "  -> {}  {}  ({:.0},{:.0}) to ({:.0},{:.0})",
            child, dir, s.x, s.y, t.x, t.y
        );
    }
}

fn print_ascii_tree(reg: &Registry) {
    println!("Tree:");
    let Some(root) = reg.root() else {
        println!("  (empty)");
        return;
    };
    print_node("", reg, root);
    fn go(reg: &Registry, node: BlockId, prefix: &str) {
        let kids = reg.child_ids(node);
        let len = kids.len();
        for (i, &k) in kids.iter().enumerate() {
            let last = i + 1 == len;
            let branch = if last { "└── " } else { "├── " };
            print_node(&format!("{}{}", prefix, branch), reg, k);
            let next_prefix = if last {
                format!("{}    ", prefix)
            } else {
                format!("{}│   ", prefix)
            };
            go(reg, k, &next_prefix);
        }
    }
    go(reg, root, "");
}

fn print_node(prefix: &str, reg: &Registry, id: BlockId) {
    if let Some(b) = reg.get(id) {
        let r = b.rect();
        println!(
            "{}{}  rect=({:.0},{:.0})–({:.0},{:.0})  child_width={:.0}",
            prefix, id, r.x0, r.y0, r.x1, r.y1, b.child_width
        );
    }
}
