// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rearranging subtrees: move, cancel, veto, and save/restore.
//!
//! Run:
//! - `cargo run -p understory_flow_demos --example flow_rearrange`

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::{Point, Size};
use understory_flow_drag::{
    CanvasFrame, DownTarget, EngineConfig, Field, FlowEngine, Hooks, Output, PayloadSource,
    PointerButtons, SurfaceOp,
};
use understory_flow_tree::{Block, BlockId, BlockRecord};

struct Labels;

impl PayloadSource for Labels {
    fn markup(&self) -> String {
        "<div id=\"canvas\">…</div>".into()
    }

    fn fields(&self, id: BlockId) -> Vec<Field> {
        vec![Field {
            name: "label".into(),
            value: format!("step {}", id.0),
        }]
    }
}

/// Root with two children; the first child has two children of its own.
fn seed() -> Output {
    let blocks = [
        Block::new(BlockId(0), None, Point::new(300.0, 50.0), Size::new(80.0, 30.0)),
        Block::new(BlockId(1), Some(BlockId(0)), Point::ZERO, Size::new(100.0, 30.0)),
        Block::new(BlockId(2), Some(BlockId(0)), Point::ZERO, Size::new(100.0, 30.0)),
        Block::new(BlockId(3), Some(BlockId(1)), Point::ZERO, Size::new(60.0, 30.0)),
        Block::new(BlockId(4), Some(BlockId(1)), Point::ZERO, Size::new(60.0, 30.0)),
    ];
    Output {
        markup: String::new(),
        blocks_arr: blocks.iter().map(BlockRecord::from_block).collect(),
        blocks: Vec::new(),
    }
}

/// Grab `id` and drop it onto `onto`, wherever that block sits once `id` is lifted out.
fn drag_onto(engine: &mut FlowEngine<()>, id: u32, onto: u32) -> Vec<SurfaceOp<()>> {
    let from = engine.registry().get(BlockId(id)).map_or(Point::ZERO, |b| b.center);
    let mut ops = engine.pointer_down(DownTarget::Block(BlockId(id)), from, PointerButtons::PRIMARY);
    let to = engine.registry().get(BlockId(onto)).map_or(Point::ZERO, |b| b.center);
    ops.extend(engine.pointer_move(to));
    ops.extend(engine.pointer_up(to));
    ops
}

fn drag(engine: &mut FlowEngine<()>, id: u32, to: Point) -> Vec<SurfaceOp<()>> {
    let from = engine.registry().get(BlockId(id)).map_or(Point::ZERO, |b| b.center);
    let mut ops = engine.pointer_down(DownTarget::Block(BlockId(id)), from, PointerButtons::PRIMARY);
    ops.extend(engine.pointer_move(to));
    ops.extend(engine.pointer_up(to));
    ops
}

fn print_blocks(title: &str, engine: &FlowEngine<()>) {
    println!("== {} ==", title);
    for b in engine.registry().iter() {
        let parent = b.parent.map_or_else(|| "-".to_string(), |p| p.to_string());
        println!(
            "  {:<4} parent={:<4} center=({:.0},{:.0})",
            b.id.to_string(),
            parent,
            b.center.x,
            b.center.y
        );
    }
}

fn main() {
    let vetoes = Rc::new(RefCell::new(Vec::new()));
    let log = Rc::clone(&vetoes);
    let hooks = Hooks::new()
        .with_grab(|id| println!("  [hook] grab {}", id))
        .with_rearrange(move |id, previous| {
            // Only block #4 may go back where it came from.
            let allow = id == BlockId(4);
            log.borrow_mut().push((id, previous, allow));
            allow
        });
    let mut engine = FlowEngine::new(
        EngineConfig::with_padding(20.0, 30.0),
        CanvasFrame::new(Size::new(1000.0, 700.0)),
    )
    .with_hooks(hooks);

    engine.import(&seed());
    print_blocks("Imported", &engine);

    // Move block #1 (with #3 and #4) under block #2.
    let ops = drag_onto(&mut engine, 1, 2);
    let grouped = ops
        .iter()
        .filter(|op| matches!(op, SurfaceOp::GroupUnder { .. }))
        .count();
    println!("  carried {} descendants", grouped);
    print_blocks("After moving #1 under #2", &engine);

    // Drop #4 on empty canvas: the hook lets it return.
    let before = engine.blocks();
    drag(&mut engine, 4, Point::new(900.0, 600.0));
    assert_eq!(engine.blocks(), before);
    print_blocks("After cancelled drag of #4", &engine);

    // Drop #3 on empty canvas: the hook refuses, so it is discarded.
    let ops = drag(&mut engine, 3, Point::new(900.0, 600.0));
    assert!(ops.contains(&SurfaceOp::RemoveBlock { id: BlockId(3) }));
    print_blocks("After vetoed drag of #3", &engine);
    println!("  rearrange decisions: {:?}", vetoes.borrow());

    // Save and restore into a fresh engine.
    let saved = engine.output(&Labels);
    let mut restored: FlowEngine<()> = FlowEngine::new(
        EngineConfig::with_padding(20.0, 30.0),
        CanvasFrame::new(Size::new(1000.0, 700.0)),
    );
    restored.import(&saved);
    assert_eq!(restored.blocks(), engine.blocks());
    println!("\n== Saved payload ==");
    for b in &saved.blocks {
        println!("  {} parent={:?} data={:?}", b.id, b.parent, b.data);
    }
}
