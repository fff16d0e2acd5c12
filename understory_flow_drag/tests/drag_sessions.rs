// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Random pointer sessions against the engine.
//!
//! Each case seeds a root, then replays a random mix of template drops, cancelled rearranges,
//! and rearranges onto other blocks, checking the tree after every release.

use kurbo::{Point, Rect, Size};
use proptest::prelude::*;
use understory_flow_drag::{
    CanvasFrame, DownTarget, DragPhase, EngineConfig, FlowEngine, PointerButtons, SurfaceOp,
};
use understory_flow_tree::{Block, BlockId, Registry};

const EPS: f64 = 1e-6;

#[derive(Debug, Clone)]
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self {
            state: seed ^ 0x2545_F491_4F6C_DD1D,
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state >> 11
    }

    fn choose<T: Copy>(&mut self, items: &[T]) -> T {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn next_f64(&mut self, min: f64, max: f64) -> f64 {
        let unit = (self.next_u64() % 10_000) as f64 / 10_000.0;
        min + unit * (max - min)
    }
}

type Engine = FlowEngine<u32>;

fn center(e: &Engine, id: BlockId) -> Point {
    e.registry().get(id).map(|b| b.center).unwrap()
}

fn drop_template(e: &mut Engine, rng: &mut Lcg, at: Point) -> Vec<SurfaceOp<u32>> {
    let size = Size::new(rng.next_f64(20.0, 120.0), rng.next_f64(15.0, 40.0));
    let rect = Rect::from_origin_size(Point::new(3000.0, 3000.0), size);
    let mut ops = e.pointer_down(
        DownTarget::Template { source: 7, rect },
        rect.center(),
        PointerButtons::PRIMARY,
    );
    ops.extend(e.pointer_up(at));
    ops
}

fn drag(e: &mut Engine, id: BlockId, to: Point) -> Vec<SurfaceOp<u32>> {
    let from = center(e, id);
    let mut ops = e.pointer_down(DownTarget::Block(id), from, PointerButtons::PRIMARY);
    ops.extend(e.pointer_move(to));
    ops.extend(e.pointer_up(to));
    ops
}

/// Grab `id`, then release it on `onto` wherever that block sits once the subtree is lifted.
fn drag_onto(e: &mut Engine, id: BlockId, onto: BlockId) -> Vec<SurfaceOp<u32>> {
    let from = center(e, id);
    let mut ops = e.pointer_down(DownTarget::Block(id), from, PointerButtons::PRIMARY);
    let to = center(e, onto);
    ops.extend(e.pointer_move(to));
    ops.extend(e.pointer_up(to));
    ops
}

fn descendants(reg: &Registry, id: BlockId) -> Vec<BlockId> {
    let mut out = vec![id];
    let mut i = 0;
    while i < out.len() {
        out.extend_from_slice(reg.child_ids(out[i]));
        i += 1;
    }
    out
}

/// Same ids, parents, and sizes in the same order; positions equal up to float noise.
fn assert_same_blocks(before: &[Block], after: &[Block]) {
    assert_eq!(before.len(), after.len(), "cancel keeps every block");
    for (a, b) in before.iter().zip(after) {
        assert_eq!((a.id, a.parent, a.size), (b.id, b.parent, b.size), "cancel restores structure");
        assert!((a.center - b.center).hypot() < EPS, "cancel restores positions");
        assert!((a.child_width - b.child_width).abs() < EPS, "cancel restores footprints");
    }
}

fn assert_tree(e: &Engine) {
    let reg = e.registry();
    let mut ids: Vec<BlockId> = reg.iter().map(|b| b.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), reg.len(), "ids are unique");
    assert_eq!(
        reg.iter().filter(|b| b.is_root()).count(),
        1,
        "exactly one root"
    );
    let padding_x = e.config().layout.padding_x;
    for p in reg.iter() {
        assert!(p.rect().x0 >= -EPS, "tree stays right of the canvas edge");
        let kids: Vec<&Block> = reg.children_of(p.id).collect();
        if kids.is_empty() {
            assert!((p.child_width - p.size.width).abs() < EPS, "leaf footprint");
            continue;
        }
        let span: f64 = kids.iter().map(|c| c.lay_width()).sum::<f64>()
            + padding_x * (kids.len() - 1) as f64;
        assert!(
            (p.child_width - p.size.width.max(span)).abs() < EPS,
            "footprint covers the row"
        );
        for c in kids {
            assert!(
                (c.center.x - p.center.x).abs() <= p.child_width / 2.0 + EPS,
                "child within parent footprint"
            );
        }
    }
}

fn run(seed: u64, steps: usize) {
    let mut rng = Lcg::new(seed);
    let mut e: Engine = FlowEngine::new(
        EngineConfig::with_padding(rng.next_f64(0.0, 30.0), rng.next_f64(5.0, 30.0)),
        CanvasFrame::new(Size::new(1200.0, 900.0)),
    );
    drop_template(&mut e, &mut rng, Point::new(400.0, 80.0));
    assert_eq!(e.registry().len(), 1, "first drop roots the tree");

    for _ in 0..steps {
        let ids: Vec<BlockId> = e.registry().iter().map(|b| b.id).collect();
        let non_root: Vec<BlockId> = ids.iter().copied().filter(|id| *id != ids[0]).collect();
        match rng.next_u64() % 3 {
            0 => {
                let onto = center(&e, rng.choose(&ids));
                let before = e.registry().len();
                drop_template(&mut e, &mut rng, onto);
                assert_eq!(e.registry().len(), before + 1, "drop on a block attaches");
            }
            1 if !non_root.is_empty() => {
                let id = rng.choose(&non_root);
                let before: Vec<Block> = e.registry().iter().cloned().collect();
                // Far above every block: no target, so the subtree goes back.
                drag(&mut e, id, Point::new(600.0, -500.0));
                let after: Vec<Block> = e.registry().iter().cloned().collect();
                assert_same_blocks(&before, &after);
            }
            _ if !non_root.is_empty() => {
                let id = rng.choose(&non_root);
                let moving = descendants(e.registry(), id);
                let targets: Vec<BlockId> =
                    ids.iter().copied().filter(|t| !moving.contains(t)).collect();
                let onto = rng.choose(&targets);
                let before = e.registry().len();
                drag_onto(&mut e, id, onto);
                assert_eq!(e.registry().len(), before, "rearrange keeps every block");
                assert!(e.registry().get(id).and_then(|b| b.parent).is_some());
            }
            _ => {}
        }
        assert_eq!(e.phase(), DragPhase::Idle);
        assert_tree(&e);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn random_sessions_keep_the_tree_consistent(seed in any::<u64>(), steps in 5usize..40) {
        run(seed, steps);
    }
}
