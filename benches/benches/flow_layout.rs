// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Size};
use understory_flow_drag::{CanvasFrame, DownTarget, EngineConfig, FlowEngine, PointerButtons};
use understory_flow_tree::{Block, BlockId, LayoutConfig, Registry};

const CONFIG: LayoutConfig = LayoutConfig::new(10.0, 20.0);

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

fn root() -> Block {
    Block::new(BlockId(0), None, Point::new(2000.0, 50.0), Size::new(120.0, 40.0))
}

/// Complete tree with the given fan-out, breadth-first ids.
fn gen_balanced(fanout: usize, depth: u32) -> Registry {
    let mut reg = Registry::new();
    let _ = reg.add(root());
    let mut level = vec![BlockId(0)];
    for _ in 0..depth {
        let mut next = Vec::with_capacity(level.len() * fanout);
        for &parent in &level {
            for _ in 0..fanout {
                let id = reg.next_id();
                let _ = reg.add(Block::new(id, Some(parent), Point::ZERO, Size::new(80.0, 30.0)));
                next.push(id);
            }
        }
        level = next;
    }
    reg
}

/// Each new block picks a random existing parent and a random size.
fn gen_random(count: usize, seed: u64) -> Registry {
    let mut rng = Rng::new(seed);
    let mut reg = Registry::new();
    let _ = reg.add(root());
    for i in 1..count {
        let parent = BlockId(rng.below(i) as u32);
        let size = Size::new(40.0 + rng.next_f64() * 120.0, 20.0 + rng.next_f64() * 40.0);
        let _ = reg.add(Block::new(BlockId(i as u32), Some(parent), Point::ZERO, size));
    }
    reg
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    for &depth in &[4u32, 6, 8] {
        let reg = gen_balanced(3, depth);
        group.throughput(Throughput::Elements(reg.len() as u64));
        group.bench_function(format!("balanced_fanout3_depth{}", depth), |b| {
            b.iter_batched(
                || reg.clone(),
                |mut reg| {
                    reg.layout(&CONFIG);
                    black_box(reg.correct_offset(0.0, 20.0));
                },
                BatchSize::SmallInput,
            )
        });
    }
    for &n in &[256usize, 1024, 4096] {
        let reg = gen_random(n, 0xCAFE_F00D_DEAD_BEEF);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("random_n{}", n), |b| {
            b.iter_batched(
                || reg.clone(),
                |mut reg| {
                    reg.layout(&CONFIG);
                    black_box(reg.arrows(CONFIG.padding_y).len());
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_attach(c: &mut Criterion) {
    let mut group = c.benchmark_group("attach_target");
    for &n in &[256usize, 1024, 4096] {
        let mut reg = gen_random(n, 0xBADC_F00D_1234_5678);
        reg.layout(&CONFIG);
        let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
        let points: Vec<Point> = (0..256)
            .map(|_| {
                let b = reg.get(BlockId(rng.below(n) as u32)).map_or(Point::ZERO, |b| b.center);
                Point::new(b.x + rng.next_f64() * 20.0 - 10.0, b.y)
            })
            .collect();
        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_function(format!("random_n{}", n), |b| {
            b.iter(|| {
                let hits = points
                    .iter()
                    .filter(|p| reg.attach_target(**p, CONFIG.padding_x).is_some())
                    .count();
                black_box(hits);
            })
        });
    }
    group.finish();
}

fn bench_rearrange(c: &mut Criterion) {
    let mut group = c.benchmark_group("rearrange");
    let mut reg = gen_balanced(3, 6);
    reg.layout(&CONFIG);
    group.bench_function("extract_restore_depth2_subtree", |b| {
        b.iter_batched(
            || reg.clone(),
            |mut reg| {
                if let Ok(temp) = reg.extract_subtree(BlockId(4)) {
                    let _ = reg.restore(temp);
                }
                reg.layout(&CONFIG);
                black_box(reg.len());
            },
            BatchSize::SmallInput,
        )
    });

    let frame = CanvasFrame::new(Size::new(4000.0, 2000.0));
    let config = EngineConfig::with_padding(CONFIG.padding_x, CONFIG.padding_y);
    let records = reg.records();
    group.bench_function("engine_drag_64_moves", |b| {
        b.iter_batched(
            || {
                let mut engine: FlowEngine<()> = FlowEngine::new(config, frame);
                let state = understory_flow_drag::Output {
                    markup: String::new(),
                    blocks_arr: records.clone(),
                    blocks: Vec::new(),
                };
                let _ = engine.import(&state);
                engine
            },
            |mut engine| {
                let from = engine.registry().get(BlockId(4)).map_or(Point::ZERO, |b| b.center);
                let _ = engine.pointer_down(DownTarget::Block(BlockId(4)), from, PointerButtons::PRIMARY);
                for i in 0..64 {
                    let _ = engine.pointer_move(Point::new(from.x + i as f64 * 10.0, from.y + 300.0));
                }
                black_box(engine.pointer_up(Point::new(from.x + 640.0, from.y + 300.0)).len());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_layout, bench_attach, bench_rearrange);
criterion_main!(benches);
