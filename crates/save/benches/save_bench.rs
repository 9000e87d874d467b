//! Save/load performance benchmarks at a few map sizes.
//!
//! Measures the container codec on its own and the full orchestrated
//! pipeline (read lock + capture + encode + envelope, and the reverse) for
//! games with 100, 1K, and 10K territories.
//!
//! Run with: `cargo bench -p save --bench save_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use save::{Container, SaveConfig, SaveLoadManager};
use simulation::delegates::{EndTurnDelegate, MoveDelegate, PurchaseDelegate, UnitMove};
use simulation::{
    Delegate, DelegateList, GameData, GameState, PlayerData, SharedGameState, TerritoryData,
};

const SIZES: [usize; 3] = [100, 1_000, 10_000];

// ---------------------------------------------------------------------------
// Helpers: build synthetic games at various scales
// ---------------------------------------------------------------------------

fn build_synthetic_game(territory_count: usize) -> SharedGameState {
    let mut data = GameData::new("Benchmark World");
    for p in 0..8 {
        data.players.push(PlayerData {
            name: format!("player_{p}"),
            alliance: if p % 2 == 0 { "Axis" } else { "Allies" }.to_string(),
            resources: 30 + p as u32,
            ai: p > 0,
        });
    }
    for t in 0..territory_count {
        data.territories.push(TerritoryData {
            name: format!("territory_{t}"),
            owner: (t % 5 != 0).then(|| format!("player_{}", t % 8)),
            production: (t % 12) as u32,
            water: t % 5 == 0,
            units: [
                ("infantry".to_string(), (t % 7) as u32),
                ("armour".to_string(), (t % 3) as u32),
            ]
            .into_iter()
            .collect(),
        });
    }

    let mut purchase = PurchaseDelegate::default();
    purchase.initialize("purchase", "Purchase Units");
    purchase.purchase("infantry", 10, 3);

    let mut combat = MoveDelegate::default();
    combat.initialize("combatMove", "Combat Move");
    for m in 0..territory_count / 10 {
        combat.record(UnitMove {
            unit_type: "infantry".to_string(),
            count: 1,
            from: format!("territory_{m}"),
            to: format!("territory_{}", m + 1),
        });
    }

    let mut end_turn = EndTurnDelegate::default();
    end_turn.initialize("endTurn", "Turn Complete");

    let mut delegates = DelegateList::new();
    delegates.add_delegate(Box::new(purchase));
    delegates.add_delegate(Box::new(combat));
    delegates.add_delegate(Box::new(end_turn));
    SharedGameState::new(GameState::new(data, delegates))
}

// ---------------------------------------------------------------------------
// 1. CONTAINER ENCODE / DECODE (no envelope)
// ---------------------------------------------------------------------------

fn bench_container_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("container_codec");
    group.sample_size(20);
    let manager = SaveLoadManager::new(SaveConfig::default());

    for &count in &SIZES {
        let container = manager.capture(&build_synthetic_game(count));
        let encoded = container.encode().unwrap();
        group.bench_with_input(
            BenchmarkId::new("encode", format!("{count}_territories")),
            &container,
            |b, container| {
                b.iter(|| black_box(container.encode().unwrap()));
            },
        );
        group.bench_with_input(
            BenchmarkId::new("decode", format!("{count}_territories")),
            &encoded,
            |b, bytes| {
                b.iter(|| black_box(Container::decode(bytes).unwrap()));
            },
        );
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// 2. FULL SAVE PIPELINE: lock + capture + encode + compress
// ---------------------------------------------------------------------------

fn bench_full_save_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("save_full_pipeline");
    group.sample_size(20);

    for compress in [true, false] {
        let manager = SaveLoadManager::new(SaveConfig {
            compress,
            ..SaveConfig::default()
        });
        let label = if compress { "lz4" } else { "raw" };
        for &count in &SIZES {
            let state = build_synthetic_game(count);
            group.bench_with_input(
                BenchmarkId::new(label, format!("{count}_territories")),
                &state,
                |b, state| {
                    b.iter(|| black_box(manager.save(state).unwrap().len()));
                },
            );
        }
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// 3. FULL LOAD PIPELINE: decompress + policy + decode + reconstruct
// ---------------------------------------------------------------------------

fn bench_full_load_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_full_pipeline");
    group.sample_size(20);
    let manager = SaveLoadManager::new(SaveConfig::default());

    for &count in &SIZES {
        let bytes = manager.save(&build_synthetic_game(count)).unwrap();
        group.bench_with_input(
            BenchmarkId::new("load", format!("{count}_territories")),
            &bytes,
            |b, bytes| {
                b.iter(|| black_box(manager.load(bytes, None).unwrap().is_loaded()));
            },
        );
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Register all benchmark groups
// ---------------------------------------------------------------------------

criterion_group!(
    benches,
    bench_container_codec,
    bench_full_save_pipeline,
    bench_full_load_pipeline,
);
criterion_main!(benches);
