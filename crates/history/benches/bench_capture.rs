use std::hint::black_box;
use std::time::Instant;

use colsnap_common::{Column, ColumnData, SourceId};
use colsnap_history::{HistoryTable, Snapshot};

fn make_data(rows: usize, columns: usize) -> ColumnData {
    let mut data = ColumnData::new();
    for c in 0..columns {
        let name = format!("col{c}");
        let column = if c % 2 == 0 {
            Column::Float64((0..rows).map(|i| i as f64 * 0.5).collect())
        } else {
            Column::values((0..rows).map(|i| format!("row-{i}")))
        };
        data.insert(name, column);
    }
    data
}

fn bench_capture(rows: usize, columns: usize, iterations: usize) {
    let data = make_data(rows, columns);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = black_box(Snapshot::capture(black_box(&data)));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  capture ({rows} rows x {columns} cols, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_push_pop(rows: usize, depth: usize) {
    let data = make_data(rows, 4);
    let id = SourceId::new();
    let mut table = HistoryTable::new();

    let start = Instant::now();
    for _ in 0..depth {
        if let Ok(snap) = Snapshot::capture(&data) {
            table.push(id, snap);
        }
    }
    while let Some(snap) = table.pop(id) {
        black_box(snap.into_data());
    }
    let elapsed = start.elapsed();
    println!("  push+pop ({rows} rows, depth {depth}): total {elapsed:?}");
}

fn main() {
    println!("=== Snapshot Capture Benchmarks ===\n");

    println!("Capture:");
    bench_capture(100, 4, 10000);
    bench_capture(10_000, 4, 100);
    bench_capture(100_000, 8, 10);

    println!("\nHistory push/pop:");
    bench_push_pop(1000, 100);
    bench_push_pop(100_000, 10);

    println!("\n=== Done ===");
}
