use chrono::{DateTime, Utc};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use timeline_rs::core::{RenderGroup, TimeWindow, ZoomLevelTable, ZoomTransform};
use timeline_rs::{ChartId, TimelineConfig, ZoomPanCoordinator};

const MINUTE_MS: i64 = 60_000;
const NOW_MS: i64 = 1_700_000_000_000;

fn minute_windows(start: i64, count: i64) -> Vec<TimeWindow> {
    (0..count)
        .map(|i| {
            let window_start = start + i * MINUTE_MS;
            TimeWindow::new(window_start, window_start + MINUTE_MS, (i % 10) as f64)
        })
        .collect()
}

fn bench_merge_overlapping_batch_10k(c: &mut Criterion) {
    let minute = ZoomLevelTable::default()
        .level(1)
        .expect("minute level");
    let geometry = TimelineConfig::default()
        .bar_geometry()
        .expect("valid geometry");
    let existing = minute_windows(0, 10_000);
    let update = minute_windows(5_000 * MINUTE_MS, 500);

    c.bench_function("merge_overlapping_batch_10k", |b| {
        b.iter(|| {
            let mut group = RenderGroup::new(minute, MINUTE_MS, 0);
            group.extend(10_000 * MINUTE_MS);
            group.merge_windows(black_box(&existing));
            group.merge_windows(black_box(&update));
            group.render_geometry(&geometry);
            black_box(group.windows().len());
        })
    });
}

fn bench_zoom_500_groups_3_charts(c: &mut Criterion) {
    let now = DateTime::<Utc>::from_timestamp_millis(NOW_MS).expect("valid instant");
    let mut coordinator = ZoomPanCoordinator::new(TimelineConfig::default(), now)
        .expect("coordinator init");
    let charts = ["A", "B", "C"].map(ChartId::new);
    for chart in &charts {
        coordinator
            .register_chart(chart.clone())
            .expect("register chart");
        // Disjoint batches so every batch gets its own group.
        for group in 0..500 {
            let start = NOW_MS - (group + 1) * 200 * MINUTE_MS;
            coordinator
                .add_bars(chart, &minute_windows(start, 60), &[])
                .expect("add bars");
        }
    }
    coordinator.resize(1920.0).expect("resize");

    let k = coordinator.config().initial_zoom_scale();
    let mut step = 0.0;
    c.bench_function("zoom_500_groups_3_charts", |b| {
        b.iter(|| {
            step += 1.0;
            let transform = ZoomTransform {
                k,
                x: 1920.0 - 1920.0 * k + step % 50.0,
            };
            let outcome = coordinator
                .zoom(&charts[0], black_box(transform))
                .expect("zoom");
            black_box(outcome.visible_level);
        })
    });
}

criterion_group!(
    benches,
    bench_merge_overlapping_batch_10k,
    bench_zoom_500_groups_3_charts
);
criterion_main!(benches);
