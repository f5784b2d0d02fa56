use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use proptest::prelude::*;
use timeline_rs::core::{RenderGroup, TimeWindow, ZoomLevelTable, ZoomTransform};
use timeline_rs::{ChartId, TimelineConfig, ZoomPanCoordinator};

const MINUTE_MS: i64 = 60_000;
const BASE_MS: i64 = 1_699_999_980_000;

fn minute_batch(base: i64, offset: i64, count: i64, height: f64) -> Vec<TimeWindow> {
    (0..count)
        .map(|i| {
            let start = base + (offset + i) * MINUTE_MS;
            TimeWindow::new(start, start + MINUTE_MS, height)
        })
        .collect()
}

fn sized_coordinator(charts: &[&str]) -> ZoomPanCoordinator {
    let config = TimelineConfig::default().with_epoch_origin_ms(0);
    let now = DateTime::<Utc>::from_timestamp_millis(720_000_000).expect("valid instant");
    let mut coordinator = ZoomPanCoordinator::new(config, now).expect("coordinator init");
    for id in charts {
        coordinator
            .register_chart(ChartId::new(*id))
            .expect("register chart");
    }
    coordinator.resize(1000.0).expect("resize");
    coordinator
}

proptest! {
    #[test]
    fn every_added_window_lives_in_exactly_one_containing_group(
        batches in prop::collection::vec((0i64..400, 1i64..30, 0.0f64..20.0), 1..12)
    ) {
        let now = DateTime::<Utc>::from_timestamp_millis(BASE_MS + 1_000 * MINUTE_MS)
            .expect("valid instant");
        let mut coordinator =
            ZoomPanCoordinator::new(TimelineConfig::default(), now).expect("coordinator init");
        let chart = ChartId::new("A");
        coordinator.register_chart(chart.clone()).expect("register");

        let mut added = BTreeSet::new();
        for (offset, count, height) in batches {
            let batch = minute_batch(BASE_MS, offset, count, height);
            added.extend(batch.iter().map(|w| w.window_start));
            let outcome = coordinator.add_bars(&chart, &batch, &[]).expect("add bars");
            prop_assert_eq!(outcome.level.index(), 1);
        }

        let minute = coordinator.levels().level(1).expect("minute level");
        let groups = coordinator.chart(&chart).expect("chart").registry().groups(minute);
        for start in added {
            let owners: Vec<&RenderGroup> = groups
                .iter()
                .filter(|g| g.windows().iter().any(|w| w.window_start == start))
                .collect();
            prop_assert_eq!(owners.len(), 1);
            prop_assert!(owners[0].contains(start));
        }
    }

    #[test]
    fn local_positions_do_not_depend_on_absolute_time(
        base_minutes in -1_000_000_000i64..1_000_000_000,
        count in 1i64..200
    ) {
        let levels = ZoomLevelTable::default();
        let minute = levels.level(1).expect("minute level");
        let geometry = TimelineConfig::default().bar_geometry().expect("geometry");
        let base = base_minutes * MINUTE_MS;

        let mut group = RenderGroup::new(minute, MINUTE_MS, base);
        let batch = minute_batch(base, 0, count, 5.0);
        group.extend(batch[batch.len() - 1].window_end);
        group.merge_windows(&batch);
        group.render_geometry(&geometry);

        for (i, rect) in group.container().rects().iter().enumerate() {
            prop_assert_eq!(rect.x, i as f64 * geometry.bar_interval);
            prop_assert!(rect.x <= count as f64 * geometry.bar_interval);
        }
    }

    #[test]
    fn extend_never_moves_start_or_shrinks_end(
        start in -1_000_000i64..1_000_000,
        ends in prop::collection::vec(-2_000_000i64..2_000_000, 1..40)
    ) {
        let minute = ZoomLevelTable::default().level(1).expect("minute level");
        let mut group = RenderGroup::new(minute, MINUTE_MS, start);
        let mut previous_end = group.end();
        for end in ends {
            group.extend(end);
            prop_assert_eq!(group.start(), start);
            prop_assert!(group.end() >= previous_end);
            prop_assert_eq!(group.end(), previous_end.max(end));
            previous_end = group.end();
        }
    }

    #[test]
    fn merging_twice_equals_merging_once(
        count in 1i64..50,
        height in 0.0f64..10.0
    ) {
        let minute = ZoomLevelTable::default().level(1).expect("minute level");
        let batch = minute_batch(0, 0, count, height);
        let mut group = RenderGroup::new(minute, MINUTE_MS, 0);
        group.merge_windows(&batch);
        let once = group.windows().to_vec();
        group.merge_windows(&batch);
        prop_assert_eq!(group.windows(), once.as_slice());
    }

    #[test]
    fn overlapping_merge_replaces_only_the_overlap(
        existing in 1i64..60,
        offset in 0i64..80,
        count in 1i64..40
    ) {
        let minute = ZoomLevelTable::default().level(1).expect("minute level");
        let old = minute_batch(0, 0, existing, 1.0);
        let new = minute_batch(0, offset, count, 7.0);
        let mut group = RenderGroup::new(minute, MINUTE_MS, 0);
        group.merge_windows(&old);
        group.merge_windows(&new);

        let span = (new[0].window_start, new[new.len() - 1].window_end);
        let retained = group.windows();
        prop_assert!(retained.windows(2).all(|p| p[0].window_start < p[1].window_start));
        for window in retained {
            let in_span = window.window_start >= span.0 && window.window_start < span.1;
            prop_assert_eq!(window.height, if in_span { 7.0 } else { 1.0 });
        }
        let kept_old = old
            .iter()
            .filter(|w| w.window_start < span.0 || w.window_start >= span.1)
            .count();
        prop_assert_eq!(retained.len(), kept_old + new.len());
    }

    #[test]
    fn at_most_one_level_is_visible_for_any_transform(
        exponent in 0.0f64..24.8,
        x_fraction in 0.0f64..1.0
    ) {
        let mut coordinator = sized_coordinator(&["A"]);
        let chart = ChartId::new("A");
        let levels = coordinator.levels().clone();
        for level in levels.levels().take(4) {
            let length = levels.window_length_ms(level).expect("length");
            coordinator
                .add_bars(&chart, &[TimeWindow::new(0, length, 1.0)], &[])
                .expect("add bars");
        }

        let k = exponent.exp2();
        let x = -(k - 1.0) * 1000.0 * x_fraction;
        let outcome = coordinator.zoom(&chart, ZoomTransform { k, x }).expect("zoom");
        prop_assert!(outcome.visible_level.is_some());

        let registry = coordinator.chart(&chart).expect("chart").registry();
        for group in registry.iter() {
            if group.container().is_visible() {
                prop_assert_eq!(Some(group.level()), outcome.visible_level);
            }
        }
    }

    #[test]
    fn gestures_from_any_chart_keep_every_chart_in_sync(
        gestures in prop::collection::vec((0usize..3, 1.0f64..4096.0, -1.0e6f64..0.0), 1..10)
    ) {
        let ids = ["A", "B", "C"];
        let mut coordinator = sized_coordinator(&ids);
        for (source, k, x) in gestures {
            let outcome = coordinator
                .zoom(&ChartId::new(ids[source]), ZoomTransform { k, x })
                .expect("zoom");
            for id in coordinator.chart_ids() {
                prop_assert_eq!(
                    coordinator.chart(id).expect("chart").transform(),
                    outcome.transform
                );
            }
        }
    }
}
