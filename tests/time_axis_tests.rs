use approx::assert_relative_eq;
use chrono::{DateTime, Utc};
use timeline_rs::api::{DEFAULT_EPOCH_ORIGIN_MS, time_axis_ticks};
use timeline_rs::core::{TimeScale, ZoomTransform};
use timeline_rs::{ChartId, TimelineConfig, ZoomPanCoordinator};

#[test]
fn day_ticks_across_a_week_and_a_bit() {
    let scale = TimeScale::new(0.0, 720_000_000.0, 0.0, 1000.0).expect("scale");
    let ticks = time_axis_ticks(scale);
    assert_eq!(ticks.len(), 9);
    assert_eq!(ticks[0].time_ms, 0);
    assert_eq!(ticks[0].label, "Jan 01");
    assert_eq!(ticks[1].time_ms, 86_400_000);
    assert_relative_eq!(ticks[1].x, 120.0);
    assert_eq!(ticks[8].label, "Jan 09");
}

#[test]
fn year_ticks_across_the_full_domain() {
    let scale = TimeScale::new(
        DEFAULT_EPOCH_ORIGIN_MS as f64,
        1_700_000_000_000.0,
        0.0,
        1000.0,
    )
    .expect("scale");
    let labels: Vec<String> = time_axis_ticks(scale)
        .into_iter()
        .map(|tick| tick.label)
        .collect();
    assert_eq!(
        labels,
        vec!["1900", "1920", "1940", "1960", "1980", "2000", "2020"]
    );
}

#[test]
fn ticks_are_ordered_and_inside_the_range() {
    let scale = TimeScale::new(1_699_990_000_000.0, 1_700_000_000_000.0, 0.0, 640.0)
        .expect("scale");
    let ticks = time_axis_ticks(scale);
    assert!(!ticks.is_empty());
    assert!(ticks.len() <= 16);
    assert!(ticks.windows(2).all(|pair| pair[0].time_ms < pair[1].time_ms));
    assert!(ticks.iter().all(|tick| (0.0..=640.0).contains(&tick.x)));
}

#[test]
fn coordinator_ticks_follow_the_zoomed_domain() {
    let config = TimelineConfig::default().with_epoch_origin_ms(0);
    let now = DateTime::<Utc>::from_timestamp_millis(720_000_000).expect("valid instant");
    let mut coordinator = ZoomPanCoordinator::new(config, now).expect("coordinator init");
    let chart = ChartId::new("A");
    coordinator.register_chart(chart.clone()).expect("register");
    coordinator.resize(1000.0).expect("resize");
    coordinator
        .zoom(&chart, ZoomTransform { k: 120.0, x: 0.0 })
        .expect("zoom");

    // About 100 minutes over 12 ticks snaps to quarter hours.
    let ticks = coordinator.time_axis_ticks().expect("ticks");
    let labels: Vec<&str> = ticks.iter().map(|tick| tick.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["00:00", "00:15", "00:30", "00:45", "01:00", "01:15", "01:30"]
    );
}
