use timeline_rs::api::GroupRegistry;
use timeline_rs::core::{TimeWindow, ZoomLevelTable};
use timeline_rs::{ChartId, TimelineConfig, ZoomPanCoordinator};

#[test]
fn get_or_create_reuses_group_with_closed_span() {
    let levels = ZoomLevelTable::default();
    let minute = levels.level(1).expect("minute level");
    let mut registry = GroupRegistry::new(levels.len());

    registry.get_or_create(minute, 60_000, 0).extend(120_000);
    assert_eq!(registry.group_count(), 1);

    let same = registry.get_or_create(minute, 60_000, 120_000);
    assert_eq!(same.start(), 0);
    assert_eq!(registry.group_count(), 1);

    assert!(registry.lookup(minute, 120_000).is_some());
    assert!(registry.lookup(minute, 120_001).is_none());
    assert!(registry.lookup(minute, -1).is_none());

    let other = registry.get_or_create(minute, 60_000, 500_000);
    assert_eq!(other.start(), 500_000);
    assert_eq!(other.end(), 500_000);
    assert_eq!(registry.group_count(), 2);
}

#[test]
fn levels_keep_separate_groups_for_the_same_instant() {
    let levels = ZoomLevelTable::default();
    let mut registry = GroupRegistry::new(levels.len());
    for level in levels.levels() {
        let length = levels.window_length_ms(level).expect("length");
        registry.get_or_create(level, length, 0).extend(length);
    }
    assert_eq!(registry.group_count(), levels.len());
    for level in levels.levels() {
        assert_eq!(registry.groups(level).len(), 1);
        assert_eq!(registry.groups(level)[0].level(), level);
    }
}

#[test]
fn charts_do_not_share_groups() {
    let now = chrono::DateTime::from_timestamp_millis(1_700_000_000_000).expect("valid instant");
    let mut coordinator =
        ZoomPanCoordinator::new(TimelineConfig::default(), now).expect("coordinator init");
    let a = ChartId::new("A");
    let b = ChartId::new("B");
    coordinator.register_chart(a.clone()).expect("register A");
    coordinator.register_chart(b.clone()).expect("register B");

    coordinator
        .add_bars(&a, &[TimeWindow::new(0, 60_000, 1.0)], &[])
        .expect("bars for A");

    let registry_a = coordinator.chart(&a).expect("chart A").registry();
    let registry_b = coordinator.chart(&b).expect("chart B").registry();
    assert_eq!(registry_a.group_count(), 1);
    assert_eq!(registry_b.group_count(), 0);
    assert_eq!(registry_a.iter().count(), 1);
}
