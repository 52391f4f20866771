use super::*;

#[test]
fn computes_absolute_minute_within_first_day() {
    assert_eq!(absolute_minute(1, 0), 0);
    assert_eq!(absolute_minute(1, 480), 480);
}

#[test]
fn computes_absolute_minute_across_days() {
    // Tuesday 00:00 is exactly one day (1440 min) after Monday 00:00.
    assert_eq!(absolute_minute(2, 0), MINUTES_PER_DAY);
    assert_eq!(absolute_minute(7, 0), 6 * MINUTES_PER_DAY);
}

#[test]
fn canonical_signature_is_stable_and_16_chars() {
    let sig_a = canonical_signature(&["1", "480", "960", "", ""]);
    let sig_b = canonical_signature(&["1", "480", "960", "", ""]);
    assert_eq!(sig_a, sig_b);
    assert_eq!(sig_a.len(), 16);
}

#[test]
fn canonical_signature_differs_on_field_order() {
    let a = canonical_signature(&["1", "480", "960"]);
    let b = canonical_signature(&["480", "1", "960"]);
    assert_ne!(a, b);
}

#[test]
fn time_window_detects_cross_midnight() {
    let same_day = TimeWindow::new(480, 960);
    assert!(!same_day.crosses_midnight());

    let overnight = TimeWindow::new(22 * 60, 30 * 60);
    assert!(overnight.crosses_midnight());
    assert_eq!(overnight.duration_min(), 8 * 60);
}

#[test]
fn week_category_classifies_by_active_day_count() {
    assert_eq!(WeekCategory::from_active_day_count(0), WeekCategory::ShortWeek);
    assert_eq!(WeekCategory::from_active_day_count(3), WeekCategory::ShortWeek);
    assert_eq!(WeekCategory::from_active_day_count(4), WeekCategory::Compressed);
    assert_eq!(WeekCategory::from_active_day_count(5), WeekCategory::Compressed);
    assert_eq!(WeekCategory::from_active_day_count(6), WeekCategory::Normal);
    assert_eq!(WeekCategory::from_active_day_count(7), WeekCategory::Normal);
}
