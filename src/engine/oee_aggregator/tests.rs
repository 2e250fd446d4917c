use super::*;
use crate::domain::catalog::MachineCatalogEntry;
use crate::domain::shift::DowntimeEntry;
use crate::domain::types::DowntimeCategory;
use chrono::NaiveDate;

// ==========================================
// 测试辅助函数
// ==========================================

const EPS: f64 = 1e-12;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
}

/// 60 EPH = 1 件/分钟, 便于手算
fn test_catalog() -> MachineCatalog {
    MachineCatalog::new(vec![
        MachineCatalogEntry::new("Tubo", "Doblado", 60.0),
        MachineCatalogEntry::new("Perforado", "Perforado", 120.0),
    ])
}

fn create_test_record(day: u32, start: &str, end: &str, total: i64, good: i64) -> ShiftRecord {
    let mut record = ShiftRecord::new(date(day));
    record.machine = Some("Tubo".to_string());
    record.process = Some("Doblado".to_string());
    record.start_time = Some(start.to_string());
    record.end_time = Some(end.to_string());
    record.total_pieces = Some(total);
    record.good_pieces = Some(good);
    record
}

fn metrics_with(scheduled_minutes: f64, oee: f64) -> OeeMetrics {
    OeeMetrics {
        scheduled_minutes,
        planned_downtime_minutes: 0.0,
        unplanned_downtime_minutes: 0.0,
        good_pieces: 0,
        defective_pieces: 0,
        running_minutes: scheduled_minutes,
        speed_loss_minutes: 0.0,
        ideal_production_minutes: scheduled_minutes,
        quality_loss_minutes: 0.0,
        net_good_minutes: scheduled_minutes,
        availability: 1.0,
        performance: 1.0,
        quality: 1.0,
        oee,
        rate: crate::domain::catalog::RateLookup::Matched {
            standard_rate: 60.0,
            rate_per_minute: 1.0,
        },
    }
}

// ==========================================
// 加权规则
// ==========================================

#[test]
fn test_weighted_oee_uses_scheduled_minutes() {
    let metrics = vec![metrics_with(100.0, 0.5), metrics_with(300.0, 0.9)];

    let aggregate = aggregate_metrics(metrics.iter());

    let oee = aggregate.oee.unwrap();
    assert!((oee - 0.8).abs() < 1e-9);
    assert!((oee - 0.7).abs() > 0.05);
    assert_eq!(aggregate.totals.scheduled_minutes, 400.0);
    assert_eq!(aggregate.computed_count, 2);
}

#[test]
fn test_single_record_reproduces_its_metrics() {
    let mut record = create_test_record(3, "08:00", "16:00", 380, 361);
    record.downtime_entries = vec![
        DowntimeEntry::new(DowntimeCategory::Planned, 30.0),
        DowntimeEntry::new(DowntimeCategory::Anomaly, 12.0),
    ];
    let catalog = test_catalog();
    let per_record = *OeeCalculator::new()
        .compute(&record, &catalog)
        .metrics()
        .unwrap();

    let aggregate = OeeAggregator::new().aggregate(&[record], &catalog, &DateRangeFilter::all());

    assert!((aggregate.oee.unwrap() - per_record.oee).abs() < EPS);
    assert_eq!(aggregate.availability, Some(per_record.availability));
    assert_eq!(aggregate.performance, Some(per_record.performance));
    assert_eq!(aggregate.quality, Some(per_record.quality));
    assert_eq!(aggregate.totals.running_minutes, per_record.running_minutes);
    assert_eq!(aggregate.totals.net_good_minutes, per_record.net_good_minutes);
}

#[test]
fn test_single_fast_record_keeps_performance_capped() {
    // 理想时间 > 运行时间
    let record = create_test_record(3, "08:00", "09:00", 90, 90);
    let aggregate =
        OeeAggregator::new().aggregate(&[record], &test_catalog(), &DateRangeFilter::all());

    assert_eq!(aggregate.performance, Some(1.0));
}

#[test]
fn test_weighted_ratios_follow_time_sums() {
    let mut a = create_test_record(1, "08:00", "10:00", 100, 90); // 120 分钟
    a.downtime_entries = vec![DowntimeEntry::new(DowntimeCategory::Unplanned, 20.0)];
    let b = create_test_record(2, "08:00", "14:00", 200, 200); // 360 分钟

    let aggregate =
        OeeAggregator::new().aggregate(&[a, b], &test_catalog(), &DateRangeFilter::all());

    // 运行 100 + 360, 理想 100 + 200, 有效 90 + 200
    assert!((aggregate.availability.unwrap() - 460.0 / 480.0).abs() < EPS);
    assert!((aggregate.performance.unwrap() - 300.0 / 460.0).abs() < EPS);
    assert!((aggregate.quality.unwrap() - 290.0 / 300.0).abs() < EPS);
    assert_eq!(aggregate.totals.unplanned_downtime_minutes, 20.0);
    assert_eq!(aggregate.totals.good_pieces, 290);
    assert_eq!(aggregate.totals.defective_pieces, 10);
}

// ==========================================
// 空集 / 排除
// ==========================================

#[test]
fn test_empty_input_has_no_data() {
    let aggregate = OeeAggregator::new().aggregate(&[], &test_catalog(), &DateRangeFilter::all());

    assert!(aggregate.is_empty());
    assert_eq!(aggregate.oee, None);
    assert_eq!(aggregate.availability, None);
    assert_eq!(aggregate.performance, None);
    assert_eq!(aggregate.quality, None);
    assert_eq!(aggregate.totals, MetricTotals::default());
}

#[test]
fn test_not_computable_records_are_excluded() {
    let good = create_test_record(1, "08:00", "12:00", 200, 190);
    let mut missing_end = create_test_record(1, "08:00", "12:00", 500, 500);
    missing_end.end_time = None;
    let overnight = create_test_record(2, "22:00", "06:00", 500, 500);

    let records = vec![good.clone(), missing_end, overnight];
    let catalog = test_catalog();
    let aggregator = OeeAggregator::new();

    let with_bad = aggregator.aggregate(&records, &catalog, &DateRangeFilter::all());
    let only_good = aggregator.aggregate(&[good], &catalog, &DateRangeFilter::all());

    assert_eq!(with_bad.computed_count, 1);
    assert_eq!(with_bad.skipped_count, 2);
    assert_eq!(with_bad.totals, only_good.totals);
    assert_eq!(with_bad.oee, only_good.oee);
}

#[test]
fn test_all_records_not_computable_gives_zero_totals() {
    let mut record = create_test_record(1, "08:00", "12:00", 10, 10);
    record.machine = None;

    let aggregate =
        OeeAggregator::new().aggregate(&[record], &test_catalog(), &DateRangeFilter::all());

    assert_eq!(aggregate.oee, None);
    assert_eq!(aggregate.skipped_count, 1);
    assert_eq!(aggregate.totals.scheduled_minutes, 0.0);
}

// ==========================================
// 日期筛选
// ==========================================

#[test]
fn test_date_filter_is_inclusive() {
    let records = vec![
        create_test_record(10, "08:00", "09:00", 60, 60),
        create_test_record(5, "08:00", "09:00", 60, 60),
        create_test_record(1, "08:00", "09:00", 60, 60),
    ];
    let catalog = test_catalog();
    let aggregator = OeeAggregator::new();

    let filter = DateRangeFilter::between(date(1), date(5));
    let aggregate = aggregator.aggregate(&records, &catalog, &filter);
    assert_eq!(aggregate.computed_count, 2);

    let only_end = DateRangeFilter {
        start: None,
        end: Some(date(4)),
    };
    let evaluated = aggregator.evaluate(&records, &catalog, &only_end);
    assert_eq!(evaluated.len(), 1);
    assert_eq!(evaluated[0].0.date, date(1));
}

#[test]
fn test_evaluate_keeps_input_order() {
    let records = vec![
        create_test_record(9, "08:00", "09:00", 60, 60),
        create_test_record(7, "08:00", "09:00", 60, 60),
    ];

    let evaluated = OeeAggregator::new().evaluate(&records, &test_catalog(), &DateRangeFilter::all());
    let dates: Vec<NaiveDate> = evaluated.iter().map(|(r, _)| r.date).collect();
    assert_eq!(dates, vec![date(9), date(7)]);
}

#[test]
fn test_unrated_records_are_counted() {
    let mut record = create_test_record(1, "08:00", "09:00", 60, 60);
    record.machine = Some("Horno".to_string());
    let rated = create_test_record(1, "08:00", "09:00", 60, 60);

    let aggregate =
        OeeAggregator::new().aggregate(&[record, rated], &test_catalog(), &DateRangeFilter::all());
    assert_eq!(aggregate.unrated_count, 1);
    assert_eq!(aggregate.computed_count, 2);
}

#[test]
fn test_aggregate_is_idempotent() {
    let records = vec![
        create_test_record(1, "06:00", "14:00", 410, 400),
        create_test_record(2, "14:00", "22:00", 395, 380),
    ];
    let catalog = test_catalog();
    let aggregator = OeeAggregator::new();

    assert_eq!(
        aggregator.aggregate(&records, &catalog, &DateRangeFilter::all()),
        aggregator.aggregate(&records, &catalog, &DateRangeFilter::all())
    );
}
