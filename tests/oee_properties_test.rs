// ==========================================
// OEE 计算与汇总 - 性质测试
// ==========================================
// 测试目标: 单班次公式、时间加权汇总、目录匹配
// ==========================================


use shift_oee_report::domain::{
    DateRangeFilter, MachineCatalogEntry, NotComputableReason, OeeOutcome, RateLookup,
};
use shift_oee_report::engine::{MachineCatalog, OeeAggregator, OeeCalculator};
use test_helpers::{unit_rate_catalog, ymd, ShiftRecordBuilder};

const EPS: f64 = 1e-9;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}

fn reference_record() -> shift_oee_report::ShiftRecord {
    ShiftRecordBuilder::new(ymd(2024, 5, 6))
        .machine("Troqueladora", "Corte")
        .window("08:00", "16:00")
        .pieces(500, 480)
        .planned(30.0)
        .unplanned(20.0)
        .build()
}

#[test]
fn test_reference_shift_metrics() {
    let catalog = unit_rate_catalog("Troqueladora", "Corte");
    let outcome = OeeCalculator::new().compute(&reference_record(), &catalog);
    let m = outcome.metrics().expect("computable");

    assert!(approx(m.scheduled_minutes, 480.0));
    assert!(approx(m.running_minutes, 430.0));
    assert!(approx(m.ideal_production_minutes, 500.0));
    assert!(approx(m.speed_loss_minutes, -70.0));
    assert_eq!(m.defective_pieces, 20);
    assert!(approx(m.quality_loss_minutes, 20.0));
    assert!(approx(m.net_good_minutes, 480.0));
    assert!(approx(m.availability, 430.0 / 480.0));
    assert_eq!(m.performance, 1.0);
    assert!(approx(m.quality, 0.96));
    assert!((m.oee - 0.86).abs() < 1e-4);
    assert_eq!(m.oee, m.availability * m.performance * m.quality);
}

#[test]
fn test_performance_never_exceeds_one() {
    let catalog = unit_rate_catalog("Troqueladora", "Corte");
    let calculator = OeeCalculator::new();

    for total in [10, 430, 431, 5_000] {
        let record = ShiftRecordBuilder::new(ymd(2024, 5, 6))
            .machine("Troqueladora", "Corte")
            .window("08:00", "16:00")
            .pieces(total, total)
            .planned(30.0)
            .unplanned(20.0)
            .build();
        let m = *calculator.compute(&record, &catalog).metrics().unwrap();
        assert!(m.performance <= 1.0, "total={} performance={}", total, m.performance);
    }
}

#[test]
fn test_missing_end_time_is_excluded_everywhere() {
    let catalog = unit_rate_catalog("Troqueladora", "Corte");
    let mut incomplete = reference_record();
    incomplete.end_time = None;

    let outcome = OeeCalculator::new().compute(&incomplete, &catalog);
    assert_eq!(
        outcome,
        OeeOutcome::NotComputable(NotComputableReason::MissingField {
            field: "end_time".to_string()
        })
    );

    let records = vec![reference_record(), incomplete];
    let aggregate = OeeAggregator::new().aggregate(&records, &catalog, &DateRangeFilter::all());
    assert_eq!(aggregate.computed_count, 1);
    assert_eq!(aggregate.skipped_count, 1);
    assert!(approx(aggregate.totals.scheduled_minutes, 480.0));
}

#[test]
fn test_single_record_aggregate_reproduces_record() {
    let catalog = unit_rate_catalog("Troqueladora", "Corte");
    let record = reference_record();
    let m = *OeeCalculator::new().compute(&record, &catalog).metrics().unwrap();

    let aggregate =
        OeeAggregator::new().aggregate(std::slice::from_ref(&record), &catalog, &DateRangeFilter::all());
    assert!(approx(aggregate.oee.unwrap(), m.oee));
    assert!(approx(aggregate.availability.unwrap(), m.availability));
    assert!(approx(aggregate.performance.unwrap(), m.performance));
    assert!(approx(aggregate.quality.unwrap(), m.quality));
}

#[test]
fn test_weighting_is_by_scheduled_time() {
    // 100 分钟 / OEE 0.5 与 300 分钟 / OEE 0.9
    let catalog = unit_rate_catalog("Troqueladora", "Corte");
    let short = ShiftRecordBuilder::new(ymd(2024, 5, 6))
        .machine("Troqueladora", "Corte")
        .window("08:00", "09:40")
        .pieces(50, 50)
        .unplanned(50.0)
        .build();
    let long = ShiftRecordBuilder::new(ymd(2024, 5, 7))
        .machine("Troqueladora", "Corte")
        .window("08:00", "13:00")
        .pieces(270, 270)
        .unplanned(30.0)
        .build();

    let calculator = OeeCalculator::new();
    assert!(approx(calculator.compute(&short, &catalog).metrics().unwrap().oee, 0.5));
    assert!(approx(calculator.compute(&long, &catalog).metrics().unwrap().oee, 0.9));

    let aggregate =
        OeeAggregator::new().aggregate(&[short, long], &catalog, &DateRangeFilter::all());
    assert!(approx(aggregate.oee.unwrap(), 0.8));
}

#[test]
fn test_empty_aggregate_has_no_ratios() {
    let catalog = MachineCatalog::empty();
    let aggregate = OeeAggregator::new().aggregate(&[], &catalog, &DateRangeFilter::all());

    assert!(aggregate.is_empty());
    assert_eq!(aggregate.oee, None);
    assert_eq!(aggregate.availability, None);
    assert_eq!(aggregate.performance, None);
    assert_eq!(aggregate.quality, None);
    assert_eq!(aggregate.totals, Default::default());
}

#[test]
fn test_catalog_lookup_ignores_diacritics() {
    let catalog = MachineCatalog::new(vec![MachineCatalogEntry::new(
        "Pintura Electroestatica",
        "Pintura",
        120.0,
    )]);

    match catalog.lookup("Pintura Electroestática", "PINTURA") {
        RateLookup::Matched {
            standard_rate,
            rate_per_minute,
        } => {
            assert_eq!(standard_rate, 120.0);
            assert_eq!(rate_per_minute, 2.0);
        }
        other => panic!("expected match, got {:?}", other),
    }
}

#[test]
fn test_repeated_aggregation_is_identical() {
    let catalog = unit_rate_catalog("Troqueladora", "Corte");
    let records = vec![reference_record(), reference_record()];
    let aggregator = OeeAggregator::new();
    let filter = DateRangeFilter::between(ymd(2024, 5, 1), ymd(2024, 5, 31));

    assert_eq!(
        aggregator.aggregate(&records, &catalog, &filter),
        aggregator.aggregate(&records, &catalog, &filter)
    );
}
