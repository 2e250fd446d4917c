// ==========================================
// 报表全流程集成测试
// ==========================================
// 测试目标: 目录导入 → 录入 → 持久化 → 报表 → CSV 导出
// ==========================================


use shift_oee_report::api::{ApiError, ReportApi};
use shift_oee_report::config::{config_keys, ConfigManager};
use shift_oee_report::domain::DateRangeFilter;
use shift_oee_report::engine::DowntimeHistoryFilter;
use shift_oee_report::exporter::TOTAL_LABEL;
use shift_oee_report::importer::load_catalog;
use shift_oee_report::logging;
use shift_oee_report::repository::ShiftRecordRepository;
use std::sync::Arc;
use test_helpers::{create_test_db, write_catalog_csv, ymd, ShiftRecordBuilder};

fn open_api(db_path: &str) -> ReportApi {
    let config = ConfigManager::new(db_path).unwrap();
    let catalog_path = config.get_catalog_path().unwrap().unwrap();
    let catalog = load_catalog(&catalog_path)
        .unwrap()
        .with_default_rate(config.get_default_standard_rate().unwrap());

    let repo = ShiftRecordRepository::new(db_path).unwrap();
    ReportApi::new(Arc::new(repo), catalog)
}

#[test]
fn test_full_report_flow_with_file_database() {
    logging::init_test();

    let (_db_file, db_path) = create_test_db().unwrap();
    let catalog_file = write_catalog_csv(&[
        ("Embutidora 315", "Embutido", "60"),
        ("Pintura Electroestatica", "Pintura", "120,0"),
    ]);

    let config = ConfigManager::new(&db_path).unwrap();
    config
        .set_global_config_value(
            config_keys::CATALOG_PATH,
            catalog_file.path().to_str().unwrap(),
        )
        .unwrap();

    let api = open_api(&db_path);
    assert_eq!(api.catalog().len(), 2);

    api.record_shift(
        &ShiftRecordBuilder::new(ymd(2024, 6, 3))
            .machine("Embutidora 315", "Embutido")
            .window("08:00", "16:00")
            .pieces(500, 480)
            .planned(30.0)
            .unplanned(20.0)
            .build(),
    )
    .unwrap();
    api.record_shift(
        &ShiftRecordBuilder::new(ymd(2024, 6, 4))
            .machine("Pintura Electroestática", "Pintura")
            .window("07:00", "15:00")
            .pieces(800, 790)
            .planned(60.0)
            .build(),
    )
    .unwrap();

    // 重新打开数据库,数据仍在
    drop(api);
    let api = open_api(&db_path);

    let view = api.build_report(&DateRangeFilter::all()).unwrap();
    assert_eq!(view.rows.len(), 2);
    assert_eq!(view.rows[0].record.date, ymd(2024, 6, 4));
    assert_eq!(view.aggregate.computed_count, 2);
    assert_eq!(view.aggregate.unrated_count, 0);
    assert!((view.aggregate.totals.scheduled_minutes - 960.0).abs() < 1e-9);

    let out = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    api.export_report(&DateRangeFilter::all(), out.path(), 1)
        .unwrap();
    let content = std::fs::read_to_string(out.path()).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("2024-06-04,Pintura Electroestática,Pintura,480.0,60.0,0.0,420.0,"));
    assert!(lines[3].starts_with(TOTAL_LABEL));
}

#[test]
fn test_capture_rules_block_incomplete_downtime() {
    let (_db_file, db_path) = create_test_db().unwrap();
    let catalog_file = write_catalog_csv(&[("Roladora", "Rolado", "90")]);
    ConfigManager::new(&db_path)
        .unwrap()
        .set_global_config_value(
            config_keys::CATALOG_PATH,
            catalog_file.path().to_str().unwrap(),
        )
        .unwrap();
    let api = open_api(&db_path);

    let mut record = ShiftRecordBuilder::new(ymd(2024, 6, 5))
        .machine("Roladora", "Rolado")
        .window("06:00", "14:00")
        .pieces(400, 400)
        .unplanned(15.0)
        .build();
    record.downtime_entries[0].origin = None;
    record.downtime_entries[0].comment = Some("   ".to_string());

    match api.record_shift(&record) {
        Err(ApiError::ShiftValidationError { violations, .. }) => {
            let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
            assert!(fields.contains(&"origin"));
            assert!(fields.contains(&"comment"));
        }
        other => panic!("expected validation error, got {:?}", other.map(|_| ())),
    }

    let history = api
        .downtime_history(&DowntimeHistoryFilter::default())
        .unwrap();
    assert!(history.is_empty());
}
