// ==========================================
// 生产日报 OEE - 报表 CSV 导出
// ==========================================
// 职责: 可计算明细行 + 合计行 → CSV
// 格式: 时间/件数保留 1 位小数; 比率以百分数输出 (小数位可配置)
// 红线: 不可计算记录不导出; 未定义比率留空
// ==========================================

use crate::domain::metrics::{AggregateMetrics, OeeMetrics};
use crate::domain::report::ReportView;
use crate::domain::shift::ShiftRecord;
use crate::exporter::error::{ExportError, ExportResult};
use csv::Writer;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// 合计行日期列标记
pub const TOTAL_LABEL: &str = "TOTAL";

// CSV 表头（西语列名,与现场报表一致）
pub const REPORT_HEADER: &[&str] = &[
    "Fecha",
    "Máquina",
    "Proceso",
    "Tiempo programado (min)",
    "Paro planeado (min)",
    "Paro no planeado (min)",
    "Tiempo operativo (min)",
    "Pérdida de velocidad (min)",
    "Tiempo ideal (min)",
    "Pérdida de calidad (min)",
    "Tiempo neto (min)",
    "Piezas buenas",
    "Piezas defectuosas",
    "Disponibilidad (%)",
    "Rendimiento (%)",
    "Calidad (%)",
    "OEE (%)",
    "Sin EPH",
];

/// 写出报表（明细 + 合计）
///
/// # 返回
/// - 写出的明细行数（不含表头与合计行）
pub fn write_report_csv<W: Write>(
    view: &ReportView,
    writer: W,
    percent_decimals: usize,
) -> ExportResult<usize> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(REPORT_HEADER)?;

    let mut written = 0;
    for (record, metrics) in view.computable_rows() {
        wtr.write_record(&detail_row(record, metrics, percent_decimals))?;
        written += 1;
    }

    wtr.write_record(&total_row(&view.aggregate, percent_decimals))?;
    wtr.flush()?;

    Ok(written)
}

/// 导出报表到文件
pub fn export_report_csv(
    view: &ReportView,
    path: impl AsRef<Path>,
    percent_decimals: usize,
) -> ExportResult<usize> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let written = write_report_csv(view, file, percent_decimals)?;

    info!(
        path = %path.display(),
        rows = written,
        skipped = view.aggregate.skipped_count,
        "报表导出完成"
    );
    Ok(written)
}

/// 导出到内存字符串
pub fn report_csv_string(view: &ReportView, percent_decimals: usize) -> ExportResult<String> {
    let mut buffer = Vec::new();
    write_report_csv(view, &mut buffer, percent_decimals)?;
    String::from_utf8(buffer).map_err(|e| ExportError::BufferError(e.to_string()))
}

fn detail_row(record: &ShiftRecord, m: &OeeMetrics, decimals: usize) -> Vec<String> {
    vec![
        record.date.format("%Y-%m-%d").to_string(),
        record.machine_name().unwrap_or_default().to_string(),
        record.process_name().unwrap_or_default().to_string(),
        minutes(m.scheduled_minutes),
        minutes(m.planned_downtime_minutes),
        minutes(m.unplanned_downtime_minutes),
        minutes(m.running_minutes),
        minutes(m.speed_loss_minutes),
        minutes(m.ideal_production_minutes),
        minutes(m.quality_loss_minutes),
        minutes(m.net_good_minutes),
        m.good_pieces.to_string(),
        m.defective_pieces.to_string(),
        percent(Some(m.availability), decimals),
        percent(Some(m.performance), decimals),
        percent(Some(m.quality), decimals),
        percent(Some(m.oee), decimals),
        if m.is_rated() { String::new() } else { "X".to_string() },
    ]
}

fn total_row(aggregate: &AggregateMetrics, decimals: usize) -> Vec<String> {
    let t = &aggregate.totals;
    vec![
        TOTAL_LABEL.to_string(),
        String::new(),
        String::new(),
        minutes(t.scheduled_minutes),
        minutes(t.planned_downtime_minutes),
        minutes(t.unplanned_downtime_minutes),
        minutes(t.running_minutes),
        minutes(t.speed_loss_minutes),
        minutes(t.ideal_production_minutes),
        minutes(t.quality_loss_minutes),
        minutes(t.net_good_minutes),
        t.good_pieces.to_string(),
        t.defective_pieces.to_string(),
        percent(aggregate.availability, decimals),
        percent(aggregate.performance, decimals),
        percent(aggregate.quality, decimals),
        percent(aggregate.oee, decimals),
        aggregate.unrated_count.to_string(),
    ]
}

fn minutes(value: f64) -> String {
    format!("{:.1}", value)
}

fn percent(ratio: Option<f64>, decimals: usize) -> String {
    match ratio {
        Some(r) if r.is_finite() => format!("{:.*}", decimals, r * 100.0),
        _ => String::new(),
    }
}
