// ==========================================
// 生产日报 OEE - 导出层
// ==========================================
// 职责: 报表导出 (CSV)
// ==========================================

pub mod error;
pub mod report_csv;

pub use error::{ExportError, ExportResult};
pub use report_csv::{export_report_csv, report_csv_string, write_report_csv, REPORT_HEADER, TOTAL_LABEL};
