// ==========================================
// 生产日报 OEE - 报表 API
// ==========================================
// 职责: 班次记录录入、OEE 报表生成与导出、停机历史查询
// 流程: 仓储读取 (日期降序) → 逐条计算 → 加权汇总
// ==========================================

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::downtime_reason::DowntimeReasonCatalog;
use crate::domain::metrics::OeeOutcome;
use crate::domain::report::{ReportRow, ReportView};
use crate::domain::shift::{DateRangeFilter, ShiftRecord};
use crate::engine::catalog_lookup::MachineCatalog;
use crate::engine::downtime_history::{self, DowntimeHistoryFilter, DowntimeHistoryRow};
use crate::engine::oee_aggregator::OeeAggregator;
use crate::engine::oee_calculator::OeeCalculator;
use crate::exporter::report_csv;
use crate::importer::shift_validator::{ShiftValidationReport, ShiftValidator};
use crate::repository::shift_record_repo::ShiftRecordRepository;

// ==========================================
// ReportApi - 报表 API
// ==========================================
pub struct ReportApi {
    shift_repo: Arc<ShiftRecordRepository>,
    catalog: MachineCatalog,
    reasons: DowntimeReasonCatalog,
    aggregator: OeeAggregator,
    calculator: OeeCalculator,
}

impl ReportApi {
    /// 创建报表 API（停机原因使用内置目录）
    pub fn new(shift_repo: Arc<ShiftRecordRepository>, catalog: MachineCatalog) -> Self {
        Self {
            shift_repo,
            catalog,
            reasons: DowntimeReasonCatalog::builtin(),
            aggregator: OeeAggregator::new(),
            calculator: OeeCalculator::new(),
        }
    }

    pub fn with_reason_catalog(mut self, reasons: DowntimeReasonCatalog) -> Self {
        self.reasons = reasons;
        self
    }

    pub fn catalog(&self) -> &MachineCatalog {
        &self.catalog
    }

    // ==========================================
    // 录入
    // ==========================================

    /// 校验班次记录（不写库）
    pub fn validate_shift(&self, record: &ShiftRecord) -> ShiftValidationReport {
        ShiftValidator::new(&self.catalog, &self.reasons).validate(record)
    }

    /// 校验并保存班次记录
    ///
    /// # 返回
    /// - Ok(String): 记录ID
    /// - Err(ShiftValidationError): 存在 Error 级违规,未保存
    pub fn record_shift(&self, record: &ShiftRecord) -> ApiResult<String> {
        let report = self.validate_shift(record);
        if !report.is_valid() {
            return Err(ApiError::ShiftValidationError {
                reason: format!("{} 项错误", report.error_count()),
                violations: report.violations,
            });
        }

        if report.warning_count() > 0 {
            warn!(
                date = %record.date,
                warnings = report.warning_count(),
                "班次记录存在警告,仍然保存"
            );
        }

        Ok(self.shift_repo.insert(record)?)
    }

    /// 回放离线缓存的记录（单事务,不做录入校验）
    pub fn replay_pending(&self, records: &[ShiftRecord]) -> ApiResult<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        Ok(self.shift_repo.insert_batch(records)?)
    }

    // ==========================================
    // 报表
    // ==========================================

    /// 计算单条记录（不读写库）
    pub fn compute_shift(&self, record: &ShiftRecord) -> OeeOutcome {
        self.calculator.compute(record, &self.catalog)
    }

    /// 生成日期范围内的报表
    pub fn build_report(&self, filter: &DateRangeFilter) -> ApiResult<ReportView> {
        validate_filter(filter)?;

        let records = self.shift_repo.list_by_date_range(filter)?;
        let rows: Vec<ReportRow> = self
            .aggregator
            .evaluate(&records, &self.catalog, filter)
            .into_iter()
            .map(|(record, outcome)| ReportRow {
                record: record.clone(),
                outcome,
            })
            .collect();
        let aggregate = self
            .aggregator
            .aggregate_outcomes(rows.iter().map(|row| &row.outcome));

        info!(
            start = ?filter.start,
            end = ?filter.end,
            rows = rows.len(),
            "报表生成完成"
        );

        Ok(ReportView {
            filter: *filter,
            rows,
            aggregate,
        })
    }

    /// 生成报表并导出 CSV
    pub fn export_report(
        &self,
        filter: &DateRangeFilter,
        path: impl AsRef<Path>,
        percent_decimals: usize,
    ) -> ApiResult<ReportView> {
        let view = self.build_report(filter)?;
        report_csv::export_report_csv(&view, path, percent_decimals)?;
        Ok(view)
    }

    // ==========================================
    // 停机历史
    // ==========================================

    /// 查询停机明细（记录按日期降序展开）
    pub fn downtime_history(&self, filter: &DowntimeHistoryFilter) -> ApiResult<Vec<DowntimeHistoryRow>> {
        let records = self.shift_repo.list_all()?;
        let rows = downtime_history::flatten(&records);
        Ok(downtime_history::filter_rows(&rows, filter)
            .into_iter()
            .cloned()
            .collect())
    }
}

fn validate_filter(filter: &DateRangeFilter) -> ApiResult<()> {
    if let (Some(start), Some(end)) = (filter.start, filter.end) {
        if start > end {
            return Err(ApiError::InvalidInput(format!(
                "开始日期 {} 晚于结束日期 {}",
                start, end
            )));
        }
    }
    Ok(())
}
