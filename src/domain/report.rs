// ==========================================
// 生产日报 OEE - 报表视图
// ==========================================
// 职责: 明细行 (记录 + 计算结果) 与汇总的组合,供展示与导出
// ==========================================

use crate::domain::metrics::{AggregateMetrics, OeeMetrics, OeeOutcome};
use crate::domain::shift::{DateRangeFilter, ShiftRecord};
use serde::{Deserialize, Serialize};

// ==========================================
// ReportRow - 报表明细行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub record: ShiftRecord,
    pub outcome: OeeOutcome,
}

impl ReportRow {
    pub fn metrics(&self) -> Option<&OeeMetrics> {
        self.outcome.metrics()
    }
}

// ==========================================
// ReportView - 报表视图
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportView {
    pub filter: DateRangeFilter,
    pub rows: Vec<ReportRow>, // 与记录读取顺序一致 (日期降序)
    pub aggregate: AggregateMetrics,
}

impl ReportView {
    /// 仅可计算的明细行 (记录, 指标)
    pub fn computable_rows(&self) -> impl Iterator<Item = (&ShiftRecord, &OeeMetrics)> {
        self.rows
            .iter()
            .filter_map(|row| row.metrics().map(|m| (&row.record, m)))
    }

    /// 不可计算的明细行
    pub fn skipped_rows(&self) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().filter(|row| !row.outcome.is_computable())
    }
}
