// ==========================================
// 生产日报 OEE - 领域模型层
// ==========================================
// 职责: 定义班次记录、目录、指标等实体与类型
// 红线: 不含数据访问逻辑,不含计算逻辑
// ==========================================

pub mod catalog;
pub mod downtime_reason;
pub mod metrics;
pub mod report;
pub mod shift;
pub mod types;

// 重导出核心类型
pub use catalog::{normalize_key, MachineCatalogEntry, RateLookup, DEFAULT_RATE_PER_MINUTE};
pub use downtime_reason::{DowntimeReason, DowntimeReasonCatalog};
pub use metrics::{AggregateMetrics, MetricTotals, NotComputableReason, OeeMetrics, OeeOutcome};
pub use report::{ReportRow, ReportView};
pub use shift::{parse_time_of_day, DateRangeFilter, DowntimeEntry, ShiftRecord};
pub use types::{DowntimeCategory, FailureCause};
