// ==========================================
// 生产日报 OEE - 引擎层
// ==========================================
// 职责: 目录查询、单班次 OEE 计算、加权汇总、停机历史
// 红线: 纯函数,不访问存储; 目录显式注入
// ==========================================

pub mod catalog_lookup;
pub mod downtime_history;
pub mod oee_aggregator;
pub mod oee_calculator;

// 重导出核心引擎
pub use catalog_lookup::MachineCatalog;
pub use downtime_history::{DowntimeHistoryFilter, DowntimeHistoryRow};
pub use oee_aggregator::{aggregate_metrics, OeeAggregator};
pub use oee_calculator::{compute_metrics, OeeCalculator};
