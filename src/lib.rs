// ==========================================
// 生产日报 OEE - 核心库
// ==========================================
// 职责: 班次记录 → 设备综合效率 (可用率 × 性能率 × 良品率)
// 技术栈: Rust + SQLite
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 计算规则
pub mod engine;

// 导入层 - 设备目录与录入校验
pub mod importer;

// 导出层 - 报表文件
pub mod exporter;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    AggregateMetrics, DateRangeFilter, DowntimeCategory, DowntimeEntry, MachineCatalogEntry,
    NotComputableReason, OeeMetrics, OeeOutcome, RateLookup, ReportRow, ReportView, ShiftRecord,
};

// 引擎
pub use engine::{MachineCatalog, OeeAggregator, OeeCalculator};

// API
pub use api::{ApiError, ApiResult, ReportApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "生产日报 OEE";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
