// ==========================================
// 生产日报 OEE - API 层
// ==========================================
// 职责: 组合仓储、引擎与导出,向命令行/界面提供业务接口
// ==========================================

pub mod error;
pub mod report_api;

pub use error::{ApiError, ApiResult};
pub use report_api::ReportApi;
