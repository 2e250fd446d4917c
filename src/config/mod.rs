// ==========================================
// 生产日报 OEE - 配置层
// ==========================================
// 职责: 系统配置管理与数据库路径解析
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod paths;

pub use config_manager::{config_keys, ConfigManager, ConfigScope, DEFAULT_PERCENT_DECIMALS};
pub use paths::{get_default_db_path, DB_PATH_ENV};
