// ==========================================
// 生产日报 OEE - 数据库路径
// ==========================================

use std::path::PathBuf;

/// 显式指定数据库路径的环境变量
pub const DB_PATH_ENV: &str = "SHIFT_OEE_DB_PATH";

const APP_DIR_NAME: &str = "shift-oee-report";
const DB_FILE_NAME: &str = "shift_oee.db";

/// 获取默认数据库路径
///
/// 优先级: 环境变量 > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from(".").join(DB_FILE_NAME);

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join(APP_DIR_NAME);
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join(DB_FILE_NAME);
        } else {
            tracing::warn!(dir = %dir.display(), "无法创建数据目录，使用当前目录");
        }
    }

    path.to_string_lossy().to_string()
}
