// ==========================================
// 生产日报 OEE - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::db::{ensure_schema, open_sqlite_connection};
use crate::domain::catalog::DEFAULT_RATE_PER_MINUTE;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// 报表百分比默认小数位
pub const DEFAULT_PERCENT_DECIMALS: usize = 1;

/// 百分比小数位上限
const MAX_PERCENT_DECIMALS: usize = 6;

// ==========================================
// ConfigScope - 配置作用域
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigScope {
    Global,
}

impl ConfigScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigScope::Global => "global",
        }
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 会对传入连接再次应用统一 PRAGMA 并建表（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
            ensure_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![ConfigScope::Global.as_str(), key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![ConfigScope::Global.as_str(), key, value],
        )?;

        tracing::debug!(config_key = key, value = value, "配置已更新");
        Ok(())
    }

    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 获取所有配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map(params![ConfigScope::Global.as_str()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        let json_value = json!(config_map);
        Ok(serde_json::to_string(&json_value)?)
    }

    // ===== OEE 计算配置 =====

    /// 未匹配目录时使用的默认速率（件/分钟）
    ///
    /// 非数值或非正数回退到 1.0
    pub fn get_default_standard_rate(&self) -> Result<f64, Box<dyn Error>> {
        let default = DEFAULT_RATE_PER_MINUTE.to_string();
        let value = self.get_config_or_default(config_keys::DEFAULT_STANDARD_RATE, &default)?;

        match value.trim().parse::<f64>() {
            Ok(rate) if rate.is_finite() && rate > 0.0 => Ok(rate),
            _ => {
                tracing::warn!(
                    config_key = config_keys::DEFAULT_STANDARD_RATE,
                    raw_value = %value,
                    "默认速率配置无效，使用 {}",
                    DEFAULT_RATE_PER_MINUTE
                );
                Ok(DEFAULT_RATE_PER_MINUTE)
            }
        }
    }

    /// 设备目录文件路径（未配置返回 None）
    pub fn get_catalog_path(&self) -> Result<Option<String>, Box<dyn Error>> {
        Ok(self
            .get_config_value(config_keys::CATALOG_PATH)?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }

    // ===== 报表配置 =====

    /// 导出百分比的小数位（默认 1）
    pub fn get_percent_decimals(&self) -> Result<usize, Box<dyn Error>> {
        let default = DEFAULT_PERCENT_DECIMALS.to_string();
        let value = self.get_config_or_default(config_keys::PERCENT_DECIMALS, &default)?;
        Ok(value
            .trim()
            .parse::<usize>()
            .map(|d| d.min(MAX_PERCENT_DECIMALS))
            .unwrap_or(DEFAULT_PERCENT_DECIMALS))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // OEE 计算
    pub const DEFAULT_STANDARD_RATE: &str = "oee/default_standard_rate";
    pub const CATALOG_PATH: &str = "oee/catalog_path";

    // 报表
    pub const PERCENT_DECIMALS: &str = "report/percent_decimals";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_manager() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).unwrap()
    }

    #[test]
    fn test_defaults_when_unset() {
        let manager = memory_manager();
        assert_eq!(manager.get_default_standard_rate().unwrap(), 1.0);
        assert_eq!(manager.get_catalog_path().unwrap(), None);
        assert_eq!(manager.get_percent_decimals().unwrap(), 1);
    }

    #[test]
    fn test_set_and_override() {
        let manager = memory_manager();
        manager
            .set_global_config_value(config_keys::DEFAULT_STANDARD_RATE, "2.5")
            .unwrap();
        assert_eq!(manager.get_default_standard_rate().unwrap(), 2.5);

        manager
            .set_global_config_value(config_keys::DEFAULT_STANDARD_RATE, "3")
            .unwrap();
        assert_eq!(manager.get_default_standard_rate().unwrap(), 3.0);
    }

    #[test]
    fn test_invalid_rate_falls_back() {
        let manager = memory_manager();
        manager
            .set_global_config_value(config_keys::DEFAULT_STANDARD_RATE, "-4")
            .unwrap();
        assert_eq!(manager.get_default_standard_rate().unwrap(), 1.0);
    }

    #[test]
    fn test_snapshot_contains_set_keys() {
        let manager = memory_manager();
        manager
            .set_global_config_value(config_keys::CATALOG_PATH, " /data/eph.csv ")
            .unwrap();
        manager
            .set_global_config_value(config_keys::PERCENT_DECIMALS, "2")
            .unwrap();

        assert_eq!(
            manager.get_catalog_path().unwrap().as_deref(),
            Some("/data/eph.csv")
        );
        assert_eq!(manager.get_percent_decimals().unwrap(), 2);

        let snapshot: HashMap<String, String> =
            serde_json::from_str(&manager.get_config_snapshot().unwrap()).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot["report/percent_decimals"], "2");
    }
}
