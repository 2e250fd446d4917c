// ==========================================
// 生产日报 OEE - 机组工序标准产能目录
// ==========================================
// 职责: (机组, 工序) → 标准产能 (EPH, 件/小时)
// 红线: 目录为外部参考数据,运行期只读
// ==========================================

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// 未匹配目录时使用的默认速率（件/分钟）
pub const DEFAULT_RATE_PER_MINUTE: f64 = 1.0;

/// 目录键规范化: 小写 → NFD 分解 → 去除组合重音符 → 去首尾空白
///
/// 不同版本录入表单留下的大小写/重音不一致,统一在此消除
/// （"Pintura Electroestática" 与 "pintura electroestatica" 等价）。
pub fn normalize_key(input: &str) -> String {
    input
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .trim()
        .to_string()
}

// ==========================================
// MachineCatalogEntry - 目录条目
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineCatalogEntry {
    pub machine: String,    // 机组
    pub process: String,    // 工序
    pub standard_rate: f64, // 标准产能 EPH (件/小时, > 0)
}

impl MachineCatalogEntry {
    pub fn new(machine: &str, process: &str, standard_rate: f64) -> Self {
        Self {
            machine: machine.to_string(),
            process: process.to_string(),
            standard_rate,
        }
    }

    /// 标准速率换算为 件/分钟
    pub fn rate_per_minute(&self) -> f64 {
        self.standard_rate / 60.0
    }
}

// ==========================================
// RateLookup - 目录查询结果
// ==========================================
// 未匹配时显式标记,避免与真实速率为 1 的机组混淆
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RateLookup {
    Matched {
        standard_rate: f64,   // EPH
        rate_per_minute: f64, // 件/分钟
    },
    Unmatched {
        default_applied: f64, // 件/分钟
    },
}

impl RateLookup {
    /// 参与公式计算的速率（件/分钟）
    pub fn rate_per_minute(&self) -> f64 {
        match self {
            RateLookup::Matched {
                rate_per_minute, ..
            } => *rate_per_minute,
            RateLookup::Unmatched { default_applied } => *default_applied,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, RateLookup::Matched { .. })
    }
}
