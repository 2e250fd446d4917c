// ==========================================
// 生产日报 OEE - 标准产能目录查询
// ==========================================
// 职责: (机组, 工序) → 标准速率
// 输入: 目录条目 (外部参考数据, 显式注入)
// 输出: RateLookup (Matched / Unmatched)
// ==========================================
// 红线: 未匹配时回退默认速率,但必须可区分
// ==========================================

use crate::domain::catalog::{
    normalize_key, MachineCatalogEntry, RateLookup, DEFAULT_RATE_PER_MINUTE,
};
use std::collections::HashMap;
use tracing::warn;

// ==========================================
// MachineCatalog - 标准产能目录
// ==========================================
#[derive(Debug, Clone)]
pub struct MachineCatalog {
    entries: Vec<MachineCatalogEntry>,
    index: HashMap<(String, String), usize>, // 规范化键 → entries 下标
    default_rate_per_minute: f64,
}

impl MachineCatalog {
    /// 由目录条目构建
    ///
    /// 规范化后重复的键以先出现的条目为准
    pub fn new(entries: Vec<MachineCatalogEntry>) -> Self {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            let key = (normalize_key(&entry.machine), normalize_key(&entry.process));
            if index.contains_key(&key) {
                warn!(
                    machine = %entry.machine,
                    process = %entry.process,
                    "目录存在重复的机组/工序条目,忽略后出现者"
                );
                continue;
            }
            index.insert(key, i);
        }

        Self {
            entries,
            index,
            default_rate_per_minute: DEFAULT_RATE_PER_MINUTE,
        }
    }

    /// 空目录（全部记录走默认速率）
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// 设置未匹配时的默认速率（件/分钟）
    ///
    /// 非正值或非有限值被忽略,保留 1.0
    pub fn with_default_rate(mut self, rate_per_minute: f64) -> Self {
        if rate_per_minute.is_finite() && rate_per_minute > 0.0 {
            self.default_rate_per_minute = rate_per_minute;
        } else {
            warn!(rate_per_minute, "默认速率无效,保留 {}", DEFAULT_RATE_PER_MINUTE);
        }
        self
    }

    pub fn default_rate_per_minute(&self) -> f64 {
        self.default_rate_per_minute
    }

    pub fn entries(&self) -> &[MachineCatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按 (机组, 工序) 查找目录条目
    pub fn find(&self, machine: &str, process: &str) -> Option<&MachineCatalogEntry> {
        let key = (normalize_key(machine), normalize_key(process));
        self.index.get(&key).map(|&i| &self.entries[i])
    }

    /// 查询标准速率
    ///
    /// # 返回
    /// - Matched: 目录 EPH 及换算后的 件/分钟
    /// - Unmatched: 应用默认速率 (默认 1 件/分钟)
    pub fn lookup(&self, machine: &str, process: &str) -> RateLookup {
        match self.find(machine, process) {
            Some(entry) => RateLookup::Matched {
                standard_rate: entry.standard_rate,
                rate_per_minute: entry.rate_per_minute(),
            },
            None => {
                warn!(machine, process, "目录未匹配,使用默认速率");
                RateLookup::Unmatched {
                    default_applied: self.default_rate_per_minute,
                }
            }
        }
    }

    /// 某机组登记的全部工序
    pub fn processes_for(&self, machine: &str) -> Vec<&str> {
        let key = normalize_key(machine);
        self.entries
            .iter()
            .filter(|e| normalize_key(&e.machine) == key)
            .map(|e| e.process.as_str())
            .collect()
    }
}

impl Default for MachineCatalog {
    fn default() -> Self {
        Self::empty()
    }
}
