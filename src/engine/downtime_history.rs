// ==========================================
// 生产日报 OEE - 停机历史
// ==========================================
// 职责: 将班次记录中的停机记录展开为明细行,支持筛选与分类合计
// 输入: 班次记录集合 (按日期降序)
// 输出: DowntimeHistoryRow 列表
// ==========================================

use crate::domain::shift::ShiftRecord;
use crate::domain::types::DowntimeCategory;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

// ==========================================
// DowntimeHistoryRow - 停机明细行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DowntimeHistoryRow {
    pub date: NaiveDate,
    pub machine: String,
    pub operator: String,   // 操作员姓名
    pub start_time: String, // 班次开始
    pub end_time: String,   // 班次结束
    pub category: DowntimeCategory,
    pub origin: String,
    pub event: String,
    pub cause: String,
    pub action: String,
    pub minutes: f64,
    pub comment: String,
}

// ==========================================
// DowntimeHistoryFilter - 明细筛选
// ==========================================
// 各条件精确匹配; None 表示不筛选
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DowntimeHistoryFilter {
    pub date: Option<NaiveDate>,
    pub machine: Option<String>,
    pub category: Option<DowntimeCategory>,
}

impl DowntimeHistoryFilter {
    pub fn matches(&self, row: &DowntimeHistoryRow) -> bool {
        self.date.map_or(true, |d| row.date == d)
            && self.machine.as_deref().map_or(true, |m| row.machine == m)
            && self.category.map_or(true, |c| row.category == c)
    }
}

/// 展开停机记录（保持记录顺序与记录内顺序）
pub fn flatten(records: &[ShiftRecord]) -> Vec<DowntimeHistoryRow> {
    records
        .iter()
        .flat_map(|record| {
            record.downtime_entries.iter().map(move |entry| DowntimeHistoryRow {
                date: record.date,
                machine: text(&record.machine),
                operator: record.operator_name.clone(),
                start_time: text(&record.start_time),
                end_time: text(&record.end_time),
                category: entry.category,
                origin: text(&entry.origin),
                event: text(&entry.event),
                cause: text(&entry.cause),
                action: text(&entry.action),
                minutes: entry.minutes,
                comment: text(&entry.comment),
            })
        })
        .collect()
}

/// 按条件筛选明细行
pub fn filter_rows<'a>(
    rows: &'a [DowntimeHistoryRow],
    filter: &DowntimeHistoryFilter,
) -> Vec<&'a DowntimeHistoryRow> {
    rows.iter().filter(|row| filter.matches(row)).collect()
}

/// 明细中出现过的机组（去重,字典序）
pub fn distinct_machines(rows: &[DowntimeHistoryRow]) -> Vec<String> {
    rows.iter()
        .map(|row| row.machine.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// 各停机类别的分钟合计
pub fn minutes_by_category<'a, I>(rows: I) -> HashMap<DowntimeCategory, f64>
where
    I: IntoIterator<Item = &'a DowntimeHistoryRow>,
{
    let mut totals = HashMap::new();
    for row in rows {
        *totals.entry(row.category).or_insert(0.0) += row.minutes;
    }
    totals
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}
