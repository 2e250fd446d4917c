// ==========================================
// 生产日报 OEE - 班次记录领域模型
// ==========================================
// 职责: 班次记录 (registro) 与停机记录 (paro)
// 红线: 记录创建后只读,报表不得修改
// ==========================================

use crate::domain::types::DowntimeCategory;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// 时刻字符串支持的格式
const TIME_FORMATS: [&str; 2] = ["%H:%M", "%H:%M:%S"];

// ==========================================
// DowntimeEntry - 停机记录
// ==========================================
// 归属于唯一的 ShiftRecord
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DowntimeEntry {
    pub category: DowntimeCategory, // 停机类别
    pub minutes: f64,               // 停机时长（分钟）

    // ===== 描述字段（不参与计算） =====
    #[serde(default)]
    pub origin: Option<String>, // 来源
    #[serde(default)]
    pub event: Option<String>, // 停机事件 (hecho)
    #[serde(default)]
    pub cause: Option<String>, // 原因
    #[serde(default)]
    pub action: Option<String>, // 处理措施
    #[serde(default)]
    pub comment: Option<String>, // 备注
}

impl DowntimeEntry {
    /// 创建只含类别与时长的停机记录
    pub fn new(category: DowntimeCategory, minutes: f64) -> Self {
        Self {
            category,
            minutes,
            origin: None,
            event: None,
            cause: None,
            action: None,
            comment: None,
        }
    }

    pub fn with_event(mut self, event: &str, cause: &str, action: &str) -> Self {
        self.event = Some(event.to_string());
        self.cause = Some(cause.to_string());
        self.action = Some(action.to_string());
        self
    }

    pub fn with_origin(mut self, origin: &str) -> Self {
        self.origin = Some(origin.to_string());
        self
    }

    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }
}

// ==========================================
// ShiftRecord - 班次记录
// ==========================================
// 说明: 必填字段在录入端校验; 计算层对缺失字段返回 NotComputable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftRecord {
    #[serde(default)]
    pub record_id: Option<String>, // 存储层分配的ID

    pub date: NaiveDate, // 生产日期 (YYYY-MM-DD)

    // ===== 操作员 =====
    #[serde(default)]
    pub operator_code: String,
    #[serde(default)]
    pub operator_name: String,

    // ===== 机组/工序 =====
    #[serde(default)]
    pub machine: Option<String>,
    #[serde(default)]
    pub process: Option<String>,

    // ===== 时间（同日时刻, 原样保存） =====
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,

    // ===== 产量 =====
    #[serde(default)]
    pub cart_loads: Option<i64>, // 车数 (carretas)
    #[serde(default)]
    pub total_pieces: Option<i64>,
    #[serde(default)]
    pub good_pieces: Option<i64>,

    #[serde(default)]
    pub downtime_entries: Vec<DowntimeEntry>,
}

impl ShiftRecord {
    /// 创建空白班次记录
    pub fn new(date: NaiveDate) -> Self {
        Self {
            record_id: None,
            date,
            operator_code: String::new(),
            operator_name: String::new(),
            machine: None,
            process: None,
            start_time: None,
            end_time: None,
            cart_loads: None,
            total_pieces: None,
            good_pieces: None,
            downtime_entries: Vec::new(),
        }
    }

    /// 非空的机组名称
    pub fn machine_name(&self) -> Option<&str> {
        non_blank(self.machine.as_deref())
    }

    /// 非空的工序名称
    pub fn process_name(&self) -> Option<&str> {
        non_blank(self.process.as_deref())
    }

    /// 开始时刻（无法解析视为缺失）
    pub fn start(&self) -> Option<NaiveTime> {
        parse_time_of_day(self.start_time.as_deref())
    }

    /// 结束时刻（无法解析视为缺失）
    pub fn end(&self) -> Option<NaiveTime> {
        parse_time_of_day(self.end_time.as_deref())
    }

    /// 停机总时长（全部类别）
    pub fn total_downtime_minutes(&self) -> f64 {
        self.downtime_entries.iter().map(|e| e.minutes).sum()
    }
}

// ==========================================
// DateRangeFilter - 日期范围筛选
// ==========================================
// 闭区间; 缺省边界视为无界
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangeFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRangeFilter {
    /// 不筛选
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// 解析时刻字符串 ("08:00" / "08:00:00")
pub fn parse_time_of_day(value: Option<&str>) -> Option<NaiveTime> {
    let raw = non_blank(value)?;
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
}
