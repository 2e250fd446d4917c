// ==========================================
// 生产日报 OEE - 指标结果模型
// ==========================================
// 职责: 单班次 OEE 指标 / 多班次加权汇总
// 红线: 派生数据,不落库; 不做截断/修正（性能除外）
// ==========================================

use crate::domain::catalog::RateLookup;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// OeeMetrics - 单班次指标
// ==========================================
// 时间单位: 分钟
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OeeMetrics {
    pub scheduled_minutes: f64,          // 计划时间 (结束 - 开始)
    pub planned_downtime_minutes: f64,   // 计划停机
    pub unplanned_downtime_minutes: f64, // 非计划停机 (含异常)
    pub good_pieces: i64,                // 良品数
    pub defective_pieces: i64,           // 不良品数 (可能为负, 不修正)
    pub running_minutes: f64,            // 运行时间
    pub speed_loss_minutes: f64,         // 速度损失
    pub ideal_production_minutes: f64,   // 理想生产时间
    pub quality_loss_minutes: f64,       // 质量损失
    pub net_good_minutes: f64,           // 有效时间

    pub availability: f64, // 可用率
    pub performance: f64,  // 性能率 (≤ 1)
    pub quality: f64,      // 良品率
    pub oee: f64,          // OEE = 可用率 × 性能率 × 良品率

    pub rate: RateLookup, // 使用的标准速率及其来源
}

impl OeeMetrics {
    /// 标准速率是否来自目录
    pub fn is_rated(&self) -> bool {
        self.rate.is_matched()
    }

    /// 是否存在超出 [0,1] 或为负的字段（录入不一致的信号）
    pub fn has_out_of_range_values(&self) -> bool {
        let ratio_out = |v: f64| !(0.0..=1.0).contains(&v);
        self.defective_pieces < 0
            || self.running_minutes < 0.0
            || ratio_out(self.availability)
            || ratio_out(self.performance)
            || ratio_out(self.quality)
    }
}

// ==========================================
// NotComputableReason - 无法计算的原因
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotComputableReason {
    MissingField { field: String },
    NonPositiveSchedule { scheduled_minutes: f64 },
}

impl fmt::Display for NotComputableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotComputableReason::MissingField { field } => write!(f, "缺少字段: {}", field),
            NotComputableReason::NonPositiveSchedule { scheduled_minutes } => {
                write!(f, "计划时间非正: {:.1} 分钟", scheduled_minutes)
            }
        }
    }
}

// ==========================================
// OeeOutcome - 单班次计算结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OeeOutcome {
    Computed(OeeMetrics),
    NotComputable(NotComputableReason),
}

impl OeeOutcome {
    pub fn metrics(&self) -> Option<&OeeMetrics> {
        match self {
            OeeOutcome::Computed(m) => Some(m),
            OeeOutcome::NotComputable(_) => None,
        }
    }

    pub fn is_computable(&self) -> bool {
        matches!(self, OeeOutcome::Computed(_))
    }
}

// ==========================================
// MetricTotals - 合计行
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricTotals {
    pub scheduled_minutes: f64,
    pub planned_downtime_minutes: f64,
    pub unplanned_downtime_minutes: f64,
    pub running_minutes: f64,
    pub speed_loss_minutes: f64,
    pub ideal_production_minutes: f64,
    pub quality_loss_minutes: f64,
    pub net_good_minutes: f64,
    pub good_pieces: i64,
    pub defective_pieces: i64,
}

impl MetricTotals {
    /// 累加单班次指标
    pub fn add(&mut self, m: &OeeMetrics) {
        self.scheduled_minutes += m.scheduled_minutes;
        self.planned_downtime_minutes += m.planned_downtime_minutes;
        self.unplanned_downtime_minutes += m.unplanned_downtime_minutes;
        self.running_minutes += m.running_minutes;
        self.speed_loss_minutes += m.speed_loss_minutes;
        self.ideal_production_minutes += m.ideal_production_minutes;
        self.quality_loss_minutes += m.quality_loss_minutes;
        self.net_good_minutes += m.net_good_minutes;
        self.good_pieces += m.good_pieces;
        self.defective_pieces += m.defective_pieces;
    }
}

// ==========================================
// AggregateMetrics - 加权汇总
// ==========================================
// None 表示分母为 0（无数据）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateMetrics {
    pub oee: Option<f64>,
    pub availability: Option<f64>,
    pub performance: Option<f64>,
    pub quality: Option<f64>,
    pub totals: MetricTotals,

    // ===== 计数 =====
    pub computed_count: usize,
    pub skipped_count: usize, // NotComputable 记录数
    pub unrated_count: usize, // 使用默认速率的记录数
}

impl AggregateMetrics {
    /// 是否无任何可计算记录
    pub fn is_empty(&self) -> bool {
        self.computed_count == 0
    }
}
