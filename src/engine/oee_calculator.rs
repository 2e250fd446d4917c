// ==========================================
// 生产日报 OEE - 单班次 OEE 计算引擎
// ==========================================
// 职责: 班次记录 + 目录 → OEE 指标
// 输入: ShiftRecord, MachineCatalog
// 输出: OeeOutcome (Computed / NotComputable)
// ==========================================
// 红线: 纯函数,无 I/O,相同输入必得相同输出
// 红线: 除性能率 ≤ 1 外不做任何截断,录入错误原样体现在结果中
// 限制: 仅支持同日班次,跨零点 (结束 < 开始) 视为无法计算
// ==========================================

use crate::domain::metrics::{NotComputableReason, OeeMetrics, OeeOutcome};
use crate::domain::shift::ShiftRecord;
use crate::engine::catalog_lookup::MachineCatalog;
use tracing::debug;

// ==========================================
// OeeCalculator - OEE 计算引擎
// ==========================================
// 无状态引擎,目录由调用方注入
#[derive(Debug, Default, Clone, Copy)]
pub struct OeeCalculator;

impl OeeCalculator {
    pub fn new() -> Self {
        Self
    }

    /// 计算单班次 OEE 指标
    ///
    /// # 参数
    /// - `record`: 班次记录
    /// - `catalog`: 标准产能目录
    ///
    /// # 返回
    /// - Computed: 全部指标
    /// - NotComputable: 缺少必填字段或计划时间 ≤ 0
    pub fn compute(&self, record: &ShiftRecord, catalog: &MachineCatalog) -> OeeOutcome {
        match self.try_compute(record, catalog) {
            Ok(metrics) => OeeOutcome::Computed(metrics),
            Err(reason) => {
                debug!(
                    record_id = ?record.record_id,
                    date = %record.date,
                    reason = %reason,
                    "班次记录无法计算 OEE"
                );
                OeeOutcome::NotComputable(reason)
            }
        }
    }

    fn try_compute(
        &self,
        record: &ShiftRecord,
        catalog: &MachineCatalog,
    ) -> Result<OeeMetrics, NotComputableReason> {
        // 0. 必填字段
        let machine = record.machine_name().ok_or_else(|| missing("machine"))?;
        let process = record.process_name().ok_or_else(|| missing("process"))?;
        let start = record.start().ok_or_else(|| missing("start_time"))?;
        let end = record.end().ok_or_else(|| missing("end_time"))?;
        let total_pieces = record.total_pieces.ok_or_else(|| missing("total_pieces"))?;
        let good_pieces = record.good_pieces.ok_or_else(|| missing("good_pieces"))?;

        // 1. 标准速率
        let rate = catalog.lookup(machine, process);
        let rate_per_minute = rate.rate_per_minute();

        // 2. 计划时间（同日时刻差）
        let scheduled_minutes = end.signed_duration_since(start).num_seconds() as f64 / 60.0;
        if scheduled_minutes <= 0.0 {
            return Err(NotComputableReason::NonPositiveSchedule { scheduled_minutes });
        }

        // 3-4. 停机时间: 计划 / 非计划（非计划与异常合并）
        let (planned_downtime_minutes, unplanned_downtime_minutes) = record
            .downtime_entries
            .iter()
            .fold((0.0, 0.0), |(planned, unplanned), entry| {
                if entry.category.is_planned() {
                    (planned + entry.minutes, unplanned)
                } else {
                    (planned, unplanned + entry.minutes)
                }
            });

        // 5-10. 时间分解
        let defective_pieces = total_pieces - good_pieces;
        let running_minutes =
            scheduled_minutes - planned_downtime_minutes - unplanned_downtime_minutes;
        let ideal_production_minutes = total_pieces as f64 / rate_per_minute;
        let speed_loss_minutes = running_minutes - ideal_production_minutes;
        let quality_loss_minutes = defective_pieces as f64 / rate_per_minute;
        let net_good_minutes = ideal_production_minutes - quality_loss_minutes;

        // 11-14. 比率
        let availability = running_minutes / scheduled_minutes;
        let performance = if running_minutes > 0.0 {
            (ideal_production_minutes / running_minutes).min(1.0)
        } else {
            0.0
        };
        let quality = if ideal_production_minutes > 0.0 {
            net_good_minutes / ideal_production_minutes
        } else {
            0.0
        };
        let oee = availability * performance * quality;

        Ok(OeeMetrics {
            scheduled_minutes,
            planned_downtime_minutes,
            unplanned_downtime_minutes,
            good_pieces,
            defective_pieces,
            running_minutes,
            speed_loss_minutes,
            ideal_production_minutes,
            quality_loss_minutes,
            net_good_minutes,
            availability,
            performance,
            quality,
            oee,
            rate,
        })
    }
}

fn missing(field: &str) -> NotComputableReason {
    NotComputableReason::MissingField {
        field: field.to_string(),
    }
}

/// 计算单班次 OEE（便捷函数）
pub fn compute_metrics(record: &ShiftRecord, catalog: &MachineCatalog) -> OeeOutcome {
    OeeCalculator::new().compute(record, catalog)
}
