// ==========================================
// 生产日报 OEE - 多班次加权汇总引擎
// ==========================================
// 职责: 按日期筛选 → 逐条计算 → 时间加权汇总 + 合计行
// 输入: 班次记录集合, 目录, 日期范围
// 输出: AggregateMetrics
// ==========================================
// 红线: 按计划时间加权,不按记录条数平均
// 红线: NotComputable 记录既不进入比率也不进入合计
// ==========================================

use crate::domain::metrics::{AggregateMetrics, MetricTotals, OeeMetrics, OeeOutcome};
use crate::domain::shift::{DateRangeFilter, ShiftRecord};
use crate::engine::catalog_lookup::MachineCatalog;
use crate::engine::oee_calculator::OeeCalculator;
use tracing::{info, warn};

// ==========================================
// OeeAggregator - 加权汇总引擎
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct OeeAggregator {
    calculator: OeeCalculator,
}

impl OeeAggregator {
    pub fn new() -> Self {
        Self {
            calculator: OeeCalculator::new(),
        }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 对筛选后的每条记录计算 OEE
    ///
    /// 保持输入顺序; 返回 (记录, 结果) 对,供明细行展示
    pub fn evaluate<'a>(
        &self,
        records: &'a [ShiftRecord],
        catalog: &MachineCatalog,
        filter: &DateRangeFilter,
    ) -> Vec<(&'a ShiftRecord, OeeOutcome)> {
        records
            .iter()
            .filter(|r| filter.contains(r.date))
            .map(|r| (r, self.calculator.compute(r, catalog)))
            .collect()
    }

    /// 汇总筛选范围内的班次记录
    pub fn aggregate(
        &self,
        records: &[ShiftRecord],
        catalog: &MachineCatalog,
        filter: &DateRangeFilter,
    ) -> AggregateMetrics {
        let evaluated = self.evaluate(records, catalog, filter);
        self.aggregate_outcomes(evaluated.iter().map(|(_, outcome)| outcome))
    }

    /// 汇总已计算的结果（NotComputable 只计数）
    pub fn aggregate_outcomes<'a, I>(&self, outcomes: I) -> AggregateMetrics
    where
        I: IntoIterator<Item = &'a OeeOutcome>,
    {
        let mut skipped_count = 0;
        let computed: Vec<&OeeMetrics> = outcomes
            .into_iter()
            .filter_map(|outcome| {
                let metrics = outcome.metrics();
                if metrics.is_none() {
                    skipped_count += 1;
                }
                metrics
            })
            .collect();

        let mut aggregate = aggregate_metrics(computed.iter().copied());
        aggregate.skipped_count = skipped_count;

        if skipped_count > 0 {
            warn!(skipped_count, "部分班次记录无法计算,已从汇总中排除");
        }
        info!(
            computed = aggregate.computed_count,
            skipped = aggregate.skipped_count,
            unrated = aggregate.unrated_count,
            "OEE 汇总完成"
        );

        aggregate
    }
}

// ==========================================
// 加权计算
// ==========================================

/// 对指标集合做时间加权汇总
///
/// - OEE = Σ(oee × 计划时间) / Σ计划时间
/// - 可用率 = Σ运行时间 / Σ计划时间
/// - 性能率 = Σ理想生产时间 / Σ运行时间 (≤ 1; 运行时间合计为负时取 0)
/// - 良品率 = Σ有效时间 / Σ理想生产时间
///
/// 分母为 0 时对应比率为 None
pub fn aggregate_metrics<'a, I>(metrics: I) -> AggregateMetrics
where
    I: IntoIterator<Item = &'a OeeMetrics>,
{
    let mut totals = MetricTotals::default();
    let mut weighted_oee_sum = 0.0;
    let mut computed_count = 0;
    let mut unrated_count = 0;

    for m in metrics {
        totals.add(m);
        weighted_oee_sum += m.oee * m.scheduled_minutes;
        computed_count += 1;
        if !m.is_rated() {
            unrated_count += 1;
        }
    }

    let oee = ratio(weighted_oee_sum, totals.scheduled_minutes);
    let availability = ratio(totals.running_minutes, totals.scheduled_minutes);
    let performance = if totals.running_minutes < 0.0 {
        Some(0.0)
    } else {
        ratio(totals.ideal_production_minutes, totals.running_minutes).map(|p| p.min(1.0))
    };
    let quality = ratio(totals.net_good_minutes, totals.ideal_production_minutes);

    AggregateMetrics {
        oee,
        availability,
        performance,
        quality,
        totals,
        computed_count,
        skipped_count: 0,
        unrated_count,
    }
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

#[cfg(test)]
mod tests;
