// ==========================================
// 生产日报 OEE - 班次记录录入校验
// ==========================================
// 职责: 录入端规则校验 + 校验报告生成
// 说明: 计算引擎不调用本模块,由写入存储前的调用方负责
// ==========================================

use crate::domain::downtime_reason::DowntimeReasonCatalog;
use crate::domain::shift::{DowntimeEntry, ShiftRecord};
use crate::domain::types::DowntimeCategory;
use crate::engine::catalog_lookup::MachineCatalog;
use serde::{Deserialize, Serialize};

// ==========================================
// ViolationLevel - 违规级别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationLevel {
    Error,   // 错误（拒绝保存）
    Warning, // 警告（允许保存）
}

// ==========================================
// ShiftViolation - 违规记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShiftViolation {
    pub level: ViolationLevel,
    pub field: String,
    pub entry_index: Option<usize>, // 停机记录下标（班次级字段为 None）
    pub message: String,
}

// ==========================================
// ShiftValidationReport - 校验报告
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShiftValidationReport {
    pub violations: Vec<ShiftViolation>,
}

impl ShiftValidationReport {
    /// 无 Error 级违规即可保存
    pub fn is_valid(&self) -> bool {
        self.error_count() == 0
    }

    pub fn error_count(&self) -> usize {
        self.count(ViolationLevel::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(ViolationLevel::Warning)
    }

    fn count(&self, level: ViolationLevel) -> usize {
        self.violations.iter().filter(|v| v.level == level).count()
    }

    fn push(&mut self, level: ViolationLevel, field: &str, entry_index: Option<usize>, message: String) {
        self.violations.push(ShiftViolation {
            level,
            field: field.to_string(),
            entry_index,
            message,
        });
    }
}

// ==========================================
// ShiftValidator - 录入校验器
// ==========================================
pub struct ShiftValidator<'a> {
    catalog: &'a MachineCatalog,
    reasons: &'a DowntimeReasonCatalog,
}

impl<'a> ShiftValidator<'a> {
    pub fn new(catalog: &'a MachineCatalog, reasons: &'a DowntimeReasonCatalog) -> Self {
        Self { catalog, reasons }
    }

    /// 校验单条班次记录
    pub fn validate(&self, record: &ShiftRecord) -> ShiftValidationReport {
        let mut report = ShiftValidationReport::default();

        self.validate_required_fields(record, &mut report);
        self.validate_consistency(record, &mut report);
        for (idx, entry) in record.downtime_entries.iter().enumerate() {
            self.validate_downtime_entry(record, idx, entry, &mut report);
        }

        report
    }

    /// 必填字段
    fn validate_required_fields(&self, record: &ShiftRecord, report: &mut ShiftValidationReport) {
        let required = [
            ("machine", record.machine_name().is_some()),
            ("process", record.process_name().is_some()),
            ("start_time", record.start().is_some()),
            ("end_time", record.end().is_some()),
            ("total_pieces", record.total_pieces.is_some()),
            ("good_pieces", record.good_pieces.is_some()),
        ];
        for (field, present) in required {
            if !present {
                report.push(ViolationLevel::Error, field, None, format!("{} 缺失或格式错误", field));
            }
        }

        for (field, value) in [
            ("total_pieces", record.total_pieces),
            ("good_pieces", record.good_pieces),
            ("cart_loads", record.cart_loads),
        ] {
            if let Some(v) = value.filter(|v| *v < 0) {
                report.push(ViolationLevel::Error, field, None, format!("{} 为负数: {}", field, v));
            }
        }
    }

    /// 跨字段一致性（警告）
    fn validate_consistency(&self, record: &ShiftRecord, report: &mut ShiftValidationReport) {
        if let (Some(total), Some(good)) = (record.total_pieces, record.good_pieces) {
            if good > total {
                report.push(
                    ViolationLevel::Warning,
                    "good_pieces",
                    None,
                    format!("良品数 {} 大于总数 {}", good, total),
                );
            }
        }

        if let (Some(start), Some(end)) = (record.start(), record.end()) {
            let scheduled = end.signed_duration_since(start).num_seconds() as f64 / 60.0;
            if scheduled <= 0.0 {
                report.push(
                    ViolationLevel::Warning,
                    "end_time",
                    None,
                    "结束时间不晚于开始时间（不支持跨零点班次）,该记录将无法计算 OEE".to_string(),
                );
            } else if record.total_downtime_minutes() > scheduled {
                report.push(
                    ViolationLevel::Warning,
                    "downtime_entries",
                    None,
                    format!(
                        "停机合计 {:.1} 分钟超过计划时间 {:.1} 分钟",
                        record.total_downtime_minutes(),
                        scheduled
                    ),
                );
            }
        }

        if let (Some(machine), Some(process)) = (record.machine_name(), record.process_name()) {
            if self.catalog.find(machine, process).is_none() {
                report.push(
                    ViolationLevel::Warning,
                    "process",
                    None,
                    format!("目录中无 {} / {},将使用默认速率", machine, process),
                );
            }
        }
    }

    /// 停机记录规则
    ///
    /// - 全部类别: 时长 > 0 且有备注
    /// - 非计划停机: 来源、事件、原因、措施必填
    /// - 异常: 事件、原因、措施必填
    fn validate_downtime_entry(
        &self,
        record: &ShiftRecord,
        idx: usize,
        entry: &DowntimeEntry,
        report: &mut ShiftValidationReport,
    ) {
        if !(entry.minutes.is_finite() && entry.minutes > 0.0) {
            report.push(
                ViolationLevel::Error,
                "minutes",
                Some(idx),
                format!("停机时长必须大于 0: {}", entry.minutes),
            );
        }
        if is_blank(&entry.comment) {
            report.push(ViolationLevel::Error, "comment", Some(idx), "停机记录缺少备注".to_string());
        }

        let required: Vec<(&str, &Option<String>)> = match entry.category {
            DowntimeCategory::Planned => Vec::new(),
            DowntimeCategory::Unplanned => vec![
                ("origin", &entry.origin),
                ("event", &entry.event),
                ("cause", &entry.cause),
                ("action", &entry.action),
            ],
            DowntimeCategory::Anomaly => vec![
                ("event", &entry.event),
                ("cause", &entry.cause),
                ("action", &entry.action),
            ],
        };
        for (field, value) in required {
            if is_blank(value) {
                report.push(
                    ViolationLevel::Error,
                    field,
                    Some(idx),
                    format!("{} 停机记录不完整: 缺少 {}", entry.category, field),
                );
            }
        }

        // 事件不在机组目录中（仅对已登记目录的机组提示）
        if let (Some(machine), Some(event)) = (record.machine_name(), non_blank(&entry.event)) {
            if self.reasons.has_machine(machine) && !self.reasons.is_known_event(machine, event) {
                report.push(
                    ViolationLevel::Warning,
                    "event",
                    Some(idx),
                    format!("停机事件 \"{}\" 不在 {} 的目录中", event, machine),
                );
            }
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn is_blank(value: &Option<String>) -> bool {
    non_blank(value).is_none()
}
