// ==========================================
// 生产日报 OEE - 领域类型定义
// ==========================================
// 职责: 停机类别、故障原因等枚举
// 序列化格式: 与现场录入表单一致的西语标签
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 停机类别 (Downtime Category, "paro")
// ==========================================
// 红线: OEE 计算只区分 Planned 与非 Planned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DowntimeCategory {
    #[serde(rename = "Planeado", alias = "Planned", alias = "PLANNED")]
    Planned, // 计划停机
    #[serde(rename = "No Planeado", alias = "Unplanned", alias = "UNPLANNED")]
    Unplanned, // 非计划停机
    #[serde(
        rename = "Anomalía",
        alias = "Anomalia",
        alias = "Anomaly",
        alias = "ANOMALY"
    )]
    Anomaly, // 异常
}

impl DowntimeCategory {
    /// 是否计入计划停机时间
    pub fn is_planned(&self) -> bool {
        matches!(self, DowntimeCategory::Planned)
    }

    /// 现场标签
    pub fn label(&self) -> &'static str {
        match self {
            DowntimeCategory::Planned => "Planeado",
            DowntimeCategory::Unplanned => "No Planeado",
            DowntimeCategory::Anomaly => "Anomalía",
        }
    }

    /// 从现场标签或英文名解析（大小写、重音不敏感）
    pub fn parse(s: &str) -> Option<Self> {
        match crate::domain::catalog::normalize_key(s).as_str() {
            "planeado" | "planned" => Some(DowntimeCategory::Planned),
            "no planeado" | "unplanned" => Some(DowntimeCategory::Unplanned),
            "anomalia" | "anomaly" => Some(DowntimeCategory::Anomaly),
            _ => None,
        }
    }
}

impl fmt::Display for DowntimeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// 故障原因分类 (Failure Cause)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureCause {
    #[serde(rename = "Mecánica", alias = "Mecanica", alias = "Mechanical")]
    Mechanical, // 机械
    #[serde(rename = "Eléctrica", alias = "Electrica", alias = "Electrical")]
    Electrical, // 电气
    #[serde(rename = "Operacional", alias = "Operational")]
    Operational, // 操作
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::Mechanical => write!(f, "Mecánica"),
            FailureCause::Electrical => write!(f, "Eléctrica"),
            FailureCause::Operational => write!(f, "Operacional"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serde_labels() {
        let json = serde_json::to_string(&DowntimeCategory::Unplanned).unwrap();
        assert_eq!(json, "\"No Planeado\"");

        let parsed: DowntimeCategory = serde_json::from_str("\"Anomalia\"").unwrap();
        assert_eq!(parsed, DowntimeCategory::Anomaly);

        let parsed: DowntimeCategory = serde_json::from_str("\"Planned\"").unwrap();
        assert_eq!(parsed, DowntimeCategory::Planned);
    }

    #[test]
    fn test_category_parse_is_accent_insensitive() {
        assert_eq!(DowntimeCategory::parse(" ANOMALÍA "), Some(DowntimeCategory::Anomaly));
        assert_eq!(DowntimeCategory::parse("no planeado"), Some(DowntimeCategory::Unplanned));
        assert_eq!(DowntimeCategory::parse("otro"), None);
        assert!(DowntimeCategory::Planned.is_planned());
        assert!(!DowntimeCategory::Anomaly.is_planned());
    }
}
