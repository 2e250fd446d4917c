// ==========================================
// 生产日报 OEE - 停机事件目录
// ==========================================
// 职责: 各机组可选的停机事件及其故障原因分类
// 用途: 录入校验、停机历史筛选
// ==========================================

use crate::domain::catalog::normalize_key;
use crate::domain::types::FailureCause;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ==========================================
// DowntimeReason - 停机事件
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DowntimeReason {
    pub event: String,       // 停机事件
    pub cause: FailureCause, // 故障原因分类
}

// ==========================================
// DowntimeReasonCatalog - 停机事件目录
// ==========================================
// 键: 规范化后的机组名
#[derive(Debug, Clone, Default)]
pub struct DowntimeReasonCatalog {
    reasons: HashMap<String, Vec<DowntimeReason>>,
}

impl DowntimeReasonCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 工厂现行的停机事件目录
    pub fn builtin() -> Self {
        use FailureCause::{Electrical, Mechanical, Operational};

        let data: &[(&str, &[(&str, FailureCause)])] = &[
        (
            "Embutidora 315",
            &[
                ("Pérdida de presión", Mechanical),
                ("Cambio de molde", Operational),
                ("Fuga de aceite", Mechanical),
                ("Calibración de presiones", Operational),
                ("Calibración de sensores", Operational),
                ("Falla en Relé", Electrical),
                ("No acciona", Mechanical),
                ("No acciona", Electrical),
                ("Falla en molde", Mechanical),
            ],
        ),
        (
            "Embutidora 200",
            &[
                ("Pérdida de presión", Mechanical),
                ("Cambio de molde", Operational),
                ("Fuga de aceite", Mechanical),
                ("Calibración de presiones", Mechanical),
                ("Calibración de sensores", Operational),
                ("Falla en Relé", Electrical),
                ("Falla en molde", Mechanical),
            ],
        ),
        (
            "Perforado",
            &[
                ("Pérdida de presión", Mechanical),
                ("Cambio de punzones", Operational),
            ],
        ),
        (
            "Tubo",
            &[
                ("Desajuste de lanza de dobladora", Mechanical),
                ("Desajuste de mordaza de dobladora", Mechanical),
                ("No dobla el tubo correctamente", Mechanical),
                ("Desajuste de sensor", Electrical),
                ("Reventadura de cadena de dobladora", Mechanical),
                ("Falta de presión", Mechanical),
                ("No acciona la dobladora", Electrical),
                ("No regresa la dobladora", Electrical),
                ("Tubo golpeado o con mal ángulo", Mechanical),
                ("Formadora no acciona", Mechanical),
                ("Formadora no acciona", Electrical),
                ("Cambio de punzones", Mechanical),
                ("Resortes quebrados", Mechanical),
                ("Tubo mal perforado por tope", Mechanical),
                ("Perforadora no acciona", Mechanical),
                ("Perforadora no acciona", Electrical),
                ("Perforadora no embraga", Mechanical),
                ("Embrague de perforadora", Mechanical),
                ("Falla en cuña de perforadora", Mechanical),
                ("Faja de volante reventada", Mechanical),
                ("Falla en freno de perforadora", Mechanical),
                ("Falla en polea de perforadora", Mechanical),
                ("Falla en pedal de perforadora", Mechanical),
                ("Falla en botonera de perforadora", Electrical),
                ("Falla en palanca de perforadora", Mechanical),
                ("Falla en sujetadores de molde", Mechanical),
                ("Falla en tablero eléctrico local", Electrical),
            ],
        ),
        (
            "Serigrafía",
            &[
                ("Problema con manta de serigrafía", Operational),
                ("Problema con sujetador de marco", Mechanical),
                ("Falla de mesa giratoria", Mechanical),
                ("Falla de molde sujetador de tolva", Mechanical),
            ],
        ),
        (
            "Pintura Electroestática",
            &[
                ("Falla en quemador", Mechanical),
                ("Motor de ventilador", Mechanical),
                ("Arrastre de cadena", Mechanical),
                ("Cadena de traslado de piezas", Mechanical),
                ("Lubricación de cadena", Mechanical),
                ("Extractores de vapores", Mechanical),
                ("Panel principal", Electrical),
                ("Panel local de ciclón", Electrical),
                ("Pistolas de pintura", Mechanical),
                ("Panel de calibración de pistolas", Electrical),
                ("Sistema de carrera de pistolas", Mechanical),
                ("Sistema de carrera de pistolas", Electrical),
                ("Mangueras neumáticas", Mechanical),
                ("Unidad de mantenimiento", Mechanical),
                ("Tubería neumática", Mechanical),
                ("Electroválvulas", Mechanical),
                ("Ciclón principal", Mechanical),
                ("Filtros de pintura", Mechanical),
                ("Cernidores de pintura", Mechanical),
                ("Cernidores de pintura", Electrical),
                ("Cernido de pintura", Operational),
                ("Cerchas de materiales", Operational),
                ("Ganchos de cadena", Operational),
            ],
        ),
        ];

        let mut catalog = Self::new();
        for (machine, reasons) in data {
            for (event, cause) in reasons.iter() {
                catalog.add(machine, event, *cause);
            }
        }
        catalog
    }

    /// 添加一条停机事件
    pub fn add(&mut self, machine: &str, event: &str, cause: FailureCause) {
        self.reasons
            .entry(normalize_key(machine))
            .or_default()
            .push(DowntimeReason {
                event: event.to_string(),
                cause,
            });
    }

    /// 指定机组的停机事件（未登记返回空切片）
    pub fn reasons_for(&self, machine: &str) -> &[DowntimeReason] {
        self.reasons
            .get(&normalize_key(machine))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 机组是否登记了停机事件目录
    pub fn has_machine(&self, machine: &str) -> bool {
        self.reasons.contains_key(&normalize_key(machine))
    }

    /// 停机事件是否在机组目录中
    pub fn is_known_event(&self, machine: &str, event: &str) -> bool {
        let key = normalize_key(event);
        self.reasons_for(machine)
            .iter()
            .any(|r| normalize_key(&r.event) == key)
    }

    /// 停机事件可能的故障原因（同一事件可能对应多个分类）
    pub fn causes_for(&self, machine: &str, event: &str) -> Vec<FailureCause> {
        let key = normalize_key(event);
        self.reasons_for(machine)
            .iter()
            .filter(|r| normalize_key(&r.event) == key)
            .map(|r| r.cause)
            .collect()
    }
}
