// ==========================================
// 生产日报 OEE - 标准产能目录导入
// ==========================================
// 职责: 表格文件 → MachineCatalogEntry 列表
// 列名: 大小写/重音不敏感, 接受西语与英文别名
// ==========================================

use crate::domain::catalog::{normalize_key, MachineCatalogEntry};
use crate::engine::catalog_lookup::MachineCatalog;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{RawRow, UniversalFileParser};
use std::path::Path;
use tracing::info;

const MACHINE_COLUMNS: [&str; 2] = ["machine", "maquina"];
const PROCESS_COLUMNS: [&str; 2] = ["process", "proceso"];
const RATE_COLUMNS: [&str; 4] = ["eph", "standard_rate", "piezas_hora", "piezas por hora"];

/// 解析目录文件 (.csv / .xlsx / .xls)
pub fn parse_catalog_file<P: AsRef<Path>>(path: P) -> ImportResult<Vec<MachineCatalogEntry>> {
    let path = path.as_ref();
    let rows = UniversalFileParser.parse(path)?;
    let entries = map_catalog_rows(&rows)?;

    info!(
        path = %path.display(),
        entries = entries.len(),
        "标准产能目录导入完成"
    );
    Ok(entries)
}

/// 读取目录文件并构建 MachineCatalog
pub fn load_catalog<P: AsRef<Path>>(path: P) -> ImportResult<MachineCatalog> {
    Ok(MachineCatalog::new(parse_catalog_file(path)?))
}

/// 原始行 → 目录条目
///
/// 机组为空的行跳过; 速率非数值或 ≤ 0 报错并带行号
pub fn map_catalog_rows(rows: &[RawRow]) -> ImportResult<Vec<MachineCatalogEntry>> {
    let mut entries = Vec::with_capacity(rows.len());

    for row in rows {
        let machine = cell(row, &MACHINE_COLUMNS).unwrap_or_default();
        if machine.is_empty() {
            continue;
        }

        let process = cell(row, &PROCESS_COLUMNS).unwrap_or_default();
        if process.is_empty() {
            return Err(ImportError::FieldValue {
                row: row.row_number,
                field: "process".to_string(),
                message: "工序为空".to_string(),
            });
        }

        let raw_rate = cell(row, &RATE_COLUMNS).ok_or_else(|| {
            ImportError::MissingColumn(format!("eph (行 {})", row.row_number))
        })?;
        let standard_rate = parse_rate(&raw_rate).ok_or_else(|| ImportError::FieldValue {
            row: row.row_number,
            field: "eph".to_string(),
            message: format!("标准产能必须为正数,实际: {}", raw_rate),
        })?;

        entries.push(MachineCatalogEntry {
            machine,
            process,
            standard_rate,
        });
    }

    Ok(entries)
}

/// 按列名别名取单元格
fn cell(row: &RawRow, aliases: &[&str]) -> Option<String> {
    row.cells
        .iter()
        .find(|(header, _)| {
            let key = normalize_key(header);
            aliases.iter().any(|alias| key == *alias)
        })
        .map(|(_, value)| value.trim().to_string())
}

/// 解析速率,兼容逗号小数点
fn parse_rate(raw: &str) -> Option<f64> {
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}
