// ==========================================
// 生产日报 OEE - 导入层
// ==========================================
// 职责: 外部参考数据导入（标准产能目录）与录入校验
// ==========================================

pub mod catalog_parser;
pub mod error;
pub mod file_parser;
pub mod shift_validator;

// 重导出
pub use catalog_parser::{load_catalog, map_catalog_rows, parse_catalog_file};
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, RawRow, UniversalFileParser};
pub use shift_validator::{ShiftValidationReport, ShiftValidator, ShiftViolation, ViolationLevel};
