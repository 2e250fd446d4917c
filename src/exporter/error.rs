// ==========================================
// 生产日报 OEE - 导出层错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("文件写入失败: {0}")]
    FileWriteError(#[from] std::io::Error),

    #[error("CSV写入失败: {0}")]
    CsvWriteError(#[from] csv::Error),

    #[error("CSV缓冲区刷新失败: {0}")]
    BufferError(String),
}

pub type ExportResult<T> = Result<T, ExportError>;
