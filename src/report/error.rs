// ==========================================
// 邮件插页排产系统 - 报表模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 报表导出错误类型
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("报表文件写入失败: {0}")]
    FileWriteError(String),

    #[error("CSV 导出失败: {0}")]
    CsvExportError(String),

    #[error("JSON 导出失败: {0}")]
    JsonExportError(String),
}

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        ReportError::FileWriteError(err.to_string())
    }
}

impl From<csv::Error> for ReportError {
    fn from(err: csv::Error) -> Self {
        ReportError::CsvExportError(err.to_string())
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        ReportError::JsonExportError(err.to_string())
    }
}

/// Result 类型别名
pub type ReportResult<T> = Result<T, ReportError>;
