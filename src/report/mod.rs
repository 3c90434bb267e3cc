// ==========================================
// 邮件插页排产系统 - 报表层
// ==========================================
// 职责: 排产运行结果的只读导出 (CSV 表 + JSON 文档)
// 红线: 报表层绝不修改排产结果
// ==========================================

pub mod csv_export;
pub mod error;

// 重导出核心类型
pub use csv_export::ScheduleReportWriter;
pub use error::{ReportError, ReportResult};
