// ==========================================
// 邮件插页排产系统 - 核心库
// ==========================================
// 依据: Scheduling_Specs - 系统宪法
// 技术栈: Rust + CSV 报表
// 系统定位: 决策支持系统 (人工最终控制权)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 业务规则
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 报表层 - 结果导出
pub mod report;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{MailDate, SchedulingMethod};

// 领域实体
pub use domain::{
    MachineAssignment, PickListRecord, RunSequence, StoreProfile, ZipcodeProfile,
    ZipcodeScheduleEntry,
};

// 引擎
pub use engine::{
    Aggregator, LoadReport, LoadReporter, RunSequencer, RunWarning, ScheduleError,
    ScheduleOrchestrator, ScheduleResult, ScheduleRunResult, StoreScheduler, ZipcodeScheduler,
};

// 配置
pub use config::{LoadPenaltyCurve, ScheduleConfig};

// 导入
pub use importer::{ImportError, MailDateLookup, PickListParser};

// 报表
pub use report::{ReportError, ScheduleReportWriter};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "邮件插页排产系统";

// ==========================================
// 预编译检查
// ==========================================

// 确保编译时所有模块可见
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
