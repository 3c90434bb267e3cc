// ==========================================
// 邮件插页排产系统 - 配置层
// ==========================================
// 依据: Scheduling_Specs - 6. 外部接口 (配置项全集)
// ==========================================
// 职责: 排产运行配置与运行前校验
// ==========================================

pub mod schedule_config;

// 重导出核心配置类型
pub use schedule_config::{
    ConfigError, LoadPenaltyCurve, ScheduleConfig, DEFAULT_BALANCE_TOLERANCE,
    DEFAULT_MACHINE_COUNT,
};
