// ==========================================
// 邮件插页排产系统 - 引擎层
// ==========================================
// 依据: Scheduling_Specs - 4. 组件设计
// ==========================================
// 职责: 实现排产业务规则, 不做 I/O
// 红线: 引擎确定性: 相同输入相同配置必产出相同结果;
//       平手规则精确实现, 不依赖容器遍历的偶然顺序
// ==========================================

pub mod aggregator;
pub mod error;
pub mod load_reporter;
pub mod orchestrator;
pub mod run_sequencer;
pub mod store_scheduler;
pub mod zipcode_scheduler;

// 重导出核心引擎
pub use aggregator::{Aggregate, Aggregator};
pub use error::{RunWarning, ScheduleError, ScheduleResult};
pub use load_reporter::{DailyLoad, LoadReport, LoadReporter};
pub use orchestrator::{ScheduleOrchestrator, ScheduleRunResult};
pub use run_sequencer::RunSequencer;
pub use store_scheduler::{StoreScheduleOutput, StoreScheduler};
pub use zipcode_scheduler::{ZipcodeScheduleOutput, ZipcodeScheduler};
