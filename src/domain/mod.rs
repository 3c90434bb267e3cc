// ==========================================
// 邮件插页排产系统 - 领域模型层
// ==========================================
// 依据: Scheduling_Specs - 3. 数据模型
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含聚合逻辑, 不含引擎逻辑, 不含 I/O
// ==========================================

pub mod assignment;
pub mod profile;
pub mod record;
pub mod types;

// 重导出核心类型
pub use assignment::{MachineAssignment, RunSequence, ZipcodeScheduleEntry};
pub use profile::{StoreProfile, ZipcodeProfile};
pub use record::{PickListRecord, RawPickListSection, RawStoreRow};
pub use types::{MailDate, SchedulingMethod};
