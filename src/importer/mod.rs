// ==========================================
// 邮件插页排产系统 - 导入层
// ==========================================
// 职责: 外部数据导入, 生成规范化记录序列
// 支持: 拣货单纯文本, 邮寄日 CSV 地址表
// 红线: 导入层只产出 Vec<PickListRecord>, 不触碰引擎内部结构
// ==========================================

pub mod error;
pub mod mail_dates;
pub mod pick_list;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use mail_dates::MailDateLookup;
pub use pick_list::PickListParser;
