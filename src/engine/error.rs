// ==========================================
// 邮件插页排产系统 - 引擎层错误与警告
// ==========================================
// 依据: Scheduling_Specs - 7. 错误处理设计
// ==========================================
// 红线: 致命错误立即终止运行, 非致命条件作为警告附在结果上,
//       永不静默丢弃; 引擎内部不做重试
// ==========================================

use crate::config::ConfigError;
use crate::domain::types::MailDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ==========================================
// ScheduleError - 致命错误
// ==========================================
#[derive(Error, Debug)]
pub enum ScheduleError {
    /// 记录数据非法（第 index 条输入记录, 0 起）
    #[error("数据错误: 记录#{index} ({zipcode}/{store}): {reason}")]
    Data {
        index: usize,
        zipcode: String,
        store: String,
        reason: String,
    },

    /// 配置非法（排产开始前抛出）
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// Result 类型别名
pub type ScheduleResult<T> = Result<T, ScheduleError>;

// ==========================================
// RunWarning - 非致命警告
// ==========================================
// 附在运行结果上供操作员复核, 不中断排产
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunWarning {
    /// 同一邮编在输入记录中映射到多个邮寄日
    /// 排产按输入序首见邮寄日进行（确定性）
    AmbiguousMailDate {
        zipcode: String,
        kept: Option<MailDate>,
        conflicting: Option<MailDate>,
    },

    /// 门店优先方法的再均衡在达到容差前终止（无合法移动）
    UnbalancedResult {
        /// 终止时的最大-最小负载差
        achieved_spread: u64,
        /// 配置的单机台负载上限
        ceiling: f64,
    },
}

impl RunWarning {
    /// 警告摘要（日志与报表用）
    pub fn summary(&self) -> String {
        match self {
            RunWarning::AmbiguousMailDate {
                zipcode,
                kept,
                conflicting,
            } => format!(
                "邮编{}邮寄日歧义: 保留{}, 冲突{}",
                zipcode,
                MailDate::label_opt(*kept),
                MailDate::label_opt(*conflicting)
            ),
            RunWarning::UnbalancedResult {
                achieved_spread,
                ceiling,
            } => format!(
                "再均衡未达容差: 负载差={}, 单机上限={:.1}",
                achieved_spread, ceiling
            ),
        }
    }
}
