// ==========================================
// 邮件插页排产系统 - 排产配置
// ==========================================
// 依据: Scheduling_Specs - 6. 外部接口 (配置项)
// ==========================================
// 职责: 单次排产运行的全部可调参数, 运行开始前一次性校验
// ==========================================

use crate::domain::types::SchedulingMethod;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 默认机台数
pub const DEFAULT_MACHINE_COUNT: u32 = 3;

/// 默认负载均衡容差
pub const DEFAULT_BALANCE_TOLERANCE: f64 = 0.15;

// ==========================================
// ConfigError - 配置错误
// ==========================================
// 排产开始前抛出, 排产过程中不产生配置错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("机台数非法: machine_count={0}, 必须 >= 1")]
    InvalidMachineCount(u32),

    #[error("均衡容差非法: balance_tolerance={0}, 必须为非负有限值")]
    InvalidBalanceTolerance(f64),

    #[error("负载惩罚曲线非法: {0}")]
    InvalidLoadPenalty(String),
}

// ==========================================
// LoadPenaltyCurve - 负载惩罚曲线
// ==========================================
// 邮编优先方法的亲和度 = 共享门店数 - 惩罚项
// 惩罚曲线设计上未定死, 作为可调参数暴露:
// - Linear: 惩罚 = weight * 超出当日公平份额的比例 (默认, weight=1.0)
// - Stepped: 超出比例每满 step_ratio 计一档, 惩罚 = 档数 * step_penalty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "curve", rename_all = "snake_case")]
pub enum LoadPenaltyCurve {
    Linear { weight: f64 },
    Stepped { step_ratio: f64, step_penalty: f64 },
}

impl Default for LoadPenaltyCurve {
    fn default() -> Self {
        LoadPenaltyCurve::Linear { weight: 1.0 }
    }
}

impl LoadPenaltyCurve {
    /// 计算负载惩罚
    ///
    /// # 参数
    /// - `load`: 机台当日已分配数量
    /// - `fair_share`: 当日公平份额 (当日总量 / 机台数)
    ///
    /// # 返回
    /// 非负惩罚值; 负载未超公平份额或份额为 0 时恒为 0
    pub fn penalty(&self, load: u64, fair_share: f64) -> f64 {
        if fair_share <= 0.0 {
            return 0.0;
        }
        let excess_ratio = (load as f64 - fair_share) / fair_share;
        if excess_ratio <= 0.0 {
            return 0.0;
        }
        match *self {
            LoadPenaltyCurve::Linear { weight } => weight * excess_ratio,
            LoadPenaltyCurve::Stepped {
                step_ratio,
                step_penalty,
            } => (excess_ratio / step_ratio).floor() * step_penalty,
        }
    }

    /// 校验曲线参数
    fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            LoadPenaltyCurve::Linear { weight } => {
                if !weight.is_finite() || weight < 0.0 {
                    return Err(ConfigError::InvalidLoadPenalty(format!(
                        "weight={} 必须为非负有限值",
                        weight
                    )));
                }
            }
            LoadPenaltyCurve::Stepped {
                step_ratio,
                step_penalty,
            } => {
                if !step_ratio.is_finite() || step_ratio <= 0.0 {
                    return Err(ConfigError::InvalidLoadPenalty(format!(
                        "step_ratio={} 必须为正有限值",
                        step_ratio
                    )));
                }
                if !step_penalty.is_finite() || step_penalty < 0.0 {
                    return Err(ConfigError::InvalidLoadPenalty(format!(
                        "step_penalty={} 必须为非负有限值",
                        step_penalty
                    )));
                }
            }
        }
        Ok(())
    }
}

// ==========================================
// ScheduleConfig - 排产配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub machine_count: u32,                 // 机台数 (>= 1)
    pub scheduling_method: SchedulingMethod, // 排产方法
    pub balance_tolerance: f64,             // 均衡容差 (门店优先方法)
    pub load_penalty: LoadPenaltyCurve,     // 负载惩罚曲线 (邮编优先方法)
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            machine_count: DEFAULT_MACHINE_COUNT,
            scheduling_method: SchedulingMethod::ByStore,
            balance_tolerance: DEFAULT_BALANCE_TOLERANCE,
            load_penalty: LoadPenaltyCurve::default(),
        }
    }
}

impl ScheduleConfig {
    /// 校验配置（排产开始前调用）
    ///
    /// # 返回
    /// - `Ok(())`: 配置合法
    /// - `Err(ConfigError)`: 任一参数非法
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.machine_count < 1 {
            return Err(ConfigError::InvalidMachineCount(self.machine_count));
        }
        if !self.balance_tolerance.is_finite() || self.balance_tolerance < 0.0 {
            return Err(ConfigError::InvalidBalanceTolerance(self.balance_tolerance));
        }
        self.load_penalty.validate()
    }

    /// 单机台负载上限（门店优先方法的均衡判据）
    ///
    /// # 参数
    /// - `total_load`: 全部记录数量之和
    ///
    /// # 返回
    /// total_load / N * (1 + balance_tolerance)
    pub fn balance_ceiling(&self, total_load: u64) -> f64 {
        total_load as f64 / self.machine_count as f64 * (1.0 + self.balance_tolerance)
    }
}
