// ==========================================
// 邮件插页排产系统 - 领域类型定义
// ==========================================
// 依据: Scheduling_Specs - 0.1 邮寄日全序
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 邮寄日 (Mail Date)
// ==========================================
// 红线: 全序 MON < TUES < ... < SUN, 未知日期永远排在已知日期之后
// 序列化格式: SCREAMING_SNAKE_CASE (与原始拣货单数据一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MailDate {
    Mon,   // 周一
    Tues,  // 周二
    Wed,   // 周三
    Thurs, // 周四
    Fri,   // 周五
    Sat,   // 周六
    Sun,   // 周日
}

impl MailDate {
    /// 全部邮寄日（按全序）
    pub const ALL: [MailDate; 7] = [
        MailDate::Mon,
        MailDate::Tues,
        MailDate::Wed,
        MailDate::Thurs,
        MailDate::Fri,
        MailDate::Sat,
        MailDate::Sun,
    ];

    /// 邮寄日序号（0 = MON）
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// 可空邮寄日的排序键
    ///
    /// 未知日期 (None) 排在所有已知日期之后。该策略在此处统一实现，
    /// 所有多日遍历必须使用本函数，不得依赖 Option 的默认排序。
    pub fn rank_opt(date: Option<MailDate>) -> u8 {
        match date {
            Some(d) => d.rank(),
            None => MailDate::ALL.len() as u8,
        }
    }

    /// 可空邮寄日的显示标签（未知日期显示为 UNASSIGNED）
    pub fn label_opt(date: Option<MailDate>) -> String {
        match date {
            Some(d) => d.to_string(),
            None => "UNASSIGNED".to_string(),
        }
    }
}

impl fmt::Display for MailDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MailDate::Mon => write!(f, "MON"),
            MailDate::Tues => write!(f, "TUES"),
            MailDate::Wed => write!(f, "WED"),
            MailDate::Thurs => write!(f, "THURS"),
            MailDate::Fri => write!(f, "FRI"),
            MailDate::Sat => write!(f, "SAT"),
            MailDate::Sun => write!(f, "SUN"),
        }
    }
}

impl FromStr for MailDate {
    type Err = ();

    /// 解析邮寄日字符串（兼容缩写与全称，大小写不敏感）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MON" | "MONDAY" => Ok(MailDate::Mon),
            "TUE" | "TUES" | "TUESDAY" => Ok(MailDate::Tues),
            "WED" | "WEDS" | "WEDNESDAY" => Ok(MailDate::Wed),
            "THU" | "THUR" | "THURS" | "THURSDAY" => Ok(MailDate::Thurs),
            "FRI" | "FRIDAY" => Ok(MailDate::Fri),
            "SAT" | "SATURDAY" => Ok(MailDate::Sat),
            "SUN" | "SUNDAY" => Ok(MailDate::Sun),
            _ => Err(()),
        }
    }
}

// ==========================================
// 排产方法 (Scheduling Method)
// ==========================================
// 两种启发式互斥，由用户在运行前选定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingMethod {
    ByStore,   // 门店优先: 同一门店的插页固定在一台机台
    ByZipcode, // 邮编优先: 同一邮编固定在一台机台
}

impl fmt::Display for SchedulingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulingMethod::ByStore => write!(f, "by_store"),
            SchedulingMethod::ByZipcode => write!(f, "by_zipcode"),
        }
    }
}

impl FromStr for SchedulingMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "by_store" | "store" => Ok(SchedulingMethod::ByStore),
            "by_zipcode" | "zipcode" => Ok(SchedulingMethod::ByZipcode),
            _ => Err(()),
        }
    }
}
