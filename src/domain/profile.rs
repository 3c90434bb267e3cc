// ==========================================
// 邮件插页排产系统 - 聚合画像领域模型
// ==========================================
// 依据: Scheduling_Specs - 3. 数据模型 (StoreProfile / ZipcodeProfile)
// ==========================================
// 红线: 画像为单次排产运行的派生结构, 运行结束即丢弃, 不跨运行共享
// ==========================================

use crate::domain::types::MailDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ==========================================
// StoreProfile - 门店画像
// ==========================================
// 门店 → 其插页覆盖的邮编集合 / 出现的邮寄日集合 / 总量
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreProfile {
    pub store: String,                      // 门店名
    pub zipcodes: BTreeSet<String>,         // 覆盖的邮编集合
    pub mail_dates: BTreeSet<MailDate>,     // 出现的已知邮寄日集合
    pub has_unknown_mail_date: bool,        // 是否出现在未知邮寄日上
    pub total_quantity: u64,                // 总插页数量
}

// ==========================================
// ZipcodeProfile - 邮编画像
// ==========================================
// 邮编 → 门店集合 / 邮寄日（正常唯一, 歧义时取首见, 见警告体系）/ 总量
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZipcodeProfile {
    pub zipcode: String,                // 邮编
    pub stores: BTreeSet<String>,       // 出现的门店集合
    pub mail_date: Option<MailDate>,    // 邮寄日（输入序首见值）
    pub total_quantity: u64,            // 总插页数量
}
