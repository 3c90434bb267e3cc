// ==========================================
// 邮件插页排产系统 - 机台分配领域模型
// ==========================================
// 依据: Scheduling_Specs - 3. 数据模型 (MachineAssignment / ZipcodeScheduleEntry)
// ==========================================
// 红线: 显式类型化记录, 禁止无类型嵌套容器
// ==========================================

use crate::domain::types::MailDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ==========================================
// MachineAssignment - 机台分配记录
// ==========================================
// 聚合后每个 (机台, 门店, 邮寄日) 三元组一条记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineAssignment {
    pub machine_number: u32,             // 机台号（1..N）
    pub store: String,                   // 门店名
    pub zip_codes: BTreeSet<String>,     // 该门店插页在该机台该邮寄日占用的邮编集合
    pub zip_code_count: usize,           // 邮编数
    pub total_quantity: u64,             // 总插页数量
    pub mail_date: Option<MailDate>,     // 邮寄日
}

impl MachineAssignment {
    /// 计算与另一条分配记录的插页连续性（邮编交集大小）
    ///
    /// 换版最小化的邻接度量：交集越大，相邻生产的换版越少。
    pub fn continuity_with(&self, other: &MachineAssignment) -> usize {
        self.zip_codes.intersection(&other.zip_codes).count()
    }
}

// ==========================================
// ZipcodeScheduleEntry - 邮编排程记录
// ==========================================
// 邮编优先方法下不变式: |machines| == 1
// 门店优先方法下 |machines| > 1 是已知分歧, 不是错误
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZipcodeScheduleEntry {
    pub zipcode: String,               // 邮编
    pub mail_date: Option<MailDate>,   // 邮寄日
    pub machines: BTreeSet<u32>,       // 承载该邮编的机台集合（有序）
}

// ==========================================
// RunSequence - 机台生产序列
// ==========================================
// 一台机台在一个邮寄日内的有序工作清单（换版最小化排序后）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSequence {
    pub machine_number: u32,               // 机台号
    pub mail_date: Option<MailDate>,       // 邮寄日
    pub entries: Vec<MachineAssignment>,   // 有序分配记录
}
