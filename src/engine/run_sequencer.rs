// ==========================================
// 邮件插页排产系统 - 生产序列引擎
// ==========================================
// 依据: Scheduling_Specs - 4.4 Run Sequencer
// ==========================================
// 职责: 对单机台单邮寄日的分配记录做换版最小化排序
// 算法: 连续性图上的最近邻贪心 (邮编交集为邻接度量)
// 红线: 平手规则 (数量大者优先, 再门店名升序) 承载确定性
// ==========================================

use crate::domain::assignment::{MachineAssignment, RunSequence};
use crate::domain::types::MailDate;
use std::collections::BTreeMap;
use tracing::info;

// ==========================================
// RunSequencer - 生产序列引擎
// ==========================================
pub struct RunSequencer {
    // 无状态引擎, 不需要注入依赖
}

impl Default for RunSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl RunSequencer {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 对全部分配记录分组排序
    ///
    /// 按 (机台, 邮寄日) 分组后逐组做最近邻贪心; 结果序列
    /// 按邮寄日全序、机台号升序排列。
    ///
    /// # 参数
    /// - `assignments`: 任一调度器产出的分配记录全集
    ///
    /// # 返回
    /// 每 (机台, 邮寄日) 一条生产序列
    pub fn sequence_all(&self, assignments: &[MachineAssignment]) -> Vec<RunSequence> {
        // 分组键: (邮寄日序, 机台号)
        let mut groups: BTreeMap<(u8, u32), Vec<MachineAssignment>> = BTreeMap::new();
        for assignment in assignments {
            groups
                .entry((
                    MailDate::rank_opt(assignment.mail_date),
                    assignment.machine_number,
                ))
                .or_default()
                .push(assignment.clone());
        }

        let sequences: Vec<RunSequence> = groups
            .into_values()
            .map(|entries| {
                let machine_number = entries[0].machine_number;
                let mail_date = entries[0].mail_date;
                RunSequence {
                    machine_number,
                    mail_date,
                    entries: self.sequence_group(entries),
                }
            })
            .collect();

        info!(sequences = sequences.len(), "生产序列排序完成");
        sequences
    }

    /// 单 (机台, 邮寄日) 组内的最近邻贪心排序
    ///
    /// 规则（依据 Scheduling_Specs 4.4）：
    /// 1) 起点取总量最大者, 平手门店名升序
    /// 2) 反复取与最近入序记录邮编交集最大者,
    ///    平手取总量较大者, 再取门店名升序
    pub fn sequence_group(&self, mut pending: Vec<MachineAssignment>) -> Vec<MachineAssignment> {
        let mut sequenced = Vec::with_capacity(pending.len());
        if pending.is_empty() {
            return sequenced;
        }

        // 起点
        let start = Self::take_best(&mut pending, |a, b| {
            a.total_quantity
                .cmp(&b.total_quantity)
                .then_with(|| b.store.cmp(&a.store))
        });
        sequenced.push(start);

        // 最近邻贪心
        while !pending.is_empty() {
            // 起点已入序, 序列此处必非空
            let last = &sequenced[sequenced.len() - 1];
            let next = Self::take_best(&mut pending, |a, b| {
                a.continuity_with(last)
                    .cmp(&b.continuity_with(last))
                    .then_with(|| a.total_quantity.cmp(&b.total_quantity))
                    .then_with(|| b.store.cmp(&a.store))
            });
            sequenced.push(next);
        }

        sequenced
    }

    /// 取出比较器意义下的最大元素（比较器把"更优"视为 Greater）
    fn take_best<F>(pending: &mut Vec<MachineAssignment>, compare: F) -> MachineAssignment
    where
        F: Fn(&MachineAssignment, &MachineAssignment) -> std::cmp::Ordering,
    {
        let mut best = 0usize;
        for idx in 1..pending.len() {
            if compare(&pending[idx], &pending[best]) == std::cmp::Ordering::Greater {
                best = idx;
            }
        }
        pending.remove(best)
    }
}
