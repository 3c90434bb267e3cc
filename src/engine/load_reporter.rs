// ==========================================
// 邮件插页排产系统 - 负载报表引擎
// ==========================================
// 依据: Scheduling_Specs - 4.5 Load Reporter
// ==========================================
// 职责: 由分配记录派生机台负载 (总量 / 分日 / 占比), 纯计算无 I/O
// 红线: 守恒: 各机台负载之和等于输入记录数量之和;
//       总量为 0 时占比返回 0, 禁止除零
// ==========================================

use crate::domain::assignment::MachineAssignment;
use crate::domain::types::MailDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// DailyLoad - 单邮寄日机台负载
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyLoad {
    pub mail_date: Option<MailDate>,   // 邮寄日
    pub loads: BTreeMap<u32, u64>,     // 机台号 → 当日数量
}

// ==========================================
// LoadReport - 负载报表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadReport {
    /// 机台号 → 总数量（全部机台, 含零负载）
    pub machine_totals: BTreeMap<u32, u64>,
    /// 机台号 → 占总量百分比（0..=100, 总量为 0 时恒为 0）
    pub machine_percentages: BTreeMap<u32, f64>,
    /// 分邮寄日负载（按邮寄日全序）
    pub loads_by_date: Vec<DailyLoad>,
    /// 全部机台负载之和
    pub total_load: u64,
}

// ==========================================
// LoadReporter - 负载报表引擎
// ==========================================
pub struct LoadReporter {
    // 无状态引擎, 不需要注入依赖
}

impl Default for LoadReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadReporter {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 生成负载报表
    ///
    /// # 参数
    /// - `assignments`: 任一调度器产出的分配记录全集
    /// - `machine_count`: 机台数（零负载机台也要出现在报表中）
    ///
    /// # 返回
    /// 负载报表（只读派生数据, 不修改输入）
    pub fn report(&self, assignments: &[MachineAssignment], machine_count: u32) -> LoadReport {
        let mut machine_totals: BTreeMap<u32, u64> =
            (1..=machine_count).map(|m| (m, 0)).collect();
        let mut by_date: BTreeMap<u8, DailyLoad> = BTreeMap::new();

        for assignment in assignments {
            *machine_totals.entry(assignment.machine_number).or_insert(0) +=
                assignment.total_quantity;

            let daily = by_date
                .entry(MailDate::rank_opt(assignment.mail_date))
                .or_insert_with(|| DailyLoad {
                    mail_date: assignment.mail_date,
                    loads: (1..=machine_count).map(|m| (m, 0)).collect(),
                });
            *daily.loads.entry(assignment.machine_number).or_insert(0) +=
                assignment.total_quantity;
        }

        let total_load: u64 = machine_totals.values().sum();
        let machine_percentages = machine_totals
            .iter()
            .map(|(machine, load)| {
                let pct = if total_load == 0 {
                    0.0
                } else {
                    *load as f64 / total_load as f64 * 100.0
                };
                (*machine, pct)
            })
            .collect();

        LoadReport {
            machine_totals,
            machine_percentages,
            loads_by_date: by_date.into_values().collect(),
            total_load,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn assignment(machine: u32, qty: u64, date: Option<MailDate>) -> MachineAssignment {
        MachineAssignment {
            machine_number: machine,
            store: format!("S{}", machine),
            zip_codes: BTreeSet::from(["10001".to_string()]),
            zip_code_count: 1,
            total_quantity: qty,
            mail_date: date,
        }
    }

    #[test]
    fn test_totals_and_conservation() {
        let assignments = vec![
            assignment(1, 100, Some(MailDate::Mon)),
            assignment(1, 50, Some(MailDate::Tues)),
            assignment(2, 80, Some(MailDate::Mon)),
        ];
        let report = LoadReporter::new().report(&assignments, 3);

        assert_eq!(report.machine_totals[&1], 150);
        assert_eq!(report.machine_totals[&2], 80);
        assert_eq!(report.machine_totals[&3], 0, "零负载机台也在报表中");
        assert_eq!(report.total_load, 230);

        let summed: u64 = report.machine_totals.values().sum();
        assert_eq!(summed, 230, "守恒");
    }

    #[test]
    fn test_per_date_loads_in_order() {
        let assignments = vec![
            assignment(1, 10, None),
            assignment(1, 100, Some(MailDate::Wed)),
            assignment(2, 80, Some(MailDate::Mon)),
        ];
        let report = LoadReporter::new().report(&assignments, 2);

        let dates: Vec<Option<MailDate>> =
            report.loads_by_date.iter().map(|d| d.mail_date).collect();
        assert_eq!(dates, vec![Some(MailDate::Mon), Some(MailDate::Wed), None]);
        assert_eq!(report.loads_by_date[0].loads[&2], 80);
        assert_eq!(report.loads_by_date[0].loads[&1], 0);
    }

    #[test]
    fn test_percentages() {
        let assignments = vec![
            assignment(1, 75, Some(MailDate::Mon)),
            assignment(2, 25, Some(MailDate::Mon)),
        ];
        let report = LoadReporter::new().report(&assignments, 2);

        assert!((report.machine_percentages[&1] - 75.0).abs() < 1e-9);
        assert!((report.machine_percentages[&2] - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_total_no_division() {
        let report = LoadReporter::new().report(&[], 3);
        assert_eq!(report.total_load, 0);
        for pct in report.machine_percentages.values() {
            assert_eq!(*pct, 0.0);
        }
        assert!(report.loads_by_date.is_empty());
    }
}
