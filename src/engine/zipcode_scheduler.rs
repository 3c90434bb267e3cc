// ==========================================
// 邮件插页排产系统 - 邮编优先调度引擎
// ==========================================
// 依据: Scheduling_Specs - 4.3 Zipcode-Based Scheduler
// ==========================================
// 职责: 逐邮寄日把整邮编分到机台, 最大化插页连续性并兼顾负载
// 输入: Aggregate + ScheduleConfig
// 输出: MachineAssignment 全集 + 邮编排程
// 红线: 每个邮编在其邮寄日上必须且只能落在一台机台 (|machines| == 1);
//       门店跨机台是有意的取舍, 不是错误
// ==========================================

use crate::config::ScheduleConfig;
use crate::domain::assignment::{MachineAssignment, ZipcodeScheduleEntry};
use crate::domain::profile::ZipcodeProfile;
use crate::domain::types::MailDate;
use crate::engine::aggregator::Aggregate;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

// ==========================================
// ZipcodeScheduleOutput - 邮编优先调度结果
// ==========================================
#[derive(Debug, Clone)]
pub struct ZipcodeScheduleOutput {
    /// 每 (机台, 门店, 邮寄日) 一条
    pub assignments: Vec<MachineAssignment>,
    /// 邮编 → 单元素机台集合
    pub zipcode_schedule: Vec<ZipcodeScheduleEntry>,
}

// ==========================================
// ZipcodeScheduler - 邮编优先调度引擎
// ==========================================
pub struct ZipcodeScheduler {
    // 无状态引擎, 不需要注入依赖
}

impl Default for ZipcodeScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ZipcodeScheduler {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 执行邮编优先调度
    ///
    /// 流程（依据 Scheduling_Specs 4.3, 逐邮寄日按全序）：
    /// 1) 收集该日活跃邮编及其画像
    /// 2) 按数量降序排列 (平手邮编升序), 大件先落以避免后期失衡
    /// 3) 亲和度 = 机台上已有门店与该邮编门店集合的交集大小
    ///            - 负载惩罚 (超出当日公平份额部分, 曲线可调)
    ///    取亲和度最高的机台; 平手取负载最低, 再取机台号最低
    /// 4) 落位后按门店交集派生 (机台, 门店, 邮寄日) 分配记录
    pub fn schedule(
        &self,
        aggregate: &Aggregate,
        config: &ScheduleConfig,
    ) -> ZipcodeScheduleOutput {
        let machine_count = config.machine_count as usize;
        let mut assignments = Vec::new();
        let mut zipcode_schedule = Vec::new();

        for date in &aggregate.mail_dates {
            let mut zipcodes = aggregate.zipcodes_on_date(*date);
            if zipcodes.is_empty() {
                continue;
            }

            // 大件先落: 数量降序, 平手邮编升序
            zipcodes.sort_by(|a, b| {
                b.total_quantity
                    .cmp(&a.total_quantity)
                    .then_with(|| a.zipcode.cmp(&b.zipcode))
            });

            // 当日公平份额
            let date_total: u64 = zipcodes.iter().map(|z| z.total_quantity).sum();
            let fair_share = date_total as f64 / machine_count as f64;

            // 当日机台状态
            let mut machine_stores: Vec<BTreeSet<String>> = vec![BTreeSet::new(); machine_count];
            let mut machine_loads: Vec<u64> = vec![0; machine_count];
            let mut zipcode_machines: Vec<(&ZipcodeProfile, u32)> = Vec::new();

            for profile in zipcodes {
                let chosen = self.pick_machine(
                    profile,
                    config,
                    fair_share,
                    &machine_stores,
                    &machine_loads,
                );

                machine_loads[chosen] += profile.total_quantity;
                for store in &profile.stores {
                    machine_stores[chosen].insert(store.clone());
                }
                zipcode_machines.push((profile, chosen as u32 + 1));

                debug!(
                    zipcode = %profile.zipcode,
                    mail_date = %MailDate::label_opt(*date),
                    machine = chosen + 1,
                    quantity = profile.total_quantity,
                    "邮编落位"
                );
            }

            // 邮编排程: 不变式 |machines| == 1
            for (profile, machine) in &zipcode_machines {
                zipcode_schedule.push(ZipcodeScheduleEntry {
                    zipcode: profile.zipcode.clone(),
                    mail_date: *date,
                    machines: BTreeSet::from([*machine]),
                });
            }

            // 派生 (机台, 门店) 分配记录
            let mut date_assignments: BTreeMap<(u32, String), (BTreeSet<String>, u64)> =
                BTreeMap::new();
            for (profile, machine) in &zipcode_machines {
                for store in &profile.stores {
                    let quantity = aggregate
                        .store_zip_quantity
                        .get(store)
                        .and_then(|by_zip| by_zip.get(&profile.zipcode))
                        .copied()
                        .unwrap_or(0);
                    let entry = date_assignments
                        .entry((*machine, store.clone()))
                        .or_default();
                    entry.0.insert(profile.zipcode.clone());
                    entry.1 += quantity;
                }
            }
            for ((machine, store), (zip_codes, total_quantity)) in date_assignments {
                assignments.push(MachineAssignment {
                    machine_number: machine,
                    store,
                    zip_code_count: zip_codes.len(),
                    zip_codes,
                    total_quantity,
                    mail_date: *date,
                });
            }
        }

        info!(
            assignments = assignments.len(),
            zipcodes = zipcode_schedule.len(),
            "邮编优先调度完成"
        );

        ZipcodeScheduleOutput {
            assignments,
            zipcode_schedule,
        }
    }

    /// 选机台: 亲和度最高 > 负载最低 > 机台号最低
    fn pick_machine(
        &self,
        profile: &ZipcodeProfile,
        config: &ScheduleConfig,
        fair_share: f64,
        machine_stores: &[BTreeSet<String>],
        machine_loads: &[u64],
    ) -> usize {
        let mut best = 0usize;
        let mut best_score = f64::NEG_INFINITY;
        for idx in 0..machine_stores.len() {
            let shared = machine_stores[idx]
                .intersection(&profile.stores)
                .count() as f64;
            let penalty = config.load_penalty.penalty(machine_loads[idx], fair_share);
            let score = shared - penalty;

            let better = score > best_score
                || (score == best_score && machine_loads[idx] < machine_loads[best]);
            if better {
                best = idx;
                best_score = score;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoadPenaltyCurve;
    use crate::domain::record::PickListRecord;
    use crate::domain::types::SchedulingMethod;
    use crate::engine::aggregator::Aggregator;

    fn aggregate(records: &[PickListRecord]) -> Aggregate {
        Aggregator::new().aggregate(records).unwrap()
    }

    fn config(machine_count: u32) -> ScheduleConfig {
        ScheduleConfig {
            machine_count,
            scheduling_method: SchedulingMethod::ByZipcode,
            ..Default::default()
        }
    }

    fn record(zipcode: &str, store: &str, qty: u64, date: MailDate) -> PickListRecord {
        PickListRecord::new(zipcode, store, qty, Some(date))
    }

    /// 每个邮编恰好一台机台 (核心不变式)
    fn assert_exclusive(output: &ZipcodeScheduleOutput) {
        for entry in &output.zipcode_schedule {
            assert_eq!(
                entry.machines.len(),
                1,
                "邮编{}应只落一台机台",
                entry.zipcode
            );
        }
    }

    #[test]
    fn test_zipcode_exclusivity_and_conservation() {
        // Scheduling_Specs 8 场景: 2 机台, 共享门店 A
        let records = vec![
            record("10001", "A", 100, MailDate::Mon),
            record("10001", "B", 50, MailDate::Mon),
            record("10002", "A", 80, MailDate::Mon),
        ];
        let agg = aggregate(&records);
        let output = ZipcodeScheduler::new().schedule(&agg, &config(2));

        assert_exclusive(&output);

        let assigned: u64 = output.assignments.iter().map(|a| a.total_quantity).sum();
        assert_eq!(assigned, 230, "数量守恒");
    }

    #[test]
    fn test_shared_store_attracts_when_penalty_off() {
        // 惩罚权重 0: 共享门店 A 应把 10002 吸到 10001 所在机台
        let records = vec![
            record("10001", "A", 100, MailDate::Mon),
            record("10001", "B", 50, MailDate::Mon),
            record("10002", "A", 80, MailDate::Mon),
        ];
        let agg = aggregate(&records);
        let cfg = ScheduleConfig {
            load_penalty: LoadPenaltyCurve::Linear { weight: 0.0 },
            ..config(2)
        };
        let output = ZipcodeScheduler::new().schedule(&agg, &cfg);

        let machines: BTreeSet<u32> = output
            .zipcode_schedule
            .iter()
            .flat_map(|e| e.machines.iter().copied())
            .collect();
        assert_eq!(machines.len(), 1, "两个邮编应同机台");
        assert_exclusive(&output);
    }

    #[test]
    fn test_store_may_span_machines() {
        // 邮编优先: 门店连续性让位于邮编连续性
        // 两个大邮编共享门店 A, 但惩罚强时会被拆到两台机台
        let records = vec![
            record("10001", "A", 1200, MailDate::Mon),
            record("10002", "A", 800, MailDate::Mon),
        ];
        let agg = aggregate(&records);
        let cfg = ScheduleConfig {
            load_penalty: LoadPenaltyCurve::Linear { weight: 100.0 },
            ..config(2)
        };
        let output = ZipcodeScheduler::new().schedule(&agg, &cfg);

        assert_exclusive(&output);
        let machines: BTreeSet<u32> = output
            .assignments
            .iter()
            .filter(|a| a.store == "A")
            .map(|a| a.machine_number)
            .collect();
        assert_eq!(machines.len(), 2, "门店A应跨两台机台");
    }

    #[test]
    fn test_per_date_isolation() {
        // 不同邮寄日独立调度, 每日每邮编仍然独占一台机台
        let records = vec![
            record("10001", "A", 100, MailDate::Mon),
            record("10002", "B", 90, MailDate::Tues),
            record("10003", "C", 80, MailDate::Mon),
        ];
        let agg = aggregate(&records);
        let output = ZipcodeScheduler::new().schedule(&agg, &config(3));

        assert_exclusive(&output);
        // 邮寄日按全序出现
        let dates: Vec<Option<MailDate>> =
            output.assignments.iter().map(|a| a.mail_date).collect();
        let mut sorted = dates.clone();
        sorted.sort_by_key(|d| MailDate::rank_opt(*d));
        assert_eq!(dates, sorted);
    }

    #[test]
    fn test_largest_zipcode_seeds_first() {
        // 空机台时全部亲和度相等 -> 负载最低(0)平手 -> 机台号最低
        // 最大邮编必落机台 1
        let records = vec![
            record("10001", "A", 10, MailDate::Mon),
            record("10002", "B", 500, MailDate::Mon),
        ];
        let agg = aggregate(&records);
        let output = ZipcodeScheduler::new().schedule(&agg, &config(2));

        let entry = output
            .zipcode_schedule
            .iter()
            .find(|e| e.zipcode == "10002")
            .unwrap();
        assert_eq!(entry.machines, BTreeSet::from([1]));
    }

    #[test]
    fn test_determinism() {
        let records = vec![
            record("10001", "A", 100, MailDate::Mon),
            record("10002", "A", 100, MailDate::Mon),
            record("10003", "B", 100, MailDate::Mon),
        ];
        let agg = aggregate(&records);
        let scheduler = ZipcodeScheduler::new();

        let first = scheduler.schedule(&agg, &config(2));
        let second = scheduler.schedule(&agg, &config(2));
        assert_eq!(first.assignments, second.assignments);
        assert_eq!(first.zipcode_schedule, second.zipcode_schedule);
    }
}
