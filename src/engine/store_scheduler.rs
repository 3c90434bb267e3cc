// ==========================================
// 邮件插页排产系统 - 门店优先调度引擎
// ==========================================
// 依据: Scheduling_Specs - 4.2 Store-Based Scheduler
// ==========================================
// 职责: 按门店共现度聚类上机, 一个门店全程固定一台机台, 再做负载再均衡
// 输入: Aggregate + ScheduleConfig
// 输出: MachineAssignment 全集 + 邮编排程 + 再均衡警告
// 红线: 平手规则 (门店名升序 / 机台号升序) 承载确定性, 必须精确保持
// ==========================================

use crate::config::ScheduleConfig;
use crate::domain::assignment::{MachineAssignment, ZipcodeScheduleEntry};
use crate::engine::aggregator::Aggregate;
use crate::engine::error::RunWarning;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

// ==========================================
// StoreScheduleOutput - 门店优先调度结果
// ==========================================
#[derive(Debug, Clone)]
pub struct StoreScheduleOutput {
    /// 每 (机台, 门店, 邮寄日) 一条, 仅含当日数量非零的组合
    pub assignments: Vec<MachineAssignment>,
    /// 邮编 → 机台集合（门店拆机时 |machines| > 1 属已知分歧）
    pub zipcode_schedule: Vec<ZipcodeScheduleEntry>,
    /// 门店 → 最终机台号
    pub store_machines: BTreeMap<String, u32>,
    /// 再均衡警告
    pub warnings: Vec<RunWarning>,
}

// ==========================================
// StoreScheduler - 门店优先调度引擎
// ==========================================
pub struct StoreScheduler {
    // 无状态引擎, 不需要注入依赖
}

impl Default for StoreScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreScheduler {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 执行门店优先调度
    ///
    /// 流程（依据 Scheduling_Specs 4.2）：
    /// 1) 两两门店共现度 = 邮编集合交集大小
    /// 2) 种子分配: 按总量降序贪心放置, 取共现累计分最高的机台,
    ///    平手取当前负载最低, 再取机台号最低; 首个门店放机台 1
    /// 3) 邮寄日派生: 门店跨全部邮寄日保持同一机台
    /// 4) 再均衡: 负载差超容差时从最重机台向最轻机台移动最小量门店,
    ///    仅当共现多数不被破坏且严格缩小负载差; 无合法移动则出警告终止
    pub fn schedule(&self, aggregate: &Aggregate, config: &ScheduleConfig) -> StoreScheduleOutput {
        let machine_count = config.machine_count as usize;

        // ==========================================
        // 步骤1: 门店两两共现度
        // ==========================================
        let cooccurrence = self.build_cooccurrence(aggregate);

        // ==========================================
        // 步骤2: 种子分配
        // ==========================================
        // 放置顺序: 总量降序, 平手门店名升序
        let mut order: Vec<&str> = aggregate.store_profiles.keys().map(|s| s.as_str()).collect();
        order.sort_by(|a, b| {
            let qa = aggregate.store_profiles[*a].total_quantity;
            let qb = aggregate.store_profiles[*b].total_quantity;
            qb.cmp(&qa).then_with(|| a.cmp(b))
        });

        let mut machine_stores: Vec<BTreeSet<String>> = vec![BTreeSet::new(); machine_count];
        let mut machine_loads: Vec<u64> = vec![0; machine_count];
        let mut store_machines: BTreeMap<String, u32> = BTreeMap::new();

        for store in &order {
            let quantity = aggregate.store_profiles[*store].total_quantity;

            // 首个门店直接落机台 1; 之后取共现累计分最高的机台
            let chosen = if store_machines.is_empty() {
                0
            } else {
                self.pick_seed_machine(store, &cooccurrence, &machine_stores, &machine_loads)
            };

            machine_stores[chosen].insert((*store).to_string());
            machine_loads[chosen] += quantity;
            store_machines.insert((*store).to_string(), chosen as u32 + 1);

            debug!(store = %store, machine = chosen + 1, quantity, "种子放置");
        }

        // ==========================================
        // 步骤4: 再均衡 (在派生邮寄日分配前完成, 门店机台全程一致)
        // ==========================================
        let mut warnings = Vec::new();
        self.rebalance(
            aggregate,
            config,
            &cooccurrence,
            &mut machine_stores,
            &mut machine_loads,
            &mut store_machines,
            &mut warnings,
        );

        // ==========================================
        // 步骤3: 邮寄日派生 (机台分配确定后)
        // ==========================================
        let (assignments, zipcode_schedule) =
            self.derive_assignments(aggregate, &store_machines);

        info!(
            stores = store_machines.len(),
            assignments = assignments.len(),
            zipcodes = zipcode_schedule.len(),
            unbalanced = !warnings.is_empty(),
            "门店优先调度完成"
        );

        StoreScheduleOutput {
            assignments,
            zipcode_schedule,
            store_machines,
            warnings,
        }
    }

    // ==========================================
    // 共现度
    // ==========================================

    /// 门店 → 门店 → 共现度 (邮编交集大小, 仅存非零项)
    fn build_cooccurrence(
        &self,
        aggregate: &Aggregate,
    ) -> BTreeMap<String, BTreeMap<String, usize>> {
        let mut scores: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
        let stores: Vec<(&String, &BTreeSet<String>)> = aggregate
            .store_profiles
            .iter()
            .map(|(name, profile)| (name, &profile.zipcodes))
            .collect();

        for i in 0..stores.len() {
            for j in (i + 1)..stores.len() {
                let shared = stores[i].1.intersection(&stores[j].1).count();
                if shared > 0 {
                    scores
                        .entry(stores[i].0.clone())
                        .or_default()
                        .insert(stores[j].0.clone(), shared);
                    scores
                        .entry(stores[j].0.clone())
                        .or_default()
                        .insert(stores[i].0.clone(), shared);
                }
            }
        }
        scores
    }

    /// 门店与某机台已放置门店的共现累计分
    fn machine_affinity(
        &self,
        store: &str,
        cooccurrence: &BTreeMap<String, BTreeMap<String, usize>>,
        placed: &BTreeSet<String>,
    ) -> usize {
        let Some(neighbors) = cooccurrence.get(store) else {
            return 0;
        };
        placed
            .iter()
            .filter(|other| other.as_str() != store)
            .filter_map(|other| neighbors.get(other))
            .sum()
    }

    /// 种子阶段选机台: 共现分最高 > 负载最低 > 机台号最低
    fn pick_seed_machine(
        &self,
        store: &str,
        cooccurrence: &BTreeMap<String, BTreeMap<String, usize>>,
        machine_stores: &[BTreeSet<String>],
        machine_loads: &[u64],
    ) -> usize {
        let mut best = 0usize;
        let mut best_score = self.machine_affinity(store, cooccurrence, &machine_stores[0]);
        for idx in 1..machine_stores.len() {
            let score = self.machine_affinity(store, cooccurrence, &machine_stores[idx]);
            if score > best_score
                || (score == best_score && machine_loads[idx] < machine_loads[best])
            {
                best = idx;
                best_score = score;
            }
        }
        best
    }

    // ==========================================
    // 再均衡
    // ==========================================

    #[allow(clippy::too_many_arguments)]
    fn rebalance(
        &self,
        aggregate: &Aggregate,
        config: &ScheduleConfig,
        cooccurrence: &BTreeMap<String, BTreeMap<String, usize>>,
        machine_stores: &mut [BTreeSet<String>],
        machine_loads: &mut [u64],
        store_machines: &mut BTreeMap<String, u32>,
        warnings: &mut Vec<RunWarning>,
    ) {
        if machine_loads.len() < 2 {
            return;
        }
        let ceiling = config.balance_ceiling(aggregate.total_quantity);

        loop {
            // 最重 / 最轻机台 (平手取机台号最低)
            let heaviest = Self::argmax_load(machine_loads);
            let lightest = Self::argmin_load(machine_loads);
            let spread = machine_loads[heaviest] - machine_loads[lightest];

            if (machine_loads[heaviest] as f64) <= ceiling {
                return; // 已均衡
            }

            // 最重机台上的门店, 数量升序 / 名称升序
            let mut candidates: Vec<&str> =
                machine_stores[heaviest].iter().map(|s| s.as_str()).collect();
            candidates.sort_by(|a, b| {
                let qa = aggregate.store_profiles[*a].total_quantity;
                let qb = aggregate.store_profiles[*b].total_quantity;
                qa.cmp(&qb).then_with(|| a.cmp(b))
            });

            let mut moved = false;
            for store in candidates {
                let quantity = aggregate.store_profiles[store].total_quantity;

                // 共现多数不可破坏: 与当前机台其余门店的共现分
                // 不得严格高于与目标机台门店的共现分
                let current_score =
                    self.machine_affinity(store, cooccurrence, &machine_stores[heaviest]);
                let target_score =
                    self.machine_affinity(store, cooccurrence, &machine_stores[lightest]);
                if current_score > target_score {
                    continue;
                }

                // 移动必须严格缩小负载差, 否则过程不保证终止
                let new_heavy = machine_loads[heaviest] - quantity;
                let new_light = machine_loads[lightest] + quantity;
                let new_spread = Self::spread_after(
                    machine_loads, heaviest, lightest, new_heavy, new_light,
                );
                if new_spread >= spread {
                    continue;
                }

                let store_owned = store.to_string();
                machine_stores[heaviest].remove(&store_owned);
                machine_stores[lightest].insert(store_owned.clone());
                machine_loads[heaviest] = new_heavy;
                machine_loads[lightest] = new_light;
                store_machines.insert(store_owned.clone(), lightest as u32 + 1);

                debug!(
                    store = %store_owned,
                    from = heaviest + 1,
                    to = lightest + 1,
                    quantity,
                    new_spread,
                    "再均衡移动"
                );
                moved = true;
                break;
            }

            if !moved {
                warnings.push(RunWarning::UnbalancedResult {
                    achieved_spread: spread,
                    ceiling,
                });
                info!(achieved_spread = spread, ceiling, "再均衡终止: 无合法移动");
                return;
            }
        }
    }

    /// 最大负载机台下标 (平手取号最低)
    fn argmax_load(loads: &[u64]) -> usize {
        let mut best = 0;
        for (idx, load) in loads.iter().enumerate() {
            if *load > loads[best] {
                best = idx;
            }
        }
        best
    }

    /// 最小负载机台下标 (平手取号最低)
    fn argmin_load(loads: &[u64]) -> usize {
        let mut best = 0;
        for (idx, load) in loads.iter().enumerate() {
            if *load < loads[best] {
                best = idx;
            }
        }
        best
    }

    /// 假设移动后的全局负载差
    fn spread_after(
        loads: &[u64],
        heaviest: usize,
        lightest: usize,
        new_heavy: u64,
        new_light: u64,
    ) -> u64 {
        let mut max = u64::MIN;
        let mut min = u64::MAX;
        for (idx, load) in loads.iter().enumerate() {
            let value = if idx == heaviest {
                new_heavy
            } else if idx == lightest {
                new_light
            } else {
                *load
            };
            max = max.max(value);
            min = min.min(value);
        }
        max - min
    }

    // ==========================================
    // 邮寄日派生
    // ==========================================

    /// 由全局门店机台放置派生每 (机台, 门店, 邮寄日) 分配记录与邮编排程
    fn derive_assignments(
        &self,
        aggregate: &Aggregate,
        store_machines: &BTreeMap<String, u32>,
    ) -> (Vec<MachineAssignment>, Vec<ZipcodeScheduleEntry>) {
        let mut assignments = Vec::new();
        let mut zip_machines: BTreeMap<String, BTreeSet<u32>> = BTreeMap::new();

        for date in &aggregate.mail_dates {
            for (store, machine) in store_machines {
                let (zip_codes, total_quantity) = aggregate.store_date_slice(store, *date);
                if zip_codes.is_empty() || total_quantity == 0 {
                    continue;
                }
                for zipcode in &zip_codes {
                    zip_machines
                        .entry(zipcode.clone())
                        .or_default()
                        .insert(*machine);
                }
                assignments.push(MachineAssignment {
                    machine_number: *machine,
                    store: store.clone(),
                    zip_code_count: zip_codes.len(),
                    zip_codes,
                    total_quantity,
                    mail_date: *date,
                });
            }
        }

        let zipcode_schedule = zip_machines
            .into_iter()
            .map(|(zipcode, machines)| ZipcodeScheduleEntry {
                mail_date: aggregate
                    .zipcode_profiles
                    .get(&zipcode)
                    .and_then(|p| p.mail_date),
                zipcode,
                machines,
            })
            .collect();

        (assignments, zipcode_schedule)
    }
}
