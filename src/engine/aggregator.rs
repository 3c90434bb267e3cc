// ==========================================
// 邮件插页排产系统 - 聚合引擎
// ==========================================
// 依据: Scheduling_Specs - 4.1 Aggregator
// ==========================================
// 职责: 把有序记录序列聚合为门店画像 / 邮编画像 / 邮寄日清单
// 输入: 有序 PickListRecord 序列（外部解析器产出）
// 输出: Aggregate（两类启发式调度器共用的输入）
// 红线: 确定性: 相同输入序列必产出相同聚合; 邮编邮寄日歧义取首见值并出警告
// ==========================================

use crate::domain::profile::{StoreProfile, ZipcodeProfile};
use crate::domain::record::PickListRecord;
use crate::domain::types::MailDate;
use crate::engine::error::{RunWarning, ScheduleError, ScheduleResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info};

// ==========================================
// Aggregate - 聚合结果
// ==========================================
// 单次排产运行独占, 运行结束即丢弃
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Aggregate {
    /// 门店 → 门店画像
    pub store_profiles: BTreeMap<String, StoreProfile>,
    /// 邮编 → 邮编画像（邮寄日已按首见值归一）
    pub zipcode_profiles: BTreeMap<String, ZipcodeProfile>,
    /// 门店 → 邮编 → 数量（重复行数量合并）
    pub store_zip_quantity: BTreeMap<String, BTreeMap<String, u64>>,
    /// 出现的去重邮寄日, 按全序排列（未知日期在末尾）
    pub mail_dates: Vec<Option<MailDate>>,
    /// 全部记录数量之和
    pub total_quantity: u64,
    /// 聚合阶段产生的警告（邮寄日歧义）
    pub warnings: Vec<RunWarning>,
}

impl Aggregate {
    /// 某邮寄日上活跃的邮编（按邮编升序）
    pub fn zipcodes_on_date(&self, date: Option<MailDate>) -> Vec<&ZipcodeProfile> {
        self.zipcode_profiles
            .values()
            .filter(|p| p.mail_date == date)
            .collect()
    }

    /// 某门店在某邮寄日上的邮编集合与数量
    ///
    /// 邮编归属按其画像的归一邮寄日判定。
    pub fn store_date_slice(
        &self,
        store: &str,
        date: Option<MailDate>,
    ) -> (BTreeSet<String>, u64) {
        let mut zipcodes = BTreeSet::new();
        let mut quantity: u64 = 0;

        if let Some(by_zip) = self.store_zip_quantity.get(store) {
            for (zipcode, qty) in by_zip {
                let zip_date = self
                    .zipcode_profiles
                    .get(zipcode)
                    .and_then(|p| p.mail_date);
                if zip_date == date {
                    zipcodes.insert(zipcode.clone());
                    quantity += qty;
                }
            }
        }

        (zipcodes, quantity)
    }
}

// ==========================================
// Aggregator - 聚合引擎
// ==========================================
pub struct Aggregator {
    // 无状态引擎, 不需要注入依赖
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 聚合记录序列
    ///
    /// 规则（依据 Scheduling_Specs 4.1）：
    /// 1) 逐条校验字段, 非法记录立即返回 DataError（数量为无符号整型, 负值在类型层面排除）
    /// 2) 邮编的邮寄日取输入序首见值; 后续冲突值只产生警告, 记录按首见值聚合
    /// 3) 画像集合使用有序集合, 成员与输入顺序无关
    ///
    /// # 参数
    /// - `records`: 有序记录序列
    ///
    /// # 返回
    /// 聚合结果（含歧义警告）
    pub fn aggregate(&self, records: &[PickListRecord]) -> ScheduleResult<Aggregate> {
        let mut aggregate = Aggregate::default();
        // 已出过警告的 (邮编, 冲突邮寄日) 对, 避免重复警告
        let mut warned: BTreeSet<(String, u8)> = BTreeSet::new();

        for (index, record) in records.iter().enumerate() {
            if let Err(reason) = record.validate() {
                return Err(ScheduleError::Data {
                    index,
                    zipcode: record.zipcode.clone(),
                    store: record.store.clone(),
                    reason,
                });
            }

            // 邮编画像: 邮寄日首见归一
            let zip_profile = aggregate
                .zipcode_profiles
                .entry(record.zipcode.clone())
                .or_insert_with(|| ZipcodeProfile {
                    zipcode: record.zipcode.clone(),
                    mail_date: record.mail_date,
                    ..Default::default()
                });
            if zip_profile.mail_date != record.mail_date {
                let key = (record.zipcode.clone(), MailDate::rank_opt(record.mail_date));
                if warned.insert(key) {
                    debug!(
                        zipcode = %record.zipcode,
                        kept = %MailDate::label_opt(zip_profile.mail_date),
                        conflicting = %MailDate::label_opt(record.mail_date),
                        "邮编邮寄日歧义, 保留首见值"
                    );
                    aggregate.warnings.push(RunWarning::AmbiguousMailDate {
                        zipcode: record.zipcode.clone(),
                        kept: zip_profile.mail_date,
                        conflicting: record.mail_date,
                    });
                }
            }
            let canonical_date = zip_profile.mail_date;
            zip_profile.stores.insert(record.store.clone());
            zip_profile.total_quantity += record.quantity;

            // 门店画像
            let store_profile = aggregate
                .store_profiles
                .entry(record.store.clone())
                .or_insert_with(|| StoreProfile {
                    store: record.store.clone(),
                    ..Default::default()
                });
            store_profile.zipcodes.insert(record.zipcode.clone());
            match canonical_date {
                Some(date) => {
                    store_profile.mail_dates.insert(date);
                }
                None => store_profile.has_unknown_mail_date = true,
            }
            store_profile.total_quantity += record.quantity;

            // 门店 × 邮编 数量表
            *aggregate
                .store_zip_quantity
                .entry(record.store.clone())
                .or_default()
                .entry(record.zipcode.clone())
                .or_insert(0) += record.quantity;

            aggregate.total_quantity += record.quantity;
        }

        // 去重邮寄日清单（归一后）, 未知日期排在末尾
        let mut dates: Vec<Option<MailDate>> = aggregate
            .zipcode_profiles
            .values()
            .map(|p| p.mail_date)
            .collect();
        dates.sort_by_key(|d| MailDate::rank_opt(*d));
        dates.dedup();
        aggregate.mail_dates = dates;

        info!(
            records = records.len(),
            stores = aggregate.store_profiles.len(),
            zipcodes = aggregate.zipcode_profiles.len(),
            mail_dates = aggregate.mail_dates.len(),
            total_quantity = aggregate.total_quantity,
            ambiguous = aggregate.warnings.len(),
            "聚合完成"
        );

        Ok(aggregate)
    }
}
