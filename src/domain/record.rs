// ==========================================
// 邮件插页排产系统 - 拣货单记录领域模型
// ==========================================
// 依据: Scheduling_Specs - 1. 记录模型
// ==========================================
// 红线: 记录创建后不可变, 纯数据 + 校验, 无行为
// ==========================================

use crate::domain::types::MailDate;
use serde::{Deserialize, Serialize};

// ==========================================
// PickListRecord - 规范化拣货单行
// ==========================================
// 一行 = 一个 (邮编, 门店) 的插页数量, 附带外部查表得到的邮寄日
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickListRecord {
    pub zipcode: String,              // 邮编（5位）
    pub store: String,                // 门店名
    pub quantity: u64,                // 插页数量（非负，类型保证）
    pub mail_date: Option<MailDate>,  // 邮寄日（查表未命中时为 None）
}

impl PickListRecord {
    /// 构造规范化记录（trim 字符串字段）
    pub fn new(
        zipcode: impl Into<String>,
        store: impl Into<String>,
        quantity: u64,
        mail_date: Option<MailDate>,
    ) -> Self {
        Self {
            zipcode: zipcode.into().trim().to_string(),
            store: store.into().trim().to_string(),
            quantity,
            mail_date,
        }
    }

    /// 字段校验
    ///
    /// # 返回
    /// - `Ok(())`: 字段合法
    /// - `Err(原因)`: trim 后邮编或门店为空
    pub fn validate(&self) -> Result<(), String> {
        if self.zipcode.trim().is_empty() {
            return Err("zipcode为空".to_string());
        }
        if self.store.trim().is_empty() {
            return Err("store为空".to_string());
        }
        Ok(())
    }
}

// ==========================================
// RawPickListSection - 拣货单原始分节
// ==========================================
// 由拣货单文本导入器产生（一节 = 一个邮编），尚未做邮寄日解析
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPickListSection {
    pub zipcode: String,           // 邮编
    pub num_inserts: u64,          // 该邮编的插页种类数（Inserts - N）
    pub stores: Vec<RawStoreRow>,  // 门店行（文档顺序）
}

/// 拣货单门店行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawStoreRow {
    pub store_name: String, // 门店名
    pub quantity: u64,      // 数量
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_new_trims_fields() {
        let record = PickListRecord::new(" 10001 ", " SHOPRITE ", 100, Some(MailDate::Mon));
        assert_eq!(record.zipcode, "10001");
        assert_eq!(record.store, "SHOPRITE");
    }

    #[test]
    fn test_record_validate() {
        let record = PickListRecord::new("10001", "SHOPRITE", 100, None);
        assert!(record.validate().is_ok());

        let record = PickListRecord::new("  ", "SHOPRITE", 100, None);
        assert!(record.validate().is_err());

        let record = PickListRecord::new("10001", "", 100, None);
        assert!(record.validate().is_err());
    }
}
