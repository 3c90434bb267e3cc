// ==========================================
// 邮件插页排产系统 - 邮寄日查表导入器
// ==========================================
// 依据: "Zips by Address" 地址表 (CSV)
// ==========================================
// 职责: 读取邮编 → 邮寄日映射, 并把拣货单分节解析为规范化记录
// 红线: 查表未命中的邮编 mail_date 为 None, 在一切按日列表中排在末尾
// ==========================================

use crate::domain::record::{PickListRecord, RawPickListSection};
use crate::domain::types::MailDate;
use crate::importer::error::{ImportError, ImportResult};
use csv::ReaderBuilder;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

// ==========================================
// MailDateLookup - 邮寄日查表
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct MailDateLookup {
    /// 邮编 (5位补齐) → 邮寄日
    map: BTreeMap<String, MailDate>,
}

impl MailDateLookup {
    /// 空查表 (全部记录 mail_date = None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// 从 CSV 文件读取
    pub fn from_csv_path(path: &Path) -> ImportResult<Self> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }
        Self::from_reader(File::open(path)?)
    }

    /// 从任意 reader 读取 CSV
    ///
    /// 列识别（大小写不敏感, 对齐原地址表的宽松策略）：
    /// - zip 列: 表头为 zip/zipcode/zip code, 或任意含 "zip" 的列
    /// - 邮寄日列: 表头为 mailday/mail date/mail day/maildate,
    ///   或任意含 mail/day/date 的列
    /// - 兜底: 第 1 列为 zip, 第 3 列为邮寄日
    pub fn from_reader<R: Read>(reader: R) -> ImportResult<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let (zip_col, date_col) = Self::detect_columns(&headers)?;

        let mut map = BTreeMap::new();
        let mut skipped_rows: usize = 0;

        for result in csv_reader.records() {
            let row = result?;
            let zip_raw = row.get(zip_col).unwrap_or("").trim();
            let date_raw = row.get(date_col).unwrap_or("").trim();

            let zipcode = Self::normalize_zipcode(zip_raw);
            let mail_date = date_raw.parse::<MailDate>().ok();
            match (zipcode, mail_date) {
                (Some(zipcode), Some(date)) => {
                    map.insert(zipcode, date);
                }
                _ => {
                    skipped_rows += 1;
                    debug!(zip = %zip_raw, date = %date_raw, "邮寄日行无法解析, 跳过");
                }
            }
        }

        info!(entries = map.len(), skipped_rows, "邮寄日查表读取完成");
        Ok(Self { map })
    }

    /// 列识别
    fn detect_columns(headers: &[String]) -> ImportResult<(usize, usize)> {
        let lower: Vec<String> = headers.iter().map(|h| h.to_ascii_lowercase()).collect();

        let mut zip_col = lower
            .iter()
            .position(|h| matches!(h.as_str(), "zip" | "zipcode" | "zip code"));
        if zip_col.is_none() {
            zip_col = lower.iter().position(|h| h.contains("zip"));
        }

        let mut date_col = lower.iter().position(|h| {
            matches!(h.as_str(), "mailday" | "mail date" | "mail day" | "maildate")
        });
        if date_col.is_none() {
            date_col = lower
                .iter()
                .position(|h| h.contains("mail") || h.contains("day") || h.contains("date"));
        }

        // 兜底: 第 1 列 zip, 第 3 列邮寄日
        let zip_col = zip_col.or(if headers.is_empty() { None } else { Some(0) });
        let date_col = date_col.or(if headers.len() >= 3 { Some(2) } else { None });

        match (zip_col, date_col) {
            (Some(z), Some(d)) => Ok((z, d)),
            _ => Err(ImportError::ColumnDetectionError(headers.join(", "))),
        }
    }

    /// 邮编归一化: 去浮点尾巴, 左补零到 5 位
    fn normalize_zipcode(raw: &str) -> Option<String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        // Excel 转 CSV 常见的 "11550.0" 浮点残留
        let digits = match raw.split_once('.') {
            Some((head, _)) => head,
            None => raw,
        };
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        Some(format!("{:0>5}", digits))
    }

    /// 查询邮编的邮寄日
    pub fn get(&self, zipcode: &str) -> Option<MailDate> {
        self.map.get(zipcode).copied()
    }

    /// 查表条目数
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// 查表是否为空
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// 把拣货单分节 + 查表合成规范化记录序列
    ///
    /// 记录顺序与分节及分节内门店行的文档顺序一致 (首见语义依赖此序)。
    pub fn resolve(&self, sections: &[RawPickListSection]) -> Vec<PickListRecord> {
        let mut records = Vec::new();
        for section in sections {
            let zipcode = Self::normalize_zipcode(&section.zipcode)
                .unwrap_or_else(|| section.zipcode.clone());
            let mail_date = self.get(&zipcode);
            for store in &section.stores {
                records.push(PickListRecord::new(
                    zipcode.clone(),
                    store.store_name.clone(),
                    store.quantity,
                    mail_date,
                ));
            }
        }
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::RawStoreRow;

    #[test]
    fn test_column_detection_by_name() {
        let csv = "Zip,City,MailDay\n10001,NYC,MON\n11550,HEMPSTEAD,TUES\n";
        let lookup = MailDateLookup::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(lookup.get("10001"), Some(MailDate::Mon));
        assert_eq!(lookup.get("11550"), Some(MailDate::Tues));
    }

    #[test]
    fn test_column_fallback_first_and_third() {
        let csv = "a,b,c\n10001,x,WED\n";
        let lookup = MailDateLookup::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(lookup.get("10001"), Some(MailDate::Wed));
    }

    #[test]
    fn test_zip_normalization() {
        let csv = "zip,city,mail date\n501.0,HOLTSVILLE,FRI\n";
        let lookup = MailDateLookup::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(lookup.get("00501"), Some(MailDate::Fri));
    }

    #[test]
    fn test_bad_rows_skipped() {
        let csv = "zip,city,mailday\n10001,NYC,MON\nabc,NOWHERE,MON\n10002,NYC,NOPE\n";
        let lookup = MailDateLookup::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(lookup.len(), 1);
    }

    #[test]
    fn test_resolve_missing_zip_gets_none() {
        let csv = "zip,city,mailday\n10001,NYC,MON\n";
        let lookup = MailDateLookup::from_reader(csv.as_bytes()).unwrap();

        let sections = vec![
            RawPickListSection {
                zipcode: "10001".to_string(),
                num_inserts: 2,
                stores: vec![RawStoreRow {
                    store_name: "A".to_string(),
                    quantity: 100,
                }],
            },
            RawPickListSection {
                zipcode: "99999".to_string(),
                num_inserts: 1,
                stores: vec![RawStoreRow {
                    store_name: "B".to_string(),
                    quantity: 50,
                }],
            },
        ];

        let records = lookup.resolve(&sections);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].mail_date, Some(MailDate::Mon));
        assert_eq!(records[1].mail_date, None);
    }
}
