// ==========================================
// 邮件插页排产系统 - 拣货单文本解析器
// ==========================================
// 依据: Material Pick List 版式 (PDF 提文后的纯文本)
// ==========================================
// 职责: 把拣货单文本切分为邮编分节并抽取门店行
// 输入: 已由外部工具提取的纯文本 (PDF 解析不在本系统范围内)
// 输出: 文档顺序的 RawPickListSection 列表
// ==========================================

use crate::domain::record::{RawPickListSection, RawStoreRow};
use crate::importer::error::{ImportError, ImportResult};
use tracing::{debug, info};

/// 分节分隔标记
const SECTION_MARKER: &str = "Material Pick List";

/// 邮编标记
const ZIPCODE_MARKER: &str = "Zipcode - ";

/// 插页数标记
const INSERTS_MARKER: &str = "Inserts - ";

// ==========================================
// PickListParser - 拣货单文本解析器
// ==========================================
pub struct PickListParser {
    // 无状态解析器
}

impl Default for PickListParser {
    fn default() -> Self {
        Self::new()
    }
}

impl PickListParser {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 解析拣货单文本
    ///
    /// 规则（对齐原始拣货单版式）：
    /// 1) 按 "Material Pick List" 切分分节, 无 "Zipcode - " 的分节跳过
    /// 2) 门店行从含 Store 与 Qty/Wght/Quantity 的表头行之后开始,
    ///    到 "Page:" 或独立 "0" 行结束
    /// 3) "Total -" / "Machine#" / "Day#" 行忽略; 无法解析的行跳过并计数
    ///
    /// # 参数
    /// - `text`: 拣货单纯文本
    ///
    /// # 返回
    /// 文档顺序的分节列表; 无任何可用分节时返回 NoUsableSection
    pub fn parse(&self, text: &str) -> ImportResult<Vec<RawPickListSection>> {
        let mut sections = Vec::new();
        let mut skipped_lines: usize = 0;

        for chunk in text.split(SECTION_MARKER) {
            if !chunk.contains(ZIPCODE_MARKER) {
                continue;
            }
            let Some(zipcode) = Self::extract_digits(chunk, ZIPCODE_MARKER) else {
                continue;
            };
            let num_inserts = Self::extract_digits(chunk, INSERTS_MARKER)
                .and_then(|n| n.parse::<u64>().ok())
                .unwrap_or(0);

            let stores = self.parse_store_rows(chunk, &mut skipped_lines);
            if stores.is_empty() {
                continue;
            }

            sections.push(RawPickListSection {
                zipcode,
                num_inserts,
                stores,
            });
        }

        if sections.is_empty() {
            return Err(ImportError::NoUsableSection);
        }

        info!(
            sections = sections.len(),
            skipped_lines,
            "拣货单文本解析完成"
        );
        Ok(sections)
    }

    /// 抽取标记后的连续数字串
    fn extract_digits(chunk: &str, marker: &str) -> Option<String> {
        let start = chunk.find(marker)? + marker.len();
        let digits: String = chunk[start..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        if digits.is_empty() {
            None
        } else {
            Some(digits)
        }
    }

    /// 解析分节内的门店行
    fn parse_store_rows(&self, chunk: &str, skipped_lines: &mut usize) -> Vec<RawStoreRow> {
        let mut stores = Vec::new();
        let mut in_store_section = false;

        for line in chunk.lines() {
            // 表头行: Store + Qty/Wght/Quantity
            if line.contains("Store")
                && (line.contains("Qty") || line.contains("Wght") || line.contains("Quantity"))
            {
                in_store_section = true;
                continue;
            }
            if !in_store_section {
                continue;
            }
            if line.contains("Page:") || line.trim() == "0" {
                break;
            }
            let trimmed = line.trim();
            if trimmed.is_empty()
                || line.contains("Total -")
                || line.contains("Machine#")
                || line.contains("Day#")
            {
                continue;
            }

            match Self::parse_store_line(trimmed) {
                Some(row) => stores.push(row),
                None => {
                    *skipped_lines += 1;
                    debug!(line = %trimmed, "门店行无法解析, 跳过");
                }
            }
        }

        stores
    }

    /// 解析单条门店行
    ///
    /// 版式两种:
    /// - `<门店名> <数量> <重量>` (数量带千分位)
    /// - `<门店名> <数量>`, 门店名可能带 `Z5 13,550` 一类口袋码后缀, 需剥离
    fn parse_store_line(line: &str) -> Option<RawStoreRow> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 2 {
            return None;
        }

        let last = tokens[tokens.len() - 1];
        let (name_tokens, quantity) = if tokens.len() >= 3 {
            // 末两列为 数量 + 重量 (重量列为无千分位整数)
            let second_last = tokens[tokens.len() - 2];
            match (Self::parse_quantity(second_last), Self::parse_plain_int(last)) {
                (Some(qty), Some(_weight)) => (&tokens[..tokens.len() - 2], qty),
                _ => (&tokens[..tokens.len() - 1], Self::parse_quantity(last)?),
            }
        } else {
            (&tokens[..tokens.len() - 1], Self::parse_quantity(last)?)
        };

        let name_tokens = Self::strip_pocket_suffix(name_tokens);
        if name_tokens.is_empty() {
            return None;
        }

        Some(RawStoreRow {
            store_name: name_tokens.join(" "),
            quantity,
        })
    }

    /// 解析带千分位的数量 ("13,550" / "1186")
    fn parse_quantity(token: &str) -> Option<u64> {
        if token.is_empty() {
            return None;
        }
        let mut digits = String::with_capacity(token.len());
        for c in token.chars() {
            match c {
                '0'..='9' => digits.push(c),
                ',' => {}
                _ => return None,
            }
        }
        digits.parse().ok()
    }

    /// 解析无千分位整数
    fn parse_plain_int(token: &str) -> Option<u64> {
        if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        token.parse().ok()
    }

    /// 剥离门店名尾部的口袋码后缀 (`Z5 13,550` / `ABR 200` / `1-Z5 300` 一类)
    fn strip_pocket_suffix(tokens: &[&str]) -> Vec<String> {
        let mut kept: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        if kept.len() >= 2 {
            let last = &kept[kept.len() - 1];
            let second_last = &kept[kept.len() - 2];
            if Self::parse_quantity(last).is_some() && Self::is_pocket_code(second_last) {
                kept.truncate(kept.len() - 2);
            }
        }
        kept
    }

    /// 口袋码判定: Z<数字> / ABR / *-Z<数字>
    fn is_pocket_code(token: &str) -> bool {
        if token == "ABR" {
            return true;
        }
        let code = match token.split_once('-') {
            Some((_, rest)) => rest,
            None => token,
        };
        let mut chars = code.chars();
        chars.next() == Some('Z') && chars.clone().count() > 0 && chars.all(|c| c.is_ascii_digit())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Material Pick List
Zipcode - 10001
Inserts - 12
Store Qty Wght
SHOPRITE BETHPAGE 1,200 350
KING KULLEN 800 210
Total - 2,000
Page: 1
Material Pick List
Zipcode - 10002
Inserts - 8
Store Quantity
STOP AND SHOP 950
0
";

    #[test]
    fn test_parse_two_sections() {
        let sections = PickListParser::new().parse(SAMPLE).unwrap();
        assert_eq!(sections.len(), 2);

        assert_eq!(sections[0].zipcode, "10001");
        assert_eq!(sections[0].num_inserts, 12);
        assert_eq!(sections[0].stores.len(), 2);
        assert_eq!(sections[0].stores[0].store_name, "SHOPRITE BETHPAGE");
        assert_eq!(sections[0].stores[0].quantity, 1200);
        assert_eq!(sections[0].stores[1].quantity, 800);

        assert_eq!(sections[1].zipcode, "10002");
        assert_eq!(sections[1].stores[0].store_name, "STOP AND SHOP");
        assert_eq!(sections[1].stores[0].quantity, 950);
    }

    #[test]
    fn test_no_usable_section() {
        let err = PickListParser::new().parse("nothing here").unwrap_err();
        assert!(matches!(err, ImportError::NoUsableSection));
    }

    #[test]
    fn test_total_and_machine_rows_ignored() {
        let text = "\
Material Pick List
Zipcode - 11550
Store Qty
Machine# 3
GOOD STORE 500
Total - 500
Day# 2
Page: 1
";
        let sections = PickListParser::new().parse(text).unwrap();
        assert_eq!(sections[0].stores.len(), 1);
        assert_eq!(sections[0].stores[0].store_name, "GOOD STORE");
    }

    #[test]
    fn test_quantity_weight_columns() {
        // 末两列 数量 + 重量: 重量丢弃
        let row =
            PickListParser::parse_store_line("SHOPRITE BETHPAGE LI Z5 13,550 1186").unwrap();
        assert_eq!(row.store_name, "SHOPRITE BETHPAGE LI Z5");
        assert_eq!(row.quantity, 13550);
    }

    #[test]
    fn test_pocket_suffix_stripped() {
        // 末列带千分位 -> 按单数量列解析, 口袋码后缀剥离
        let row =
            PickListParser::parse_store_line("SHOPRITE BETHPAGE LI Z5 13,550 1,186").unwrap();
        assert_eq!(row.store_name, "SHOPRITE BETHPAGE LI");
        assert_eq!(row.quantity, 1186);
    }

    #[test]
    fn test_thousands_separator() {
        let row = PickListParser::parse_store_line("BIG STORE 13,550 400").unwrap();
        assert_eq!(row.quantity, 13550);
    }

    #[test]
    fn test_unparsable_row_skipped() {
        let text = "\
Material Pick List
Zipcode - 11550
Store Qty
???
GOOD STORE 500
Page: 1
";
        let sections = PickListParser::new().parse(text).unwrap();
        assert_eq!(sections[0].stores.len(), 1);
    }
}
