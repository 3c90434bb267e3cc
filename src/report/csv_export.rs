// ==========================================
// 邮件插页排产系统 - 排产报表导出
// ==========================================
// 依据: 原 Excel 报表的四张表 (机台总表 / 分日表 / 邮编排程 / 分日负载)
// ==========================================
// 职责: 把排产运行结果只读导出为 CSV 表与 JSON 文档
// 红线: 导出绝不修改运行结果; 行序继承生产序列与邮寄日全序
// ==========================================

use crate::domain::types::MailDate;
use crate::engine::orchestrator::ScheduleRunResult;
use crate::report::error::ReportResult;
use csv::Writer;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

/// 机台总表文件名
const SCHEDULE_FILE: &str = "machine_schedule.csv";

/// 邮编排程文件名
const ZIPCODE_FILE: &str = "zipcode_schedule.csv";

/// 分日负载文件名
const DAILY_LOADS_FILE: &str = "daily_machine_loads.csv";

/// JSON 全量结果文件名
const JSON_FILE: &str = "schedule_result.json";

// ==========================================
// ScheduleReportWriter - 排产报表导出器
// ==========================================
pub struct ScheduleReportWriter {
    // 无状态导出器
}

impl Default for ScheduleReportWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleReportWriter {
    /// 构造函数
    pub fn new() -> Self {
        Self {}
    }

    /// 导出全部报表到目录
    ///
    /// # 参数
    /// - `result`: 排产运行结果（只读）
    /// - `out_dir`: 输出目录（须已存在）
    ///
    /// # 返回
    /// 写出的文件路径列表
    pub fn write_all(
        &self,
        result: &ScheduleRunResult,
        out_dir: &Path,
    ) -> ReportResult<Vec<PathBuf>> {
        let mut written = Vec::new();

        written.push(self.write_machine_schedule(result, out_dir)?);
        written.extend(self.write_per_date_tables(result, out_dir)?);
        written.push(self.write_zipcode_schedule(result, out_dir)?);
        written.push(self.write_daily_loads(result, out_dir)?);
        written.push(self.write_json(result, out_dir)?);

        info!(files = written.len(), dir = %out_dir.display(), "报表导出完成");
        Ok(written)
    }

    /// 表1: 机台总表 (按邮寄日全序 / 机台升序 / 生产序列序)
    fn write_machine_schedule(
        &self,
        result: &ScheduleRunResult,
        out_dir: &Path,
    ) -> ReportResult<PathBuf> {
        let path = out_dir.join(SCHEDULE_FILE);
        let mut writer = Writer::from_path(&path)?;
        writer.write_record(["Mail Date", "Machine", "Store", "Zip Codes", "Quantity"])?;

        // run_sequences 已按 (邮寄日全序, 机台号) 排列
        for sequence in &result.run_sequences {
            for entry in &sequence.entries {
                let zips: Vec<&str> = entry.zip_codes.iter().map(|z| z.as_str()).collect();
                writer.write_record([
                    MailDate::label_opt(sequence.mail_date),
                    format!("Machine {}", sequence.machine_number),
                    entry.store.clone(),
                    format!("{} {}", zips.join(", "), entry.zip_code_count),
                    entry.total_quantity.to_string(),
                ])?;
            }
        }

        writer.flush()?;
        Ok(path)
    }

    /// 表2: 分日表, 每个邮寄日一个文件 (schedule_MON.csv ...)
    fn write_per_date_tables(
        &self,
        result: &ScheduleRunResult,
        out_dir: &Path,
    ) -> ReportResult<Vec<PathBuf>> {
        let mut written = Vec::new();

        for date in &result.mail_dates {
            let path = out_dir.join(format!("schedule_{}.csv", MailDate::label_opt(*date)));
            let mut writer = Writer::from_path(&path)?;
            writer.write_record(["Machine", "Store", "Zip Codes", "Quantity"])?;

            for sequence in result.run_sequences.iter().filter(|s| s.mail_date == *date) {
                for entry in &sequence.entries {
                    let zips: Vec<&str> = entry.zip_codes.iter().map(|z| z.as_str()).collect();
                    writer.write_record([
                        format!("Machine {}", sequence.machine_number),
                        entry.store.clone(),
                        zips.join(", "),
                        entry.total_quantity.to_string(),
                    ])?;
                }
            }

            writer.flush()?;
            written.push(path);
        }

        Ok(written)
    }

    /// 表3: 邮编排程 (按邮寄日全序 / 邮编升序)
    fn write_zipcode_schedule(
        &self,
        result: &ScheduleRunResult,
        out_dir: &Path,
    ) -> ReportResult<PathBuf> {
        let path = out_dir.join(ZIPCODE_FILE);
        let mut writer = Writer::from_path(&path)?;
        writer.write_record(["Mail Date", "Zipcode", "Machines"])?;

        let mut entries: Vec<_> = result.zipcode_schedule.iter().collect();
        entries.sort_by(|a, b| {
            MailDate::rank_opt(a.mail_date)
                .cmp(&MailDate::rank_opt(b.mail_date))
                .then_with(|| a.zipcode.cmp(&b.zipcode))
        });

        for entry in entries {
            let machines: Vec<String> = entry.machines.iter().map(|m| m.to_string()).collect();
            writer.write_record([
                MailDate::label_opt(entry.mail_date),
                entry.zipcode.clone(),
                machines.join(", "),
            ])?;
        }

        writer.flush()?;
        Ok(path)
    }

    /// 表4: 分日机台负载 (按邮寄日全序, 一机台一列)
    fn write_daily_loads(
        &self,
        result: &ScheduleRunResult,
        out_dir: &Path,
    ) -> ReportResult<PathBuf> {
        let path = out_dir.join(DAILY_LOADS_FILE);
        let mut writer = Writer::from_path(&path)?;

        let machine_count = result.config.machine_count;
        let mut header = vec!["Mail Date".to_string()];
        for machine in 1..=machine_count {
            header.push(format!("Machine {}", machine));
        }
        writer.write_record(&header)?;

        for daily in &result.load_report.loads_by_date {
            let mut row = vec![MailDate::label_opt(daily.mail_date)];
            for machine in 1..=machine_count {
                row.push(daily.loads.get(&machine).copied().unwrap_or(0).to_string());
            }
            writer.write_record(&row)?;
        }

        writer.flush()?;
        Ok(path)
    }

    /// 全量结果 JSON (外部协作方只读消费)
    fn write_json(&self, result: &ScheduleRunResult, out_dir: &Path) -> ReportResult<PathBuf> {
        let path = out_dir.join(JSON_FILE);
        let file = File::create(&path)?;
        serde_json::to_writer_pretty(file, result)?;
        Ok(path)
    }
}
