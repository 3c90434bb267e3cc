// ==========================================
// 邮件插页排产系统 - 命令行主入口
// ==========================================
// 依据: Scheduling_Specs - 6. 外部接口
// 流程: 导入拣货单 -> 邮寄日查表 -> 排产 -> 报表导出
// ==========================================

use anyhow::{bail, Context, Result};
use mail_insert_aps::{
    logging, MailDateLookup, PickListParser, ScheduleConfig, ScheduleOrchestrator,
    ScheduleReportWriter, SchedulingMethod,
};
use std::path::PathBuf;

/// 命令行参数
struct CliArgs {
    pick_list: PathBuf,
    zips_csv: Option<PathBuf>,
    machines: Option<u32>,
    method: Option<SchedulingMethod>,
    tolerance: Option<f64>,
    out_dir: PathBuf,
}

impl CliArgs {
    /// 解析命令行参数
    fn parse(args: &[String]) -> Result<Self> {
        let mut pick_list: Option<PathBuf> = None;
        let mut zips_csv = None;
        let mut machines = None;
        let mut method = None;
        let mut tolerance = None;
        let mut out_dir = PathBuf::from(".");

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--zips" => {
                    let value = iter.next().context("--zips 缺少参数值")?;
                    zips_csv = Some(PathBuf::from(value));
                }
                "--machines" => {
                    let value = iter.next().context("--machines 缺少参数值")?;
                    machines = Some(
                        value
                            .parse::<u32>()
                            .with_context(|| format!("--machines 无法解析: {}", value))?,
                    );
                }
                "--method" => {
                    let value = iter.next().context("--method 缺少参数值")?;
                    method = Some(value.parse::<SchedulingMethod>().map_err(|_| {
                        anyhow::anyhow!("--method 无法解析: {}, 取值 by_store|by_zipcode", value)
                    })?);
                }
                "--tolerance" => {
                    let value = iter.next().context("--tolerance 缺少参数值")?;
                    tolerance = Some(
                        value
                            .parse::<f64>()
                            .with_context(|| format!("--tolerance 无法解析: {}", value))?,
                    );
                }
                "--out" => {
                    let value = iter.next().context("--out 缺少参数值")?;
                    out_dir = PathBuf::from(value);
                }
                other if other.starts_with("--") => {
                    bail!("未知参数: {}", other);
                }
                other => {
                    if pick_list.is_some() {
                        bail!("重复的拣货单路径: {}", other);
                    }
                    pick_list = Some(PathBuf::from(other));
                }
            }
        }

        let pick_list = pick_list.context(
            "用法: mail-insert-aps <拣货单.txt> [--zips <地址表.csv>] \
             [--machines N] [--method by_store|by_zipcode] [--tolerance F] [--out 目录]",
        )?;

        Ok(Self {
            pick_list,
            zips_csv,
            machines,
            method,
            tolerance,
            out_dir,
        })
    }

    /// 合成排产配置 (未指定项取默认值)
    fn to_config(&self) -> ScheduleConfig {
        let mut config = ScheduleConfig::default();
        if let Some(machines) = self.machines {
            config.machine_count = machines;
        }
        if let Some(method) = self.method {
            config.scheduling_method = method;
        }
        if let Some(tolerance) = self.tolerance {
            config.balance_tolerance = tolerance;
        }
        config
    }
}

fn main() -> Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - 决策支持系统", mail_insert_aps::APP_NAME);
    tracing::info!("系统版本: {}", mail_insert_aps::VERSION);
    tracing::info!("==================================================");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = CliArgs::parse(&args)?;
    let config = cli.to_config();

    // 导入拣货单文本
    let text = std::fs::read_to_string(&cli.pick_list)
        .with_context(|| format!("读取拣货单失败: {}", cli.pick_list.display()))?;
    let sections = PickListParser::new()
        .parse(&text)
        .with_context(|| format!("解析拣货单失败: {}", cli.pick_list.display()))?;

    // 邮寄日查表 (未提供地址表时全部记录邮寄日为未知)
    let lookup = match &cli.zips_csv {
        Some(path) => MailDateLookup::from_csv_path(path)
            .with_context(|| format!("读取邮寄日地址表失败: {}", path.display()))?,
        None => {
            tracing::warn!("未提供 --zips 地址表, 全部邮寄日按未知处理");
            MailDateLookup::empty()
        }
    };
    let records = lookup.resolve(&sections);
    tracing::info!(
        sections = sections.len(),
        records = records.len(),
        "导入完成"
    );

    // 执行排产
    let result = ScheduleOrchestrator::new()
        .run(&records, &config)
        .context("排产执行失败")?;

    for warning in &result.warnings {
        tracing::warn!("{}", warning.summary());
    }

    // 导出报表
    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("创建输出目录失败: {}", cli.out_dir.display()))?;
    let files = ScheduleReportWriter::new()
        .write_all(&result, &cli.out_dir)
        .context("报表导出失败")?;
    for file in &files {
        tracing::info!("已写出: {}", file.display());
    }

    // 负载摘要
    tracing::info!("==================================================");
    tracing::info!(
        "总量: {}, 邮编数: {}, 警告数: {}",
        result.load_report.total_load,
        result.zip_code_count,
        result.warnings.len()
    );
    for (machine, total) in &result.load_report.machine_totals {
        let pct = result
            .load_report
            .machine_percentages
            .get(machine)
            .copied()
            .unwrap_or(0.0);
        tracing::info!("Machine {}: {} ({:.1}%)", machine, total, pct);
    }
    tracing::info!("==================================================");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliArgs> {
        let owned: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        CliArgs::parse(&owned)
    }

    #[test]
    fn test_parse_full_args() {
        let cli = parse(&[
            "pick.txt",
            "--zips",
            "zips.csv",
            "--machines",
            "4",
            "--method",
            "by_zipcode",
            "--tolerance",
            "0.2",
            "--out",
            "reports",
        ])
        .unwrap();

        assert_eq!(cli.pick_list, PathBuf::from("pick.txt"));
        assert_eq!(cli.zips_csv, Some(PathBuf::from("zips.csv")));

        let config = cli.to_config();
        assert_eq!(config.machine_count, 4);
        assert_eq!(config.scheduling_method, SchedulingMethod::ByZipcode);
        assert_eq!(config.balance_tolerance, 0.2);
    }

    #[test]
    fn test_defaults_without_flags() {
        let cli = parse(&["pick.txt"]).unwrap();
        let config = cli.to_config();
        assert_eq!(config, ScheduleConfig::default());
        assert_eq!(cli.out_dir, PathBuf::from("."));
    }

    #[test]
    fn test_missing_pick_list_rejected() {
        assert!(parse(&["--machines", "3"]).is_err());
    }

    #[test]
    fn test_unknown_flag_rejected() {
        assert!(parse(&["pick.txt", "--bogus"]).is_err());
    }
}
