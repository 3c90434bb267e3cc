// ==========================================
// 排产流程端到端测试
// ==========================================
// 依据: Scheduling_Specs - 8. 验收场景
// 职责: 经由编排器验证完整排产流程的验收场景
// ==========================================

use mail_insert_aps::config::ScheduleConfig;
use mail_insert_aps::domain::record::PickListRecord;
use mail_insert_aps::domain::types::{MailDate, SchedulingMethod};
use mail_insert_aps::engine::{RunWarning, ScheduleOrchestrator};
use std::collections::BTreeSet;

// ==========================================
// 测试辅助函数
// ==========================================

fn record(zipcode: &str, store: &str, qty: u64, date: Option<MailDate>) -> PickListRecord {
    PickListRecord::new(zipcode, store, qty, date)
}

fn config(machine_count: u32, method: SchedulingMethod) -> ScheduleConfig {
    ScheduleConfig {
        machine_count,
        scheduling_method: method,
        ..Default::default()
    }
}

// ==========================================
// 场景1: 2 机台邮编优先, 共享门店
// ==========================================
// 两个邮编共享门店 A; 启发式可能把两个邮编并机 (230/0)
// 也可能因负载惩罚拆机, 但邮编独占与数量守恒必须恒成立
#[test]
fn test_e2e_two_machine_by_zipcode_scenario() {
    let records = vec![
        record("10001", "A", 100, Some(MailDate::Mon)),
        record("10001", "B", 50, Some(MailDate::Mon)),
        record("10002", "A", 80, Some(MailDate::Mon)),
    ];
    let result = ScheduleOrchestrator::new()
        .run(&records, &config(2, SchedulingMethod::ByZipcode))
        .unwrap();

    // 邮编独占
    for entry in &result.zipcode_schedule {
        assert_eq!(entry.machines.len(), 1, "邮编{}应独占一台机台", entry.zipcode);
    }

    // 数量守恒
    let assigned: u64 = result.assignments.iter().map(|a| a.total_quantity).sum();
    assert_eq!(assigned, 230);
    assert_eq!(result.load_report.total_load, 230);

    // 无论并机还是拆机, 机台负载之和不变
    let loads: Vec<u64> = result.load_report.machine_totals.values().copied().collect();
    assert_eq!(loads.iter().sum::<u64>(), 230);
}

// ==========================================
// 场景2: 空输入合法
// ==========================================
#[test]
fn test_e2e_empty_input_produces_empty_outputs() {
    for method in [SchedulingMethod::ByStore, SchedulingMethod::ByZipcode] {
        let result = ScheduleOrchestrator::new()
            .run(&[], &config(3, method))
            .unwrap();

        assert!(result.assignments.is_empty());
        assert!(result.zipcode_schedule.is_empty());
        assert!(result.run_sequences.is_empty());
        assert!(result.warnings.is_empty());
        assert_eq!(result.zip_code_count, 0);
        assert_eq!(result.load_report.total_load, 0);

        // 机台占比不除零, 全部为 0
        assert_eq!(result.load_report.machine_percentages.len(), 3);
        for pct in result.load_report.machine_percentages.values() {
            assert_eq!(*pct, 0.0);
        }
    }
}

// ==========================================
// 场景3: 单门店跨 3 个邮寄日, 3 机台门店优先
// ==========================================
#[test]
fn test_e2e_single_store_three_dates_same_machine() {
    let records = vec![
        record("10001", "SHOPRITE", 100, Some(MailDate::Mon)),
        record("10002", "SHOPRITE", 90, Some(MailDate::Wed)),
        record("10003", "SHOPRITE", 80, Some(MailDate::Fri)),
    ];
    let result = ScheduleOrchestrator::new()
        .run(&records, &config(3, SchedulingMethod::ByStore))
        .unwrap();

    assert_eq!(result.assignments.len(), 3);
    let machines: BTreeSet<u32> = result
        .assignments
        .iter()
        .map(|a| a.machine_number)
        .collect();
    assert_eq!(machines.len(), 1, "三个邮寄日应同一机台");

    // 每个邮寄日一个序列
    assert_eq!(result.run_sequences.len(), 3);
    let dates: Vec<Option<MailDate>> =
        result.run_sequences.iter().map(|s| s.mail_date).collect();
    assert_eq!(
        dates,
        vec![
            Some(MailDate::Mon),
            Some(MailDate::Wed),
            Some(MailDate::Fri)
        ]
    );
}

// ==========================================
// 场景4: 未知邮寄日排在已知日期之后
// ==========================================
#[test]
fn test_e2e_unknown_mail_date_sorts_last() {
    let records = vec![
        record("99999", "X", 40, None),
        record("10001", "A", 100, Some(MailDate::Fri)),
    ];
    let result = ScheduleOrchestrator::new()
        .run(&records, &config(2, SchedulingMethod::ByZipcode))
        .unwrap();

    assert_eq!(result.mail_dates, vec![Some(MailDate::Fri), None]);

    // 负载报表按日列表同序, 未知日期 (UNASSIGNED) 在最后
    let report_dates: Vec<Option<MailDate>> = result
        .load_report
        .loads_by_date
        .iter()
        .map(|d| d.mail_date)
        .collect();
    assert_eq!(report_dates, vec![Some(MailDate::Fri), None]);
}

// ==========================================
// 场景5: 邮寄日歧义按输入序首见并出警告
// ==========================================
#[test]
fn test_e2e_ambiguous_mail_date_first_seen_wins() {
    let records = vec![
        record("10001", "A", 10, Some(MailDate::Wed)),
        record("10001", "B", 10, Some(MailDate::Mon)),
    ];
    let result = ScheduleOrchestrator::new()
        .run(&records, &config(2, SchedulingMethod::ByZipcode))
        .unwrap();

    // 规范化为首见 WED
    assert_eq!(result.mail_dates, vec![Some(MailDate::Wed)]);
    let entry = result
        .zipcode_schedule
        .iter()
        .find(|e| e.zipcode == "10001")
        .unwrap();
    assert_eq!(entry.mail_date, Some(MailDate::Wed));

    assert!(result.warnings.iter().any(|w| matches!(
        w,
        RunWarning::AmbiguousMailDate {
            kept: Some(MailDate::Wed),
            conflicting: Some(MailDate::Mon),
            ..
        }
    )));
}

// ==========================================
// 场景6: 端到端确定性 (序列与分配字节级一致)
// ==========================================
#[test]
fn test_e2e_determinism_across_runs() {
    let records = vec![
        record("10001", "A", 1200, Some(MailDate::Mon)),
        record("10001", "B", 450, Some(MailDate::Mon)),
        record("10002", "A", 800, Some(MailDate::Mon)),
        record("11550", "C", 650, Some(MailDate::Wed)),
        record("99999", "D", 70, None),
    ];

    for method in [SchedulingMethod::ByStore, SchedulingMethod::ByZipcode] {
        let cfg = config(3, method);
        let first = ScheduleOrchestrator::new().run(&records, &cfg).unwrap();
        let second = ScheduleOrchestrator::new().run(&records, &cfg).unwrap();

        // run_id 与时间戳以外的全部派生结构一致
        assert_eq!(
            serde_json::to_string(&first.assignments).unwrap(),
            serde_json::to_string(&second.assignments).unwrap()
        );
        assert_eq!(
            serde_json::to_string(&first.run_sequences).unwrap(),
            serde_json::to_string(&second.run_sequences).unwrap()
        );
        assert_eq!(
            serde_json::to_string(&first.load_report).unwrap(),
            serde_json::to_string(&second.load_report).unwrap()
        );
    }
}
