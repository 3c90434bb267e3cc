// ==========================================
// 邮件插页排产系统 - 引擎编排器
// ==========================================
// 依据: Scheduling_Specs - 2. 系统总览 (数据流)
// 用途: 协调聚合 / 调度 / 序列 / 负载四类引擎的执行顺序
// ==========================================
// 红线: 一次 run() 即一次完整排产, 全部派生结构由本次运行独占,
//       返回后即为只读数据; 引擎不重试, 不持久化, 不跨运行共享
// ==========================================

use crate::config::ScheduleConfig;
use crate::domain::assignment::{MachineAssignment, RunSequence, ZipcodeScheduleEntry};
use crate::domain::record::PickListRecord;
use crate::domain::types::{MailDate, SchedulingMethod};
use crate::engine::aggregator::Aggregator;
use crate::engine::error::{RunWarning, ScheduleResult};
use crate::engine::load_reporter::{LoadReport, LoadReporter};
use crate::engine::run_sequencer::RunSequencer;
use crate::engine::store_scheduler::StoreScheduler;
use crate::engine::zipcode_scheduler::ZipcodeScheduler;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

// ==========================================
// ScheduleRunResult - 排产运行结果
// ==========================================
// 对外唯一输出: 无格式承诺的嵌套数据结构,
// 外部协作方 (报表渲染 / 导出) 只读消费
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRunResult {
    pub run_id: Uuid,                              // 运行ID
    pub generated_at: DateTime<Utc>,               // 生成时间 (UTC)
    pub config: ScheduleConfig,                    // 本次运行配置
    pub mail_dates: Vec<Option<MailDate>>,         // 出现的邮寄日 (全序)
    pub zip_code_count: usize,                     // 邮编数
    pub assignments: Vec<MachineAssignment>,       // 分配记录全集
    pub zipcode_schedule: Vec<ZipcodeScheduleEntry>, // 邮编排程
    pub run_sequences: Vec<RunSequence>,           // 每 (机台, 邮寄日) 生产序列
    pub load_report: LoadReport,                   // 负载报表
    pub warnings: Vec<RunWarning>,                 // 非致命警告
}

// ==========================================
// ScheduleOrchestrator - 引擎编排器
// ==========================================
pub struct ScheduleOrchestrator {
    aggregator: Aggregator,
    store_scheduler: StoreScheduler,
    zipcode_scheduler: ZipcodeScheduler,
    sequencer: RunSequencer,
    reporter: LoadReporter,
}

impl Default for ScheduleOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScheduleOrchestrator {
    /// 创建新的编排器实例
    pub fn new() -> Self {
        Self {
            aggregator: Aggregator::new(),
            store_scheduler: StoreScheduler::new(),
            zipcode_scheduler: ZipcodeScheduler::new(),
            sequencer: RunSequencer::new(),
            reporter: LoadReporter::new(),
        }
    }

    /// 执行完整排产流程
    ///
    /// # 参数
    /// - `records`: 有序记录序列（空序列合法, 产出空结果）
    /// - `config`: 排产配置
    ///
    /// # 返回
    /// 排产运行结果; 配置非法或记录非法时返回错误
    pub fn run(
        &self,
        records: &[PickListRecord],
        config: &ScheduleConfig,
    ) -> ScheduleResult<ScheduleRunResult> {
        // ==========================================
        // 步骤0: 配置校验 (排产开始前)
        // ==========================================
        config.validate()?;

        let run_id = Uuid::new_v4();
        info!(
            %run_id,
            records = records.len(),
            machine_count = config.machine_count,
            method = %config.scheduling_method,
            "开始执行排产流程"
        );

        // ==========================================
        // 步骤1: Aggregator - 记录聚合
        // ==========================================
        debug!("步骤1: 执行记录聚合");
        let aggregate = self.aggregator.aggregate(records)?;
        let mut warnings = aggregate.warnings.clone();

        // ==========================================
        // 步骤2: 调度 (两类启发式互斥, 用户选定)
        // ==========================================
        debug!(method = %config.scheduling_method, "步骤2: 执行机台调度");
        let (assignments, zipcode_schedule) = match config.scheduling_method {
            SchedulingMethod::ByStore => {
                let output = self.store_scheduler.schedule(&aggregate, config);
                warnings.extend(output.warnings);
                (output.assignments, output.zipcode_schedule)
            }
            SchedulingMethod::ByZipcode => {
                let output = self.zipcode_scheduler.schedule(&aggregate, config);
                (output.assignments, output.zipcode_schedule)
            }
        };

        // ==========================================
        // 步骤3: Run Sequencer - 换版最小化排序
        // ==========================================
        debug!("步骤3: 执行生产序列排序");
        let run_sequences = self.sequencer.sequence_all(&assignments);

        // ==========================================
        // 步骤4: Load Reporter - 负载报表
        // ==========================================
        debug!("步骤4: 生成负载报表");
        let load_report = self.reporter.report(&assignments, config.machine_count);

        info!(
            %run_id,
            assignments = assignments.len(),
            sequences = run_sequences.len(),
            total_load = load_report.total_load,
            warnings = warnings.len(),
            "排产流程完成"
        );

        Ok(ScheduleRunResult {
            run_id,
            generated_at: Utc::now(),
            config: config.clone(),
            mail_dates: aggregate.mail_dates.clone(),
            zip_code_count: aggregate.zipcode_profiles.len(),
            assignments,
            zipcode_schedule,
            run_sequences,
            load_report,
            warnings,
        })
    }
}
