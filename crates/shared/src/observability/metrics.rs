//! 指标描述模块
//!
//! 指标通过 metrics facade 记录，由宿主进程安装的 recorder 决定导出方式；
//! 未安装 recorder 时记录为空操作。

/// 条件评估次数
pub const CRITERIA_EVALUATIONS_TOTAL: &str = "criteria_evaluations_total";

/// 条件定义错误次数
pub const CRITERIA_DEFINITION_ERRORS_TOTAL: &str = "criteria_definition_errors_total";

/// 注册指标描述
pub fn describe_metrics() {
    metrics::describe_counter!(
        CRITERIA_EVALUATIONS_TOTAL,
        "Total number of personalisation criteria evaluations"
    );
    metrics::describe_counter!(
        CRITERIA_DEFINITION_ERRORS_TOTAL,
        "Total number of rejected criteria definitions"
    );
}
