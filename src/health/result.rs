//! 健康检测结果数据结构
//!
//! 定义单个组织的检测结果和一次完整检测的汇总报告

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 单个组织的检测结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum HealthOutcome {
    /// 健康端点返回 200
    Healthy,
    /// 健康端点返回了其他状态码
    Unhealthy { status_code: u16 },
    /// 请求在传输层失败（连接、超时、URL无效）
    Unreachable { detail: String },
}

impl HealthOutcome {
    /// 判断是否健康
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthOutcome::Healthy)
    }

    /// 告警中使用的错误描述，健康时为 None
    pub fn error_message(&self) -> Option<String> {
        match self {
            HealthOutcome::Healthy => None,
            HealthOutcome::Unhealthy { status_code } => Some(format!("Status code: {status_code}")),
            HealthOutcome::Unreachable { detail } => Some(detail.clone()),
        }
    }
}

impl std::fmt::Display for HealthOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthOutcome::Healthy => write!(f, "正常"),
            HealthOutcome::Unhealthy { status_code } => write!(f, "异常 ({status_code})"),
            HealthOutcome::Unreachable { .. } => write!(f, "不可达"),
        }
    }
}

/// 一次检测的汇总报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    /// 检测ID
    pub pass_id: Uuid,
    /// 开始时间
    pub started_at: DateTime<Utc>,
    /// 结束时间
    pub finished_at: DateTime<Utc>,
    /// 目录拉取失败时的错误描述
    ///
    /// 目录不可达时组织列表为空，本次检测与"没有组织"表现一致，
    /// 这里仅用于在日志和输出中区分两者。
    pub directory_error: Option<String>,
    /// 目录中的组织数量
    pub organizations: usize,
    /// 被跳过（停用）的组织数量
    pub skipped: usize,
    /// 健康的组织数量
    pub healthy: usize,
    /// 已发出的告警，按目录顺序
    pub alerts: Vec<String>,
}

impl CheckReport {
    /// 创建一个刚开始的报告
    pub fn start() -> Self {
        Self {
            pass_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            directory_error: None,
            organizations: 0,
            skipped: 0,
            healthy: 0,
            alerts: Vec::new(),
        }
    }

    /// 标记检测完成
    pub fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self
    }

    /// 被检测的组织数量
    pub fn checked(&self) -> usize {
        self.organizations - self.skipped
    }

    /// 检测耗时（毫秒）
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}
