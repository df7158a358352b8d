//! Org Vitals - 组织健康巡检工具
//!
//! 拉取组织目录，逐个检测组织的健康端点，并把异常组织推送到告警webhook：
//! - 目录拉取与停用组织过滤
//! - 顺序检测 `<base_url>/api/health`
//! - webhook文本告警
//! - 结构化日志记录

pub mod cli;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod notification;

// 重新导出主要类型
pub use config::Config;
pub use error::OrgVitalsError;
pub use health::{CheckReport, HealthOutcome, Organization, OrganizationHealthChecker};
pub use notification::{Notifier, WebhookNotifier};

/// 应用程序版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 应用程序名称
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

/// 应用程序描述
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
