//! 健康检测模块
//!
//! 提供组织目录拉取、健康检测和检测结果汇总功能

pub mod checker;
pub mod organization;
pub mod result;

// 重新导出主要类型
pub use checker::OrganizationHealthChecker;
pub use organization::{Organization, UNKNOWN_URL};
pub use result::{CheckReport, HealthOutcome};
