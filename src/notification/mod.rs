//! 通知模块
//!
//! 提供webhook告警发送功能

pub mod sender;
pub mod webhook;

// 重新导出主要类型
pub use sender::{NoOpNotifier, Notifier};
pub use webhook::WebhookNotifier;
