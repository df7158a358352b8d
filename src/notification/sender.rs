//! 通知发送器模块
//!
//! 定义告警发送的trait和基础实现

use crate::error::NotificationError;
use async_trait::async_trait;
use tracing::{debug, warn};

/// 告警发送器trait
///
/// 检测流程只调用 `send`，它永远不会失败：投递错误被记录后丢弃，
/// 保证一个告警发送失败不会影响后续组织的检测。
#[async_trait]
pub trait Notifier: Send + Sync {
    /// 发送一条文本告警，返回投递结果
    ///
    /// # 参数
    /// * `message` - 告警文本
    async fn try_send(&self, message: &str) -> Result<(), NotificationError>;

    /// 发送一条文本告警，失败只记录日志
    async fn send(&self, message: &str) {
        match self.try_send(message).await {
            Ok(()) => debug!("告警已发送"),
            Err(e) => warn!(error = %e, "告警发送失败，已忽略"),
        }
    }

    /// 测试连接
    async fn test_connection(&self) -> Result<(), NotificationError>;
}

/// 空的告警发送器实现（用于演练模式）
pub struct NoOpNotifier;

#[async_trait]
impl Notifier for NoOpNotifier {
    async fn try_send(&self, message: &str) -> Result<(), NotificationError> {
        tracing::info!(alert = %message, "演练模式，未发送告警");
        Ok(())
    }

    async fn test_connection(&self) -> Result<(), NotificationError> {
        Ok(())
    }
}
