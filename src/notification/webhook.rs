//! Webhook告警发送器模块
//!
//! 将告警文本以 `{"text": ...}` 的形式POST到预先配置的webhook

use crate::error::NotificationError;
use crate::notification::sender::Notifier;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error, info};

/// 连接测试使用的消息
const TEST_MESSAGE: &str = "org-vitals webhook connection test";

/// Webhook告警发送器
pub struct WebhookNotifier {
    /// HTTP客户端
    client: Client,
    /// webhook URL
    webhook_url: String,
}

impl WebhookNotifier {
    /// 创建新的webhook发送器
    ///
    /// # 参数
    /// * `webhook_url` - webhook URL
    /// * `timeout` - 单次投递超时时间
    ///
    /// # 返回
    /// * `Result<Self, NotificationError>` - 发送器实例
    pub fn new(webhook_url: impl Into<String>, timeout: Duration) -> Result<Self, NotificationError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
            .build()
            .map_err(|e| NotificationError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            webhook_url: webhook_url.into(),
        })
    }

    /// webhook URL
    pub fn webhook_url(&self) -> &str {
        &self.webhook_url
    }

    /// 构建消息体
    pub fn build_payload(message: &str) -> Value {
        json!({ "text": message })
    }

    async fn post(&self, body: &Value) -> Result<(), NotificationError> {
        debug!(url = %self.webhook_url, "发送消息到webhook");

        // json() 会设置 Content-Type: application/json
        let response = self
            .client
            .post(&self.webhook_url)
            .json(body)
            .send()
            .await
            .map_err(|e| NotificationError::SendError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            info!(status = status.as_u16(), "webhook消息发送成功");
            Ok(())
        } else {
            let text = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %text, "webhook消息发送失败");
            Err(NotificationError::Rejected {
                status: status.as_u16(),
            })
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn try_send(&self, message: &str) -> Result<(), NotificationError> {
        let body = Self::build_payload(message);
        self.post(&body).await
    }

    async fn test_connection(&self) -> Result<(), NotificationError> {
        self.try_send(TEST_MESSAGE).await
    }
}
