//! 组织数据结构
//!
//! 每次检测都从目录服务的响应重新构建，不缓存、不持久化

use serde::{Deserialize, Deserializer, Serialize};

/// 缺少 base_url 时告警中使用的占位文本
pub const UNKNOWN_URL: &str = "Unknown URL";

/// 目录服务返回的一个组织
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// 组织标识（名称/slug）
    #[serde(rename = "orga", default, deserialize_with = "null_as_empty")]
    pub identifier: String,
    /// 组织状态
    #[serde(rename = "statut", default, deserialize_with = "null_as_empty")]
    pub status: String,
    /// 组织服务的基础URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Organization {
    /// 本地实例或已停用的组织不参与检测
    pub fn is_disabled(&self) -> bool {
        self.identifier.contains("localhost") || self.status == "disabled"
    }

    /// 健康检测地址：base_url 与路径直接拼接
    ///
    /// base_url 缺失时只剩路径本身，请求会在传输层失败。
    pub fn health_url(&self, health_path: &str) -> String {
        format!("{}{}", self.base_url.as_deref().unwrap_or_default(), health_path)
    }

    /// 告警中展示的地址
    pub fn display_url(&self) -> &str {
        match self.base_url.as_deref() {
            Some(url) if !url.is_empty() => url,
            _ => UNKNOWN_URL,
        }
    }

    /// 构建告警文本
    pub fn alert_text(&self, error_message: &str) -> String {
        format!("{} is down: {}", self.display_url(), error_message)
    }
}
