//! 错误处理模块
//!
//! 定义应用程序的统一错误类型

use thiserror::Error;

/// Org Vitals 应用程序的主要错误类型
#[derive(Error, Debug)]
pub enum OrgVitalsError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    /// 组织目录相关错误
    #[error("组织目录错误: {0}")]
    Directory(#[from] DirectoryError),

    /// 通知相关错误
    #[error("通知错误: {0}")]
    Notification(#[from] NotificationError),

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    /// JSON序列化/反序列化错误
    #[error("JSON错误: {0}")]
    Json(#[from] serde_json::Error),

    /// 其他错误
    #[error("其他错误: {0}")]
    Other(#[from] anyhow::Error),
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 配置文件解析错误
    #[error("配置文件解析失败: {0}")]
    ParseError(String),

    /// 配置验证错误
    #[error("配置验证失败: {0}")]
    ValidationError(String),

    /// 配置文件不存在
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    /// 环境变量替换错误
    #[error("环境变量替换失败: {var}")]
    EnvVarError { var: String },

    /// 必填项缺失
    #[error("缺少必填配置项: {key}")]
    MissingValue { key: String },
}

/// 组织目录拉取错误类型
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// HTTP请求错误
    #[error("HTTP请求失败: {0}")]
    Request(#[from] reqwest::Error),

    /// 目录服务返回非成功状态码
    #[error("目录服务返回状态码 {0}")]
    UnexpectedStatus(u16),

    /// 响应体不是合法的组织数组
    #[error("目录响应格式错误: {0}")]
    Malformed(String),
}

/// 通知错误类型
#[derive(Error, Debug)]
pub enum NotificationError {
    /// 发送失败
    #[error("通知发送失败: {0}")]
    SendError(String),

    /// webhook拒绝了消息
    #[error("webhook返回状态码 {status}")]
    Rejected { status: u16 },

    /// HTTP客户端创建失败
    #[error("创建HTTP客户端失败: {0}")]
    ClientBuild(String),
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, OrgVitalsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_converts_to_top_level() {
        let err: OrgVitalsError = ConfigError::MissingValue {
            key: "webhook_url".to_string(),
        }
        .into();

        assert!(matches!(err, OrgVitalsError::Config(_)));
        assert!(err.to_string().contains("webhook_url"));
    }

    #[test]
    fn test_directory_status_message() {
        let err = DirectoryError::UnexpectedStatus(503);
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_notification_rejected_message() {
        let err: OrgVitalsError = NotificationError::Rejected { status: 404 }.into();
        assert!(matches!(err, OrgVitalsError::Notification(_)));
        assert!(err.to_string().contains("404"));
    }
}
