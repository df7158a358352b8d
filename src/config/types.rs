//! 配置数据结构定义
//!
//! 定义应用程序的配置结构体和验证逻辑

use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 健康检测端点默认路径
pub const DEFAULT_HEALTH_PATH: &str = "/api/health";

/// 主配置结构
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// 告警webhook URL
    #[serde(default)]
    pub webhook_url: String,
    /// 组织目录API URL
    #[serde(default)]
    pub org_api_url: String,
    /// 单次请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
    /// 健康检测路径，拼接在组织 base_url 之后
    #[serde(default = "default_health_path")]
    pub health_path: String,
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// 是否输出JSON格式日志
    #[serde(default)]
    pub json_logs: bool,
    /// 日志文件路径，设置后日志写入文件而不是控制台
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// 实际加载的配置文件
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            org_api_url: String::new(),
            request_timeout_seconds: default_timeout(),
            health_path: default_health_path(),
            log_level: default_log_level(),
            json_logs: false,
            log_file: None,
            source: None,
        }
    }
}

impl Config {
    /// 请求超时时间
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// 应用命令行/环境变量覆盖项
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(ref url) = overrides.webhook_url {
            self.webhook_url = url.clone();
        }
        if let Some(ref url) = overrides.org_api_url {
            self.org_api_url = url.clone();
        }
        if let Some(timeout) = overrides.request_timeout_seconds {
            self.request_timeout_seconds = timeout;
        }
        if let Some(ref level) = overrides.log_level {
            self.log_level = level.clone();
        }
        if overrides.json_logs {
            self.json_logs = true;
        }
        if let Some(ref path) = overrides.log_file {
            self.log_file = Some(path.clone());
        }
    }
}

/// 来自命令行或环境变量的配置覆盖项
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub webhook_url: Option<String>,
    pub org_api_url: Option<String>,
    pub request_timeout_seconds: Option<u64>,
    pub log_level: Option<String>,
    pub json_logs: bool,
    pub log_file: Option<PathBuf>,
}

// 默认值函数
fn default_timeout() -> u64 {
    10
}
fn default_health_path() -> String {
    DEFAULT_HEALTH_PATH.to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

/// 校验URL为绝对的 http/https 地址
fn validate_http_url(key: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{key} 不能为空"));
    }

    let url = Url::parse(value).map_err(|e| format!("{key} 不是合法的URL: {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("{key} 的协议 {other} 无效，仅支持 http/https")),
    }
}

/// 配置验证函数
///
/// # 参数
/// * `config` - 要验证的配置
///
/// # 返回
/// * `Result<(), String>` - 验证结果，错误时返回错误信息
pub fn validate_config(config: &Config) -> Result<(), String> {
    validate_http_url("webhook_url", &config.webhook_url)?;
    validate_http_url("org_api_url", &config.org_api_url)?;

    if config.request_timeout_seconds == 0 {
        return Err("请求超时时间不能为0".to_string());
    }

    if !config.health_path.starts_with('/') {
        return Err(format!(
            "健康检测路径必须以 / 开头: {}",
            config.health_path
        ));
    }

    let valid_log_levels = ["debug", "info", "warn", "error"];
    if !valid_log_levels.contains(&config.log_level.as_str()) {
        return Err(format!(
            "无效的日志级别: {}，支持的级别: {:?}",
            config.log_level, valid_log_levels
        ));
    }

    Ok(())
}
