//! 命令行参数定义
//!
//! 使用clap定义应用程序的命令行接口

use crate::config::ConfigOverrides;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Org Vitals - 组织健康巡检工具
#[derive(Parser, Debug, Clone)]
#[command(
    name = "org-vitals",
    version = crate::VERSION,
    about = crate::APP_DESCRIPTION,
    long_about = None
)]
pub struct Args {
    /// 配置文件路径
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "配置文件路径",
        env = "ORG_VITALS_CONFIG",
        global = true
    )]
    pub config: Option<PathBuf>,

    /// 告警webhook URL
    #[arg(
        long,
        value_name = "URL",
        help = "告警webhook URL",
        env = "ORG_VITALS_WEBHOOK_URL",
        global = true
    )]
    pub webhook_url: Option<String>,

    /// 组织目录API URL
    #[arg(
        long,
        value_name = "URL",
        help = "组织目录API URL",
        env = "ORG_VITALS_ORG_API_URL",
        global = true
    )]
    pub org_api_url: Option<String>,

    /// 请求超时时间（秒）
    #[arg(
        short,
        long,
        value_name = "SECONDS",
        help = "请求超时时间（秒）",
        env = "ORG_VITALS_TIMEOUT",
        global = true
    )]
    pub timeout: Option<u64>,

    /// 日志级别
    #[arg(
        short,
        long,
        value_enum,
        help = "日志级别",
        env = "ORG_VITALS_LOG_LEVEL",
        global = true
    )]
    pub log_level: Option<LogLevel>,

    /// 输出JSON格式日志
    #[arg(long, help = "输出JSON格式日志", global = true)]
    pub json_logs: bool,

    /// 日志文件路径
    #[arg(
        long,
        value_name = "FILE",
        help = "日志写入文件而不是控制台",
        env = "ORG_VITALS_LOG_FILE",
        global = true
    )]
    pub log_file: Option<PathBuf>,

    /// 子命令，缺省为 check
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// 日志级别枚举
#[derive(ValueEnum, Clone, Debug, PartialEq)]
pub enum LogLevel {
    /// 调试级别
    Debug,
    /// 信息级别
    Info,
    /// 警告级别
    Warn,
    /// 错误级别
    Error,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

/// 子命令定义
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// 执行一次组织健康检测
    Check {
        /// 只记录告警，不发送到webhook
        #[arg(long, help = "只记录告警，不发送到webhook")]
        dry_run: bool,

        /// 输出格式
        #[arg(short, long, value_enum, default_value = "text", help = "输出格式")]
        format: OutputFormat,
    },

    /// 列出目录中的组织及其停用状态，不做检测
    List {
        /// 输出格式
        #[arg(short, long, value_enum, default_value = "text", help = "输出格式")]
        format: OutputFormat,
    },

    /// 验证配置
    Validate,

    /// 测试webhook通知
    TestNotification {
        /// 测试消息内容
        #[arg(
            short,
            long,
            default_value = "org-vitals test notification",
            help = "测试消息内容"
        )]
        message: String,
    },
}

/// 输出格式枚举
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
pub enum OutputFormat {
    /// 文本格式
    Text,
    /// JSON格式
    Json,
}

impl Args {
    /// 实际执行的子命令，未指定时为一次检测
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Check {
            dry_run: false,
            format: OutputFormat::Text,
        })
    }

    /// 收集覆盖配置文件的参数
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            webhook_url: self.webhook_url.clone(),
            org_api_url: self.org_api_url.clone(),
            request_timeout_seconds: self.timeout,
            log_level: self.log_level.as_ref().map(LogLevel::to_string),
            json_logs: self.json_logs,
            log_file: self.log_file.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_check() {
        let args = Args::try_parse_from(["org-vitals"]).unwrap();
        assert_eq!(
            args.command(),
            Commands::Check {
                dry_run: false,
                format: OutputFormat::Text
            }
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from([
            "org-vitals",
            "check",
            "--dry-run",
            "--webhook-url",
            "https://hooks.example.com/x",
            "--timeout",
            "3",
            "--log-level",
            "debug",
            "--log-file",
            "/tmp/org-vitals.log",
        ])
        .unwrap();

        let overrides = args.overrides();
        assert_eq!(
            overrides.webhook_url.as_deref(),
            Some("https://hooks.example.com/x")
        );
        assert_eq!(overrides.request_timeout_seconds, Some(3));
        assert_eq!(overrides.log_level.as_deref(), Some("debug"));
        assert_eq!(
            overrides.log_file.as_deref(),
            Some(std::path::Path::new("/tmp/org-vitals.log"))
        );
        assert!(matches!(args.command(), Commands::Check { dry_run: true, .. }));
    }

    #[test]
    fn test_test_notification_message() {
        let args =
            Args::try_parse_from(["org-vitals", "test-notification", "-m", "hello"]).unwrap();
        assert_eq!(
            args.command(),
            Commands::TestNotification {
                message: "hello".to_string()
            }
        );
    }
}
