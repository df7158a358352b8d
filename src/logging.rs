//! 日志系统模块
//!
//! 提供结构化日志配置和初始化功能

use crate::config::Config;
use log::LevelFilter;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter, Layer};

/// 全局日志初始化状态
static LOGGING_CONFIG: OnceLock<Mutex<Option<LogConfig>>> = OnceLock::new();

/// 日志配置结构
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    /// 日志级别
    pub level: LevelFilter,
    /// 日志文件路径，为空时输出到控制台
    pub file_path: Option<PathBuf>,
    /// 是否使用JSON格式
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            file_path: None,
            json_format: false,
        }
    }
}

impl LogConfig {
    /// 从已验证的应用配置生成日志配置
    pub fn for_config(config: &Config) -> Self {
        Self {
            level: parse_level(&config.log_level).unwrap_or(LevelFilter::Info),
            file_path: config.log_file.clone(),
            json_format: config.json_logs,
        }
    }
}

/// 将配置中的级别字符串转换为 `LevelFilter`
pub fn parse_level(level: &str) -> Option<LevelFilter> {
    match level.to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

/// 日志系统管理器
pub struct LoggingSystem {
    config: LogConfig,
}

impl LoggingSystem {
    /// 初始化日志系统
    ///
    /// 重复调用是安全的：全局 subscriber 只会安装一次，后续调用直接返回。
    ///
    /// # 参数
    /// * `config` - 日志配置
    pub fn setup_logging(config: LogConfig) -> anyhow::Result<Self> {
        let state = LOGGING_CONFIG.get_or_init(|| Mutex::new(None));
        let mut current = state
            .lock()
            .map_err(|_| anyhow::anyhow!("日志状态锁已损坏"))?;

        if current.is_none() {
            Self::init_log_tracer()?;
            Self::init_tracing_subscriber(&config)?;
            *current = Some(config.clone());
        }

        Ok(Self { config })
    }

    /// 初始化 LogTracer（log crate 到 tracing 的桥接）
    fn init_log_tracer() -> anyhow::Result<()> {
        use tracing_log::LogTracer;

        static LOG_TRACER_INIT: OnceLock<Result<(), String>> = OnceLock::new();

        let result = LOG_TRACER_INIT.get_or_init(|| LogTracer::init().map_err(|e| e.to_string()));

        result
            .as_ref()
            .map_err(|e| anyhow::anyhow!("LogTracer初始化失败: {}", e))?;
        Ok(())
    }

    /// 构建过滤器
    ///
    /// 设置了 RUST_LOG 时完全按其过滤，否则使用配置的级别。
    fn build_env_filter(level: LevelFilter) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::default().add_directive(Self::convert_level_to_directive(level))
        })
    }

    /// 初始化 tracing subscriber
    fn init_tracing_subscriber(config: &LogConfig) -> anyhow::Result<()> {
        let env_filter = Self::build_env_filter(config.level);

        let result = match &config.file_path {
            Some(file_path) => {
                let file = std::fs::File::create(file_path)
                    .map_err(|e| anyhow::anyhow!("创建日志文件失败: {}", e))?;
                let file_layer = if config.json_format {
                    fmt::layer()
                        .json()
                        .with_writer(Mutex::new(file))
                        .with_timer(fmt::time::ChronoUtc::rfc_3339())
                        .boxed()
                } else {
                    fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_timer(fmt::time::ChronoUtc::rfc_3339())
                        .with_ansi(false)
                        .with_file(true)
                        .with_line_number(true)
                        .boxed()
                };

                registry().with(env_filter).with(file_layer).try_init()
            }
            None => {
                let console_layer = if config.json_format {
                    fmt::layer()
                        .json()
                        .with_timer(fmt::time::ChronoUtc::rfc_3339())
                        .with_file(true)
                        .with_line_number(true)
                        .boxed()
                } else {
                    fmt::layer()
                        .with_timer(fmt::time::ChronoUtc::rfc_3339())
                        .with_ansi(true)
                        .with_target(false)
                        .boxed()
                };

                registry().with(env_filter).with(console_layer).try_init()
            }
        };

        match result {
            Ok(()) => {
                tracing::debug!("日志配置: {:?}", config);
                Ok(())
            }
            Err(e) => {
                let error_msg = e.to_string();
                if error_msg.contains("a global default trace dispatcher has already been set") {
                    // 测试中可能已有其他 subscriber
                    tracing::debug!("日志系统已经初始化过了");
                    Ok(())
                } else {
                    Err(anyhow::anyhow!(
                        "tracing subscriber初始化失败: {}",
                        error_msg
                    ))
                }
            }
        }
    }

    /// 将 log::LevelFilter 转换为 tracing 的指令
    fn convert_level_to_directive(level: LevelFilter) -> tracing_subscriber::filter::Directive {
        use tracing_subscriber::filter::{Directive, LevelFilter as TracingLevel};
        match level {
            LevelFilter::Off => Directive::from(TracingLevel::OFF),
            LevelFilter::Error => Directive::from(tracing::Level::ERROR),
            LevelFilter::Warn => Directive::from(tracing::Level::WARN),
            LevelFilter::Info => Directive::from(tracing::Level::INFO),
            LevelFilter::Debug => Directive::from(tracing::Level::DEBUG),
            LevelFilter::Trace => Directive::from(tracing::Level::TRACE),
        }
    }

    /// 本实例的配置
    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// 检查日志系统是否已初始化
    pub fn is_initialized() -> bool {
        LOGGING_CONFIG
            .get()
            .and_then(|state| state.lock().ok().map(|current| current.is_some()))
            .unwrap_or(false)
    }
}
