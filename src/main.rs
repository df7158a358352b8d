//! Org Vitals 主程序入口
//!
//! 加载配置后执行一次组织健康检测（或其他子命令）

use anyhow::Result;
use clap::Parser;
use org_vitals::cli::{command_for, Args};
use org_vitals::config::TomlConfigLoader;
use org_vitals::logging::{LogConfig, LoggingSystem};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // 解析命令行参数
    let args = Args::parse();

    // 配置必须在检测开始前完整有效
    let loader = TomlConfigLoader::new(true);
    let resolved = loader
        .resolve(args.config.as_deref(), &args.overrides())
        .await;

    // 初始化日志系统，配置无效时退回命令行参数
    let log_config = match resolved.as_ref() {
        Ok(config) => LogConfig::for_config(config),
        Err(_) => fallback_log_config(&args),
    };
    LoggingSystem::setup_logging(log_config)?;

    let config = match resolved {
        Ok(config) => config,
        Err(e) => {
            error!("配置无效: {}", e);
            std::process::exit(1);
        }
    };

    info!("Org Vitals v{} 启动", org_vitals::VERSION);
    match config.source {
        Some(ref path) => info!("成功加载配置文件: {}", path.display()),
        None => info!("未使用配置文件，配置来自命令行参数和环境变量"),
    }

    let command = command_for(args.command());
    if let Err(e) = command.execute(&config).await {
        error!("命令执行失败: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// 配置无效时仅凭命令行参数构建日志配置
fn fallback_log_config(args: &Args) -> LogConfig {
    LogConfig {
        level: args
            .log_level
            .clone()
            .map(Into::into)
            .unwrap_or(log::LevelFilter::Info),
        file_path: args.log_file.clone(),
        json_format: args.json_logs,
    }
}
