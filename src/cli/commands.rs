//! 命令处理逻辑
//!
//! 实现各种CLI命令的处理逻辑

use crate::cli::args::{Commands, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::health::{CheckReport, Organization, OrganizationHealthChecker};
use crate::notification::{NoOpNotifier, Notifier, WebhookNotifier};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::json;
use std::sync::Arc;

/// 命令处理器trait
#[async_trait]
pub trait Command: Send + Sync {
    /// 执行命令
    async fn execute(&self, config: &Config) -> Result<()>;
}

/// 根据子命令创建处理器
pub fn command_for(command: Commands) -> Box<dyn Command> {
    match command {
        Commands::Check { dry_run, format } => Box::new(CheckCommand { dry_run, format }),
        Commands::List { format } => Box::new(ListCommand { format }),
        Commands::Validate => Box::new(ValidateCommand),
        Commands::TestNotification { message } => Box::new(TestNotificationCommand { message }),
    }
}

/// 根据配置组装检测器
///
/// # 参数
/// * `config` - 已验证的配置
/// * `dry_run` - 为 true 时告警只记录日志
pub fn build_checker(config: &Config, dry_run: bool) -> Result<OrganizationHealthChecker> {
    let notifier: Arc<dyn Notifier> = if dry_run {
        Arc::new(NoOpNotifier)
    } else {
        Arc::new(WebhookNotifier::new(
            config.webhook_url.clone(),
            config.request_timeout(),
        )?)
    };

    OrganizationHealthChecker::new(
        config.org_api_url.clone(),
        config.health_path.clone(),
        config.request_timeout(),
        notifier,
    )
}

/// 隐藏webhook路径中的令牌，只保留协议和主机
pub fn redact_url(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => format!("{}://{}/***", parsed.scheme(), host),
            None => "***".to_string(),
        },
        Err(_) => "***".to_string(),
    }
}

/// 一次性检测命令
pub struct CheckCommand {
    pub dry_run: bool,
    pub format: OutputFormat,
}

impl CheckCommand {
    fn print_report(&self, report: &CheckReport) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(report)?);
            }
            OutputFormat::Text => {
                if let Some(ref error) = report.directory_error {
                    println!("⚠️  组织目录不可用: {}", error);
                }
                println!(
                    "检测完成: 组织 {}，跳过 {}，正常 {}，告警 {}（{}ms）",
                    report.organizations,
                    report.skipped,
                    report.healthy,
                    report.alerts.len(),
                    report.duration_ms()
                );
                for alert in &report.alerts {
                    println!("  ❌ {}", alert);
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Command for CheckCommand {
    async fn execute(&self, config: &Config) -> Result<()> {
        let checker = build_checker(config, self.dry_run)?;
        let report = checker.run_check_pass().await;
        self.print_report(&report)
    }
}

/// 列出组织命令
pub struct ListCommand {
    pub format: OutputFormat,
}

#[async_trait]
impl Command for ListCommand {
    async fn execute(&self, config: &Config) -> Result<()> {
        let checker = build_checker(config, true)?;
        let organizations: Vec<Organization> = checker.try_fetch_organizations().await?;

        match self.format {
            OutputFormat::Json => {
                let entries: Vec<_> = organizations
                    .iter()
                    .map(|org| {
                        json!({
                            "orga": org.identifier,
                            "statut": org.status,
                            "base_url": org.base_url,
                            "disabled": org.is_disabled(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
            OutputFormat::Text => {
                println!("组织数量: {}", organizations.len());
                for org in &organizations {
                    println!(
                        "  {} {} [{}] {}",
                        if org.is_disabled() { "⏸" } else { "▶" },
                        org.identifier,
                        org.status,
                        org.display_url()
                    );
                }
            }
        }
        Ok(())
    }
}

/// 配置验证命令
///
/// 配置在进入命令前已经完成验证，这里只输出生效值。
pub struct ValidateCommand;

#[async_trait]
impl Command for ValidateCommand {
    async fn execute(&self, config: &Config) -> Result<()> {
        println!("✅ 配置有效");
        println!("  webhook_url: {}", redact_url(&config.webhook_url));
        println!("  org_api_url: {}", config.org_api_url);
        println!("  request_timeout_seconds: {}", config.request_timeout_seconds);
        println!("  health_path: {}", config.health_path);
        println!("  log_level: {}", config.log_level);
        Ok(())
    }
}

/// 测试通知命令
pub struct TestNotificationCommand {
    pub message: String,
}

#[async_trait]
impl Command for TestNotificationCommand {
    async fn execute(&self, config: &Config) -> Result<()> {
        let notifier = WebhookNotifier::new(config.webhook_url.clone(), config.request_timeout())?;
        notifier.try_send(&self.message).await?;
        println!("✅ 测试消息已发送到 {}", redact_url(notifier.webhook_url()));
        Ok(())
    }
}
