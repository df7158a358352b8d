//! 组织健康检测器实现
//!
//! 拉取组织目录，过滤停用组织，逐个检测健康端点，并为每个失败的组织发出告警

use crate::error::{DirectoryError, Result};
use crate::health::organization::Organization;
use crate::health::result::{CheckReport, HealthOutcome};
use crate::notification::Notifier;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// 组织健康检测器
pub struct OrganizationHealthChecker {
    /// HTTP客户端
    client: Client,
    /// 组织目录API URL
    org_api_url: String,
    /// 健康检测路径
    health_path: String,
    /// 告警发送器
    notifier: Arc<dyn Notifier>,
}

impl OrganizationHealthChecker {
    /// 创建新的组织健康检测器
    ///
    /// # 参数
    /// * `org_api_url` - 组织目录API URL
    /// * `health_path` - 健康检测路径，例如 `/api/health`
    /// * `timeout` - 单次请求超时时间
    /// * `notifier` - 告警发送器
    ///
    /// # 返回
    /// * `Result<Self>` - 检测器实例
    pub fn new(
        org_api_url: impl Into<String>,
        health_path: impl Into<String>,
        timeout: Duration,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
            .build()
            .map_err(DirectoryError::Request)?;

        Ok(Self {
            client,
            org_api_url: org_api_url.into(),
            health_path: health_path.into(),
            notifier,
        })
    }

    /// 拉取组织目录，保留错误
    pub async fn try_fetch_organizations(
        &self,
    ) -> std::result::Result<Vec<Organization>, DirectoryError> {
        debug!(url = %self.org_api_url, "拉取组织目录");

        let response = self.client.get(&self.org_api_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::UnexpectedStatus(status.as_u16()));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| DirectoryError::Malformed(e.to_string()))
    }

    /// 拉取组织目录
    ///
    /// 任何传输或解析错误都只记录日志并返回空列表。
    pub async fn fetch_organizations(&self) -> Vec<Organization> {
        self.fetch_or_report().await.0
    }

    /// 拉取组织目录，失败时记录日志并同时返回空列表和错误
    async fn fetch_or_report(&self) -> (Vec<Organization>, Option<DirectoryError>) {
        match self.try_fetch_organizations().await {
            Ok(organizations) => (organizations, None),
            Err(e) => {
                error!(url = %self.org_api_url, error = %e, "获取组织列表失败");
                (Vec::new(), Some(e))
            }
        }
    }

    /// 判断组织是否停用
    pub fn is_disabled(organization: &Organization) -> bool {
        organization.is_disabled()
    }

    /// 检测单个组织的健康端点
    pub async fn check_health(&self, organization: &Organization) -> HealthOutcome {
        let url = organization.health_url(&self.health_path);

        match self.client.get(&url).send().await {
            Ok(response) if response.status() == StatusCode::OK => HealthOutcome::Healthy,
            Ok(response) => HealthOutcome::Unhealthy {
                status_code: response.status().as_u16(),
            },
            Err(e) => HealthOutcome::Unreachable {
                detail: e.to_string(),
            },
        }
    }

    /// 检测单个组织，健康时返回 None，否则返回错误描述
    pub async fn check_organization(&self, organization: &Organization) -> Option<String> {
        self.check_health(organization).await.error_message()
    }

    /// 执行一次完整检测
    ///
    /// 按目录返回的顺序逐个处理组织，前一个组织的检测和告警完成后才开始
    /// 下一个。本方法不会失败，所有外部调用错误都在各自边界处被吸收。
    pub async fn run_check_pass(&self) -> CheckReport {
        let mut report = CheckReport::start();
        info!(pass_id = %report.pass_id, "开始组织健康检测");

        let (organizations, directory_error) = self.fetch_or_report().await;
        report.directory_error = directory_error.map(|e| e.to_string());
        report.organizations = organizations.len();

        for organization in &organizations {
            if Self::is_disabled(organization) {
                debug!(orga = %organization.identifier, "跳过停用组织");
                report.skipped += 1;
                continue;
            }

            let outcome = self.check_health(organization).await;
            if outcome.is_healthy() {
                debug!(url = %organization.display_url(), "组织健康");
                report.healthy += 1;
                continue;
            }

            let alert = organization.alert_text(&outcome.error_message().unwrap_or_default());
            warn!(
                pass_id = %report.pass_id,
                url = %organization.display_url(),
                outcome = %outcome,
                "{}",
                alert
            );
            self.notifier.send(&alert).await;
            report.alerts.push(alert);
        }

        let report = report.finish();
        info!(
            pass_id = %report.pass_id,
            organizations = report.organizations,
            skipped = report.skipped,
            healthy = report.healthy,
            alerts = report.alerts.len(),
            duration_ms = report.duration_ms(),
            "组织健康检测完成"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotificationError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// 记录所有告警的发送器
    #[derive(Default)]
    struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn try_send(&self, message: &str) -> std::result::Result<(), NotificationError> {
            self.messages.lock().unwrap().push(message.to_string());
            Ok(())
        }

        async fn test_connection(&self) -> std::result::Result<(), NotificationError> {
            Ok(())
        }
    }

    fn create_checker(
        org_api_url: String,
        notifier: Arc<RecordingNotifier>,
    ) -> OrganizationHealthChecker {
        OrganizationHealthChecker::new(
            org_api_url,
            "/api/health",
            Duration::from_secs(5),
            notifier,
        )
        .unwrap()
    }

    fn org_with_url(base_url: Option<String>) -> Organization {
        Organization {
            identifier: "acme".to_string(),
            status: "enabled".to_string(),
            base_url,
        }
    }

    #[tokio::test]
    async fn test_fetch_organizations_parses_directory() {
        let mut server = mockito::Server::new_async().await;
        let _directory = server
            .mock("GET", "/orgs")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"orga": "acme", "statut": "enabled", "base_url": "http://a"},
                    {"orga": "localhost-dev"},
                    {}
                ]"#,
            )
            .create_async()
            .await;

        let checker = create_checker(
            format!("{}/orgs", server.url()),
            Arc::new(RecordingNotifier::default()),
        );
        let organizations = checker.fetch_organizations().await;

        assert_eq!(organizations.len(), 3);
        assert_eq!(organizations[0].base_url.as_deref(), Some("http://a"));
        assert_eq!(organizations[1].identifier, "localhost-dev");
        assert_eq!(organizations[1].status, "");
        assert_eq!(organizations[2], Organization::default());
    }

    #[tokio::test]
    async fn test_fetch_organizations_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        let _directory = server
            .mock("GET", "/orgs")
            .with_status(200)
            .with_body(r#"{"not": "an array"}"#)
            .create_async()
            .await;

        let checker = create_checker(
            format!("{}/orgs", server.url()),
            Arc::new(RecordingNotifier::default()),
        );

        assert!(matches!(
            checker.try_fetch_organizations().await,
            Err(DirectoryError::Malformed(_))
        ));
        assert!(checker.fetch_organizations().await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_organizations_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _directory = server
            .mock("GET", "/orgs")
            .with_status(503)
            .create_async()
            .await;

        let checker = create_checker(
            format!("{}/orgs", server.url()),
            Arc::new(RecordingNotifier::default()),
        );

        assert!(matches!(
            checker.try_fetch_organizations().await,
            Err(DirectoryError::UnexpectedStatus(503))
        ));
        assert!(checker.fetch_organizations().await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_handled_once_for_both_paths() {
        let mut server = mockito::Server::new_async().await;
        let directory = server
            .mock("GET", "/orgs")
            .with_status(502)
            .expect(3)
            .create_async()
            .await;

        let notifier = Arc::new(RecordingNotifier::default());
        let checker = create_checker(format!("{}/orgs", server.url()), notifier.clone());

        let (organizations, error) = checker.fetch_or_report().await;
        assert!(organizations.is_empty());
        assert!(matches!(error, Some(DirectoryError::UnexpectedStatus(502))));

        assert!(checker.fetch_organizations().await.is_empty());

        let report = checker.run_check_pass().await;
        assert_eq!(
            report.directory_error,
            Some(DirectoryError::UnexpectedStatus(502).to_string())
        );
        assert_eq!(report.organizations, 0);
        assert!(notifier.messages.lock().unwrap().is_empty());

        directory.assert_async().await;
    }

    #[tokio::test]
    async fn test_check_organization_healthy_only_on_200() {
        let mut server = mockito::Server::new_async().await;
        let _ok = server
            .mock("GET", "/ok/api/health")
            .with_status(200)
            .create_async()
            .await;
        let _no_content = server
            .mock("GET", "/empty/api/health")
            .with_status(204)
            .create_async()
            .await;
        let _broken = server
            .mock("GET", "/broken/api/health")
            .with_status(500)
            .create_async()
            .await;

        let checker = create_checker(
            format!("{}/orgs", server.url()),
            Arc::new(RecordingNotifier::default()),
        );

        let ok = org_with_url(Some(format!("{}/ok", server.url())));
        let empty = org_with_url(Some(format!("{}/empty", server.url())));
        let broken = org_with_url(Some(format!("{}/broken", server.url())));

        assert_eq!(checker.check_organization(&ok).await, None);
        assert_eq!(
            checker.check_organization(&empty).await,
            Some("Status code: 204".to_string())
        );
        assert_eq!(
            checker.check_health(&broken).await,
            HealthOutcome::Unhealthy { status_code: 500 }
        );
    }

    #[tokio::test]
    async fn test_check_health_without_base_url_is_unreachable() {
        let checker = create_checker(
            "http://127.0.0.1:9/orgs".to_string(),
            Arc::new(RecordingNotifier::default()),
        );

        let outcome = checker.check_health(&org_with_url(None)).await;
        assert!(matches!(outcome, HealthOutcome::Unreachable { .. }));
        assert!(outcome.error_message().is_some());
    }

    #[tokio::test]
    async fn test_run_check_pass_skips_disabled_and_alerts_in_order() {
        let mut server = mockito::Server::new_async().await;
        let url = server.url();

        let directory = format!(
            r#"[
                {{"orga": "a", "statut": "active", "base_url": "{url}/a"}},
                {{"orga": "b", "statut": "disabled", "base_url": "{url}/b"}},
                {{"orga": "localhost-c", "statut": "active", "base_url": "{url}/c"}},
                {{"orga": "d", "statut": "active", "base_url": "{url}/d"}},
                {{"orga": "e", "statut": "active", "base_url": "{url}/e"}}
            ]"#
        );
        let _directory = server
            .mock("GET", "/orgs")
            .with_status(200)
            .with_body(directory)
            .create_async()
            .await;
        let _a = server
            .mock("GET", "/a/api/health")
            .with_status(500)
            .create_async()
            .await;
        let b = server
            .mock("GET", "/b/api/health")
            .with_status(500)
            .expect(0)
            .create_async()
            .await;
        let c = server
            .mock("GET", "/c/api/health")
            .with_status(500)
            .expect(0)
            .create_async()
            .await;
        let _d = server
            .mock("GET", "/d/api/health")
            .with_status(200)
            .create_async()
            .await;
        let _e = server
            .mock("GET", "/e/api/health")
            .with_status(404)
            .create_async()
            .await;

        let notifier = Arc::new(RecordingNotifier::default());
        let checker = create_checker(format!("{url}/orgs"), notifier.clone());

        let report = checker.run_check_pass().await;

        b.assert_async().await;
        c.assert_async().await;

        let expected = vec![
            format!("{url}/a is down: Status code: 500"),
            format!("{url}/e is down: Status code: 404"),
        ];
        assert_eq!(*notifier.messages.lock().unwrap(), expected);
        assert_eq!(report.alerts, expected);
        assert_eq!(report.organizations, 5);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.healthy, 1);
        assert!(report.directory_error.is_none());
    }

    #[tokio::test]
    async fn test_run_check_pass_directory_unreachable() {
        let notifier = Arc::new(RecordingNotifier::default());
        let checker = create_checker("http://127.0.0.1:9/orgs".to_string(), notifier.clone());

        let report = checker.run_check_pass().await;

        assert!(notifier.messages.lock().unwrap().is_empty());
        assert!(report.directory_error.is_some());
        assert_eq!(report.organizations, 0);
    }
}
