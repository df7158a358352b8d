//! 配置加载器实现
//!
//! 提供TOML配置文件解析、环境变量替换、覆盖项合并和错误处理功能

use crate::config::types::{validate_config, Config, ConfigOverrides};
use crate::error::{ConfigError, Result};
use async_trait::async_trait;
use regex::Regex;
use std::path::{Path, PathBuf};

/// 配置加载器trait，定义配置加载接口
#[async_trait]
pub trait ConfigLoader: Send + Sync {
    /// 从文件加载配置
    ///
    /// # 参数
    /// * `path` - 配置文件路径
    ///
    /// # 返回
    /// * `Result<Config>` - 加载的配置或错误
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<Config>;

    /// 从字符串加载配置
    async fn load_from_string(&self, content: &str) -> Result<Config>;

    /// 验证配置
    fn validate(&self, config: &Config) -> Result<()>;
}

/// TOML配置加载器实现
///
/// 加载阶段只做解析，验证放在覆盖项合并之后，
/// 这样 URL 可以完全来自环境变量。
#[derive(Debug, Clone)]
pub struct TomlConfigLoader {
    /// 是否启用环境变量替换
    enable_env_substitution: bool,
}

impl TomlConfigLoader {
    /// 创建新的TOML配置加载器
    pub fn new(enable_env_substitution: bool) -> Self {
        Self {
            enable_env_substitution,
        }
    }

    /// 替换字符串中的 `${VAR_NAME}` 环境变量
    ///
    /// 整行注释原样保留，不参与替换。
    fn substitute_env_vars(&self, content: &str) -> Result<String> {
        if !self.enable_env_substitution {
            return Ok(content.to_string());
        }

        let env_var_regex = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")
            .map_err(|e| ConfigError::ParseError(format!("正则表达式错误: {}", e)))?;

        let mut lines = Vec::new();

        for line in content.lines() {
            if line.trim_start().starts_with('#') {
                lines.push(line.to_string());
                continue;
            }

            let mut substituted = line.to_string();
            for captures in env_var_regex.captures_iter(line) {
                let full_match = &captures[0];
                let var_name = &captures[1];

                match std::env::var(var_name) {
                    Ok(value) => {
                        substituted = substituted.replace(full_match, &value);
                    }
                    Err(_) => {
                        return Err(ConfigError::EnvVarError {
                            var: var_name.to_string(),
                        }
                        .into());
                    }
                }
            }
            lines.push(substituted);
        }

        Ok(lines.join("\n"))
    }

    fn parse_toml(&self, content: &str) -> Result<Config> {
        let processed_content = self.substitute_env_vars(content)?;

        let config: Config = toml::from_str(&processed_content)
            .map_err(|e| ConfigError::ParseError(format!("TOML解析失败: {}", e)))?;

        Ok(config)
    }

    /// 解析最终生效的配置
    ///
    /// 显式指定的配置文件必须存在；未指定时使用默认路径，文件不存在则
    /// 从默认值出发。随后合并覆盖项并验证，任何缺失的必填项都会在
    /// 检测开始前报错。
    ///
    /// # 参数
    /// * `explicit_path` - 命令行或环境变量指定的配置文件
    /// * `overrides` - 命令行/环境变量覆盖项
    pub async fn resolve(
        &self,
        explicit_path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Config> {
        let mut config = match explicit_path {
            Some(path) => {
                let mut config = self.load_from_file(path).await?;
                config.source = Some(path.to_path_buf());
                config
            }
            None => {
                let default_path = get_default_config_path();
                if default_path.exists() {
                    let mut config = self.load_from_file(&default_path).await?;
                    config.source = Some(default_path);
                    config
                } else {
                    log::debug!("默认配置文件不存在: {}", default_path.display());
                    Config::default()
                }
            }
        };

        config.apply_overrides(overrides);

        if config.webhook_url.trim().is_empty() {
            return Err(ConfigError::MissingValue {
                key: "webhook_url".to_string(),
            }
            .into());
        }
        if config.org_api_url.trim().is_empty() {
            return Err(ConfigError::MissingValue {
                key: "org_api_url".to_string(),
            }
            .into());
        }

        self.validate(&config)?;
        Ok(config)
    }
}

#[async_trait]
impl ConfigLoader for TomlConfigLoader {
    async fn load_from_file<P: AsRef<Path> + Send>(&self, path: P) -> Result<Config> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.to_string_lossy().to_string(),
            }
            .into());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::ParseError(format!("读取文件失败: {}", e)))?;

        let config = self.parse_toml(&content)?;

        log::debug!("成功解析配置文件: {}", path.display());
        Ok(config)
    }

    async fn load_from_string(&self, content: &str) -> Result<Config> {
        let config = self.parse_toml(content)?;
        log::debug!("成功解析配置字符串");
        Ok(config)
    }

    fn validate(&self, config: &Config) -> Result<()> {
        validate_config(config).map_err(|e| ConfigError::ValidationError(e).into())
    }
}

/// 获取默认配置文件路径
///
/// 当前目录存在 config.toml 时优先使用，否则为
/// `<config_dir>/org-vitals/config.toml`
pub fn get_default_config_path() -> PathBuf {
    if Path::new("config.toml").exists() {
        PathBuf::from("config.toml")
    } else {
        dirs::config_dir()
            .map(|config_dir| config_dir.join("org-vitals").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
