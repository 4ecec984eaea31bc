use crate::error::{CenterError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// 服务中心配置
///
/// `configs` 非空时使用静态地址表，`address` 等注册中心字段被忽略。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// 注册中心地址
    #[serde(default)]
    pub address: String,
    /// 本地缓存过期时间（秒），0 表示不缓存
    #[serde(default)]
    pub timeout: u64,
    /// 本地配置：服务名 -> host:port 列表
    #[serde(default)]
    pub configs: HashMap<String, Vec<String>>,
    /// 单次注册中心调用超时（秒）
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    /// 发现失败时是否返回已过期的缓存
    #[serde(default)]
    pub serve_stale: bool,
    /// 只发现健康检查通过的实例
    #[serde(default = "default_passing_only")]
    pub passing_only: bool,
}

fn default_request_timeout() -> u64 {
    5
}

fn default_passing_only() -> bool {
    true
}

/// 按整秒向上取整，不足一秒的非零时长不会变成 0
fn ceil_secs(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: String::new(),
            timeout: 0,
            configs: HashMap::new(),
            request_timeout: default_request_timeout(),
            serve_stale: false,
            passing_only: default_passing_only(),
        }
    }
}

impl Config {
    /// 注册中心配置
    pub fn remote(address: impl Into<String>, timeout: Duration) -> Self {
        Self {
            address: address.into(),
            timeout: ceil_secs(timeout),
            ..Default::default()
        }
    }

    /// 添加一个静态服务地址列表
    pub fn with_static<I, S>(mut self, name: impl Into<String>, addrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.configs
            .insert(name.into(), addrs.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_serve_stale(mut self, serve_stale: bool) -> Self {
        self.serve_stale = serve_stale;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = ceil_secs(timeout);
        self
    }

    /// 是否使用静态地址表
    pub fn is_static(&self) -> bool {
        !self.configs.is_empty()
    }

    /// 发现结果缓存时长
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// 单次注册中心调用超时
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// 校验注册中心相关配置
    pub fn validate_remote(&self) -> Result<()> {
        if self.request_timeout == 0 {
            return Err(CenterError::config("request_timeout must be at least 1 second"));
        }
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_static_config() {
        let config = Config::from_toml_str(
            r#"
            [configs]
            svc-a = ["10.0.0.1:8080", "10.0.0.2:8080"]
            "#,
        )
        .unwrap();

        assert!(config.is_static());
        assert_eq!(config.configs["svc-a"].len(), 2);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert!(config.passing_only);
    }

    #[test]
    fn test_parse_remote_config() {
        let config = Config::from_toml_str(
            r#"
            address = "http://registry:8500"
            timeout = 30
            serve_stale = true
            "#,
        )
        .unwrap();

        assert!(!config.is_static());
        assert_eq!(config.cache_ttl(), Duration::from_secs(30));
        assert!(config.serve_stale);
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml_str("timeout = \"soon\"").unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::ConfigInvalid);
    }

    #[test]
    fn test_sub_second_durations_round_up() {
        let config = Config::remote("r:8500", Duration::from_millis(1500))
            .with_request_timeout(Duration::from_millis(500));
        assert_eq!(config.cache_ttl(), Duration::from_secs(2));
        assert_eq!(config.request_timeout(), Duration::from_secs(1));
        assert!(config.validate_remote().is_ok());

        let config = Config::remote("r:8500", Duration::ZERO);
        assert_eq!(config.cache_ttl(), Duration::ZERO);
    }

    #[test]
    fn test_zero_request_timeout_rejected() {
        let config = Config::from_toml_str("request_timeout = 0").unwrap();
        let err = config.validate_remote().unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::ConfigInvalid);

        let config = Config::default().with_request_timeout(Duration::ZERO);
        assert!(config.validate_remote().is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(Config::load_from_file("/nonexistent/center.toml").is_err());
    }
}
