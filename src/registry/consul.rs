//! Consul 注册中心实现

use super::trait_def::RegistryProvider;
use crate::error::{CenterError, Result};
use crate::types::{Check, Service};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Consul 注册中心
pub struct ConsulRegistry {
    client: reqwest::Client,
    base_url: reqwest::Url,
    passing_only: bool,
}

#[allow(non_snake_case)]
#[derive(Debug, Serialize)]
struct ConsulService<'a> {
    ID: &'a str,
    Name: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    Kind: &'a str,
    Address: &'a str,
    Port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    Check: Option<ConsulCheck>,
}

#[allow(non_snake_case)]
#[derive(Debug, Default, Serialize)]
struct ConsulCheck {
    #[serde(skip_serializing_if = "Option::is_none")]
    HTTP: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    TCP: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    GRPC: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    TTL: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    Interval: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    Timeout: Option<String>,
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

impl TryFrom<&Check> for ConsulCheck {
    type Error = CenterError;

    fn try_from(check: &Check) -> Result<Self> {
        let target = Some(check.target.clone());
        let mut consul_check = ConsulCheck {
            Interval: non_empty(&check.interval),
            Timeout: non_empty(&check.timeout),
            ..Default::default()
        };

        match check.check_type.to_lowercase().as_str() {
            "http" | "https" => consul_check.HTTP = target,
            "tcp" => consul_check.TCP = target,
            "grpc" => consul_check.GRPC = target,
            "ttl" => consul_check.TTL = target,
            other => {
                return Err(CenterError::invalid_input(format!(
                    "unknown check type: {other:?}"
                )));
            }
        }

        Ok(consul_check)
    }
}

#[allow(non_snake_case)]
#[derive(Deserialize)]
struct ConsulHealthResponse {
    #[serde(default)]
    Node: Option<ConsulNodeResponse>,
    Service: ConsulServiceResponse,
}

#[allow(non_snake_case)]
#[derive(Deserialize)]
struct ConsulNodeResponse {
    #[serde(default)]
    Address: String,
}

#[allow(non_snake_case)]
#[derive(Deserialize)]
struct ConsulServiceResponse {
    ID: String,
    #[serde(default)]
    Kind: String,
    Service: String,
    #[serde(default)]
    Address: String,
    Port: u16,
}

impl From<ConsulHealthResponse> for Service {
    fn from(item: ConsulHealthResponse) -> Self {
        let service = item.Service;
        // 服务未单独声明地址时 Consul 使用节点地址
        let host = if service.Address.is_empty() {
            item.Node.map(|node| node.Address).unwrap_or_default()
        } else {
            service.Address
        };

        Service {
            id: service.ID,
            kind: service.Kind,
            name: service.Service,
            host,
            port: service.Port,
        }
    }
}

impl ConsulRegistry {
    /// 创建 Consul 注册中心客户端
    ///
    /// `address` 可以是完整 URL，也可以是 `host:port`（默认 http）。
    pub fn new(address: &str, request_timeout: Duration, passing_only: bool) -> Result<Self> {
        if address.trim().is_empty() {
            return Err(CenterError::config("no Consul address provided"));
        }

        let base_url = normalize_address(address);
        let base_url = reqwest::Url::parse(&base_url)
            .map_err(|e| CenterError::config(format!("invalid Consul address {base_url:?}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(CenterError::config(format!(
                "invalid Consul address {base_url}"
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url,
            passing_only,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// 拼接接口地址，每一段按路径段转义（`/`、`?`、`#` 不会改变路径结构）
    fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url> {
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || **s == "." || **s == "..")
        {
            return Err(CenterError::invalid_input(format!(
                "invalid path segment {bad:?}"
            )));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CenterError::config(format!("invalid Consul address {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn check_status(response: reqwest::Response, operation: &str) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(CenterError::unavailable(format!(
                "Consul {operation} returned {status}"
            )))
        }
    }
}

fn normalize_address(address: &str) -> String {
    let address = address.trim().trim_end_matches('/');
    if address.starts_with("http://") || address.starts_with("https://") {
        address.to_string()
    } else {
        format!("http://{address}")
    }
}

#[async_trait]
impl RegistryProvider for ConsulRegistry {
    async fn register(&self, service: &Service, check: Option<&Check>) -> Result<()> {
        let consul_service = ConsulService {
            ID: &service.id,
            Name: &service.name,
            Kind: &service.kind,
            Address: &service.host,
            Port: service.port,
            Check: check.map(ConsulCheck::try_from).transpose()?,
        };

        let url = self.endpoint(&["v1", "agent", "service", "register"])?;
        let response = self.client.put(url).json(&consul_service).send().await?;
        Self::check_status(response, "register")?;

        info!(
            "Service registered with Consul: {} ({}) at {}:{}",
            service.name, service.id, service.host, service.port
        );
        Ok(())
    }

    async fn deregister(&self, service_id: &str) -> Result<()> {
        let url = self.endpoint(&["v1", "agent", "service", "deregister", service_id])?;
        let response = self.client.put(url).send().await?;
        Self::check_status(response, "deregister")?;

        info!("Service deregistered from Consul: {}", service_id);
        Ok(())
    }

    async fn list(&self, name: &str) -> Result<Vec<Service>> {
        let url = self.endpoint(&["v1", "health", "service", name])?;
        let mut query_params = vec![];
        if self.passing_only {
            query_params.push(("passing", "true"));
        }

        let response = self.client.get(url).query(&query_params).send().await?;
        let entries: Vec<ConsulHealthResponse> =
            Self::check_status(response, "health query")?.json().await?;

        let services: Vec<Service> = entries.into_iter().map(Service::from).collect();
        debug!(service = name, count = services.len(), "Consul 返回实例");
        Ok(services)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_address() {
        assert_eq!(normalize_address("registry:8500"), "http://registry:8500");
        assert_eq!(normalize_address("https://consul.local/"), "https://consul.local");
    }

    #[test]
    fn test_empty_address_rejected() {
        let err = ConsulRegistry::new("  ", Duration::from_secs(1), true).err().unwrap();
        assert_eq!(err.code(), crate::error::ErrorCode::ConfigInvalid);
    }

    #[test]
    fn test_endpoint_escapes_segments() {
        let registry = ConsulRegistry::new("registry:8500", Duration::from_secs(1), true).unwrap();
        assert_eq!(registry.base_url(), "http://registry:8500/");

        let url = registry.endpoint(&["v1", "health", "service", "api"]).unwrap();
        assert_eq!(url.as_str(), "http://registry:8500/v1/health/service/api");

        let url = registry
            .endpoint(&["v1", "agent", "service", "deregister", "a/b?c#d"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://registry:8500/v1/agent/service/deregister/a%2Fb%3Fc%23d"
        );
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);

        for bad in ["", ".", ".."] {
            let err = registry.endpoint(&["v1", "health", "service", bad]).unwrap_err();
            assert_eq!(err.code(), crate::error::ErrorCode::InvalidInput);
        }
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let registry =
            ConsulRegistry::new("https://gw.local/consul/", Duration::from_secs(1), false).unwrap();
        let url = registry.endpoint(&["v1", "agent", "service", "register"]).unwrap();
        assert_eq!(url.as_str(), "https://gw.local/consul/v1/agent/service/register");
    }

    #[test]
    fn test_invalid_address_rejected() {
        let err = ConsulRegistry::new("http://[::1", Duration::from_secs(1), true)
            .err()
            .unwrap();
        assert_eq!(err.code(), crate::error::ErrorCode::ConfigInvalid);
    }

    #[test]
    fn test_check_status() {
        let ok = http::Response::builder().status(200).body("[]").unwrap();
        assert!(ConsulRegistry::check_status(reqwest::Response::from(ok), "register").is_ok());

        let unavailable = http::Response::builder().status(503).body("").unwrap();
        let err = ConsulRegistry::check_status(reqwest::Response::from(unavailable), "health query")
            .unwrap_err();
        assert!(err.is_unavailable());
        assert_eq!(err.code(), crate::error::ErrorCode::RegistryUnavailable);
        assert!(err.to_string().contains("503"), "{err}");

        let not_found = http::Response::builder().status(404).body("").unwrap();
        assert!(
            ConsulRegistry::check_status(reqwest::Response::from(not_found), "deregister")
                .unwrap_err()
                .is_unavailable()
        );
    }

    #[test]
    fn test_check_mapping() {
        let check = Check::http("http://10.0.0.1:8080/health", "5s", "10s");
        let json = serde_json::to_value(ConsulCheck::try_from(&check).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "HTTP": "http://10.0.0.1:8080/health",
                "Interval": "10s",
                "Timeout": "5s"
            })
        );

        let json = serde_json::to_value(ConsulCheck::try_from(&Check::ttl("15s")).unwrap()).unwrap();
        assert_eq!(json, serde_json::json!({"TTL": "15s"}));

        let bad = Check::new("carrier-pigeon", "x", "", "");
        assert!(ConsulCheck::try_from(&bad).is_err());
    }

    #[test]
    fn test_register_payload() {
        let service = Service::new("api", "10.0.0.1", 8080).with_id("api-1");
        let payload = ConsulService {
            ID: &service.id,
            Name: &service.name,
            Kind: &service.kind,
            Address: &service.host,
            Port: service.port,
            Check: None,
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!({"ID": "api-1", "Name": "api", "Address": "10.0.0.1", "Port": 8080})
        );
    }

    #[test]
    fn test_health_response_mapping() {
        let body = r#"[
            {"Node": {"Address": "192.168.1.5"},
             "Service": {"ID": "api-1", "Service": "api", "Address": "", "Port": 8080}},
            {"Node": {"Address": "192.168.1.6"},
             "Service": {"ID": "api-2", "Kind": "connect-proxy", "Service": "api", "Address": "10.0.0.2", "Port": 9090}}
        ]"#;
        let entries: Vec<ConsulHealthResponse> = serde_json::from_str(body).unwrap();
        let services: Vec<Service> = entries.into_iter().map(Service::from).collect();

        assert_eq!(services[0].host, "192.168.1.5");
        assert_eq!(services[0].id, "api-1");
        assert_eq!(services[1].host, "10.0.0.2");
        assert_eq!(services[1].kind, "connect-proxy");
        assert_eq!(services[1].port, 9090);
    }
}
