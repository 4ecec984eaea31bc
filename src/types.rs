use serde::{Deserialize, Serialize};

/// 服务实例
///
/// 同名（`name`）实例可互相替代，`id` 在同一后端内唯一；注册时 `id` 为空则自动生成。
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Service {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub host: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub port: u16,
}

fn is_zero(port: &u16) -> bool {
    *port == 0
}

impl Service {
    /// 创建新的服务实例
    pub fn new(name: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// 设置实例 ID
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// 设置实例类型
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// 地址（格式：host:port）
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 转换为 HTTP URL
    pub fn url(&self) -> String {
        format!("http://{}", self.address())
    }
}

/// 健康检查描述
///
/// 只透传给注册中心，选择层不解释其内容。`timeout`/`interval` 使用注册中心的
/// 时长格式（如 "5s"）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Check {
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub check_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub target: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub timeout: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub interval: String,
}

impl Check {
    pub fn new(
        check_type: impl Into<String>,
        target: impl Into<String>,
        timeout: impl Into<String>,
        interval: impl Into<String>,
    ) -> Self {
        Self {
            check_type: check_type.into(),
            target: target.into(),
            timeout: timeout.into(),
            interval: interval.into(),
        }
    }

    /// HTTP 健康检查
    pub fn http(url: impl Into<String>, timeout: impl Into<String>, interval: impl Into<String>) -> Self {
        Self::new("http", url, timeout, interval)
    }

    /// TCP 健康检查
    pub fn tcp(addr: impl Into<String>, timeout: impl Into<String>, interval: impl Into<String>) -> Self {
        Self::new("tcp", addr, timeout, interval)
    }

    /// TTL 检查（`target` 即 TTL 时长）
    pub fn ttl(ttl: impl Into<String>) -> Self {
        Self::new("ttl", ttl, "", "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_address() {
        let service = Service::new("api", "10.0.0.1", 8080).with_id("api-1");
        assert_eq!(service.address(), "10.0.0.1:8080");
        assert_eq!(service.url(), "http://10.0.0.1:8080");
        assert_eq!(service.id, "api-1");
    }

    #[test]
    fn test_empty_fields_are_omitted() {
        let json = serde_json::to_value(Service::new("api", "h1", 1)).unwrap();
        assert_eq!(json, serde_json::json!({"name": "api", "host": "h1", "port": 1}));

        let json = serde_json::to_value(Check::ttl("15s")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "ttl", "target": "15s"}));
    }

    #[test]
    fn test_missing_fields_default() {
        let service: Service = serde_json::from_str(r#"{"host":"h2"}"#).unwrap();
        assert_eq!(service.host, "h2");
        assert_eq!(service.port, 0);
        assert!(service.id.is_empty());
    }
}
