//! 静态后端：本地配置的地址表
//!
//! 地址表在创建时解析一次，之后不再变化，因此不支持注册和注销。

use crate::error::{CenterError, Result};
use crate::registry::LoadBalancer;
use crate::types::Service;
use std::collections::HashMap;
use tracing::{info, warn};

/// 静态后端
#[derive(Debug)]
pub struct StaticBackend {
    table: HashMap<String, Vec<Service>>,
    balancer: LoadBalancer,
}

impl StaticBackend {
    /// 从 服务名 -> host:port 列表 创建静态后端
    pub fn new(configs: &HashMap<String, Vec<String>>) -> Result<Self> {
        let mut table = HashMap::with_capacity(configs.len());
        for (name, addrs) in configs {
            let services = addrs
                .iter()
                .map(|addr| parse_address(name, addr))
                .collect::<Result<Vec<_>>>()?;
            table.insert(name.clone(), services);
        }

        info!(services = table.len(), "Static service table loaded");
        Ok(Self {
            table,
            balancer: LoadBalancer::new(),
        })
    }

    pub async fn register(&self) -> Result<String> {
        Err(CenterError::Unsupported {
            operation: "register",
        })
    }

    pub async fn deregister(&self) -> Result<()> {
        Err(CenterError::Unsupported {
            operation: "deregister",
        })
    }

    /// 返回配置的实例列表（保持配置顺序）
    pub async fn discovery(&self, name: &str) -> Result<Vec<Service>> {
        self.table
            .get(name)
            .cloned()
            .ok_or_else(|| CenterError::not_found(name))
    }

    /// 轮询选择实例
    pub async fn robin(&self, name: &str) -> Result<Service> {
        let services = self.discovery(name).await?;
        self.balancer.robin(name, &services).await
    }

    /// 哈希选择实例
    pub async fn hash(&self, name: &str, key: &str) -> Result<Service> {
        let services = self.discovery(name).await?;
        self.balancer.hash(name, key, &services)
    }

    /// 已配置的服务名
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }
}

/// 解析 host:port，IPv6 地址需写成 `[::1]:8080`
fn parse_address(name: &str, addr: &str) -> Result<Service> {
    let invalid = || {
        warn!(service = name, addr, "拒绝非法静态地址");
        CenterError::invalid_input(format!("invalid address {addr:?} for service {name}"))
    };

    let (host, port) = addr.trim().rsplit_once(':').ok_or_else(invalid)?;
    if host.is_empty() || (host.contains(':') && !host.starts_with('[')) {
        return Err(invalid());
    }
    let port: u16 = port.parse().map_err(|_| invalid())?;
    if port == 0 {
        return Err(invalid());
    }

    Ok(Service::new(name, host, port))
}
