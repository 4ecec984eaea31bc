//! 服务发现后端
//!
//! 两种后端提供同一组能力（注册、注销、发现、轮询、哈希），创建时按配置选定：
//! - [`DynamicBackend`]：远程注册中心，带本地缓存
//! - [`StaticBackend`]：本地配置的固定地址表

pub mod dynamic;
pub mod local;

pub use dynamic::DynamicBackend;
pub use local::StaticBackend;

use crate::config::Config;
use crate::error::Result;
use crate::registry::RegistryProvider;
use crate::types::{Check, Service};
use std::sync::Arc;

/// 后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Dynamic,
    Static,
}

/// 服务发现后端
pub enum Backend {
    Dynamic(DynamicBackend),
    Static(StaticBackend),
}

impl Backend {
    /// 从配置创建后端：`configs` 非空时为静态后端，否则为 Consul 动态后端
    pub fn from_config(config: &Config) -> Result<Self> {
        if config.is_static() {
            Ok(Backend::Static(StaticBackend::new(&config.configs)?))
        } else {
            Ok(Backend::Dynamic(DynamicBackend::from_config(config)?))
        }
    }

    /// 从配置创建后端，动态后端使用指定的注册中心
    pub fn with_provider(config: &Config, provider: Arc<dyn RegistryProvider>) -> Result<Self> {
        if config.is_static() {
            Ok(Backend::Static(StaticBackend::new(&config.configs)?))
        } else {
            config.validate_remote()?;
            Ok(Backend::Dynamic(DynamicBackend::new(provider, config)))
        }
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Backend::Dynamic(_) => BackendKind::Dynamic,
            Backend::Static(_) => BackendKind::Static,
        }
    }

    pub async fn register(&self, service: &Service, check: Option<&Check>) -> Result<String> {
        match self {
            Backend::Dynamic(backend) => backend.register(service, check).await,
            Backend::Static(backend) => backend.register().await,
        }
    }

    pub async fn deregister(&self, service_id: &str) -> Result<()> {
        match self {
            Backend::Dynamic(backend) => backend.deregister(service_id).await,
            Backend::Static(backend) => backend.deregister().await,
        }
    }

    pub async fn discovery(&self, name: &str) -> Result<Vec<Service>> {
        match self {
            Backend::Dynamic(backend) => backend.discovery(name).await,
            Backend::Static(backend) => backend.discovery(name).await,
        }
    }

    pub async fn robin(&self, name: &str) -> Result<Service> {
        match self {
            Backend::Dynamic(backend) => backend.robin(name).await,
            Backend::Static(backend) => backend.robin(name).await,
        }
    }

    pub async fn hash(&self, name: &str, key: &str) -> Result<Service> {
        match self {
            Backend::Dynamic(backend) => backend.hash(name, key).await,
            Backend::Static(backend) => backend.hash(name, key).await,
        }
    }
}

impl From<DynamicBackend> for Backend {
    fn from(backend: DynamicBackend) -> Self {
        Backend::Dynamic(backend)
    }
}

impl From<StaticBackend> for Backend {
    fn from(backend: StaticBackend) -> Self {
        Backend::Static(backend)
    }
}
