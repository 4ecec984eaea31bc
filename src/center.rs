//! 服务中心门面
//!
//! `Center` 持有当前生效的后端，所有操作先检查绑定再委托给后端；未绑定时立即返回
//! [`CenterError::Unbound`]，不会访问注册中心或地址表。重新 `setup` 会整体替换后端
//! （包括缓存和轮询游标），进行中的调用继续使用替换前的后端。

use crate::config::Config;
use crate::discovery::{Backend, BackendKind};
use crate::error::{CenterError, Result};
use crate::registry::RegistryProvider;
use crate::types::{Check, Service};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// 服务中心
#[derive(Default)]
pub struct Center {
    backend: RwLock<Option<Arc<Backend>>>,
}

impl Center {
    /// 创建未绑定后端的服务中心
    pub fn new() -> Self {
        Self::default()
    }

    /// 从配置创建并绑定后端
    pub async fn from_config(config: &Config) -> Result<Self> {
        let center = Self::new();
        center.setup(config).await?;
        Ok(center)
    }

    /// 按配置创建后端并绑定，替换已有后端
    ///
    /// 创建失败时保留原有绑定。
    pub async fn setup(&self, config: &Config) -> Result<BackendKind> {
        let backend = Backend::from_config(config)?;
        Ok(self.bind(backend).await)
    }

    /// 同 [`Center::setup`]，动态后端使用指定的注册中心
    pub async fn setup_with_provider(
        &self,
        config: &Config,
        provider: Arc<dyn RegistryProvider>,
    ) -> Result<BackendKind> {
        let backend = Backend::with_provider(config, provider)?;
        Ok(self.bind(backend).await)
    }

    /// 绑定已创建的后端
    pub async fn bind(&self, backend: impl Into<Backend>) -> BackendKind {
        let backend = backend.into();
        let kind = backend.kind();
        *self.backend.write().await = Some(Arc::new(backend));
        info!(?kind, "Service center backend bound");
        kind
    }

    pub async fn is_bound(&self) -> bool {
        self.backend.read().await.is_some()
    }

    /// 当前后端类型
    pub async fn backend_kind(&self) -> Option<BackendKind> {
        self.backend.read().await.as_ref().map(|b| b.kind())
    }

    async fn active(&self) -> Result<Arc<Backend>> {
        self.backend
            .read()
            .await
            .clone()
            .ok_or(CenterError::Unbound)
    }

    /// 注册服务，返回实例 ID
    pub async fn register(&self, service: &Service, check: Option<&Check>) -> Result<String> {
        self.active().await?.register(service, check).await
    }

    /// 注销服务
    pub async fn deregister(&self, service_id: &str) -> Result<()> {
        self.active().await?.deregister(service_id).await
    }

    /// 发现服务实例
    pub async fn discovery(&self, name: &str) -> Result<Vec<Service>> {
        self.active().await?.discovery(name).await
    }

    /// 轮询选择实例
    pub async fn robin(&self, name: &str) -> Result<Service> {
        self.active().await?.robin(name).await
    }

    /// 按 key 哈希选择实例
    pub async fn hash(&self, name: &str, key: &str) -> Result<Service> {
        self.active().await?.hash(name, key).await
    }
}
