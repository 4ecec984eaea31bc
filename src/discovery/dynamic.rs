//! 动态后端：远程注册中心 + 本地缓存
//!
//! 发现结果按服务名缓存，缓存未过期时直接返回；过期或不存在时访问注册中心并覆盖缓存
//! （并发刷新时后写入者生效）。注册中心调用失败时默认直接返回错误，开启
//! `serve_stale` 后改为返回已过期的缓存。

use crate::config::Config;
use crate::error::{CenterError, Result};
use crate::registry::{ConsulRegistry, LoadBalancer, RegistryProvider};
use crate::types::{Check, Service};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, warn};

struct CacheEntry {
    services: Vec<Service>,
    fetched_at: Instant,
}

/// 动态后端
pub struct DynamicBackend {
    provider: Arc<dyn RegistryProvider>,
    balancer: LoadBalancer,
    cache: RwLock<HashMap<String, CacheEntry>>,
    cache_ttl: Duration,
    request_timeout: Duration,
    serve_stale: bool,
}

impl DynamicBackend {
    /// 使用指定注册中心创建动态后端
    pub fn new(provider: Arc<dyn RegistryProvider>, config: &Config) -> Self {
        Self {
            provider,
            balancer: LoadBalancer::new(),
            cache: RwLock::new(HashMap::new()),
            cache_ttl: config.cache_ttl(),
            request_timeout: config.request_timeout(),
            serve_stale: config.serve_stale,
        }
    }

    /// 从配置创建基于 Consul 的动态后端
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate_remote()?;
        let registry = ConsulRegistry::new(
            &config.address,
            config.request_timeout(),
            config.passing_only,
        )?;
        info!("Using Consul registry at {}", registry.base_url());
        Ok(Self::new(Arc::new(registry), config))
    }

    async fn call<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        tokio::time::timeout(self.request_timeout, fut)
            .await
            .map_err(|_| CenterError::Timeout {
                operation,
                timeout: self.request_timeout,
            })?
    }

    /// 注册服务，返回实例 ID（为空时自动生成）
    pub async fn register(&self, service: &Service, check: Option<&Check>) -> Result<String> {
        validate(service)?;

        let mut service = service.clone();
        if service.id.is_empty() {
            service.id = format!("{}-{}", service.name, uuid::Uuid::new_v4());
        }

        self.call("register", self.provider.register(&service, check))
            .await?;
        self.invalidate(&service.name).await;

        info!(
            "Service registered: {} ({}) at {}",
            service.name,
            service.id,
            service.address()
        );
        Ok(service.id)
    }

    /// 注销服务
    pub async fn deregister(&self, service_id: &str) -> Result<()> {
        if service_id.is_empty() {
            return Err(CenterError::invalid_input("service id is empty"));
        }

        self.call("deregister", self.provider.deregister(service_id))
            .await?;

        let mut cache = self.cache.write().await;
        for entry in cache.values_mut() {
            entry.services.retain(|s| s.id != service_id);
        }

        info!("Service deregistered: {}", service_id);
        Ok(())
    }

    /// 发现服务实例（带缓存）
    pub async fn discovery(&self, name: &str) -> Result<Vec<Service>> {
        if !self.cache_ttl.is_zero() {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(name) {
                if entry.fetched_at.elapsed() < self.cache_ttl {
                    debug!(service = name, "发现缓存命中");
                    return Ok(entry.services.clone());
                }
            }
        }

        match self.call("discovery", self.provider.list(name)).await {
            Ok(services) => {
                debug!(service = name, count = services.len(), "从注册中心获取实例");
                if self.caching() {
                    self.cache.write().await.insert(
                        name.to_string(),
                        CacheEntry {
                            services: services.clone(),
                            fetched_at: Instant::now(),
                        },
                    );
                }
                Ok(services)
            }
            Err(err) => {
                if self.serve_stale {
                    if let Some(entry) = self.cache.read().await.get(name) {
                        warn!(service = name, error = %err, "注册中心不可用，返回过期缓存");
                        return Ok(entry.services.clone());
                    }
                }
                Err(err)
            }
        }
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

    /// 清除指定服务的缓存
    pub async fn invalidate(&self, name: &str) -> bool {
        self.cache.write().await.remove(name).is_some()
    }

    /// 清除全部缓存
    pub async fn clear_cache(&self) {
        self.cache.write().await.clear();
    }

    /// 重置指定服务的轮询游标
    pub async fn reset_cursor(&self, name: &str) -> bool {
        self.balancer.reset(name).await
    }

    // 关闭 TTL 但允许过期兜底时，缓存只作兜底用
    fn caching(&self) -> bool {
        !self.cache_ttl.is_zero() || self.serve_stale
    }
}

fn validate(service: &Service) -> Result<()> {
    if service.name.is_empty() {
        return Err(CenterError::invalid_input("service name is empty"));
    }
    if service.host.is_empty() {
        return Err(CenterError::invalid_input("service host is empty"));
    }
    if service.port == 0 {
        return Err(CenterError::invalid_input("service port is 0"));
    }
    Ok(())
}
