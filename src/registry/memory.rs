//! 内存注册中心（用于测试和嵌入式场景）

use super::trait_def::RegistryProvider;
use crate::error::{CenterError, Result};
use crate::types::{Check, Service};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// 内存注册中心
///
/// 克隆后共享同一份数据，可切换为故障状态以模拟注册中心不可用。
#[derive(Clone, Default)]
pub struct MemoryRegistry {
    services: Arc<RwLock<HashMap<String, (Service, Option<Check>)>>>,
    list_calls: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

impl MemoryRegistry {
    /// 创建新的内存注册中心
    pub fn new() -> Self {
        Self::default()
    }

    /// 切换故障状态，故障时所有调用返回 `Unavailable`
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// `list` 被调用的次数
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// 已注册实例数量
    pub async fn count(&self) -> usize {
        self.services.read().await.len()
    }

    /// 获取实例注册时附带的健康检查
    pub async fn check_of(&self, service_id: &str) -> Option<Check> {
        self.services
            .read()
            .await
            .get(service_id)
            .and_then(|(_, check)| check.clone())
    }

    fn ensure_available(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(CenterError::unavailable("memory registry is failing"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RegistryProvider for MemoryRegistry {
    async fn register(&self, service: &Service, check: Option<&Check>) -> Result<()> {
        self.ensure_available()?;
        self.services
            .write()
            .await
            .insert(service.id.clone(), (service.clone(), check.cloned()));
        Ok(())
    }

    async fn deregister(&self, service_id: &str) -> Result<()> {
        self.ensure_available()?;
        self.services.write().await.remove(service_id);
        Ok(())
    }

    async fn list(&self, name: &str) -> Result<Vec<Service>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.ensure_available()?;

        let services = self.services.read().await;
        let mut instances: Vec<Service> = services
            .values()
            .filter(|(s, _)| s.name == name)
            .map(|(s, _)| s.clone())
            .collect();
        instances.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(instances)
    }
}
