//! 负载均衡模块
//!
//! 提供两种与后端无关的选择策略，从一组已发现的实例中选出一个：
//! - 轮询：每个服务名维护一个递增游标，读取时按当前实例数取模
//! - 哈希：`murmur3_32(key) % len`，实例列表不变时同一 key 总是落到同一实例
//!
//! 哈希策略是简单的取模映射而不是哈希环，实例数变化时大部分 key 会重新映射。

use super::murmur::murmur3_32;
use crate::error::{CenterError, Result};
use crate::types::Service;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

/// 轮询游标表（服务名 -> 游标）
///
/// 游标只增不减，取模在每次读取时按当前实例数计算，实例数缩减后也不会越界。
/// 游标只在显式 [`RoundRobin::reset`] 时移除。
#[derive(Debug, Default)]
pub struct RoundRobin {
    cursors: RwLock<HashMap<String, Arc<AtomicUsize>>>,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }

    async fn cursor(&self, name: &str) -> Arc<AtomicUsize> {
        if let Some(cursor) = self.cursors.read().await.get(name) {
            return cursor.clone();
        }

        self.cursors
            .write()
            .await
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(AtomicUsize::new(0)))
            .clone()
    }

    /// 轮询选择
    pub async fn pick(&self, name: &str, instances: &[Service]) -> Result<Service> {
        if instances.is_empty() {
            return Err(CenterError::no_instances(name));
        }

        let cursor = self.cursor(name).await;
        let index = cursor.fetch_add(1, Ordering::Relaxed) % instances.len();
        debug!(service = name, index, total = instances.len(), "轮询选择实例");

        Ok(instances[index].clone())
    }

    /// 移除服务的游标，下次选择从第一个实例开始
    pub async fn reset(&self, name: &str) -> bool {
        self.cursors.write().await.remove(name).is_some()
    }

    /// 已建立游标的服务数量
    pub async fn len(&self) -> usize {
        self.cursors.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cursors.read().await.is_empty()
    }
}

/// 哈希选择
pub fn hash_pick(name: &str, key: &str, instances: &[Service]) -> Result<Service> {
    if instances.is_empty() {
        return Err(CenterError::no_instances(name));
    }

    let index = murmur3_32(key.as_bytes()) as usize % instances.len();
    debug!(service = name, key, index, total = instances.len(), "哈希选择实例");

    Ok(instances[index].clone())
}

/// 负载均衡器
///
/// 两种后端共用同一份选择逻辑。
#[derive(Debug, Default)]
pub struct LoadBalancer {
    round_robin: RoundRobin,
}

impl LoadBalancer {
    /// 创建新的负载均衡器
    pub fn new() -> Self {
        Self::default()
    }

    /// 轮询选择
    pub async fn robin(&self, name: &str, instances: &[Service]) -> Result<Service> {
        self.round_robin.pick(name, instances).await
    }

    /// 哈希选择
    pub fn hash(&self, name: &str, key: &str, instances: &[Service]) -> Result<Service> {
        hash_pick(name, key, instances)
    }

    /// 重置服务的轮询游标
    pub async fn reset(&self, name: &str) -> bool {
        self.round_robin.reset(name).await
    }
}
