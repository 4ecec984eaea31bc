//! 注册中心 Trait 定义

use crate::error::Result;
use crate::types::{Check, Service};
use async_trait::async_trait;

/// 远程注册中心
///
/// 动态后端通过它完成注册、注销和按服务名列出实例，线协议由实现决定。
#[async_trait]
pub trait RegistryProvider: Send + Sync {
    /// 注册服务（`service.id` 已确定）
    async fn register(&self, service: &Service, check: Option<&Check>) -> Result<()>;

    /// 注销服务
    async fn deregister(&self, service_id: &str) -> Result<()>;

    /// 列出指定服务名的所有实例
    async fn list(&self, name: &str) -> Result<Vec<Service>>;
}
