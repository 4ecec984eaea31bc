//! Flare Center
//!
//! 客户端服务注册发现门面：注册、注销、发现服务实例，并通过轮询或哈希从实例集合中
//! 选出一个。后端可以是远程注册中心（Consul，带本地缓存），也可以是本地配置的静态
//! 地址表。
//!
//! ```rust,ignore
//! use flare_center::{Center, Config};
//!
//! let config = Config::default().with_static("svc-a", ["10.0.0.1:8080", "10.0.0.2:8080"]);
//! let center = Center::from_config(&config).await?;
//!
//! let next = center.robin("svc-a").await?;
//! let sticky = center.hash("svc-a", "user-42").await?;
//! ```

pub mod center;
pub mod config;
pub mod discovery;
pub mod error;
pub mod registry;
pub mod types;

// Re-exports
pub use center::Center;
pub use config::Config;
pub use discovery::{Backend, BackendKind, DynamicBackend, StaticBackend};
pub use error::{CenterError, ErrorCategory, ErrorCode, Result};
pub use registry::{
    ConsulRegistry, LoadBalancer, MemoryRegistry, RegistryProvider, RoundRobin, hash_pick,
    murmur3_32,
};
pub use types::{Check, Service};
