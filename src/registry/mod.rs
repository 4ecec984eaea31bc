//! 服务注册模块
//!
//! 注册中心抽象（Consul、内存）以及与后端无关的实例选择策略

pub mod consul;
pub mod load_balancer;
pub mod memory;
pub mod murmur;
pub mod trait_def;

pub use consul::ConsulRegistry;
pub use load_balancer::{LoadBalancer, RoundRobin, hash_pick};
pub use memory::MemoryRegistry;
pub use murmur::murmur3_32;
pub use trait_def::RegistryProvider;
