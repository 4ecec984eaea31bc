//! 服务中心统一错误类型

use super::code::ErrorCode;
use std::time::Duration;
use thiserror::Error;

/// 服务中心统一错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CenterError {
    /// 未绑定任何后端
    #[error("服务中心未配置")]
    Unbound,

    /// 注册中心不可用（网络或协议错误）
    #[error("注册中心不可用: {reason}")]
    Unavailable { reason: String },

    /// 注册中心调用超时
    #[error("注册中心调用超时: {operation} ({timeout:?})")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },

    /// 静态地址表中不存在该服务
    #[error("服务不存在: {name}")]
    NotFound { name: String },

    /// 服务没有可用实例
    #[error("服务没有可用实例: {name}")]
    NoInstances { name: String },

    /// 输入数据非法
    #[error("输入非法: {reason}")]
    InvalidInput { reason: String },

    /// 当前后端不支持该操作
    #[error("当前后端不支持该操作: {operation}")]
    Unsupported { operation: &'static str },

    /// 配置错误
    #[error("配置错误: {reason}")]
    Config { reason: String },
}

impl CenterError {
    /// 创建注册中心不可用错误
    pub fn unavailable(reason: impl Into<String>) -> Self {
        CenterError::Unavailable {
            reason: reason.into(),
        }
    }

    /// 创建服务不存在错误
    pub fn not_found(name: impl Into<String>) -> Self {
        CenterError::NotFound { name: name.into() }
    }

    /// 创建无可用实例错误
    pub fn no_instances(name: impl Into<String>) -> Self {
        CenterError::NoInstances { name: name.into() }
    }

    /// 创建输入非法错误
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        CenterError::InvalidInput {
            reason: reason.into(),
        }
    }

    /// 创建配置错误
    pub fn config(reason: impl Into<String>) -> Self {
        CenterError::Config {
            reason: reason.into(),
        }
    }

    /// 获取错误代码
    pub fn code(&self) -> ErrorCode {
        match self {
            CenterError::Unbound => ErrorCode::CenterUnbound,
            CenterError::Unavailable { .. } => ErrorCode::RegistryUnavailable,
            CenterError::Timeout { .. } => ErrorCode::RegistryTimeout,
            CenterError::NotFound { .. } => ErrorCode::ServiceNotFound,
            CenterError::NoInstances { .. } => ErrorCode::NoInstances,
            CenterError::InvalidInput { .. } => ErrorCode::InvalidInput,
            CenterError::Unsupported { .. } => ErrorCode::OperationUnsupported,
            CenterError::Config { .. } => ErrorCode::ConfigInvalid,
        }
    }

    /// 是否为注册中心不可用（含超时）
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            CenterError::Unavailable { .. } | CenterError::Timeout { .. }
        )
    }

    /// 是否为"服务确实为空"类错误
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CenterError::NotFound { .. } | CenterError::NoInstances { .. }
        )
    }
}

impl From<reqwest::Error> for CenterError {
    fn from(err: reqwest::Error) -> Self {
        CenterError::unavailable(err.to_string())
    }
}

impl From<std::io::Error> for CenterError {
    fn from(err: std::io::Error) -> Self {
        CenterError::config(err.to_string())
    }
}

impl From<toml::de::Error> for CenterError {
    fn from(err: toml::de::Error) -> Self {
        CenterError::config(err.to_string())
    }
}

/// 服务中心结果类型
pub type Result<T> = std::result::Result<T, CenterError>;
