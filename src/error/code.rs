//! 错误代码和错误类别定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 错误代码枚举
///
/// 错误代码按类别分组，每个类别占用1000个代码范围：
/// - 1000-1999: 配置与绑定相关错误
/// - 2000-2999: 注册中心相关错误
/// - 3000-3999: 服务发现相关错误
/// - 4000-4999: 输入校验相关错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum ErrorCode {
    // ============================================================
    // 配置与绑定相关错误 (1000-1999)
    // ============================================================
    CenterUnbound = 1000,
    ConfigInvalid = 1001,

    // ============================================================
    // 注册中心相关错误 (2000-2999)
    // ============================================================
    RegistryUnavailable = 2000,
    RegistryTimeout = 2001,
    OperationUnsupported = 2002,

    // ============================================================
    // 服务发现相关错误 (3000-3999)
    // ============================================================
    ServiceNotFound = 3000,
    NoInstances = 3001,

    // ============================================================
    // 输入校验相关错误 (4000-4999)
    // ============================================================
    InvalidInput = 4000,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Config,
    Registry,
    Discovery,
    Input,
}

impl ErrorCode {
    /// 数值代码
    pub fn as_u32(self) -> u32 {
        self as u32
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::CenterUnbound => "CENTER_UNBOUND",
            ErrorCode::ConfigInvalid => "CONFIG_INVALID",
            ErrorCode::RegistryUnavailable => "REGISTRY_UNAVAILABLE",
            ErrorCode::RegistryTimeout => "REGISTRY_TIMEOUT",
            ErrorCode::OperationUnsupported => "OPERATION_UNSUPPORTED",
            ErrorCode::ServiceNotFound => "SERVICE_NOT_FOUND",
            ErrorCode::NoInstances => "NO_INSTANCES",
            ErrorCode::InvalidInput => "INVALID_INPUT",
        }
    }

    /// 获取错误类别
    pub fn category(&self) -> ErrorCategory {
        match self.as_u32() / 1000 {
            1 => ErrorCategory::Config,
            2 => ErrorCategory::Registry,
            3 => ErrorCategory::Discovery,
            _ => ErrorCategory::Input,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
