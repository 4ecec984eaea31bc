//! 服务中心错误处理模块
//!
//! 区分四类错误：未配置、注册中心不可用、服务不存在、输入非法。
//! 选择层从不吞掉发现错误，调用方可以据此区分"服务为空"和"发现失败"。

pub mod center_error;
pub mod code;

pub use center_error::{CenterError, Result};
pub use code::{ErrorCategory, ErrorCode};
