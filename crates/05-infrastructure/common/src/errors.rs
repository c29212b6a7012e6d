//! 错误类型定义

use crate::identity::{ComponentId, InterfaceId, ModuleId};
use thiserror::Error;

/// 粗粒度错误码
///
/// 供语言/ABI 边界的门面层直接转换失败原因，无需解析错误消息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// 通用失败
    Fail,
    /// 组件不存在
    ComponentNotFound,
    /// 模块不存在
    ModuleNotFound,
    /// 接口未实现
    InterfaceNotImplemented,
    /// 可注入依赖无法解析
    InjectableNotFound,
    /// 模块错误（描述符格式、加载失败、入口缺失）
    ModuleError,
    /// 非法状态
    IllegalState,
    /// 拒绝访问
    AccessDenied,
    /// 超时
    Timeout,
    /// 空引用
    NullReference,
    /// 未实现
    NotImplemented,
}

impl ErrorCode {
    /// 稳定的整数错误码
    pub const fn as_i32(self) -> i32 {
        match self {
            Self::Fail => -1,
            Self::ComponentNotFound => -2,
            Self::ModuleNotFound => -3,
            Self::InterfaceNotImplemented => -4,
            Self::InjectableNotFound => -5,
            Self::ModuleError => -6,
            Self::IllegalState => -7,
            Self::AccessDenied => -8,
            Self::Timeout => -9,
            Self::NullReference => -10,
            Self::NotImplemented => -11,
        }
    }
}

/// 组件框架错误类型
#[derive(Error, Debug)]
pub enum ComponentError {
    #[error("组件不存在: {component_id}")]
    ComponentNotFound { component_id: ComponentId },

    #[error("模块不存在: {module_id}")]
    ModuleNotFound { module_id: ModuleId },

    #[error("组件 {component_id} 未实现接口 {interface_id}")]
    InterfaceNotImplemented {
        component_id: ComponentId,
        interface_id: InterfaceId,
    },

    #[error("接口元数据不存在: {interface_id}")]
    InterfaceNotFound { interface_id: InterfaceId },

    #[error("无法解析可注入依赖: 接口 {interface_id}{}{}",
        .name.as_deref().map(|n| format!(", 名称 \"{n}\"")).unwrap_or_default(),
        .component_id.map(|c| format!(", 所属组件 {c}")).unwrap_or_default())]
    InjectableNotFound {
        interface_id: InterfaceId,
        name: Option<String>,
        component_id: Option<ComponentId>,
    },

    #[error("模块错误: {message}")]
    Module {
        module_id: Option<ModuleId>,
        message: String,
    },

    #[error("描述符读取失败: {path}, 原因: {source}")]
    Descriptor {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("检测到循环依赖: {chain}")]
    CircularDependency { chain: String },

    #[error("非法状态: {message}")]
    IllegalState { message: String },

    #[error("拒绝访问: {message}")]
    AccessDenied { message: String },

    #[error("操作超时: {message}")]
    Timeout { message: String },

    #[error("空引用: {message}")]
    NullReference { message: String },

    #[error("功能未实现: {message}")]
    NotImplemented { message: String },
}

impl ComponentError {
    /// 创建模块错误
    pub fn module(message: impl Into<String>) -> Self {
        Self::Module {
            module_id: None,
            message: message.into(),
        }
    }

    /// 创建指定模块的模块错误
    pub fn module_with_id(module_id: ModuleId, message: impl Into<String>) -> Self {
        Self::Module {
            module_id: Some(module_id),
            message: message.into(),
        }
    }

    /// 创建描述符读取错误
    pub fn descriptor(
        path: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Descriptor {
            path: path.into(),
            source: source.into(),
        }
    }

    /// 创建非法状态错误
    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::IllegalState {
            message: message.into(),
        }
    }

    /// 对应的粗粒度错误码
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::ComponentNotFound { .. } => ErrorCode::ComponentNotFound,
            Self::ModuleNotFound { .. } => ErrorCode::ModuleNotFound,
            Self::InterfaceNotImplemented { .. } | Self::InterfaceNotFound { .. } => {
                ErrorCode::InterfaceNotImplemented
            }
            Self::InjectableNotFound { .. } => ErrorCode::InjectableNotFound,
            Self::Module { .. } | Self::Descriptor { .. } => ErrorCode::ModuleError,
            Self::CircularDependency { .. } | Self::IllegalState { .. } => ErrorCode::IllegalState,
            Self::AccessDenied { .. } => ErrorCode::AccessDenied,
            Self::Timeout { .. } => ErrorCode::Timeout,
            Self::NullReference { .. } => ErrorCode::NullReference,
            Self::NotImplemented { .. } => ErrorCode::NotImplemented,
        }
    }
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 结果类型别名
pub type ComponentResult<T> = Result<T, ComponentError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
