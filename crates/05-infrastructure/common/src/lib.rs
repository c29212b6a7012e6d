//! # Infrastructure Common
//!
//! Lorn 组件框架的公共基础：标识模型、组件基础与自省、依赖注入槽位以及错误分类。
//!
//! ## 核心组件
//!
//! - [`InterfaceId`] / [`ComponentId`] / [`ModuleId`] - 128 位全局唯一标识
//! - [`InterfaceTraits`] / [`ComponentTraits`] - 类型到标识的编译期映射
//! - [`ComponentBase`] - 组件的接口表与可注入依赖表
//! - [`ComponentRef`] - 组件共享引用
//! - [`ComponentError`] - 框架错误分类

pub mod component;
pub mod errors;
pub mod identity;
pub mod injection;
pub mod interface;
pub mod lifecycle;
pub mod metadata;

pub use component::*;
pub use errors::*;
pub use identity::*;
pub use injection::*;
pub use interface::*;
pub use lifecycle::*;
pub use metadata::*;
