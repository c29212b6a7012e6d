//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义绑定、解析和模块加载的核心接口。
//!
//! ## 核心接口
//!
//! - [`ComponentManager`] - 组件管理器接口
//! - [`ComponentManagerExt`] - 基于编译期标识的泛型便捷接口
//! - [`ModuleDeclaration`] / [`ModuleRegistrar`] - 可加载模块的入口契约
//! - [`ModuleLoader`] - 模块加载器接口
//! - [`ResolveContext`] - 解析链与循环依赖检测

pub mod factory;
pub mod manager;
pub mod module;
pub mod resolver;

pub use factory::*;
pub use manager::*;
pub use module::*;
pub use resolver::*;
