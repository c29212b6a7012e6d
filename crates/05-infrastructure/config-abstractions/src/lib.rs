//! # Configuration Abstractions
//!
//! 注册表与模块描述符的解析模型，以及描述符读取器接口。
//!
//! ## 核心接口
//!
//! - [`RegistryDescriptor`] - 注册表文件：模块列表与绑定列表
//! - [`ModuleDescriptor`] - 模块文件：动态库路径与组件声明
//! - [`DescriptorReader`] - 描述符读取器接口

pub mod descriptor;
pub mod reader;

pub use descriptor::*;
pub use reader::*;
