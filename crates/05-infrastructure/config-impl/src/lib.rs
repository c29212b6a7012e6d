//! # Configuration Implementation
//!
//! 描述符读取器、框架设置与注册表发现的具体实现。
//!
//! ## 主要组件
//!
//! - [`TomlDescriptorReader`] / [`JsonDescriptorReader`] - 描述符读取器
//! - [`DescriptorReaders`] - 按文件格式选择读取器
//! - [`FrameworkSettings`] - 框架设置（默认值 → 设置文件 → 环境变量）
//! - [`RegistryDiscovery`] - 注册表与模块文件发现

pub mod discovery;
pub mod readers;
pub mod settings;

pub use discovery::*;
pub use readers::*;
pub use settings::*;
