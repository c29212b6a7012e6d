//! # 依赖注入具体实现
//!
//! 提供绑定注册表、元数据目录、模块管理器、模块加载器与解析引擎

pub mod catalog;
pub mod global;
pub mod loaders;
pub mod manager;
pub mod module_manager;
pub mod registry;

pub use catalog::MetadataCatalog;
pub use global::{create_instance, create_instance_as, create_named_instance, get_component_manager_instance};
pub use loaders::{LibraryModuleLoader, StaticModuleLoader};
pub use manager::ComponentManagerImpl;
pub use module_manager::ModuleManager;
pub use registry::{Binding, BindingKey, BindingRegistry, BindingTarget};
