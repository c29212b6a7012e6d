//! # 基础设施组合层
//!
//! 组件框架的组合根：加载框架设置、初始化日志、登记描述符读取器与模块加载器，
//! 并把注册表文件加载进一个 [`ComponentManagerImpl`](di_impl::ComponentManagerImpl)。
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use infrastructure_composition::{InfrastructureBuilder, LoggingConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let infrastructure = InfrastructureBuilder::new()
//!         .with_logging(LoggingConfig::development())
//!         .add_registry_file("./app.registry.toml")
//!         .build()?;
//!
//!     for module in infrastructure.modules() {
//!         println!("模块: {} ({})", module.name, module.id);
//!     }
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod error;
pub mod infrastructure;

pub use builder::{InfrastructureBuilder, LoggingConfig};
pub use error::{BootstrapError, BootstrapResult};
pub use infrastructure::Infrastructure;
