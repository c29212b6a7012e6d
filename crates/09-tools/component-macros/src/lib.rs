//! # Component Macros
//!
//! 把接口与组件类型映射到编译期确定的 128 位标识。
//!
//! ## 核心宏
//!
//! - [`interface`] - 为 `dyn Trait` 实现 `InterfaceTraits`
//! - [`ComponentTraits`](derive@ComponentTraits) - 为组件结构体实现 `ComponentTraits`
//!
//! ## 使用示例
//!
//! ```ignore
//! use component_macros::{interface, ComponentTraits};
//!
//! #[interface(uuid = "c37ea0f8-5a2b-46a3-93b1-9e2b1c9f3e21", description = "日志接口")]
//! pub trait Logger: Send + Sync {
//!     fn log(&self, message: &str);
//! }
//!
//! #[derive(ComponentTraits)]
//! #[component(uuid = "0b1a7e52-0f59-4a2e-8f07-5d2b4d4c9c11", name = "FileLogger")]
//! pub struct FileLogger {
//!     base: ComponentBase,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod component;
mod interface;
mod utils;

/// 接口标识宏
///
/// # 参数
///
/// - `uuid = "..."` - 接口标识（必需）
/// - `name = "..."` - 接口名称，默认为 trait 名
/// - `description = "..."` - 接口描述
#[proc_macro_attribute]
pub fn interface(args: TokenStream, input: TokenStream) -> TokenStream {
    interface::interface_impl(args, input)
}

/// 组件标识派生宏
///
/// 通过 `#[component(uuid = "...", name = "...", description = "...")]` 指定标识，
/// 名称默认为结构体名。
#[proc_macro_derive(ComponentTraits, attributes(component))]
pub fn derive_component_traits(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    component::derive_component_traits_impl(input)
}
