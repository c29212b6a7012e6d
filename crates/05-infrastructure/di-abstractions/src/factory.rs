//! 组件工厂类型

use infrastructure_common::{create_boxed, Component, ComponentIntrospect, ComponentResult};
use std::sync::Arc;

/// 模块导出的组件工厂，参数为实例名
pub type ComponentFactoryFn = fn(Option<&str>) -> ComponentResult<Box<dyn ComponentIntrospect>>;

/// 绑定到接口的无参工厂，不经过模块查找
pub type BoundFactory = Arc<dyn Fn() -> ComponentResult<Box<dyn ComponentIntrospect>> + Send + Sync>;

/// 由闭包创建绑定工厂
pub fn factory_fn<F>(factory: F) -> BoundFactory
where
    F: Fn() -> ComponentResult<Box<dyn ComponentIntrospect>> + Send + Sync + 'static,
{
    Arc::new(factory)
}

/// 直接调用 `C::create` 的本地工厂
pub fn local_factory<C: Component>() -> BoundFactory {
    Arc::new(|| create_boxed::<C>(None))
}
