//! 进程级组件管理器
//!
//! 首次访问时按框架设置创建，进程结束前不销毁

use crate::manager::ComponentManagerImpl;
use config_impl::FrameworkSettings;
use di_abstractions::ComponentManager;
use infrastructure_common::{ComponentId, ComponentRef, ComponentResult, InterfaceTraits};
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::warn;

static COMPONENT_MANAGER: Lazy<Arc<ComponentManagerImpl>> = Lazy::new(|| {
    let settings = FrameworkSettings::load().unwrap_or_else(|e| {
        warn!("框架设置加载失败，使用默认设置: {}", e);
        FrameworkSettings::default()
    });
    Arc::new(ComponentManagerImpl::new(settings))
});

/// 获取进程级组件管理器
pub fn get_component_manager_instance() -> Arc<ComponentManagerImpl> {
    Arc::clone(&COMPONENT_MANAGER)
}

/// 通过进程级组件管理器创建组件
pub fn create_instance(component_id: ComponentId) -> ComponentResult<ComponentRef> {
    COMPONENT_MANAGER.create_component(component_id)
}

/// 通过进程级组件管理器以实例名创建组件
pub fn create_named_instance(instance_name: &str, component_id: ComponentId) -> ComponentResult<ComponentRef> {
    COMPONENT_MANAGER.create_component_named(instance_name, component_id)
}

/// 创建组件并取得接口 `I`
pub fn create_instance_as<I>(component_id: ComponentId) -> ComponentResult<Arc<I>>
where
    I: ?Sized + InterfaceTraits + 'static,
{
    create_instance(component_id)?.bind_to::<I>()
}
