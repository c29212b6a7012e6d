//! 依赖注入槽位

use crate::component::{AsAny, ComponentIntrospect, ComponentRef};
use crate::errors::{ComponentError, ComponentResult};
use crate::interface::InterfaceTraits;
use crate::metadata::InjectableMetadata;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 组件中保存注入结果的字段
pub struct Injected<I: ?Sized> {
    value: Option<Arc<I>>,
}

impl<I: ?Sized> Injected<I> {
    /// 创建空槽位
    pub fn empty() -> Self {
        Self { value: None }
    }

    pub fn get(&self) -> Option<&Arc<I>> {
        self.value.as_ref()
    }

    /// 获取注入的依赖，未注入时返回空引用错误
    pub fn require(&self) -> ComponentResult<&Arc<I>> {
        self.value.as_ref().ok_or_else(|| ComponentError::NullReference {
            message: format!("依赖尚未注入: {}", std::any::type_name::<I>()),
        })
    }

    pub fn is_injected(&self) -> bool {
        self.value.is_some()
    }

    pub fn set(&mut self, value: Arc<I>) {
        self.value = Some(value);
    }

    pub fn take(&mut self) -> Option<Arc<I>> {
        self.value.take()
    }
}

impl<I: ?Sized> Default for Injected<I> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<I: ?Sized> fmt::Debug for Injected<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Injected")
            .field("interface", &std::any::type_name::<I>())
            .field("injected", &self.is_injected())
            .finish()
    }
}

type Injector = Arc<dyn Fn(&mut dyn Any, &ComponentRef) -> ComponentResult<()> + Send + Sync>;

/// 可注入依赖槽位
///
/// 元数据加上把解析结果写入组件字段的注入器
#[derive(Clone)]
pub struct InjectableSlot {
    metadata: InjectableMetadata,
    injector: Injector,
}

impl InjectableSlot {
    pub fn new<I, C>(metadata: InjectableMetadata, accessor: fn(&mut C) -> &mut Injected<I>) -> Self
    where
        I: ?Sized + InterfaceTraits + 'static,
        C: Any,
    {
        let injector: Injector = Arc::new(move |target, instance| {
            let component = target.downcast_mut::<C>().ok_or_else(|| {
                ComponentError::illegal_state(format!(
                    "注入目标类型不匹配: 期望 {}",
                    std::any::type_name::<C>()
                ))
            })?;
            let interface = instance.bind_to::<I>()?;
            accessor(component).set(interface);
            Ok(())
        });
        Self { metadata, injector }
    }

    pub fn metadata(&self) -> &InjectableMetadata {
        &self.metadata
    }

    /// 把实例注入到目标组件的对应字段
    pub fn inject(&self, target: &mut dyn ComponentIntrospect, instance: &ComponentRef) -> ComponentResult<()> {
        (self.injector)(<dyn ComponentIntrospect as AsAny>::as_any_mut(target), instance)
    }
}

impl fmt::Debug for InjectableSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InjectableSlot")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// 手动注入依赖
///
/// 按接口和名称查找组件声明的槽位，找不到时返回 `InjectableNotFound`
pub fn inject<I>(
    component: &mut dyn ComponentIntrospect,
    instance: &ComponentRef,
    name: Option<&str>,
) -> ComponentResult<()>
where
    I: ?Sized + InterfaceTraits + 'static,
{
    let slot = component
        .base()
        .find_slot(&I::ID, name)
        .ok_or_else(|| ComponentError::InjectableNotFound {
            interface_id: I::ID,
            name: name.map(str::to_string),
            component_id: Some(component.base().component_id()),
        })?;
    slot.inject(component, instance)
}
