//! 组件基础接口定义
//!
//! 每个组件实例都携带一个 [`ComponentBase`]，登记它暴露的接口（接口标识 →
//! 类型擦除的自引用转换器）以及声明的可注入依赖。组件在构造与注入期间由
//! 调用方独占（`Box<dyn ComponentIntrospect>`），之后转为共享所有权
//! （[`ComponentRef`]），所有接口引用共享同一个分配和同一个原子引用计数。

use crate::errors::{ComponentError, ComponentResult};
use crate::identity::{ComponentId, InterfaceId};
use crate::injection::{Injected, InjectableSlot};
use crate::interface::{ComponentTraits, InterfaceHandle, InterfaceTraits};
use crate::metadata::{InjectableMetadata, InterfaceMetadata};
use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// `Any` 转换辅助 trait
///
/// 为所有 `Send + Sync + 'static` 类型自动实现，使 trait object 可以还原为具体类型
pub trait AsAny: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// 组件自省接口
///
/// 所有组件都必须实现此 trait，它本身也作为每个组件默认登记的接口
pub trait ComponentIntrospect: AsAny {
    /// 组件基础数据
    fn base(&self) -> &ComponentBase;

    /// 组件基础数据（可变）
    fn base_mut(&mut self) -> &mut ComponentBase;

    /// 所有可注入依赖注入完成后调用，返回错误会使整个创建失败
    fn on_injected(&mut self) -> ComponentResult<()> {
        Ok(())
    }
}

impl InterfaceTraits for dyn ComponentIntrospect {
    const ID: InterfaceId = InterfaceId::from_u128(0x125f2007_1bf9_421d_9367_fbdc1210e8a6);
    const NAME: &'static str = "Lorn::IComponentIntrospect";
    const DESCRIPTION: &'static str = "提供组件接口自省能力";
}

/// 可由框架直接构造的组件
pub trait Component: ComponentIntrospect + ComponentTraits + Sized {
    /// 创建组件实例，实例名用于选择实例相关的配置
    fn create(instance_name: Option<&str>) -> ComponentResult<Self>;
}

/// 创建组件并装箱，可作为模块工厂入口使用
pub fn create_boxed<C: Component>(
    instance_name: Option<&str>,
) -> ComponentResult<Box<dyn ComponentIntrospect>> {
    let component = C::create(instance_name)?;
    Ok(Box::new(component))
}

type Caster = Box<dyn Fn(Arc<dyn Any + Send + Sync>) -> Option<Box<dyn Any>> + Send + Sync>;

struct InterfaceEntry {
    metadata: InterfaceMetadata,
    caster: Caster,
}

/// 组件基础实现
///
/// 保存接口表与可注入依赖表
pub struct ComponentBase {
    component_id: ComponentId,
    component_name: &'static str,
    instance_name: Option<String>,
    interfaces: IndexMap<InterfaceId, InterfaceEntry>,
    injectables: Vec<InjectableSlot>,
}

impl ComponentBase {
    /// 创建新的组件基础实例，并登记自省接口
    pub fn new<C>() -> Self
    where
        C: ComponentIntrospect + ComponentTraits,
    {
        info!("{} ComponentBase 构造: {}", C::ID, C::NAME);
        let mut base = Self {
            component_id: C::ID,
            component_name: C::NAME,
            instance_name: None,
            interfaces: IndexMap::new(),
            injectables: Vec::new(),
        };
        base.add_interface::<dyn ComponentIntrospect, C>(|component| component);
        base
    }

    /// 设置实例名
    pub fn with_instance_name(mut self, instance_name: Option<&str>) -> Self {
        self.instance_name = instance_name.map(str::to_string);
        self
    }

    pub fn component_id(&self) -> ComponentId {
        self.component_id
    }

    pub fn component_name(&self) -> &'static str {
        self.component_name
    }

    pub fn instance_name(&self) -> Option<&str> {
        self.instance_name.as_deref()
    }

    /// 登记组件实现的接口
    ///
    /// `upcast` 把组件的共享引用转换为接口引用，通常写作 `|c| c`。
    /// 重复登记同一接口不产生任何效果。
    pub fn add_interface<I, C>(&mut self, upcast: fn(Arc<C>) -> Arc<I>) -> &mut Self
    where
        I: ?Sized + InterfaceTraits + 'static,
        C: Any + Send + Sync,
    {
        if self.interfaces.contains_key(&I::ID) {
            return self;
        }

        let caster: Caster = Box::new(move |this| {
            this.downcast::<C>()
                .ok()
                .map(|component| Box::new(upcast(component)) as Box<dyn Any>)
        });

        debug!("{} 登记接口 {} ({})", self.component_id, I::NAME, I::ID);
        self.interfaces.insert(
            I::ID,
            InterfaceEntry {
                metadata: I::metadata(),
                caster,
            },
        );
        self
    }

    /// 声明未命名的可注入依赖
    pub fn declare_injectable<I, C>(&mut self, accessor: fn(&mut C) -> &mut Injected<I>) -> &mut Self
    where
        I: ?Sized + InterfaceTraits + 'static,
        C: Any,
    {
        self.push_injectable(InjectableSlot::new(InjectableMetadata::new(I::ID), accessor))
    }

    /// 声明命名的可注入依赖
    pub fn declare_named_injectable<I, C>(
        &mut self,
        name: &str,
        accessor: fn(&mut C) -> &mut Injected<I>,
    ) -> &mut Self
    where
        I: ?Sized + InterfaceTraits + 'static,
        C: Any,
    {
        let metadata = InjectableMetadata::new(I::ID).with_name(name);
        self.push_injectable(InjectableSlot::new(metadata, accessor))
    }

    /// 声明可选的可注入依赖
    pub fn declare_optional_injectable<I, C>(
        &mut self,
        name: Option<&str>,
        accessor: fn(&mut C) -> &mut Injected<I>,
    ) -> &mut Self
    where
        I: ?Sized + InterfaceTraits + 'static,
        C: Any,
    {
        let mut metadata = InjectableMetadata::new(I::ID).optional();
        if let Some(name) = name {
            metadata = metadata.with_name(name);
        }
        self.push_injectable(InjectableSlot::new(metadata, accessor))
    }

    fn push_injectable(&mut self, slot: InjectableSlot) -> &mut Self {
        match self
            .injectables
            .iter_mut()
            .find(|existing| existing.metadata().same_slot(slot.metadata()))
        {
            Some(existing) => *existing = slot,
            None => self.injectables.push(slot),
        }
        self
    }

    /// 是否实现了指定接口
    pub fn implements(&self, interface_id: &InterfaceId) -> bool {
        self.interfaces.contains_key(interface_id)
    }

    /// 按登记顺序列出接口
    pub fn interfaces(&self) -> Vec<InterfaceId> {
        self.interfaces.keys().copied().collect()
    }

    /// 已登记的接口数量
    pub fn interface_count(&self) -> usize {
        self.interfaces.len()
    }

    /// 获取接口元数据
    pub fn interface_metadata(&self, interface_id: &InterfaceId) -> ComponentResult<&InterfaceMetadata> {
        self.interfaces
            .get(interface_id)
            .map(|entry| &entry.metadata)
            .ok_or(ComponentError::InterfaceNotImplemented {
                component_id: self.component_id,
                interface_id: *interface_id,
            })
    }

    /// 声明的可注入依赖元数据
    pub fn injectables(&self) -> impl Iterator<Item = &InjectableMetadata> {
        self.injectables.iter().map(InjectableSlot::metadata)
    }

    /// 复制可注入依赖槽位，用于在独占组件时逐一注入
    pub fn injectable_slots(&self) -> Vec<InjectableSlot> {
        self.injectables.clone()
    }

    pub(crate) fn find_slot(&self, interface_id: &InterfaceId, name: Option<&str>) -> Option<InjectableSlot> {
        self.injectables
            .iter()
            .find(|slot| {
                slot.metadata().interface_id == *interface_id && slot.metadata().name.as_deref() == name
            })
            .cloned()
    }

    fn query_interface(
        &self,
        interface_id: &InterfaceId,
        this: Arc<dyn Any + Send + Sync>,
    ) -> ComponentResult<InterfaceHandle> {
        let not_implemented = || ComponentError::InterfaceNotImplemented {
            component_id: self.component_id,
            interface_id: *interface_id,
        };
        let entry = self.interfaces.get(interface_id).ok_or_else(not_implemented)?;
        let handle = (entry.caster)(this).ok_or_else(not_implemented)?;
        Ok(InterfaceHandle::new(*interface_id, self.component_id, handle))
    }
}

impl Drop for ComponentBase {
    fn drop(&mut self) {
        info!("{} ComponentBase 析构: {}", self.component_id, self.component_name);
    }
}

impl fmt::Debug for ComponentBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentBase")
            .field("component_id", &self.component_id)
            .field("component_name", &self.component_name)
            .field("instance_name", &self.instance_name)
            .field("interfaces", &self.interfaces.keys().collect::<Vec<_>>())
            .field("injectables", &self.injectables.len())
            .finish()
    }
}

/// 组件共享引用
///
/// 克隆只增加原子引用计数；最后一个持有者（包括由 `bind_to` 得到的接口引用）
/// 释放时组件被销毁
#[derive(Clone)]
pub struct ComponentRef {
    inner: Arc<dyn ComponentIntrospect>,
}

impl ComponentRef {
    /// 结束独占阶段，转为共享所有权
    pub fn new(component: Box<dyn ComponentIntrospect>) -> Self {
        Self {
            inner: Arc::from(component),
        }
    }

    /// 直接共享一个已构造的组件
    pub fn from_component<C: ComponentIntrospect>(component: C) -> Self {
        Self {
            inner: Arc::new(component),
        }
    }

    pub fn component_id(&self) -> ComponentId {
        self.inner.base().component_id()
    }

    pub fn instance_name(&self) -> Option<&str> {
        self.inner.base().instance_name()
    }

    /// 是否实现了指定接口
    pub fn implements(&self, interface_id: &InterfaceId) -> bool {
        self.inner.base().implements(interface_id)
    }

    /// 是否实现了接口 `I`
    pub fn implements_interface<I>(&self) -> bool
    where
        I: ?Sized + InterfaceTraits,
    {
        self.implements(&I::ID)
    }

    /// 按登记顺序列出接口
    pub fn interfaces(&self) -> Vec<InterfaceId> {
        self.inner.base().interfaces()
    }

    /// 获取接口元数据
    pub fn interface_metadata(&self, interface_id: &InterfaceId) -> ComponentResult<InterfaceMetadata> {
        self.inner.base().interface_metadata(interface_id).cloned()
    }

    /// 声明的可注入依赖
    pub fn injectables(&self) -> Vec<InjectableMetadata> {
        self.inner.base().injectables().cloned().collect()
    }

    /// 查询接口，得到类型擦除的句柄
    pub fn query_interface(&self, interface_id: &InterfaceId) -> ComponentResult<InterfaceHandle> {
        let this = <dyn ComponentIntrospect as AsAny>::into_any_arc(Arc::clone(&self.inner));
        self.inner.base().query_interface(interface_id, this)
    }

    /// 查询接口 `I`
    pub fn bind_to<I>(&self) -> ComponentResult<Arc<I>>
    where
        I: ?Sized + InterfaceTraits + 'static,
    {
        self.query_interface(&I::ID)?.downcast::<I>()
    }

    /// 自省接口
    pub fn introspect(&self) -> Arc<dyn ComponentIntrospect> {
        Arc::clone(&self.inner)
    }

    /// 还原为具体组件类型
    pub fn downcast<C: ComponentIntrospect>(&self) -> Option<Arc<C>> {
        <dyn ComponentIntrospect as AsAny>::into_any_arc(Arc::clone(&self.inner))
            .downcast::<C>()
            .ok()
    }

    /// 当前持有者数量
    pub fn use_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// 是否为同一个实例
    pub fn ptr_eq(a: &ComponentRef, b: &ComponentRef) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&a.inner) as *const (),
            Arc::as_ptr(&b.inner) as *const (),
        )
    }
}

impl From<Box<dyn ComponentIntrospect>> for ComponentRef {
    fn from(component: Box<dyn ComponentIntrospect>) -> Self {
        Self::new(component)
    }
}

impl fmt::Debug for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRef")
            .field("component_id", &self.component_id())
            .field("use_count", &self.use_count())
            .finish()
    }
}
