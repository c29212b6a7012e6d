//! 组件管理器抽象接口
//!
//! 绑定注册表、模块元数据与解析引擎的统一入口

use crate::factory::{local_factory, BoundFactory};
use crate::module::ModuleState;
use infrastructure_common::{
    Component, ComponentId, ComponentMetadata, ComponentRef, ComponentResult, ComponentTraits,
    InterfaceId, InterfaceMetadata, InterfaceTraits, ModuleId, ModuleMetadata, Scope,
};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// 绑定目标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// 通过模块工厂创建
    Component,
    /// 通过显式工厂创建
    Factory,
}

/// 绑定快照，用于诊断
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingInfo {
    pub interface_id: InterfaceId,
    pub name: Option<String>,
    pub component_id: ComponentId,
    pub scope: Scope,
    pub kind: BindingKind,
}

impl fmt::Display for BindingInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}[{}]", self.interface_id, name)?,
            None => write!(f, "{}", self.interface_id)?,
        }
        write!(f, " -> {} ({})", self.component_id, self.scope)
    }
}

/// 组件管理器 trait
///
/// 所有方法均为同步调用，可在多线程间共享
pub trait ComponentManager: Send + Sync {
    /// 绑定接口到组件，重复绑定同一键时静默覆盖
    fn bind(&self, interface_id: InterfaceId, component_id: ComponentId, scope: Scope);

    /// 命名绑定，与未命名绑定互不影响
    fn bind_named(&self, name: &str, interface_id: InterfaceId, component_id: ComponentId, scope: Scope);

    /// 绑定到显式工厂，创建时不查找模块
    fn bind_factory(
        &self,
        interface_id: InterfaceId,
        component_id: ComponentId,
        factory: BoundFactory,
        scope: Scope,
    );

    /// 命名的工厂绑定
    fn bind_factory_named(
        &self,
        name: &str,
        interface_id: InterfaceId,
        component_id: ComponentId,
        factory: BoundFactory,
        scope: Scope,
    );

    /// 当前所有绑定
    fn bindings(&self) -> Vec<BindingInfo>;

    /// 清除绑定、元数据与单例缓存；已打开的模块和存活的实例不受影响
    fn clear(&self);

    /// 按默认发现规则加载注册表
    fn load(&self) -> ComponentResult<()>;

    /// 加载指定注册表文件
    fn load_file(&self, path: &Path) -> ComponentResult<()>;

    /// 加载目录中的注册表文件
    fn load_folder(&self, folder: &Path, recurse: bool) -> ComponentResult<()>;

    /// 读取模块描述符并登记元数据，不打开动态库
    fn load_module_metadata(&self, module_name: &str, path: &Path) -> ComponentResult<()>;

    /// 加载目录中的所有模块描述符
    fn load_modules(&self, folder: &Path, recurse: bool) -> ComponentResult<()>;

    /// 创建新的组件实例
    fn create_component(&self, component_id: ComponentId) -> ComponentResult<ComponentRef>;

    /// 以实例名创建新的组件实例
    fn create_component_named(&self, instance_name: &str, component_id: ComponentId) -> ComponentResult<ComponentRef>;

    /// 按未命名绑定解析接口
    fn resolve(&self, interface_id: InterfaceId) -> ComponentResult<ComponentRef>;

    /// 按命名绑定解析接口
    fn resolve_named(&self, interface_id: InterfaceId, name: &str) -> ComponentResult<ComponentRef>;

    /// 所有模块元数据
    fn modules_metadata(&self) -> Vec<ModuleMetadata>;

    /// 所有接口元数据
    fn interfaces_metadata(&self) -> Vec<InterfaceMetadata>;

    fn find_module_metadata(&self, module_id: ModuleId) -> ComponentResult<ModuleMetadata>;

    fn find_component_metadata(&self, component_id: ComponentId) -> ComponentResult<ComponentMetadata>;

    fn find_interface_metadata(&self, interface_id: InterfaceId) -> ComponentResult<InterfaceMetadata>;

    /// 组件所属模块
    fn get_module_uuid(&self, component_id: ComponentId) -> ComponentResult<ModuleId>;

    /// 模块状态
    fn module_state(&self, module_id: ModuleId) -> ComponentResult<ModuleState>;
}

/// 泛型便捷接口
///
/// 标识来自 [`InterfaceTraits`] 与 [`ComponentTraits`] 的关联常量
pub trait ComponentManagerExt: ComponentManager {
    fn bind_to<I, C>(&self, scope: Scope)
    where
        I: ?Sized + InterfaceTraits,
        C: ComponentTraits,
    {
        self.bind(I::ID, C::ID, scope);
    }

    fn bind_named_to<I, C>(&self, name: &str, scope: Scope)
    where
        I: ?Sized + InterfaceTraits,
        C: ComponentTraits,
    {
        self.bind_named(name, I::ID, C::ID, scope);
    }

    /// 绑定到本地组件类型，直接调用 `C::create`
    fn bind_local<I, C>(&self, scope: Scope)
    where
        I: ?Sized + InterfaceTraits,
        C: Component,
    {
        self.bind_factory(I::ID, C::ID, local_factory::<C>(), scope);
    }

    fn bind_local_named<I, C>(&self, name: &str, scope: Scope)
    where
        I: ?Sized + InterfaceTraits,
        C: Component,
    {
        self.bind_factory_named(name, I::ID, C::ID, local_factory::<C>(), scope);
    }

    fn resolve_as<I>(&self) -> ComponentResult<Arc<I>>
    where
        I: ?Sized + InterfaceTraits + 'static,
    {
        self.resolve(I::ID)?.bind_to::<I>()
    }

    fn resolve_named_as<I>(&self, name: &str) -> ComponentResult<Arc<I>>
    where
        I: ?Sized + InterfaceTraits + 'static,
    {
        self.resolve_named(I::ID, name)?.bind_to::<I>()
    }

    /// 创建组件并取得接口 `I`
    fn create_as<I>(&self, component_id: ComponentId) -> ComponentResult<Arc<I>>
    where
        I: ?Sized + InterfaceTraits + 'static,
    {
        self.create_component(component_id)?.bind_to::<I>()
    }

    fn create<C: ComponentTraits>(&self) -> ComponentResult<ComponentRef> {
        self.create_component(C::ID)
    }

    fn create_named<C: ComponentTraits>(&self, instance_name: &str) -> ComponentResult<ComponentRef> {
        self.create_component_named(instance_name, C::ID)
    }
}

impl<M: ComponentManager + ?Sized> ComponentManagerExt for M {}
