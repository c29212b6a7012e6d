//! 可加载模块契约
//!
//! 动态库导出静态符号 [`MODULE_DECLARATION_SYMBOL`]，类型为 [`ModuleDeclaration`]。
//! 加载器校验 ABI、核心版本与类型指纹后调用其注册函数，收集每个组件的工厂。
//!
//! 接口转换依赖 `TypeId`，模块必须与宿主在同一构建图中由同一编译器生成。
//! 类型指纹在打开时拒绝不满足这一点的模块。

use crate::factory::ComponentFactoryFn;
use infrastructure_common::{
    create_boxed, Component, ComponentError, ComponentId, ComponentIntrospect, ComponentRef, ComponentResult,
    ModuleId, ModuleMetadata,
};
use std::any::{Any, TypeId};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use tracing::debug;

/// 模块入口符号名
pub const MODULE_DECLARATION_SYMBOL: &str = "LORN_MODULE_DECLARATION";

/// 模块 ABI 版本，入口结构变化时递增
pub const MODULE_ABI_VERSION: u32 = 2;

/// 框架核心版本
pub const CORE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// 框架类型指纹
///
/// 由框架核心类型的 `TypeId` 计算，编译器版本或依赖图不同都会改变结果
pub fn type_fingerprint() -> u64 {
    let mut hasher = DefaultHasher::new();
    TypeId::of::<Arc<dyn ComponentIntrospect>>().hash(&mut hasher);
    TypeId::of::<ComponentRef>().hash(&mut hasher);
    TypeId::of::<dyn ModuleRegistrar>().hash(&mut hasher);
    hasher.finish()
}

/// 模块入口声明
#[derive(Clone, Copy)]
pub struct ModuleDeclaration {
    pub abi_version: u32,
    pub core_version: &'static str,
    /// 在模块一侧计算的 [`type_fingerprint`]
    pub type_fingerprint: fn() -> u64,
    pub register: fn(&mut dyn ModuleRegistrar),
}

impl ModuleDeclaration {
    /// 校验模块与当前框架是否兼容
    pub fn check_compatibility(&self, module_id: ModuleId) -> ComponentResult<()> {
        if self.abi_version != MODULE_ABI_VERSION {
            return Err(ComponentError::module_with_id(
                module_id,
                format!(
                    "模块 ABI 版本不匹配: 期望 {}, 实际 {}",
                    MODULE_ABI_VERSION, self.abi_version
                ),
            ));
        }
        if self.core_version != CORE_VERSION {
            return Err(ComponentError::module_with_id(
                module_id,
                format!(
                    "模块核心版本不匹配: 期望 {}, 实际 {}",
                    CORE_VERSION, self.core_version
                ),
            ));
        }
        let fingerprint = (self.type_fingerprint)();
        if fingerprint != type_fingerprint() {
            return Err(ComponentError::module_with_id(
                module_id,
                format!(
                    "模块类型指纹不匹配: 期望 {:016x}, 实际 {:016x}, 模块须与宿主使用同一构建",
                    type_fingerprint(),
                    fingerprint
                ),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for ModuleDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDeclaration")
            .field("abi_version", &self.abi_version)
            .field("core_version", &self.core_version)
            .finish_non_exhaustive()
    }
}

/// 声明模块入口
///
/// ```ignore
/// fn register(registrar: &mut dyn ModuleRegistrar) {
///     registrar.register_component::<FileLogger>();
/// }
/// declare_module!(register);
/// ```
#[macro_export]
macro_rules! declare_module {
    ($register:path) => {
        #[no_mangle]
        pub static LORN_MODULE_DECLARATION: $crate::ModuleDeclaration = $crate::ModuleDeclaration {
            abi_version: $crate::MODULE_ABI_VERSION,
            core_version: $crate::CORE_VERSION,
            type_fingerprint: $crate::type_fingerprint,
            register: $register,
        };
    };
}

/// 模块注册器
pub trait ModuleRegistrar {
    /// 登记组件工厂
    fn register_factory(&mut self, component_id: ComponentId, factory: ComponentFactoryFn);
}

impl dyn ModuleRegistrar + '_ {
    /// 登记实现了 [`Component`] 的组件
    pub fn register_component<C: Component>(&mut self) {
        self.register_factory(C::ID, create_boxed::<C>);
    }
}

/// 模块状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModuleState {
    /// 已登记元数据，尚未打开
    Registered,
    /// 正在打开
    Loading,
    /// 已打开
    Loaded,
    /// 打开失败，不再重试
    Failed,
}

/// 已打开的模块
///
/// 持有组件工厂表以及保持库映射有效的句柄
pub struct LoadedModule {
    module_id: ModuleId,
    factories: HashMap<ComponentId, ComponentFactoryFn>,
    handle: Option<Box<dyn Any + Send + Sync>>,
}

impl LoadedModule {
    /// 调用模块注册函数收集工厂
    pub fn from_declaration(module_id: ModuleId, declaration: &ModuleDeclaration) -> ComponentResult<Self> {
        declaration.check_compatibility(module_id)?;
        let mut module = Self {
            module_id,
            factories: HashMap::new(),
            handle: None,
        };
        (declaration.register)(&mut module);
        debug!("模块 {} 登记了 {} 个组件工厂", module_id, module.factories.len());
        Ok(module)
    }

    /// 附加需要与模块同生命周期的句柄（例如动态库）
    pub fn with_handle(mut self, handle: Box<dyn Any + Send + Sync>) -> Self {
        self.handle = Some(handle);
        self
    }

    pub fn module_id(&self) -> ModuleId {
        self.module_id
    }

    /// 获取组件工厂
    pub fn factory(&self, component_id: &ComponentId) -> Option<ComponentFactoryFn> {
        self.factories.get(component_id).copied()
    }

    /// 已登记工厂的组件
    pub fn component_ids(&self) -> Vec<ComponentId> {
        self.factories.keys().copied().collect()
    }

    pub fn has_handle(&self) -> bool {
        self.handle.is_some()
    }

    /// 描述符声明的每个组件都必须有工厂
    pub fn verify(&self, metadata: &ModuleMetadata) -> ComponentResult<()> {
        match metadata
            .components
            .iter()
            .find(|component_id| !self.factories.contains_key(component_id))
        {
            Some(missing) => Err(ComponentError::module_with_id(
                self.module_id,
                format!("模块 {} 未导出组件 {} 的工厂", metadata.name, missing),
            )),
            None => Ok(()),
        }
    }
}

impl ModuleRegistrar for LoadedModule {
    fn register_factory(&mut self, component_id: ComponentId, factory: ComponentFactoryFn) {
        self.factories.insert(component_id, factory);
    }
}

impl fmt::Debug for LoadedModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedModule")
            .field("module_id", &self.module_id)
            .field("components", &self.factories.keys().collect::<Vec<_>>())
            .field("has_handle", &self.has_handle())
            .finish()
    }
}

/// 模块加载器 trait
///
/// 按注册顺序询问，第一个支持该模块的加载器负责打开
pub trait ModuleLoader: Send + Sync {
    /// 加载器名称
    fn name(&self) -> &str;

    /// 是否能加载该模块
    fn supports(&self, module: &ModuleMetadata) -> bool;

    /// 打开模块，收集组件工厂
    fn load(&self, module: &ModuleMetadata) -> ComponentResult<LoadedModule>;
}
