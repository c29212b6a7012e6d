//! 组件管理器实现
//!
//! 解析流程：查找绑定 → 单例命中直接返回 → 通过显式工厂或模块工厂创建 →
//! 逐一解析并注入可注入依赖 → 调用 `on_injected` → 转为共享引用 → 单例写入缓存

use crate::catalog::MetadataCatalog;
use crate::loaders::LibraryModuleLoader;
use crate::module_manager::ModuleManager;
use crate::registry::{Binding, BindingKey, BindingRegistry, BindingTarget};
use config_abstractions::ModuleDescriptor;
use config_impl::{DescriptorReaders, FrameworkSettings, RegistryDiscovery};
use di_abstractions::{
    BindingInfo, BoundFactory, ComponentManager, ModuleLoader, ModuleState, ResolveContext, ResolveFrame,
};
use infrastructure_common::{
    ComponentError, ComponentId, ComponentIntrospect, ComponentMetadata, ComponentRef, ComponentResult,
    InjectableMetadata, InterfaceId, InterfaceMetadata, InterfaceTraits, ModuleId, ModuleMetadata, Scope,
};
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// 组件管理器实现
pub struct ComponentManagerImpl {
    settings: FrameworkSettings,
    readers: DescriptorReaders,
    discovery: RegistryDiscovery,
    bindings: BindingRegistry,
    catalog: RwLock<MetadataCatalog>,
    modules: ModuleManager,
}

impl ComponentManagerImpl {
    /// 使用默认读取器与动态库加载器创建
    pub fn new(settings: FrameworkSettings) -> Self {
        Self::with_readers(settings, DescriptorReaders::with_defaults())
    }

    /// 使用指定读取器创建
    pub fn with_readers(settings: FrameworkSettings, readers: DescriptorReaders) -> Self {
        let modules = ModuleManager::new();
        modules.add_loader(Arc::new(LibraryModuleLoader::new()));
        info!("创建组件管理器, 描述符读取器: {:?}", readers.names());
        Self {
            discovery: RegistryDiscovery::new(settings.clone()),
            settings,
            readers,
            bindings: BindingRegistry::new(),
            catalog: RwLock::new(MetadataCatalog::new()),
            modules,
        }
    }

    /// 替换注册表发现规则（例如指定用户目录）
    pub fn with_discovery(mut self, discovery: RegistryDiscovery) -> Self {
        self.discovery = discovery;
        self
    }

    /// 添加模块加载器，优先于已有加载器
    pub fn add_module_loader(&self, loader: Arc<dyn ModuleLoader>) {
        self.modules.add_loader(loader);
    }

    pub fn settings(&self) -> &FrameworkSettings {
        &self.settings
    }

    /// 已缓存的单例数量
    pub fn cached_singletons(&self) -> usize {
        self.bindings.cached_singletons()
    }

    /// 已打开的模块数量
    pub fn loaded_module_count(&self) -> usize {
        self.modules.loaded_count()
    }

    fn new_context(&self) -> ResolveContext {
        ResolveContext::new(self.settings.max_resolution_depth)
    }

    fn register_module(&self, descriptor: &ModuleDescriptor, descriptor_path: &Path) {
        let components = self
            .catalog
            .write()
            .register_module(descriptor, Some(descriptor_path));
        if self.settings.autobind {
            self.autobind(&components);
        }
    }

    /// 为组件声明的接口添加未命名瞬时绑定，已有绑定不受影响
    fn autobind(&self, components: &[ComponentMetadata]) {
        for component in components {
            for interface_id in &component.interfaces {
                if *interface_id == <dyn ComponentIntrospect>::ID {
                    continue;
                }
                self.bindings.bind_if_absent(
                    BindingKey::new(*interface_id, None),
                    Binding::component(component.id, Scope::Transient),
                );
            }
        }
    }

    fn load_registry_file(&self, path: &Path) -> ComponentResult<()> {
        info!("加载注册表: {}", path.display());
        let registry = self.readers.read_registry(path)?;
        for module in &registry.modules {
            self.register_module(module, path);
        }
        for bind in &registry.binds {
            self.bindings.bind(
                BindingKey::new(bind.interface, bind.name.as_deref()),
                Binding::component(bind.component, bind.scope),
            );
        }
        info!(
            "注册表加载完成: {} 个模块, {} 个绑定",
            registry.modules.len(),
            registry.binds.len()
        );
        Ok(())
    }

    fn read_module_descriptor(&self, path: &Path) -> ComponentResult<ModuleDescriptor> {
        self.readers.read_module(path)
    }

    fn resolve_in(
        &self,
        interface_id: InterfaceId,
        name: Option<&str>,
        context: &mut ResolveContext,
    ) -> ComponentResult<ComponentRef> {
        let key = BindingKey::new(interface_id, name);
        let binding = self
            .bindings
            .get(&key)
            .ok_or_else(|| ComponentError::InjectableNotFound {
                interface_id,
                name: key.name.clone(),
                component_id: None,
            })?;

        let frame = ResolveFrame::Binding {
            interface_id,
            name: key.name.clone(),
        };
        with_frame(context, frame, |context| {
            if binding.scope.is_singleton() {
                binding
                    .singleton_cell()
                    .get_or_try_init(|| self.build_bound(&binding, interface_id, context))
                    .cloned()
            } else {
                self.build_bound(&binding, interface_id, context)
            }
        })
    }

    fn build_bound(
        &self,
        binding: &Binding,
        interface_id: InterfaceId,
        context: &mut ResolveContext,
    ) -> ComponentResult<ComponentRef> {
        let component = match &binding.target {
            BindingTarget::Component => self.create_in(binding.component_id, None, context)?,
            BindingTarget::Factory(factory) => {
                self.create_from_factory(binding.component_id, factory, context)?
            }
        };

        if !component.implements(&interface_id) {
            return Err(ComponentError::InterfaceNotImplemented {
                component_id: component.component_id(),
                interface_id,
            });
        }
        Ok(component)
    }

    fn create_from_factory(
        &self,
        component_id: ComponentId,
        factory: &BoundFactory,
        context: &mut ResolveContext,
    ) -> ComponentResult<ComponentRef> {
        with_frame(context, ResolveFrame::Component(component_id), |context| {
            let component = factory()?;
            self.complete(component, context)
        })
    }

    fn create_in(
        &self,
        component_id: ComponentId,
        instance_name: Option<&str>,
        context: &mut ResolveContext,
    ) -> ComponentResult<ComponentRef> {
        let module = {
            let catalog = self.catalog.read();
            let component = catalog.component(&component_id)?;
            catalog.module(&component.module_id)?.clone()
        };

        let loaded = self.modules.ensure_loaded(&module)?;
        let factory = loaded.factory(&component_id).ok_or_else(|| {
            ComponentError::module_with_id(
                module.id,
                format!("模块 {} 未导出组件 {} 的工厂", module.name, component_id),
            )
        })?;

        with_frame(context, ResolveFrame::Component(component_id), |context| {
            let component = factory(instance_name)?;
            self.complete(component, context)
        })
    }

    /// 注入所有可注入依赖并结束独占阶段，任一必需依赖失败时实例被丢弃
    fn complete(
        &self,
        mut component: Box<dyn ComponentIntrospect>,
        context: &mut ResolveContext,
    ) -> ComponentResult<ComponentRef> {
        let component_id = component.base().component_id();
        let declared = self
            .catalog
            .read()
            .component(&component_id)
            .map(|metadata| metadata.injectables.clone())
            .unwrap_or_default();

        let slots = component.base().injectable_slots();
        for slot in &slots {
            let injectable = merge_injectable(slot.metadata(), &declared);
            match self.resolve_injectable(component_id, &injectable, context)? {
                Some(instance) => slot.inject(component.as_mut(), &instance)?,
                None => debug!(
                    "跳过可选依赖 {} (组件 {})",
                    injectable.interface_id, component_id
                ),
            }
        }

        for injectable in declared
            .iter()
            .filter(|declared| !slots.iter().any(|slot| slot.metadata().same_slot(declared)))
        {
            warn!(
                "组件 {} 未声明描述符中的可注入依赖 {}",
                component_id, injectable.interface_id
            );
            if !injectable.optional
                && injectable.default_component.is_none()
                && !self.bindings.contains(&BindingKey::new(injectable.interface_id, injectable.name.as_deref()))
            {
                return Err(injectable_not_found(component_id, injectable));
            }
        }

        component.on_injected()?;
        debug!("组件 {} 创建完成", component_id);
        Ok(ComponentRef::new(component))
    }

    fn resolve_injectable(
        &self,
        component_id: ComponentId,
        injectable: &InjectableMetadata,
        context: &mut ResolveContext,
    ) -> ComponentResult<Option<ComponentRef>> {
        let name = injectable.name.as_deref();
        if self.bindings.contains(&BindingKey::new(injectable.interface_id, name)) {
            return self
                .resolve_in(injectable.interface_id, name, context)
                .map(Some);
        }

        if let Some(default_component) = injectable.default_component {
            debug!(
                "依赖 {} 无绑定, 使用默认组件 {}",
                injectable.interface_id, default_component
            );
            let instance = self.create_in(default_component, None, context)?;
            if !instance.implements(&injectable.interface_id) {
                return Err(ComponentError::InterfaceNotImplemented {
                    component_id: default_component,
                    interface_id: injectable.interface_id,
                });
            }
            return Ok(Some(instance));
        }

        if injectable.optional {
            return Ok(None);
        }

        error!(
            "无法解析组件 {} 的依赖 {}",
            component_id, injectable.interface_id
        );
        Err(injectable_not_found(component_id, injectable))
    }
}

impl ComponentManager for ComponentManagerImpl {
    fn bind(&self, interface_id: InterfaceId, component_id: ComponentId, scope: Scope) {
        self.bindings.bind(
            BindingKey::new(interface_id, None),
            Binding::component(component_id, scope),
        );
    }

    fn bind_named(&self, name: &str, interface_id: InterfaceId, component_id: ComponentId, scope: Scope) {
        self.bindings.bind(
            BindingKey::new(interface_id, Some(name)),
            Binding::component(component_id, scope),
        );
    }

    fn bind_factory(
        &self,
        interface_id: InterfaceId,
        component_id: ComponentId,
        factory: BoundFactory,
        scope: Scope,
    ) {
        self.bindings.bind(
            BindingKey::new(interface_id, None),
            Binding::factory(component_id, factory, scope),
        );
    }

    fn bind_factory_named(
        &self,
        name: &str,
        interface_id: InterfaceId,
        component_id: ComponentId,
        factory: BoundFactory,
        scope: Scope,
    ) {
        self.bindings.bind(
            BindingKey::new(interface_id, Some(name)),
            Binding::factory(component_id, factory, scope),
        );
    }

    fn bindings(&self) -> Vec<BindingInfo> {
        self.bindings.snapshot()
    }

    fn clear(&self) {
        info!("清除组件管理器的绑定、元数据与单例缓存");
        self.bindings.clear();
        self.catalog.write().clear();
    }

    fn load(&self) -> ComponentResult<()> {
        let files = self.discovery.registry_files()?;
        if files.is_empty() {
            warn!("未发现任何注册表文件");
        }
        files.iter().try_for_each(|path| self.load_registry_file(path))
    }

    fn load_file(&self, path: &Path) -> ComponentResult<()> {
        self.load_registry_file(path)
    }

    fn load_folder(&self, folder: &Path, recurse: bool) -> ComponentResult<()> {
        self.discovery
            .registry_files_in(folder, recurse)?
            .iter()
            .try_for_each(|path| self.load_registry_file(path))
    }

    fn load_module_metadata(&self, module_name: &str, path: &Path) -> ComponentResult<()> {
        let descriptor = self.read_module_descriptor(path)?;
        if descriptor.name != module_name {
            return Err(ComponentError::module_with_id(
                descriptor.uuid,
                format!(
                    "模块名称不匹配: 期望 {}, 描述符 {} 中为 {}",
                    module_name,
                    path.display(),
                    descriptor.name
                ),
            ));
        }
        self.register_module(&descriptor, path);
        Ok(())
    }

    fn load_modules(&self, folder: &Path, recurse: bool) -> ComponentResult<()> {
        for path in self.discovery.module_files_in(folder, recurse)? {
            let descriptor = self.read_module_descriptor(&path)?;
            self.register_module(&descriptor, &path);
        }
        Ok(())
    }

    fn create_component(&self, component_id: ComponentId) -> ComponentResult<ComponentRef> {
        debug!("创建组件 {}", component_id);
        self.create_in(component_id, None, &mut self.new_context())
    }

    fn create_component_named(&self, instance_name: &str, component_id: ComponentId) -> ComponentResult<ComponentRef> {
        debug!("创建组件 {} (实例 {})", component_id, instance_name);
        self.create_in(component_id, Some(instance_name), &mut self.new_context())
    }

    fn resolve(&self, interface_id: InterfaceId) -> ComponentResult<ComponentRef> {
        self.resolve_in(interface_id, None, &mut self.new_context())
    }

    fn resolve_named(&self, interface_id: InterfaceId, name: &str) -> ComponentResult<ComponentRef> {
        self.resolve_in(interface_id, Some(name), &mut self.new_context())
    }

    fn modules_metadata(&self) -> Vec<ModuleMetadata> {
        self.catalog.read().modules()
    }

    fn interfaces_metadata(&self) -> Vec<InterfaceMetadata> {
        self.catalog.read().interfaces()
    }

    fn find_module_metadata(&self, module_id: ModuleId) -> ComponentResult<ModuleMetadata> {
        self.catalog.read().module(&module_id).cloned()
    }

    fn find_component_metadata(&self, component_id: ComponentId) -> ComponentResult<ComponentMetadata> {
        self.catalog.read().component(&component_id).cloned()
    }

    fn find_interface_metadata(&self, interface_id: InterfaceId) -> ComponentResult<InterfaceMetadata> {
        self.catalog.read().interface(&interface_id).cloned()
    }

    fn get_module_uuid(&self, component_id: ComponentId) -> ComponentResult<ModuleId> {
        self.catalog
            .read()
            .component(&component_id)
            .map(|component| component.module_id)
    }

    fn module_state(&self, module_id: ModuleId) -> ComponentResult<ModuleState> {
        match self.modules.state(&module_id) {
            Some(state) => Ok(state),
            None if self.catalog.read().contains_module(&module_id) => Ok(ModuleState::Registered),
            None => Err(ComponentError::ModuleNotFound { module_id }),
        }
    }
}

impl Default for ComponentManagerImpl {
    fn default() -> Self {
        Self::new(FrameworkSettings::default())
    }
}

impl std::fmt::Debug for ComponentManagerImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentManagerImpl")
            .field("settings", &self.settings)
            .field("bindings", &self.bindings.len())
            .field("modules", &self.modules)
            .finish()
    }
}

fn with_frame<T>(
    context: &mut ResolveContext,
    frame: ResolveFrame,
    f: impl FnOnce(&mut ResolveContext) -> ComponentResult<T>,
) -> ComponentResult<T> {
    context.push(frame)?;
    let result = f(context);
    context.pop();
    result
}

/// 组件自身声明的槽位与描述符中的同名声明合并
fn merge_injectable(slot: &InjectableMetadata, declared: &[InjectableMetadata]) -> InjectableMetadata {
    let mut merged = slot.clone();
    if let Some(declared) = declared.iter().find(|declared| declared.same_slot(slot)) {
        merged.optional |= declared.optional;
        merged.default_component = merged.default_component.or(declared.default_component);
    }
    merged
}

fn injectable_not_found(component_id: ComponentId, injectable: &InjectableMetadata) -> ComponentError {
    ComponentError::InjectableNotFound {
        interface_id: injectable.interface_id,
        name: injectable.name.clone(),
        component_id: Some(component_id),
    }
}
