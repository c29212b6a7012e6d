//! 元数据目录
//!
//! 记录已加载描述符中的模块、组件与接口元数据

use config_abstractions::ModuleDescriptor;
use indexmap::IndexMap;
use infrastructure_common::{
    ComponentError, ComponentId, ComponentMetadata, ComponentResult, InterfaceId, InterfaceMetadata,
    ModuleId, ModuleMetadata,
};
use std::path::Path;
use tracing::{debug, warn};

/// 元数据目录
#[derive(Debug, Default)]
pub struct MetadataCatalog {
    modules: IndexMap<ModuleId, ModuleMetadata>,
    components: IndexMap<ComponentId, ComponentMetadata>,
    interfaces: IndexMap<InterfaceId, InterfaceMetadata>,
}

impl MetadataCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记模块描述符，返回登记的组件元数据
    ///
    /// 同一模块再次登记时替换其全部组件
    pub fn register_module(
        &mut self,
        descriptor: &ModuleDescriptor,
        descriptor_path: Option<&Path>,
    ) -> Vec<ComponentMetadata> {
        let module = descriptor.metadata(descriptor_path);
        debug!(
            "登记模块元数据: {} ({}), 组件 {} 个",
            module.name,
            module.id,
            module.components.len()
        );

        // 重新登记时以新描述符为准
        self.components
            .retain(|_, component| component.module_id != module.id);

        let mut registered = Vec::with_capacity(descriptor.components.len());
        for component in &descriptor.components {
            let metadata = component.metadata(module.id);
            if let Some(previous) = self.components.get(&metadata.id) {
                if previous.module_id != module.id {
                    warn!(
                        "组件 {} 从模块 {} 改为由模块 {} 提供",
                        metadata.id, previous.module_id, module.id
                    );
                }
            }
            for interface in &component.interfaces {
                self.interfaces
                    .entry(interface.uuid)
                    .or_insert_with(|| interface.metadata());
            }
            self.components.insert(metadata.id, metadata.clone());
            registered.push(metadata);
        }

        self.modules.insert(module.id, module);
        registered
    }

    /// 登记接口元数据（已存在时保留原值）
    pub fn register_interface(&mut self, metadata: InterfaceMetadata) {
        self.interfaces.entry(metadata.id()).or_insert(metadata);
    }

    pub fn module(&self, module_id: &ModuleId) -> ComponentResult<&ModuleMetadata> {
        self.modules
            .get(module_id)
            .ok_or(ComponentError::ModuleNotFound { module_id: *module_id })
    }

    pub fn component(&self, component_id: &ComponentId) -> ComponentResult<&ComponentMetadata> {
        self.components
            .get(component_id)
            .ok_or(ComponentError::ComponentNotFound {
                component_id: *component_id,
            })
    }

    pub fn interface(&self, interface_id: &InterfaceId) -> ComponentResult<&InterfaceMetadata> {
        self.interfaces
            .get(interface_id)
            .ok_or(ComponentError::InterfaceNotFound {
                interface_id: *interface_id,
            })
    }

    pub fn contains_module(&self, module_id: &ModuleId) -> bool {
        self.modules.contains_key(module_id)
    }

    /// 按登记顺序列出模块
    pub fn modules(&self) -> Vec<ModuleMetadata> {
        self.modules.values().cloned().collect()
    }

    /// 按登记顺序列出接口
    pub fn interfaces(&self) -> Vec<InterfaceMetadata> {
        self.interfaces.values().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.modules.clear();
        self.components.clear();
        self.interfaces.clear();
    }
}
