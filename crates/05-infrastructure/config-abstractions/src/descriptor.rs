//! 描述符模型
//!
//! 注册表文件与模块文件解析后的结构，和具体文件格式无关

use infrastructure_common::{
    ComponentId, ComponentMetadata, ConfigError, ConfigResult, InjectableMetadata, InterfaceId,
    InterfaceMetadata, ModuleId, ModuleMetadata, Scope,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// 注册表描述符
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryDescriptor {
    /// 模块列表
    #[serde(default)]
    pub modules: Vec<ModuleDescriptor>,
    /// 绑定列表
    #[serde(default)]
    pub binds: Vec<BindDescriptor>,
}

impl RegistryDescriptor {
    /// 验证注册表内容
    pub fn validate(&self) -> ConfigResult<()> {
        let mut module_ids = HashSet::new();
        for module in &self.modules {
            module.validate()?;
            if !module_ids.insert(module.uuid) {
                return Err(validation(format!("模块重复声明: {}", module.uuid)));
            }
        }
        for bind in &self.binds {
            bind.validate()?;
        }
        Ok(())
    }

    /// 把所有模块的相对动态库路径解析为基于描述符目录的路径
    pub fn resolve_paths(&mut self, base_dir: &Path) {
        for module in &mut self.modules {
            module.resolve_path(base_dir);
        }
    }
}

/// 模块描述符
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    pub uuid: ModuleId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// 动态库路径
    pub path: PathBuf,
    #[serde(default)]
    pub components: Vec<ComponentDescriptor>,
}

impl ModuleDescriptor {
    /// 验证模块内容
    pub fn validate(&self) -> ConfigResult<()> {
        if self.uuid.is_nil() {
            return Err(validation(format!("模块 {} 缺少标识", self.name)));
        }
        if self.name.trim().is_empty() {
            return Err(validation(format!("模块 {} 缺少名称", self.uuid)));
        }

        let mut component_ids = HashSet::new();
        for component in &self.components {
            component.validate()?;
            if !component_ids.insert(component.uuid) {
                return Err(validation(format!(
                    "模块 {} 中组件重复声明: {}",
                    self.name, component.uuid
                )));
            }
        }
        Ok(())
    }

    /// 相对路径以描述符所在目录为基准
    pub fn resolve_path(&mut self, base_dir: &Path) {
        if self.path.is_relative() {
            self.path = base_dir.join(&self.path);
        }
    }

    /// 转换为模块元数据
    pub fn metadata(&self, descriptor_path: Option<&Path>) -> ModuleMetadata {
        let mut metadata = ModuleMetadata::new(self.uuid, &self.name, &self.path)
            .with_description(&self.description);
        if let Some(path) = descriptor_path {
            metadata = metadata.with_descriptor_path(path);
        }
        self.components
            .iter()
            .fold(metadata, |metadata, component| metadata.with_component(component.uuid))
    }
}

/// 组件描述符
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    pub uuid: ComponentId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub interfaces: Vec<InterfaceDescriptor>,
    #[serde(default)]
    pub injectables: Vec<InjectableDescriptor>,
}

impl ComponentDescriptor {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.uuid.is_nil() {
            return Err(validation(format!("组件 {} 缺少标识", self.name)));
        }
        if self.name.trim().is_empty() {
            return Err(validation(format!("组件 {} 缺少名称", self.uuid)));
        }
        if let Some(interface) = self.interfaces.iter().find(|i| i.uuid.is_nil()) {
            return Err(validation(format!(
                "组件 {} 的接口 {} 缺少标识",
                self.name, interface.name
            )));
        }
        if self.injectables.iter().any(|i| i.interface.is_nil()) {
            return Err(validation(format!("组件 {} 的可注入依赖缺少接口标识", self.name)));
        }
        Ok(())
    }

    /// 转换为组件元数据
    pub fn metadata(&self, module_id: ModuleId) -> ComponentMetadata {
        let metadata = ComponentMetadata::new(self.uuid, &self.name, module_id)
            .with_description(&self.description);
        let metadata = self
            .interfaces
            .iter()
            .fold(metadata, |metadata, interface| metadata.with_interface(interface.uuid));
        self.injectables
            .iter()
            .fold(metadata, |metadata, injectable| metadata.with_injectable(injectable.metadata()))
    }
}

/// 接口描述符
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDescriptor {
    pub uuid: InterfaceId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl InterfaceDescriptor {
    pub fn metadata(&self) -> InterfaceMetadata {
        InterfaceMetadata::new(self.uuid, &self.name, &self.description)
    }
}

/// 可注入依赖描述符
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectableDescriptor {
    pub interface: InterfaceId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub default_component: Option<ComponentId>,
}

impl InjectableDescriptor {
    pub fn metadata(&self) -> InjectableMetadata {
        InjectableMetadata {
            interface_id: self.interface,
            name: self.name.clone(),
            optional: self.optional,
            default_component: self.default_component,
        }
    }
}

/// 绑定描述符
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindDescriptor {
    pub interface: InterfaceId,
    pub component: ComponentId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub scope: Scope,
}

impl BindDescriptor {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.interface.is_nil() || self.component.is_nil() {
            return Err(validation(format!(
                "绑定 {} -> {} 缺少标识",
                self.interface, self.component
            )));
        }
        if matches!(self.name.as_deref(), Some(name) if name.trim().is_empty()) {
            return Err(validation(format!("绑定 {} 的名称为空", self.interface)));
        }
        Ok(())
    }
}

fn validation(message: String) -> ConfigError {
    ConfigError::ValidationError { message }
}
