//! 元数据定义
//!
//! 提供接口、组件和模块的描述信息

use crate::identity::{ComponentId, InterfaceId, ModuleId};
use std::path::{Path, PathBuf};

/// 接口元数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceMetadata {
    id: InterfaceId,
    name: String,
    description: String,
}

impl InterfaceMetadata {
    /// 创建新的接口元数据
    pub fn new(id: InterfaceId, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn id(&self) -> InterfaceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// 可注入依赖槽位的元数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectableMetadata {
    /// 目标接口
    pub interface_id: InterfaceId,
    /// 绑定名称（为空时使用未命名绑定）
    pub name: Option<String>,
    /// 是否可选，可选依赖无法解析时跳过
    pub optional: bool,
    /// 无绑定时使用的默认组件
    pub default_component: Option<ComponentId>,
}

impl InjectableMetadata {
    /// 创建必需的可注入依赖
    pub fn new(interface_id: InterfaceId) -> Self {
        Self {
            interface_id,
            name: None,
            optional: false,
            default_component: None,
        }
    }

    /// 设置绑定名称
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// 设置为可选
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// 设置默认组件
    pub fn with_default_component(mut self, component_id: ComponentId) -> Self {
        self.default_component = Some(component_id);
        self
    }

    /// 是否指向同一个槽位（接口 + 名称）
    pub fn same_slot(&self, other: &InjectableMetadata) -> bool {
        self.interface_id == other.interface_id && self.name == other.name
    }
}

/// 组件元数据
#[derive(Debug, Clone)]
pub struct ComponentMetadata {
    /// 组件标识
    pub id: ComponentId,
    /// 组件名称
    pub name: String,
    /// 组件描述
    pub description: String,
    /// 所属模块
    pub module_id: ModuleId,
    /// 声明实现的接口
    pub interfaces: Vec<InterfaceId>,
    /// 声明的可注入依赖
    pub injectables: Vec<InjectableMetadata>,
}

impl ComponentMetadata {
    /// 创建新的组件元数据
    pub fn new(id: ComponentId, name: impl Into<String>, module_id: ModuleId) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            module_id,
            interfaces: Vec::new(),
            injectables: Vec::new(),
        }
    }

    /// 设置描述
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// 添加实现的接口
    pub fn with_interface(mut self, interface_id: InterfaceId) -> Self {
        if !self.interfaces.contains(&interface_id) {
            self.interfaces.push(interface_id);
        }
        self
    }

    /// 添加可注入依赖
    pub fn with_injectable(mut self, injectable: InjectableMetadata) -> Self {
        self.injectables.push(injectable);
        self
    }

    /// 是否声明了指定接口
    pub fn declares(&self, interface_id: &InterfaceId) -> bool {
        self.interfaces.contains(interface_id)
    }
}

/// 模块元数据
///
/// 记录时并不打开可加载单元，直到首次需要创建其组件
#[derive(Debug, Clone)]
pub struct ModuleMetadata {
    /// 模块标识
    pub id: ModuleId,
    /// 模块名称
    pub name: String,
    /// 模块描述
    pub description: String,
    /// 动态库文件路径
    pub path: PathBuf,
    /// 描述符文件路径
    pub descriptor_path: Option<PathBuf>,
    /// 模块提供的组件
    pub components: Vec<ComponentId>,
}

impl ModuleMetadata {
    /// 创建新的模块元数据
    pub fn new(id: ModuleId, name: impl Into<String>, path: impl AsRef<Path>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            path: path.as_ref().to_path_buf(),
            descriptor_path: None,
            components: Vec::new(),
        }
    }

    /// 设置描述
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// 设置描述符路径
    pub fn with_descriptor_path(mut self, path: impl AsRef<Path>) -> Self {
        self.descriptor_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// 添加组件
    pub fn with_component(mut self, component_id: ComponentId) -> Self {
        if !self.components.contains(&component_id) {
            self.components.push(component_id);
        }
        self
    }

    /// 是否提供指定组件
    pub fn provides(&self, component_id: &ComponentId) -> bool {
        self.components.contains(component_id)
    }
}
