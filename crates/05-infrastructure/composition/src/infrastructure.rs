//! 基础设施主入口

use crate::builder::InfrastructureBuilder;
use config_impl::FrameworkSettings;
use di_abstractions::{BindingInfo, ComponentManager};
use di_impl::ComponentManagerImpl;
use infrastructure_common::ModuleMetadata;
use std::sync::Arc;

/// 已组装的组件框架
///
/// 持有组件管理器，克隆只增加引用计数
#[derive(Debug, Clone)]
pub struct Infrastructure {
    manager: Arc<ComponentManagerImpl>,
}

impl Infrastructure {
    /// 创建基础设施构建器
    pub fn builder() -> InfrastructureBuilder {
        InfrastructureBuilder::new()
    }

    pub(crate) fn new(manager: Arc<ComponentManagerImpl>) -> Self {
        Self { manager }
    }

    /// 组件管理器
    pub fn component_manager(&self) -> Arc<ComponentManagerImpl> {
        Arc::clone(&self.manager)
    }

    pub fn settings(&self) -> &FrameworkSettings {
        self.manager.settings()
    }

    /// 已登记的模块
    pub fn modules(&self) -> Vec<ModuleMetadata> {
        self.manager.modules_metadata()
    }

    /// 当前绑定
    pub fn bindings(&self) -> Vec<BindingInfo> {
        self.manager.bindings()
    }
}
