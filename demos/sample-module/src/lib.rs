//! # Sample Module
//!
//! 示例模块：两个日志组件和一个依赖日志的问候服务。
//! 以 `cdylib` 构建时导出模块入口，也可作为普通库静态登记。

use component_macros::{interface, ComponentTraits};
use di_abstractions::{declare_module, ModuleRegistrar};
use infrastructure_common::{
    Component, ComponentBase, ComponentIntrospect, ComponentResult, Injected, ModuleId,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// 模块标识
pub const SAMPLE_MODULE_ID: ModuleId = ModuleId::from_u128(0x5e0c9a43_8a8f_4d0e_9b61_2f4f3f7a1c10);

/// 日志接口
#[interface(uuid = "c37ea0f8-5a2b-46a3-93b1-9e2b1c9f3e21", name = "ILogger", description = "日志接口")]
pub trait Logger: Send + Sync {
    fn log(&self, message: &str);

    /// 已记录的日志
    fn entries(&self) -> Vec<String>;
}

/// 问候接口
#[interface(uuid = "9f3b1c7a-2e4d-4a6b-8c0e-5d7f9a1b3c2e", name = "IGreeter")]
pub trait Greeter: Send + Sync {
    fn greet(&self, name: &str) -> String;
}

/// 带前缀的内存日志
#[derive(ComponentTraits)]
#[component(uuid = "0b1a7e52-0f59-4a2e-8f07-5d2b4d4c9c11", name = "FileLogger", description = "带前缀的内存日志")]
pub struct FileLogger {
    base: ComponentBase,
    prefix: String,
    entries: Mutex<Vec<String>>,
}

impl Component for FileLogger {
    fn create(instance_name: Option<&str>) -> ComponentResult<Self> {
        let mut base = ComponentBase::new::<Self>().with_instance_name(instance_name);
        base.add_interface::<dyn Logger, Self>(|c| c);
        Ok(Self {
            base,
            prefix: instance_name.unwrap_or("file").to_string(),
            entries: Mutex::new(Vec::new()),
        })
    }
}

impl ComponentIntrospect for FileLogger {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }
}

impl Logger for FileLogger {
    fn log(&self, message: &str) {
        self.entries.lock().push(format!("[{}] {}", self.prefix, message));
    }

    fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }
}

/// 审计日志
#[derive(ComponentTraits)]
#[component(uuid = "7d4f2b6e-3c1a-4f8e-a2d5-9b0c6e1f4a37", name = "AuditLogger")]
pub struct AuditLogger {
    base: ComponentBase,
    entries: Mutex<Vec<String>>,
}

impl Component for AuditLogger {
    fn create(instance_name: Option<&str>) -> ComponentResult<Self> {
        let mut base = ComponentBase::new::<Self>().with_instance_name(instance_name);
        base.add_interface::<dyn Logger, Self>(|c| c);
        Ok(Self {
            base,
            entries: Mutex::new(Vec::new()),
        })
    }
}

impl ComponentIntrospect for AuditLogger {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }
}

impl Logger for AuditLogger {
    fn log(&self, message: &str) {
        self.entries.lock().push(format!("audit: {}", message));
    }

    fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }
}

/// 问候服务
///
/// 必需一个未命名日志，可选一个名为 `audit` 的日志
#[derive(ComponentTraits)]
#[component(uuid = "e2a94c1d-6b7f-4e3a-8c5d-1f0b2a3c4d5e", name = "GreetingService")]
pub struct GreetingService {
    base: ComponentBase,
    logger: Injected<dyn Logger>,
    audit: Injected<dyn Logger>,
}

impl GreetingService {
    pub fn logger(&self) -> Option<&Arc<dyn Logger>> {
        self.logger.get()
    }

    pub fn audit(&self) -> Option<&Arc<dyn Logger>> {
        self.audit.get()
    }
}

impl Component for GreetingService {
    fn create(instance_name: Option<&str>) -> ComponentResult<Self> {
        let mut base = ComponentBase::new::<Self>().with_instance_name(instance_name);
        base.add_interface::<dyn Greeter, Self>(|c| c);
        base.declare_injectable::<dyn Logger, Self>(|s| &mut s.logger);
        base.declare_optional_injectable::<dyn Logger, Self>(Some("audit"), |s| &mut s.audit);
        Ok(Self {
            base,
            logger: Injected::empty(),
            audit: Injected::empty(),
        })
    }
}

impl ComponentIntrospect for GreetingService {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }

    fn on_injected(&mut self) -> ComponentResult<()> {
        self.logger.require()?;
        debug!("GreetingService 依赖注入完成, audit: {}", self.audit.is_injected());
        Ok(())
    }
}

impl Greeter for GreetingService {
    fn greet(&self, name: &str) -> String {
        let message = format!("Hello, {}!", name);
        if let Some(logger) = self.logger.get() {
            logger.log(&message);
        }
        if let Some(audit) = self.audit.get() {
            audit.log(&message);
        }
        message
    }
}

/// 登记模块中的所有组件
pub fn register(registrar: &mut dyn ModuleRegistrar) {
    registrar.register_component::<FileLogger>();
    registrar.register_component::<AuditLogger>();
    registrar.register_component::<GreetingService>();
}

declare_module!(register);
