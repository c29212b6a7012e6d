//! 绑定与解析集成测试

mod common;

use common::{Harness, GREETER, LOGGER};
use component_macros::{interface, ComponentTraits};
use config_impl::FrameworkSettings;
use di_abstractions::{factory_fn, BindingKind, ComponentManager, ComponentManagerExt, ModuleState};
use di_impl::{create_instance, get_component_manager_instance, ComponentManagerImpl};
use infrastructure_common::{
    create_boxed, Component, ComponentBase, ComponentError, ComponentId, ComponentIntrospect, ComponentRef,
    ComponentResult, ComponentTraits, ErrorCode, Injected, InterfaceTraits, Scope,
};
use sample_module::{AuditLogger, FileLogger, Greeter, GreetingService, Logger, SAMPLE_MODULE_ID};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[interface(uuid = "2c9d8e7f-6a5b-4c3d-9e1f-0a2b3c4d5e6f")]
trait Ping: Send + Sync {
    fn ping(&self) -> &'static str;
}

#[interface(uuid = "8a7b6c5d-4e3f-4a1b-8c9d-e0f1a2b3c4d5")]
trait Pong: Send + Sync {
    fn pong(&self) -> &'static str;
}

#[interface(uuid = "f0e1d2c3-b4a5-4968-8776-655443322110")]
trait Counter: Send + Sync {}

/// 依赖 Pong 的组件
#[derive(ComponentTraits)]
#[component(uuid = "11111111-2222-4333-8444-555555555555")]
struct PingComponent {
    base: ComponentBase,
    pong: Injected<dyn Pong>,
}

impl Component for PingComponent {
    fn create(_instance_name: Option<&str>) -> ComponentResult<Self> {
        let mut base = ComponentBase::new::<Self>();
        base.add_interface::<dyn Ping, Self>(|c| c);
        base.declare_injectable::<dyn Pong, Self>(|c| &mut c.pong);
        Ok(Self {
            base,
            pong: Injected::empty(),
        })
    }
}

impl ComponentIntrospect for PingComponent {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }
}

impl Ping for PingComponent {
    fn ping(&self) -> &'static str {
        "ping"
    }
}

/// 依赖 Ping 的组件
#[derive(ComponentTraits)]
#[component(uuid = "66666666-7777-4888-9999-aaaaaaaaaaaa")]
struct PongComponent {
    base: ComponentBase,
    ping: Injected<dyn Ping>,
}

impl Component for PongComponent {
    fn create(_instance_name: Option<&str>) -> ComponentResult<Self> {
        let mut base = ComponentBase::new::<Self>();
        base.add_interface::<dyn Pong, Self>(|c| c);
        base.declare_injectable::<dyn Ping, Self>(|c| &mut c.ping);
        Ok(Self {
            base,
            ping: Injected::empty(),
        })
    }
}

impl ComponentIntrospect for PongComponent {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }
}

impl Pong for PongComponent {
    fn pong(&self) -> &'static str {
        "pong"
    }
}

static SLOW_CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);

/// 构造缓慢的组件，用于并发首次解析
#[derive(ComponentTraits)]
#[component(uuid = "bbbbbbbb-cccc-4ddd-8eee-ffffffffffff")]
struct SlowCounter {
    base: ComponentBase,
}

impl Component for SlowCounter {
    fn create(_instance_name: Option<&str>) -> ComponentResult<Self> {
        SLOW_CONSTRUCTED.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(20));
        let mut base = ComponentBase::new::<Self>();
        base.add_interface::<dyn Counter, Self>(|c| c);
        Ok(Self { base })
    }
}

impl ComponentIntrospect for SlowCounter {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }
}

impl Counter for SlowCounter {}

static FRAGILE_CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);
static FRAGILE_DROPPED: AtomicUsize = AtomicUsize::new(0);

/// 依赖一个永远无法解析的命名接口
#[derive(ComponentTraits)]
#[component(uuid = "12345678-9abc-4def-8123-456789abcdef")]
struct FragileCounter {
    base: ComponentBase,
    missing: Injected<dyn Greeter>,
}

impl Component for FragileCounter {
    fn create(_instance_name: Option<&str>) -> ComponentResult<Self> {
        FRAGILE_CONSTRUCTED.fetch_add(1, Ordering::SeqCst);
        let mut base = ComponentBase::new::<Self>();
        base.add_interface::<dyn Counter, Self>(|c| c);
        base.declare_named_injectable::<dyn Greeter, Self>("missing", |c| &mut c.missing);
        Ok(Self {
            base,
            missing: Injected::empty(),
        })
    }
}

impl ComponentIntrospect for FragileCounter {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ComponentBase {
        &mut self.base
    }
}

impl Counter for FragileCounter {}

impl Drop for FragileCounter {
    fn drop(&mut self) {
        FRAGILE_DROPPED.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_bind_then_resolve_implements_interface() {
    let harness = Harness::manual();
    let manager = &harness.manager;
    manager.bind(<dyn Logger>::ID, FileLogger::ID, Scope::Transient);

    let component = manager.resolve(<dyn Logger>::ID).unwrap();
    assert!(component.implements(&<dyn Logger>::ID));
    assert_eq!(component.component_id(), FileLogger::ID);

    let logger = component.bind_to::<dyn Logger>().unwrap();
    logger.log("started");
    assert_eq!(logger.entries(), vec!["[file] started".to_string()]);
}

#[test]
fn test_unbound_interface_is_injectable_not_found() {
    let harness = Harness::manual();
    let err = harness.manager.resolve(<dyn Greeter>::ID).unwrap_err();

    assert!(matches!(
        err,
        ComponentError::InjectableNotFound { interface_id, name: None, .. } if interface_id == <dyn Greeter>::ID
    ));
    assert_eq!(err.code(), ErrorCode::InjectableNotFound);
}

#[test]
fn test_named_and_unnamed_bindings_are_independent() {
    let harness = Harness::manual();
    let manager = &harness.manager;
    manager.bind_named("audit", <dyn Logger>::ID, AuditLogger::ID, Scope::Transient);

    assert!(manager.resolve(<dyn Logger>::ID).is_err());
    let audit = manager.resolve_named(<dyn Logger>::ID, "audit").unwrap();
    assert_eq!(audit.component_id(), AuditLogger::ID);
    assert!(manager.resolve_named(<dyn Logger>::ID, "other").is_err());
}

#[test]
fn test_singleton_is_shared_across_unrelated_binds() {
    let harness = Harness::manual();
    let manager = &harness.manager;
    manager.bind(<dyn Logger>::ID, FileLogger::ID, Scope::Singleton);

    let first = manager.resolve(<dyn Logger>::ID).unwrap();
    manager.bind(<dyn Greeter>::ID, GreetingService::ID, Scope::Transient);
    manager.bind_named("audit", <dyn Logger>::ID, AuditLogger::ID, Scope::Singleton);
    let second = manager.resolve(<dyn Logger>::ID).unwrap();

    assert!(ComponentRef::ptr_eq(&first, &second));
    assert_eq!(harness.manager.cached_singletons(), 1);
}

#[test]
fn test_transient_creates_distinct_instances() {
    let harness = Harness::manual();
    let manager = &harness.manager;
    manager.bind(<dyn Logger>::ID, FileLogger::ID, Scope::Transient);

    let first = manager.resolve(<dyn Logger>::ID).unwrap();
    let second = manager.resolve(<dyn Logger>::ID).unwrap();
    assert!(!ComponentRef::ptr_eq(&first, &second));
    assert_eq!(harness.manager.cached_singletons(), 0);
}

#[test]
fn test_rebind_replaces_target_and_evicts_singleton() {
    let harness = Harness::manual();
    let manager = &harness.manager;
    manager.bind(<dyn Logger>::ID, FileLogger::ID, Scope::Singleton);
    let old = manager.resolve_as::<dyn Logger>().unwrap();

    manager.bind(<dyn Logger>::ID, AuditLogger::ID, Scope::Singleton);
    let new = manager.resolve(<dyn Logger>::ID).unwrap();
    assert_eq!(new.component_id(), AuditLogger::ID);

    old.log("still alive");
    assert_eq!(old.entries().len(), 1);
    assert!(new.bind_to::<dyn Logger>().unwrap().entries().is_empty());
}

#[test]
fn test_clear_then_reregister_reuses_loaded_module() {
    let harness = Harness::manual();
    let manager = &harness.manager;
    manager.bind(<dyn Logger>::ID, FileLogger::ID, Scope::Singleton);
    let before = manager.resolve_as::<dyn Logger>().unwrap();
    assert_eq!(harness.loader.loads(), 1);

    manager.clear();
    assert!(manager.bindings().is_empty());
    assert!(manager.modules_metadata().is_empty());
    assert_eq!(manager.module_state(SAMPLE_MODULE_ID).unwrap(), ModuleState::Loaded);
    assert!(manager.resolve(<dyn Logger>::ID).is_err());

    harness.load();
    manager.bind(<dyn Logger>::ID, FileLogger::ID, Scope::Singleton);
    let after = manager.resolve_as::<dyn Logger>().unwrap();

    assert_eq!(harness.loader.loads(), 1);
    assert_eq!(harness.manager.loaded_module_count(), 1);
    before.log("before");
    assert!(after.entries().is_empty());
}

#[test]
fn test_greeting_service_receives_singleton_logger_and_transient_audit() {
    let harness = Harness::manual();
    let manager = &harness.manager;
    manager.bind(<dyn Logger>::ID, FileLogger::ID, Scope::Singleton);
    manager.bind_named("audit", <dyn Logger>::ID, AuditLogger::ID, Scope::Transient);
    manager.bind(<dyn Greeter>::ID, GreetingService::ID, Scope::Transient);

    let first = manager.resolve(<dyn Greeter>::ID).unwrap();
    let second = manager.resolve(<dyn Greeter>::ID).unwrap();
    let first_service = first.downcast::<GreetingService>().unwrap();
    let second_service = second.downcast::<GreetingService>().unwrap();

    assert_eq!(first.bind_to::<dyn Greeter>().unwrap().greet("Lorn"), "Hello, Lorn!");

    let shared = manager.resolve_as::<dyn Logger>().unwrap();
    assert_eq!(shared.entries(), vec!["[file] Hello, Lorn!".to_string()]);
    assert_eq!(second_service.logger().unwrap().entries().len(), 1);

    assert_eq!(first_service.audit().unwrap().entries(), vec!["audit: Hello, Lorn!".to_string()]);
    assert!(second_service.audit().unwrap().entries().is_empty());
}

#[test]
fn test_optional_injectable_is_skipped_when_unbound() {
    let harness = Harness::manual();
    let manager = &harness.manager;
    manager.bind(<dyn Logger>::ID, FileLogger::ID, Scope::Transient);
    manager.bind(<dyn Greeter>::ID, GreetingService::ID, Scope::Transient);

    let service = manager
        .resolve(<dyn Greeter>::ID)
        .unwrap()
        .downcast::<GreetingService>()
        .unwrap();
    assert!(service.logger().is_some());
    assert!(service.audit().is_none());
}

#[test]
fn test_missing_required_injectable_fails_creation() {
    let harness = Harness::manual();
    let manager = &harness.manager;
    manager.bind(<dyn Greeter>::ID, GreetingService::ID, Scope::Singleton);

    let err = manager.resolve(<dyn Greeter>::ID).unwrap_err();
    assert!(matches!(
        err,
        ComponentError::InjectableNotFound { component_id: Some(id), .. } if id == GreetingService::ID
    ));
    assert_eq!(harness.manager.cached_singletons(), 0);
}

#[test]
fn test_failed_injection_discards_instance() {
    let manager = ComponentManagerImpl::default();
    manager.bind_local::<dyn Counter, FragileCounter>(Scope::Singleton);

    let err = manager.resolve(<dyn Counter>::ID).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InjectableNotFound);
    assert_eq!(manager.cached_singletons(), 0);
    assert_eq!(FRAGILE_CONSTRUCTED.load(Ordering::SeqCst), 1);
    assert_eq!(FRAGILE_DROPPED.load(Ordering::SeqCst), 1);
}

#[test]
fn test_concurrent_first_use_builds_one_singleton() {
    let manager = ComponentManagerImpl::default();
    manager.bind_local::<dyn Counter, SlowCounter>(Scope::Singleton);

    let instances: Vec<ComponentRef> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| manager.resolve(<dyn Counter>::ID).unwrap()))
            .collect();
        handles.into_iter().map(|handle| handle.join().unwrap()).collect()
    });

    assert_eq!(SLOW_CONSTRUCTED.load(Ordering::SeqCst), 1);
    assert!(instances
        .iter()
        .all(|instance| ComponentRef::ptr_eq(instance, &instances[0])));
}

#[test]
fn test_transient_cycle_is_detected() {
    let manager = ComponentManagerImpl::default();
    manager.bind_local::<dyn Ping, PingComponent>(Scope::Transient);
    manager.bind_local::<dyn Pong, PongComponent>(Scope::Transient);

    let err = manager.resolve(<dyn Ping>::ID).unwrap_err();
    assert!(matches!(err, ComponentError::CircularDependency { .. }));
    assert_eq!(err.code(), ErrorCode::IllegalState);
}

#[test]
fn test_singleton_cycle_is_detected_without_deadlock() {
    let manager = ComponentManagerImpl::default();
    manager.bind_local::<dyn Ping, PingComponent>(Scope::Singleton);
    manager.bind_local::<dyn Pong, PongComponent>(Scope::Singleton);

    let err = manager.resolve(<dyn Pong>::ID).unwrap_err();
    assert!(matches!(err, ComponentError::CircularDependency { .. }));
    assert_eq!(manager.cached_singletons(), 0);
}

#[test]
fn test_resolution_depth_is_limited() {
    let harness = Harness::loaded(FrameworkSettings::default().with_max_resolution_depth(1), "");

    let err = harness.manager.resolve(<dyn Greeter>::ID).unwrap_err();
    assert!(matches!(err, ComponentError::CircularDependency { .. }));
}

#[test]
fn test_resolution_depth_counts_component_levels() {
    let harness = Harness::loaded(FrameworkSettings::default().with_max_resolution_depth(2), "");

    let greeter = harness.manager.resolve(<dyn Greeter>::ID).unwrap();
    assert_eq!(greeter.component_id(), GreetingService::ID);
}

#[test]
fn test_factory_target_must_implement_interface() {
    let manager = ComponentManagerImpl::default();
    manager.bind_local::<dyn Ping, SlowCounter>(Scope::Transient);

    let err = manager.resolve(<dyn Ping>::ID).unwrap_err();
    assert!(matches!(
        err,
        ComponentError::InterfaceNotImplemented { component_id, .. } if component_id == SlowCounter::ID
    ));
}

#[test]
fn test_component_binding_must_implement_interface() {
    let harness = Harness::manual();
    harness
        .manager
        .bind(<dyn Greeter>::ID, FileLogger::ID, Scope::Transient);

    let err = harness.manager.resolve(<dyn Greeter>::ID).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InterfaceNotImplemented);
}

#[test]
fn test_typed_helpers() {
    let manager = ComponentManagerImpl::default();
    manager.bind_local::<dyn Logger, FileLogger>(Scope::Singleton);
    manager.bind_local_named::<dyn Logger, AuditLogger>("audit", Scope::Transient);

    let logger = manager.resolve_as::<dyn Logger>().unwrap();
    logger.log("typed");
    assert_eq!(manager.resolve_as::<dyn Logger>().unwrap().entries().len(), 1);
    assert!(manager
        .resolve_named_as::<dyn Logger>("audit")
        .unwrap()
        .entries()
        .is_empty());

    let bindings = manager.bindings();
    assert_eq!(bindings.len(), 2);
    assert!(bindings.iter().all(|binding| binding.kind == BindingKind::Factory));

    let err = manager.create_as::<dyn Logger>(FileLogger::ID).err().unwrap();
    assert!(matches!(err, ComponentError::ComponentNotFound { .. }));
}

#[test]
fn test_bind_factory_closure() {
    let manager = ComponentManagerImpl::default();
    manager.bind_factory(
        <dyn Logger>::ID,
        AuditLogger::ID,
        factory_fn(|| create_boxed::<AuditLogger>(Some("audit"))),
        Scope::Transient,
    );

    let component = manager.resolve(<dyn Logger>::ID).unwrap();
    assert_eq!(component.instance_name(), Some("audit"));
    assert_eq!(component.component_id(), AuditLogger::ID);
}

#[test]
fn test_create_component_uses_module_factory() {
    let harness = Harness::manual();
    let manager = &harness.manager;

    let logger = manager.create_as::<dyn Logger>(FileLogger::ID).unwrap();
    logger.log("direct");
    assert_eq!(logger.entries(), vec!["[file] direct".to_string()]);

    let named = manager.create_named::<FileLogger>("app").unwrap();
    assert_eq!(named.instance_name(), Some("app"));
    let named = named.bind_to::<dyn Logger>().unwrap();
    named.log("named");
    assert_eq!(named.entries(), vec!["[app] named".to_string()]);

    let err = manager.create_component(ComponentId::from_u128(42)).unwrap_err();
    assert!(matches!(err, ComponentError::ComponentNotFound { .. }));
}

#[test]
fn test_component_ref_keeps_interfaces_alive() {
    let harness = Harness::manual();
    let component = harness.manager.create::<FileLogger>().unwrap();
    let logger = component.bind_to::<dyn Logger>().unwrap();
    assert_eq!(component.use_count(), 2);

    drop(component);
    logger.log("after drop");
    assert_eq!(logger.entries().len(), 1);
}

#[test]
fn test_global_manager_is_process_wide() {
    let first = get_component_manager_instance();
    let second = get_component_manager_instance();
    assert!(Arc::ptr_eq(&first, &second));

    let err = create_instance(ComponentId::from_u128(7)).unwrap_err();
    assert_eq!(err.code(), ErrorCode::ComponentNotFound);
}

#[test]
fn test_identity_constants_match_descriptors() {
    assert_eq!(<dyn Logger>::ID.to_string(), LOGGER);
    assert_eq!(<dyn Greeter>::ID.to_string(), GREETER);
}
