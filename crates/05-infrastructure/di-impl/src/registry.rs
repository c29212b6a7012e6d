//! 绑定注册表
//!
//! 每个绑定键（接口 + 可选名称）至多一个绑定。单例绑定自带实例单元，
//! 重新绑定会替换整个绑定，从而同时淘汰旧的缓存实例。

use di_abstractions::{BindingInfo, BindingKind, BoundFactory};
use infrastructure_common::{ComponentId, ComponentRef, InterfaceId, Scope};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// 绑定键
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingKey {
    pub interface_id: InterfaceId,
    pub name: Option<String>,
}

impl BindingKey {
    pub fn new(interface_id: InterfaceId, name: Option<&str>) -> Self {
        Self {
            interface_id,
            name: name.map(str::to_string),
        }
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{}[{}]", self.interface_id, name),
            None => write!(f, "{}", self.interface_id),
        }
    }
}

/// 绑定目标
#[derive(Clone)]
pub enum BindingTarget {
    /// 通过所属模块的工厂创建
    Component,
    /// 通过显式工厂创建
    Factory(BoundFactory),
}

/// 绑定
#[derive(Clone)]
pub struct Binding {
    pub component_id: ComponentId,
    pub target: BindingTarget,
    pub scope: Scope,
    singleton: Arc<OnceCell<ComponentRef>>,
}

impl Binding {
    pub fn component(component_id: ComponentId, scope: Scope) -> Self {
        Self::with_target(component_id, BindingTarget::Component, scope)
    }

    pub fn factory(component_id: ComponentId, factory: BoundFactory, scope: Scope) -> Self {
        Self::with_target(component_id, BindingTarget::Factory(factory), scope)
    }

    fn with_target(component_id: ComponentId, target: BindingTarget, scope: Scope) -> Self {
        Self {
            component_id,
            target,
            scope,
            singleton: Arc::new(OnceCell::new()),
        }
    }

    /// 单例实例单元
    pub fn singleton_cell(&self) -> &OnceCell<ComponentRef> {
        &self.singleton
    }

    pub fn kind(&self) -> BindingKind {
        match self.target {
            BindingTarget::Component => BindingKind::Component,
            BindingTarget::Factory(_) => BindingKind::Factory,
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("component_id", &self.component_id)
            .field("kind", &self.kind())
            .field("scope", &self.scope)
            .field("cached", &self.singleton.get().is_some())
            .finish()
    }
}

/// 绑定注册表
#[derive(Debug, Default)]
pub struct BindingRegistry {
    bindings: RwLock<HashMap<BindingKey, Binding>>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加或替换绑定
    pub fn bind(&self, key: BindingKey, binding: Binding) {
        info!("绑定 {} -> {} ({})", key, binding.component_id, binding.scope);
        if let Some(previous) = self.bindings.write().insert(key, binding) {
            if previous.singleton.get().is_some() {
                debug!("淘汰组件 {} 的单例缓存", previous.component_id);
            }
        }
    }

    /// 键未绑定时添加，返回是否添加
    pub fn bind_if_absent(&self, key: BindingKey, binding: Binding) -> bool {
        let mut bindings = self.bindings.write();
        if bindings.contains_key(&key) {
            return false;
        }
        debug!("自动绑定 {} -> {}", key, binding.component_id);
        bindings.insert(key, binding);
        true
    }

    /// 获取绑定的副本，调用方在锁外构造实例
    pub fn get(&self, key: &BindingKey) -> Option<Binding> {
        self.bindings.read().get(key).cloned()
    }

    pub fn contains(&self, key: &BindingKey) -> bool {
        self.bindings.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.bindings.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.read().is_empty()
    }

    /// 已缓存的单例数量
    pub fn cached_singletons(&self) -> usize {
        self.bindings
            .read()
            .values()
            .filter(|binding| binding.singleton.get().is_some())
            .count()
    }

    /// 绑定快照，按接口与名称排序
    pub fn snapshot(&self) -> Vec<BindingInfo> {
        let mut infos: Vec<BindingInfo> = self
            .bindings
            .read()
            .iter()
            .map(|(key, binding)| BindingInfo {
                interface_id: key.interface_id,
                name: key.name.clone(),
                component_id: binding.component_id,
                scope: binding.scope,
                kind: binding.kind(),
            })
            .collect();
        infos.sort_by(|a, b| (a.interface_id, &a.name).cmp(&(b.interface_id, &b.name)));
        infos
    }

    /// 清除所有绑定及其单例缓存
    pub fn clear(&self) {
        let removed = std::mem::take(&mut *self.bindings.write());
        debug!("清除 {} 个绑定", removed.len());
    }
}
