//! 模块管理器
//!
//! 每个模块标识对应一个槽位，首次需要时通过加载器打开，之后永不重新打开。
//! 打开失败同样被缓存，后续请求直接返回相同的错误。

use dashmap::DashMap;
use di_abstractions::{LoadedModule, ModuleLoader, ModuleState};
use infrastructure_common::{ComponentError, ComponentResult, ModuleId, ModuleMetadata};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug)]
enum SlotState {
    Registered,
    Loaded(Arc<LoadedModule>),
    Failed(String),
}

#[derive(Debug)]
struct ModuleSlot {
    state: Mutex<SlotState>,
}

/// 模块管理器
pub struct ModuleManager {
    loaders: RwLock<Vec<Arc<dyn ModuleLoader>>>,
    slots: DashMap<ModuleId, Arc<ModuleSlot>>,
}

impl ModuleManager {
    pub fn new() -> Self {
        Self {
            loaders: RwLock::new(Vec::new()),
            slots: DashMap::new(),
        }
    }

    /// 添加加载器，新加载器优先于已有加载器
    pub fn add_loader(&self, loader: Arc<dyn ModuleLoader>) {
        info!("添加模块加载器: {}", loader.name());
        self.loaders.write().insert(0, loader);
    }

    /// 已添加的加载器名称
    pub fn loader_names(&self) -> Vec<String> {
        self.loaders
            .read()
            .iter()
            .map(|loader| loader.name().to_string())
            .collect()
    }

    /// 确保模块已打开，返回其工厂表
    ///
    /// 同一模块的并发打开请求被串行化
    pub fn ensure_loaded(&self, module: &ModuleMetadata) -> ComponentResult<Arc<LoadedModule>> {
        let slot = self.slot(module.id);
        let mut state = slot.state.lock();

        match &*state {
            SlotState::Loaded(loaded) => {
                loaded.verify(module)?;
                Ok(Arc::clone(loaded))
            }
            SlotState::Failed(message) => Err(ComponentError::module_with_id(module.id, message.clone())),
            SlotState::Registered => match self.open(module) {
                Ok(loaded) => {
                    let loaded = Arc::new(loaded);
                    *state = SlotState::Loaded(Arc::clone(&loaded));
                    info!("模块已加载: {} ({})", module.name, module.id);
                    Ok(loaded)
                }
                Err(e) => {
                    error!("模块加载失败: {} ({}): {}", module.name, module.id, e);
                    *state = SlotState::Failed(e.to_string());
                    Err(e)
                }
            },
        }
    }

    /// 模块状态，从未请求打开的模块返回 `None`
    pub fn state(&self, module_id: &ModuleId) -> Option<ModuleState> {
        let slot = self.slots.get(module_id).map(|slot| Arc::clone(slot.value()))?;
        let state = match slot.state.try_lock() {
            None => ModuleState::Loading,
            Some(state) => match &*state {
                SlotState::Registered => ModuleState::Registered,
                SlotState::Loaded(_) => ModuleState::Loaded,
                SlotState::Failed(_) => ModuleState::Failed,
            },
        };
        Some(state)
    }

    /// 已打开的模块数量
    pub fn loaded_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot.state.try_lock().as_deref(), Some(SlotState::Loaded(_))))
            .count()
    }

    fn slot(&self, module_id: ModuleId) -> Arc<ModuleSlot> {
        let slot = self.slots.entry(module_id).or_insert_with(|| {
            Arc::new(ModuleSlot {
                state: Mutex::new(SlotState::Registered),
            })
        });
        Arc::clone(slot.value())
    }

    fn open(&self, module: &ModuleMetadata) -> ComponentResult<LoadedModule> {
        let loader = self
            .loaders
            .read()
            .iter()
            .find(|loader| loader.supports(module))
            .cloned()
            .ok_or_else(|| {
                ComponentError::module_with_id(module.id, format!("没有可加载模块 {} 的加载器", module.name))
            })?;

        let loaded = loader.load(module)?;
        loaded.verify(module)?;
        Ok(loaded)
    }
}

impl Default for ModuleManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ModuleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModuleManager")
            .field("loaders", &self.loader_names())
            .field("modules", &self.slots.len())
            .finish()
    }
}
