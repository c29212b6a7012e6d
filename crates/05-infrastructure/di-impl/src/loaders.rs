//! 模块加载器实现

use di_abstractions::{
    type_fingerprint, LoadedModule, ModuleDeclaration, ModuleLoader, ModuleRegistrar, CORE_VERSION,
    MODULE_ABI_VERSION, MODULE_DECLARATION_SYMBOL,
};
use infrastructure_common::{ComponentError, ComponentResult, ModuleId, ModuleMetadata};
use libloading::Library;
use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// 已打开的动态库，进程结束前不卸载
///
/// 组件实例、接口引用与注入到其他组件的字段都指向库内的代码和虚表，
/// 它们可以比创建它们的管理器活得更久
static OPENED_LIBRARIES: Lazy<Mutex<HashMap<PathBuf, Arc<Library>>>> = Lazy::new(Default::default);

/// 动态库加载器
///
/// 打开模块文件并读取导出的 [`ModuleDeclaration`]。
/// 库一经打开便保留到进程退出，同一路径再次加载时复用已有映射。
#[derive(Debug, Default, Clone, Copy)]
pub struct LibraryModuleLoader;

impl LibraryModuleLoader {
    pub fn new() -> Self {
        Self
    }

    /// 该路径的动态库是否已被打开并保留
    pub fn is_retained(path: &Path) -> bool {
        OPENED_LIBRARIES.lock().contains_key(&library_key(path))
    }

    /// 已保留的动态库数量
    pub fn retained_count() -> usize {
        OPENED_LIBRARIES.lock().len()
    }

    fn open(module: &ModuleMetadata) -> ComponentResult<Arc<Library>> {
        let key = library_key(&module.path);
        let mut opened = OPENED_LIBRARIES.lock();
        if let Some(library) = opened.get(&key) {
            debug!("复用已打开的动态库: {}", key.display());
            return Ok(Arc::clone(library));
        }

        info!("打开模块 {}: {}", module.name, key.display());
        // 打开动态库会执行其初始化代码
        let library = unsafe { Library::new(&key) }
            .map_err(|e| ComponentError::module_with_id(module.id, format!("动态库打开失败: {}", e)))?;
        let library = Arc::new(library);
        opened.insert(key, Arc::clone(&library));
        Ok(library)
    }
}

impl ModuleLoader for LibraryModuleLoader {
    fn name(&self) -> &str {
        "LibraryModuleLoader"
    }

    fn supports(&self, _module: &ModuleMetadata) -> bool {
        true
    }

    fn load(&self, module: &ModuleMetadata) -> ComponentResult<LoadedModule> {
        if !module.path.is_file() {
            return Err(ComponentError::module_with_id(
                module.id,
                format!("模块文件不存在: {}", module.path.display()),
            ));
        }

        let library = Self::open(module)?;
        let symbol_name = format!("{}\0", MODULE_DECLARATION_SYMBOL);

        // 入口符号的类型由 declare_module! 固定，兼容性在使用前校验
        let declaration = unsafe {
            let symbol = library
                .get::<*const ModuleDeclaration>(symbol_name.as_bytes())
                .map_err(|e| {
                    ComponentError::module_with_id(
                        module.id,
                        format!("缺少入口符号 {}: {}", MODULE_DECLARATION_SYMBOL, e),
                    )
                })?;
            **symbol
        };

        let loaded = LoadedModule::from_declaration(module.id, &declaration)?;
        Ok(loaded.with_handle(Box::new(library)))
    }
}

fn library_key(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// 静态模块加载器
///
/// 进程内登记的模块入口，用于静态链接的模块
#[derive(Debug, Default)]
pub struct StaticModuleLoader {
    declarations: RwLock<HashMap<ModuleId, ModuleDeclaration>>,
}

impl StaticModuleLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记模块入口声明
    pub fn register(&self, module_id: ModuleId, declaration: ModuleDeclaration) {
        debug!("登记静态模块 {}", module_id);
        self.declarations.write().insert(module_id, declaration);
    }

    /// 以当前框架版本登记注册函数
    pub fn register_fn(&self, module_id: ModuleId, register: fn(&mut dyn ModuleRegistrar)) {
        self.register(
            module_id,
            ModuleDeclaration {
                abi_version: MODULE_ABI_VERSION,
                core_version: CORE_VERSION,
                type_fingerprint,
                register,
            },
        );
    }

    /// 链式登记
    pub fn with_module(self, module_id: ModuleId, declaration: ModuleDeclaration) -> Self {
        self.register(module_id, declaration);
        self
    }
}

impl ModuleLoader for StaticModuleLoader {
    fn name(&self) -> &str {
        "StaticModuleLoader"
    }

    fn supports(&self, module: &ModuleMetadata) -> bool {
        self.declarations.read().contains_key(&module.id)
    }

    fn load(&self, module: &ModuleMetadata) -> ComponentResult<LoadedModule> {
        let declaration = self
            .declarations
            .read()
            .get(&module.id)
            .copied()
            .ok_or(ComponentError::ModuleNotFound { module_id: module.id })?;
        info!("加载静态模块 {} ({})", module.name, module.id);
        LoadedModule::from_declaration(module.id, &declaration)
    }
}
