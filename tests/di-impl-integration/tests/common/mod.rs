//! 集成测试共用的模块描述符与加载器

#![allow(dead_code)]

use config_impl::FrameworkSettings;
use di_abstractions::{ComponentManager, LoadedModule, ModuleLoader};
use di_impl::{ComponentManagerImpl, StaticModuleLoader};
use infrastructure_common::{ComponentResult, ModuleId, ModuleMetadata};
use sample_module::SAMPLE_MODULE_ID;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

pub const LOGGER: &str = "c37ea0f8-5a2b-46a3-93b1-9e2b1c9f3e21";
pub const GREETER: &str = "9f3b1c7a-2e4d-4a6b-8c0e-5d7f9a1b3c2e";
pub const FILE_LOGGER: &str = "0b1a7e52-0f59-4a2e-8f07-5d2b4d4c9c11";
pub const AUDIT_LOGGER: &str = "7d4f2b6e-3c1a-4f8e-a2d5-9b0c6e1f4a37";
pub const GREETING_SERVICE: &str = "e2a94c1d-6b7f-4e3a-8c5d-1f0b2a3c4d5e";

/// 第二个模块，复用示例模块的注册函数
pub const EXTRA_MODULE_ID: ModuleId = ModuleId::from_u128(0x1d2c3b4a_5f6e_4d7c_8b9a_0f1e2d3c4b5a);

/// 示例模块描述符，GreetingService 位于最后，便于追加可注入依赖
pub fn sample_module_toml(greeting_extra: &str) -> String {
    format!(
        r#"
uuid = "5e0c9a43-8a8f-4d0e-9b61-2f4f3f7a1c10"
name = "sample-module"
path = "libsample_module.so"

[[components]]
uuid = "{FILE_LOGGER}"
name = "FileLogger"

[[components.interfaces]]
uuid = "{LOGGER}"
name = "ILogger"

[[components]]
uuid = "{AUDIT_LOGGER}"
name = "AuditLogger"

[[components.interfaces]]
uuid = "{LOGGER}"
name = "ILogger"

[[components]]
uuid = "{GREETING_SERVICE}"
name = "GreetingService"

[[components.interfaces]]
uuid = "{GREETER}"
name = "IGreeter"
{greeting_extra}
"#
    )
}

/// 统计打开次数的加载器
#[derive(Debug)]
pub struct CountingLoader {
    inner: StaticModuleLoader,
    loads: AtomicUsize,
}

impl CountingLoader {
    pub fn new() -> Self {
        let inner = StaticModuleLoader::new();
        inner.register_fn(SAMPLE_MODULE_ID, sample_module::register);
        inner.register_fn(EXTRA_MODULE_ID, sample_module::register);
        Self {
            inner,
            loads: AtomicUsize::new(0),
        }
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl ModuleLoader for CountingLoader {
    fn name(&self) -> &str {
        "CountingLoader"
    }

    fn supports(&self, module: &ModuleMetadata) -> bool {
        self.inner.supports(module)
    }

    fn load(&self, module: &ModuleMetadata) -> ComponentResult<LoadedModule> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load(module)
    }
}

/// 组件管理器加上描述符所在的临时目录
pub struct Harness {
    pub manager: ComponentManagerImpl,
    pub loader: Arc<CountingLoader>,
    pub dir: TempDir,
    pub descriptor: PathBuf,
}

impl Harness {
    /// 写入描述符但不加载
    pub fn new(settings: FrameworkSettings, greeting_extra: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let descriptor = dir.path().join("sample.module.toml");
        fs::write(&descriptor, sample_module_toml(greeting_extra)).unwrap();

        let manager = ComponentManagerImpl::new(settings);
        let loader = Arc::new(CountingLoader::new());
        manager.add_module_loader(loader.clone());

        Self {
            manager,
            loader,
            dir,
            descriptor,
        }
    }

    /// 写入并加载描述符
    pub fn loaded(settings: FrameworkSettings, greeting_extra: &str) -> Self {
        let harness = Self::new(settings, greeting_extra);
        harness.load();
        harness
    }

    /// 关闭自动绑定并加载示例模块
    pub fn manual() -> Self {
        Self::loaded(FrameworkSettings::default().with_autobind(false), "")
    }

    pub fn load(&self) {
        self.manager
            .load_module_metadata("sample-module", &self.descriptor)
            .unwrap();
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

pub fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
