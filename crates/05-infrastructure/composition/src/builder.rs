//! 基础设施构建器

use crate::error::BootstrapResult;
use crate::infrastructure::Infrastructure;
use config_abstractions::DescriptorReader;
use config_impl::{DescriptorReaders, FrameworkSettings, RegistryDiscovery};
use di_abstractions::{ComponentManager, ModuleLoader, ModuleRegistrar};
use di_impl::{ComponentManagerImpl, StaticModuleLoader};
use infrastructure_common::ModuleId;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

const DEVELOPMENT_SETTINGS_FILE: &str = "./lorn.dev.toml";
const PRODUCTION_SETTINGS_FILE: &str = "./lorn.prod.toml";

/// 基础设施构建器
///
/// 使用建造者模式组装组件管理器
pub struct InfrastructureBuilder {
    /// 显式指定的框架设置
    settings: Option<FrameworkSettings>,
    /// 框架设置文件
    settings_file: Option<PathBuf>,
    /// 覆盖设置中的自动绑定开关
    autobind: Option<bool>,
    /// 额外的描述符读取器
    readers: Vec<Box<dyn DescriptorReader>>,
    /// 额外的模块加载器
    loaders: Vec<Arc<dyn ModuleLoader>>,
    /// 静态链接的模块
    static_modules: Vec<(ModuleId, fn(&mut dyn ModuleRegistrar))>,
    /// 注册表发现使用的用户目录
    home_dir: Option<PathBuf>,
    /// 是否按默认发现规则加载注册表
    load_default_registries: bool,
    registry_files: Vec<PathBuf>,
    registry_folders: Vec<(PathBuf, bool)>,
    module_folders: Vec<(PathBuf, bool)>,
    /// 是否启用日志初始化
    logging_enabled: bool,
    /// 日志配置
    logging_config: LoggingConfig,
}

impl InfrastructureBuilder {
    /// 创建新的基础设施构建器
    pub fn new() -> Self {
        Self {
            settings: None,
            settings_file: None,
            autobind: None,
            readers: Vec::new(),
            loaders: Vec::new(),
            static_modules: Vec::new(),
            home_dir: None,
            load_default_registries: false,
            registry_files: Vec::new(),
            registry_folders: Vec::new(),
            module_folders: Vec::new(),
            logging_enabled: false,
            logging_config: LoggingConfig::default(),
        }
    }

    /// 直接使用给定的框架设置，不再读取设置文件与环境变量
    pub fn with_settings(mut self, settings: FrameworkSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    /// 从设置文件加载框架设置
    pub fn with_settings_file<P: AsRef<Path>>(mut self, path: P) -> BootstrapResult<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(infrastructure_common::ConfigError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }
        info!("添加框架设置文件: {}", path.display());
        self.settings_file = Some(path.to_path_buf());
        Ok(self)
    }

    /// 启用或禁用自动绑定
    pub fn enable_autobind(mut self, enabled: bool) -> Self {
        self.autobind = Some(enabled);
        self
    }

    /// 添加自定义描述符读取器
    pub fn add_descriptor_reader<R: DescriptorReader + 'static>(mut self, reader: R) -> Self {
        info!("添加描述符读取器: {}", reader.name());
        self.readers.push(Box::new(reader));
        self
    }

    /// 添加模块加载器，后添加的优先
    pub fn add_module_loader(mut self, loader: Arc<dyn ModuleLoader>) -> Self {
        info!("添加模块加载器: {}", loader.name());
        self.loaders.push(loader);
        self
    }

    /// 登记静态链接的模块
    pub fn add_static_module(mut self, module_id: ModuleId, register: fn(&mut dyn ModuleRegistrar)) -> Self {
        debug!("添加静态模块: {}", module_id);
        self.static_modules.push((module_id, register));
        self
    }

    /// 指定注册表发现使用的用户目录
    pub fn with_home_dir<P: Into<PathBuf>>(mut self, home_dir: P) -> Self {
        self.home_dir = Some(home_dir.into());
        self
    }

    /// 构建时按默认发现规则加载注册表
    pub fn load_default_registries(mut self, enabled: bool) -> Self {
        self.load_default_registries = enabled;
        self
    }

    /// 添加注册表文件
    pub fn add_registry_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.registry_files.push(path.into());
        self
    }

    /// 添加注册表目录
    pub fn add_registry_folder<P: Into<PathBuf>>(mut self, folder: P, recurse: bool) -> Self {
        self.registry_folders.push((folder.into(), recurse));
        self
    }

    /// 添加模块描述符目录
    pub fn add_module_folder<P: Into<PathBuf>>(mut self, folder: P, recurse: bool) -> Self {
        self.module_folders.push((folder.into(), recurse));
        self
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = config;
        self.logging_enabled = true;
        self
    }

    /// 自动配置开发环境
    pub fn auto_configure_development(mut self) -> Self {
        info!("自动配置开发环境");
        if Path::new(DEVELOPMENT_SETTINGS_FILE).is_file() {
            debug!("添加开发环境设置: {}", DEVELOPMENT_SETTINGS_FILE);
            self.settings_file = Some(PathBuf::from(DEVELOPMENT_SETTINGS_FILE));
        }
        self.load_default_registries = true;
        self.with_logging(LoggingConfig::development())
    }

    /// 自动配置生产环境
    pub fn auto_configure_production(mut self) -> Self {
        info!("自动配置生产环境");
        if Path::new(PRODUCTION_SETTINGS_FILE).is_file() {
            debug!("添加生产环境设置: {}", PRODUCTION_SETTINGS_FILE);
            self.settings_file = Some(PathBuf::from(PRODUCTION_SETTINGS_FILE));
        }
        self.load_default_registries = true;
        self.with_logging(LoggingConfig::production())
    }

    /// 构建基础设施实例
    pub fn build(self) -> BootstrapResult<Infrastructure> {
        // 只有在明确配置了日志时才初始化日志
        if self.logging_enabled {
            self.initialize_logging();
        }
        info!("开始构建基础设施");

        let mut settings = match (self.settings, &self.settings_file) {
            (Some(settings), _) => settings,
            (None, Some(path)) => FrameworkSettings::load_from(path)?,
            (None, None) => FrameworkSettings::load()?,
        };
        if let Some(autobind) = self.autobind {
            settings = settings.with_autobind(autobind);
        }
        settings.validate()?;

        let mut readers = DescriptorReaders::with_defaults();
        for reader in self.readers {
            readers.register(reader);
        }

        let mut manager = ComponentManagerImpl::with_readers(settings.clone(), readers);
        if let Some(home_dir) = self.home_dir {
            manager = manager.with_discovery(RegistryDiscovery::new(settings).with_home_dir(home_dir));
        }

        for loader in self.loaders {
            manager.add_module_loader(loader);
        }
        if !self.static_modules.is_empty() {
            let loader = StaticModuleLoader::new();
            for (module_id, register) in self.static_modules {
                loader.register_fn(module_id, register);
            }
            manager.add_module_loader(Arc::new(loader));
        }

        if self.load_default_registries {
            manager.load()?;
        }
        for path in &self.registry_files {
            manager.load_file(path)?;
        }
        for (folder, recurse) in &self.registry_folders {
            manager.load_folder(folder, *recurse)?;
        }
        for (folder, recurse) in &self.module_folders {
            manager.load_modules(folder, *recurse)?;
        }

        let infrastructure = Infrastructure::new(Arc::new(manager));
        info!(
            "基础设施构建完成: {} 个模块, {} 个绑定",
            infrastructure.modules().len(),
            infrastructure.bindings().len()
        );
        Ok(infrastructure)
    }

    /// 初始化日志系统，已有全局订阅者时保持不变
    fn initialize_logging(&self) {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(self.logging_config.level)
            .with_target(self.logging_config.show_target)
            .with_thread_ids(self.logging_config.show_thread_ids)
            .with_file(self.logging_config.show_file)
            .with_line_number(self.logging_config.show_line_number);

        let result = if self.logging_config.json_format {
            subscriber.json().try_init()
        } else {
            subscriber.try_init()
        };

        match result {
            Ok(()) => info!("日志系统初始化完成"),
            Err(e) => debug!("日志系统已初始化, 跳过: {}", e),
        }
    }
}

impl Default for InfrastructureBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: tracing::Level,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }
}
