//! 框架设置
//!
//! 加载顺序：内置默认值 → 可选设置文件 → 环境变量（`LORN_FRAMEWORK__*`）

use config::{Config, Environment, File, FileFormat};
use infrastructure_common::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, error};

/// 环境变量前缀
pub const SETTINGS_ENV_PREFIX: &str = "LORN_FRAMEWORK";

const DEFAULT_SETTINGS_TOML: &str = r#"
registry_env_var = "LORN_REGISTRY_PATH"
home_dir_name = ".lorn"
registry_suffixes = [".registry.toml", ".registry.json"]
module_suffixes = [".module.toml", ".module.json"]
autobind = true
max_resolution_depth = 64
"#;

/// 组件框架设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkSettings {
    /// 指向注册表文件的环境变量名
    pub registry_env_var: String,
    /// 用户目录下的框架目录名
    pub home_dir_name: String,
    /// 注册表文件后缀
    pub registry_suffixes: Vec<String>,
    /// 模块文件后缀
    pub module_suffixes: Vec<String>,
    /// 加载描述符时是否为组件声明的接口自动绑定
    pub autobind: bool,
    /// 最大解析深度，按同时构造中的组件层数计算
    pub max_resolution_depth: usize,
}

impl FrameworkSettings {
    /// 从默认值与环境变量加载
    pub fn load() -> ConfigResult<Self> {
        Self::build(None)
    }

    /// 从指定设置文件加载，环境变量仍然优先
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.is_file() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        Self::build(Some(path))
    }

    fn build(path: Option<&Path>) -> ConfigResult<Self> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_SETTINGS_TOML, FileFormat::Toml));
        if let Some(path) = path {
            debug!("加载框架设置文件: {}", path.display());
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(
            Environment::with_prefix(SETTINGS_ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let settings: Self = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| {
                error!("框架设置加载失败: {}", e);
                ConfigError::ParseError { source: Box::new(e) }
            })?;
        settings.validate()?;
        Ok(settings)
    }

    /// 验证设置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_resolution_depth == 0 {
            return Err(ConfigError::ValidationError {
                message: "max_resolution_depth 必须大于 0".to_string(),
            });
        }
        if self.registry_env_var.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "registry_env_var 不能为空".to_string(),
            });
        }
        if self.registry_suffixes.iter().chain(&self.module_suffixes).any(|s| s.is_empty()) {
            return Err(ConfigError::ValidationError {
                message: "文件后缀不能为空".to_string(),
            });
        }
        Ok(())
    }

    /// 是否为注册表文件
    pub fn is_registry_file(&self, path: &Path) -> bool {
        matches_suffix(path, &self.registry_suffixes)
    }

    /// 是否为模块文件
    pub fn is_module_file(&self, path: &Path) -> bool {
        matches_suffix(path, &self.module_suffixes)
    }

    /// 设置是否自动绑定
    pub fn with_autobind(mut self, autobind: bool) -> Self {
        self.autobind = autobind;
        self
    }

    /// 设置最大解析深度
    pub fn with_max_resolution_depth(mut self, depth: usize) -> Self {
        self.max_resolution_depth = depth;
        self
    }
}

impl Default for FrameworkSettings {
    fn default() -> Self {
        Self {
            registry_env_var: "LORN_REGISTRY_PATH".to_string(),
            home_dir_name: ".lorn".to_string(),
            registry_suffixes: vec![".registry.toml".to_string(), ".registry.json".to_string()],
            module_suffixes: vec![".module.toml".to_string(), ".module.json".to_string()],
            autobind: true,
            max_resolution_depth: 64,
        }
    }
}

fn matches_suffix(path: &Path, suffixes: &[String]) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| {
            let name = name.to_ascii_lowercase();
            suffixes.iter().any(|suffix| name.ends_with(&suffix.to_ascii_lowercase()))
        })
        .unwrap_or(false)
}
