//! 描述符读取器抽象接口

use crate::descriptor::{ModuleDescriptor, RegistryDescriptor};
use infrastructure_common::{ComponentError, ComponentResult, ConfigError, ConfigResult};
use std::path::Path;
use tracing::debug;

/// 描述符读取器 trait
///
/// 每种文件格式一个实现，按文件路径判断是否支持
pub trait DescriptorReader: Send + Sync {
    /// 读取器名称
    fn name(&self) -> &str;

    /// 是否支持该文件
    fn supports(&self, path: &Path) -> bool;

    /// 解析注册表内容
    fn parse_registry(&self, content: &str) -> ConfigResult<RegistryDescriptor>;

    /// 解析模块内容
    fn parse_module(&self, content: &str) -> ConfigResult<ModuleDescriptor>;

    /// 读取并验证注册表文件，相对动态库路径以文件所在目录为基准
    fn read_registry(&self, path: &Path) -> ComponentResult<RegistryDescriptor> {
        debug!("{} 读取注册表: {}", self.name(), path.display());
        let content = read_content(path)?;
        let mut registry = self
            .parse_registry(&content)
            .and_then(|registry| registry.validate().map(|_| registry))
            .map_err(|e| descriptor_error(path, e))?;
        registry.resolve_paths(base_dir(path));
        Ok(registry)
    }

    /// 读取并验证模块文件
    fn read_module(&self, path: &Path) -> ComponentResult<ModuleDescriptor> {
        debug!("{} 读取模块描述符: {}", self.name(), path.display());
        let content = read_content(path)?;
        let mut module = self
            .parse_module(&content)
            .and_then(|module| module.validate().map(|_| module))
            .map_err(|e| descriptor_error(path, e))?;
        module.resolve_path(base_dir(path));
        Ok(module)
    }
}

/// 按扩展名判断文件格式（忽略大小写）
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

fn read_content(path: &Path) -> ComponentResult<String> {
    if !path.is_file() {
        return Err(descriptor_error(
            path,
            ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
        ));
    }
    std::fs::read_to_string(path).map_err(|e| descriptor_error(path, ConfigError::from(e)))
}

fn base_dir(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new("."))
}

fn descriptor_error(path: &Path, error: ConfigError) -> ComponentError {
    ComponentError::descriptor(path.display().to_string(), error)
}
