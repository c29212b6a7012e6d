//! 描述符读取器实现

use config_abstractions::{has_extension, DescriptorReader, ModuleDescriptor, RegistryDescriptor};
use infrastructure_common::{ComponentError, ComponentResult, ConfigError, ConfigResult};
use std::path::Path;
use tracing::debug;

/// TOML 描述符读取器
#[derive(Debug, Default, Clone, Copy)]
pub struct TomlDescriptorReader;

impl DescriptorReader for TomlDescriptorReader {
    fn name(&self) -> &str {
        "TomlDescriptorReader"
    }

    fn supports(&self, path: &Path) -> bool {
        has_extension(path, &["toml"])
    }

    fn parse_registry(&self, content: &str) -> ConfigResult<RegistryDescriptor> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError { source: Box::new(e) })
    }

    fn parse_module(&self, content: &str) -> ConfigResult<ModuleDescriptor> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError { source: Box::new(e) })
    }
}

/// JSON 描述符读取器
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonDescriptorReader;

impl DescriptorReader for JsonDescriptorReader {
    fn name(&self) -> &str {
        "JsonDescriptorReader"
    }

    fn supports(&self, path: &Path) -> bool {
        has_extension(path, &["json"])
    }

    fn parse_registry(&self, content: &str) -> ConfigResult<RegistryDescriptor> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError { source: Box::new(e) })
    }

    fn parse_module(&self, content: &str) -> ConfigResult<ModuleDescriptor> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError { source: Box::new(e) })
    }
}

/// 读取器集合
///
/// 按注册顺序选择第一个支持该文件的读取器
pub struct DescriptorReaders {
    readers: Vec<Box<dyn DescriptorReader>>,
}

impl DescriptorReaders {
    /// 创建空集合
    pub fn new() -> Self {
        Self { readers: Vec::new() }
    }

    /// 包含 TOML 与 JSON 读取器
    pub fn with_defaults() -> Self {
        let mut readers = Self::new();
        readers.register(Box::new(TomlDescriptorReader));
        readers.register(Box::new(JsonDescriptorReader));
        readers
    }

    /// 注册读取器
    pub fn register(&mut self, reader: Box<dyn DescriptorReader>) {
        debug!("注册描述符读取器: {}", reader.name());
        self.readers.push(reader);
    }

    /// 已注册的读取器名称
    pub fn names(&self) -> Vec<&str> {
        self.readers.iter().map(|reader| reader.name()).collect()
    }

    /// 查找支持该文件的读取器
    pub fn reader_for(&self, path: &Path) -> ComponentResult<&dyn DescriptorReader> {
        self.readers
            .iter()
            .find(|reader| reader.supports(path))
            .map(|reader| reader.as_ref())
            .ok_or_else(|| ComponentError::module(format!("不支持的描述符格式: {}", path.display())))
    }

    /// 读取注册表文件
    pub fn read_registry(&self, path: &Path) -> ComponentResult<RegistryDescriptor> {
        self.reader_for(path)?.read_registry(path)
    }

    /// 读取模块文件
    pub fn read_module(&self, path: &Path) -> ComponentResult<ModuleDescriptor> {
        self.reader_for(path)?.read_module(path)
    }
}

impl Default for DescriptorReaders {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for DescriptorReaders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DescriptorReaders")
            .field("readers", &self.names())
            .finish()
    }
}
