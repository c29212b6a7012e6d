//! 注册表与模块文件发现

use crate::settings::FrameworkSettings;
use infrastructure_common::{ComponentError, ComponentResult};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// 注册表发现
///
/// 环境变量指定注册表文件时只加载该文件，否则递归扫描用户目录下的框架目录
#[derive(Debug, Clone)]
pub struct RegistryDiscovery {
    settings: FrameworkSettings,
    home_dir: Option<PathBuf>,
}

impl RegistryDiscovery {
    pub fn new(settings: FrameworkSettings) -> Self {
        Self {
            settings,
            home_dir: dirs::home_dir(),
        }
    }

    /// 替换用户目录
    pub fn with_home_dir(mut self, home_dir: impl Into<PathBuf>) -> Self {
        self.home_dir = Some(home_dir.into());
        self
    }

    pub fn settings(&self) -> &FrameworkSettings {
        &self.settings
    }

    /// 框架目录（`$HOME/.lorn`）
    pub fn framework_dir(&self) -> Option<PathBuf> {
        self.home_dir
            .as_ref()
            .map(|home| home.join(&self.settings.home_dir_name))
    }

    /// 默认加载时应读取的注册表文件
    pub fn registry_files(&self) -> ComponentResult<Vec<PathBuf>> {
        if let Some(path) = std::env::var_os(&self.settings.registry_env_var) {
            let path = PathBuf::from(path);
            info!("使用环境变量 {} 指定的注册表: {}", self.settings.registry_env_var, path.display());
            return Ok(vec![path]);
        }

        let Some(dir) = self.framework_dir() else {
            warn!("无法确定用户目录，跳过注册表发现");
            return Ok(Vec::new());
        };
        if !dir.is_dir() {
            debug!("框架目录不存在: {}", dir.display());
            return Ok(Vec::new());
        }
        self.registry_files_in(&dir, true)
    }

    /// 目录中的注册表文件
    pub fn registry_files_in(&self, folder: &Path, recurse: bool) -> ComponentResult<Vec<PathBuf>> {
        collect_files(folder, recurse, |path| self.settings.is_registry_file(path))
    }

    /// 目录中的模块文件
    pub fn module_files_in(&self, folder: &Path, recurse: bool) -> ComponentResult<Vec<PathBuf>> {
        collect_files(folder, recurse, |path| self.settings.is_module_file(path))
    }
}

fn collect_files(
    folder: &Path,
    recurse: bool,
    accept: impl Fn(&Path) -> bool,
) -> ComponentResult<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(ComponentError::module(format!("目录不存在: {}", folder.display())));
    }

    let mut walker = WalkDir::new(folder).follow_links(true).sort_by_file_name();
    if !recurse {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| ComponentError::module(format!("目录遍历失败: {}", e)))?;
        if entry.file_type().is_file() && accept(entry.path()) {
            files.push(entry.into_path());
        }
    }
    debug!("在 {} 中发现 {} 个文件", folder.display(), files.len());
    Ok(files)
}
