//! 通过动态库加载示例模块
//!
//! 示例模块作为依赖构建时同时产出 cdylib，与测试程序位于同一输出目录

mod common;

use common::{sample_module_toml, write};
use config_impl::FrameworkSettings;
use di_abstractions::{ComponentManager, ModuleLoader, ModuleState};
use di_impl::{ComponentManagerImpl, LibraryModuleLoader};
use infrastructure_common::{ComponentTraits, InterfaceTraits, ModuleMetadata, Scope};
use sample_module::{FileLogger, Greeter, GreetingService, Logger, SAMPLE_MODULE_ID};
use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// 与当前构建兼容的示例模块动态库
fn sample_library() -> PathBuf {
    let exe = std::env::current_exe().unwrap();
    let deps = exe.parent().unwrap();
    let prefix = format!("{}sample_module", DLL_PREFIX);

    let mut candidates: Vec<PathBuf> = [Some(deps), deps.parent()]
        .into_iter()
        .flatten()
        .filter_map(|dir| fs::read_dir(dir).ok())
        .flat_map(|entries| entries.filter_map(Result::ok).map(|entry| entry.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map_or(false, |name| name.starts_with(&prefix) && name.ends_with(DLL_SUFFIX))
        })
        .collect();
    candidates.sort();

    candidates
        .into_iter()
        .find(|path| {
            let metadata = ModuleMetadata::new(SAMPLE_MODULE_ID, "sample-module", path);
            LibraryModuleLoader::new().load(&metadata).is_ok()
        })
        .unwrap_or_else(|| panic!("未找到可加载的 {}*{} (目录 {})", prefix, DLL_SUFFIX, deps.display()))
}

/// 写入指向动态库的描述符并加载元数据
fn library_manager(dir: &TempDir) -> (ComponentManagerImpl, PathBuf) {
    let library = sample_library();
    let descriptor = dir.path().join("sample.module.toml");
    let content = sample_module_toml("").replace(
        r#"path = "libsample_module.so""#,
        &format!("path = '{}'", library.display()),
    );
    write(&descriptor, &content);

    let manager = ComponentManagerImpl::new(FrameworkSettings::default());
    manager
        .load_module_metadata("sample-module", &descriptor)
        .unwrap();
    (manager, library)
}

#[test]
fn test_library_is_opened_lazily_and_resolves() {
    let dir = TempDir::new().unwrap();
    let (manager, _) = library_manager(&dir);
    assert_eq!(manager.module_state(SAMPLE_MODULE_ID).unwrap(), ModuleState::Registered);

    manager.bind(<dyn Logger>::ID, FileLogger::ID, Scope::Singleton);
    let greeter = manager.resolve(<dyn Greeter>::ID).unwrap();
    assert_eq!(manager.module_state(SAMPLE_MODULE_ID).unwrap(), ModuleState::Loaded);
    assert_eq!(greeter.component_id(), GreetingService::ID);

    let greeting = greeter.bind_to::<dyn Greeter>().unwrap();
    assert_eq!(greeting.greet("Lorn"), "Hello, Lorn!");

    let logger = manager
        .resolve(<dyn Logger>::ID)
        .unwrap()
        .bind_to::<dyn Logger>()
        .unwrap();
    assert_eq!(logger.entries(), vec!["[file] Hello, Lorn!".to_string()]);
}

#[test]
fn test_instances_outlive_manager() {
    let dir = TempDir::new().unwrap();
    let (manager, library) = library_manager(&dir);

    let component = manager.create_component(FileLogger::ID).unwrap();
    let logger = component.bind_to::<dyn Logger>().unwrap();
    drop(manager);

    assert!(LibraryModuleLoader::is_retained(&library));
    logger.log("after manager");
    assert_eq!(logger.entries(), vec!["[file] after manager".to_string()]);
    drop(component);
    assert_eq!(logger.entries().len(), 1);
    drop(logger);
}

#[test]
fn test_managers_share_retained_library() {
    let first_dir = TempDir::new().unwrap();
    let second_dir = TempDir::new().unwrap();
    let (first, library) = library_manager(&first_dir);
    let (second, _) = library_manager(&second_dir);

    let from_first = first.create_component(FileLogger::ID).unwrap();
    drop(first);
    let from_second = second.create_component(FileLogger::ID).unwrap();

    assert_eq!(second.loaded_module_count(), 1);
    assert!(LibraryModuleLoader::is_retained(&library));
    assert!(from_first.implements(&<dyn Logger>::ID));
    assert!(from_second.bind_to::<dyn Logger>().is_ok());
}
