//! 启动错误

use infrastructure_common::{ComponentError, ConfigError};
use thiserror::Error;

/// 基础设施启动错误
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("框架设置错误: {0}")]
    Settings(#[from] ConfigError),

    #[error("组件框架错误: {0}")]
    Component(#[from] ComponentError),
}

pub type BootstrapResult<T> = Result<T, BootstrapError>;
