//! 接口契约与类型擦除句柄

use crate::errors::{ComponentError, ComponentResult};
use crate::identity::{ComponentId, InterfaceId};
use crate::metadata::InterfaceMetadata;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 接口特征
///
/// 为 `dyn Trait` 实现，把接口类型映射到编译期确定的标识。
/// 通常由 `#[interface(...)]` 宏生成。
pub trait InterfaceTraits {
    /// 接口标识
    const ID: InterfaceId;
    /// 接口名称
    const NAME: &'static str;
    /// 接口描述
    const DESCRIPTION: &'static str;

    /// 接口元数据
    fn metadata() -> InterfaceMetadata {
        InterfaceMetadata::new(Self::ID, Self::NAME, Self::DESCRIPTION)
    }
}

/// 组件特征
///
/// 为具体组件类型实现，把类型映射到编译期确定的组件标识。
/// 通常由 `#[derive(ComponentTraits)]` 生成。
pub trait ComponentTraits {
    /// 组件标识
    const ID: ComponentId;
    /// 组件名称
    const NAME: &'static str;
    /// 组件描述
    const DESCRIPTION: &'static str;
}

/// 类型擦除的接口句柄
///
/// 由 `query_interface` 返回，只能向登记时的接口类型转换
pub struct InterfaceHandle {
    interface_id: InterfaceId,
    component_id: ComponentId,
    inner: Box<dyn Any>,
}

impl InterfaceHandle {
    pub(crate) fn new(interface_id: InterfaceId, component_id: ComponentId, inner: Box<dyn Any>) -> Self {
        Self {
            interface_id,
            component_id,
            inner,
        }
    }

    /// 句柄对应的接口
    pub fn interface_id(&self) -> InterfaceId {
        self.interface_id
    }

    /// 句柄所属组件
    pub fn component_id(&self) -> ComponentId {
        self.component_id
    }

    /// 转换为具体接口引用，接口标识必须匹配
    ///
    /// 标识相同而 Rust 类型不同时返回 `IllegalState`：组件与调用方由不同构建生成，
    /// 同一接口在两侧是不同的类型
    pub fn downcast<I>(self) -> ComponentResult<Arc<I>>
    where
        I: ?Sized + InterfaceTraits + 'static,
    {
        if I::ID != self.interface_id {
            return Err(ComponentError::InterfaceNotImplemented {
                component_id: self.component_id,
                interface_id: I::ID,
            });
        }
        let component_id = self.component_id;
        self.inner.downcast::<Arc<I>>().map(|handle| *handle).map_err(|_| {
            ComponentError::illegal_state(format!(
                "组件 {} 的接口 {} ({}) 与调用方的类型不一致, 模块可能由不同构建生成",
                component_id,
                I::NAME,
                I::ID
            ))
        })
    }
}

impl fmt::Debug for InterfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterfaceHandle")
            .field("interface_id", &self.interface_id)
            .field("component_id", &self.component_id)
            .finish_non_exhaustive()
    }
}
