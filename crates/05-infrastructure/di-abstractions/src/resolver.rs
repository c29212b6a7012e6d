//! 解析上下文
//!
//! 记录一次顶层解析调用的解析链，用于检测循环依赖

use infrastructure_common::{ComponentError, ComponentId, ComponentResult, InterfaceId};
use std::fmt;

/// 默认最大解析深度
pub const DEFAULT_MAX_RESOLUTION_DEPTH: usize = 64;

/// 解析链中的一个节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveFrame {
    /// 按绑定键解析
    Binding {
        interface_id: InterfaceId,
        name: Option<String>,
    },
    /// 正在构造的组件
    Component(ComponentId),
}

impl fmt::Display for ResolveFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binding {
                interface_id,
                name: Some(name),
            } => write!(f, "{}[{}]", interface_id, name),
            Self::Binding { interface_id, name: None } => write!(f, "{}", interface_id),
            Self::Component(component_id) => write!(f, "component {}", component_id),
        }
    }
}

/// 解析上下文
#[derive(Debug, Clone)]
pub struct ResolveContext {
    /// 当前解析链
    chain: Vec<ResolveFrame>,
    /// 最多同时构造的组件层数
    max_depth: usize,
}

impl ResolveContext {
    /// 创建新的解析上下文
    pub fn new(max_depth: usize) -> Self {
        Self {
            chain: Vec::new(),
            max_depth,
        }
    }

    /// 添加节点到解析链
    ///
    /// 只有组件节点计入深度，每个绑定节点总是紧跟一个组件节点
    pub fn push(&mut self, frame: ResolveFrame) -> ComponentResult<()> {
        if self.chain.contains(&frame) {
            return Err(ComponentError::CircularDependency {
                chain: format!("{} -> {}", self.describe(), frame),
            });
        }
        if matches!(frame, ResolveFrame::Component(_)) && self.depth() >= self.max_depth {
            return Err(ComponentError::CircularDependency {
                chain: format!("超过最大解析深度 {}: {}", self.max_depth, self.describe()),
            });
        }
        self.chain.push(frame);
        Ok(())
    }

    /// 从解析链中移除最后一个节点
    pub fn pop(&mut self) {
        self.chain.pop();
    }

    /// 当前深度，即正在构造的组件层数
    pub fn depth(&self) -> usize {
        self.chain
            .iter()
            .filter(|frame| matches!(frame, ResolveFrame::Component(_)))
            .count()
    }

    fn describe(&self) -> String {
        self.chain
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}

impl Default for ResolveContext {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RESOLUTION_DEPTH)
    }
}
