//! 节点定义
//!
//! 供水网络中的节点：水源、水处理厂、蓄水池、泵站、用水点

use crate::types::NodeKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 节点 ID（按插入顺序分配的稠密编号，从 0 开始）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// 节点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// 节点 ID
    id: NodeId,
    /// 节点名称（唯一）
    name: String,
    /// 节点类型
    kind: NodeKind,
}

impl Node {
    /// 创建新节点，类型由名称推断
    pub fn new(id: NodeId, name: String) -> Self {
        let kind = NodeKind::classify(&name);
        Self { id, name, kind }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub(crate) fn set_kind(&mut self, kind: NodeKind) {
        self.kind = kind;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kind_from_name() {
        let n = Node::new(NodeId::new(0), "PTAP Huachipa".to_string());
        assert_eq!(n.id().index(), 0);
        assert_eq!(n.name(), "PTAP Huachipa");
        assert_eq!(n.kind(), NodeKind::TreatmentPlant);
    }
}
