//! 图索引
//!
//! 节点名称和边邻接关系的内存索引，支持快速查找

use crate::graph::edge::EdgeId;
use crate::graph::node::NodeId;
use crate::types::NodeKind;
use indexmap::IndexMap;
use std::collections::{BTreeSet, HashMap};

/// 节点索引
#[derive(Debug, Default)]
pub struct NodeIndex {
    /// 名称到节点 ID 的映射（保持插入顺序）
    name_to_id: IndexMap<String, NodeId>,
    /// 类型到节点 ID 集合的映射
    kind_to_ids: HashMap<NodeKind, BTreeSet<NodeId>>,
}

impl NodeIndex {
    /// 创建新索引
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加名称索引
    pub fn add_name(&mut self, name: String, node_id: NodeId) {
        self.name_to_id.insert(name, node_id);
    }

    /// 通过名称查找节点
    pub fn get_by_name(&self, name: &str) -> Option<NodeId> {
        self.name_to_id.get(name).copied()
    }

    /// 按插入顺序列出所有名称
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.name_to_id.keys().map(String::as_str)
    }

    /// 添加类型索引
    pub fn add_kind(&mut self, kind: NodeKind, node_id: NodeId) {
        self.kind_to_ids.entry(kind).or_default().insert(node_id);
    }

    /// 修改节点类型
    pub fn reassign_kind(&mut self, node_id: NodeId, old: NodeKind, new: NodeKind) {
        if let Some(set) = self.kind_to_ids.get_mut(&old) {
            set.remove(&node_id);
        }
        self.add_kind(new, node_id);
    }

    /// 获取类型下的所有节点
    pub fn get_by_kind(&self, kind: NodeKind) -> Vec<NodeId> {
        self.kind_to_ids
            .get(&kind)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }
}

/// 边索引
#[derive(Debug, Default)]
pub struct EdgeIndex {
    /// 源节点到出边的映射
    outgoing: HashMap<NodeId, Vec<EdgeId>>,
    /// 目标节点到入边的映射
    incoming: HashMap<NodeId, Vec<EdgeId>>,
    /// 边 ID 到 (src, dst) 的映射
    edge_endpoints: HashMap<EdgeId, (NodeId, NodeId)>,
    /// (src, dst) 到边 ID 的映射（每个有向点对至多一条边）
    pair_to_edge: HashMap<(NodeId, NodeId), EdgeId>,
}

impl EdgeIndex {
    /// 创建新索引
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加边
    pub fn add_edge(&mut self, edge_id: EdgeId, src: NodeId, dst: NodeId) {
        self.outgoing.entry(src).or_default().push(edge_id);
        self.incoming.entry(dst).or_default().push(edge_id);
        self.edge_endpoints.insert(edge_id, (src, dst));
        self.pair_to_edge.insert((src, dst), edge_id);
    }

    /// 获取节点的出边
    pub fn get_outgoing(&self, node_id: NodeId) -> &[EdgeId] {
        self.outgoing
            .get(&node_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// 获取节点的入边
    pub fn get_incoming(&self, node_id: NodeId) -> &[EdgeId] {
        self.incoming
            .get(&node_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// 获取边的端点
    pub fn get_endpoints(&self, edge_id: EdgeId) -> Option<(NodeId, NodeId)> {
        self.edge_endpoints.get(&edge_id).copied()
    }

    /// 获取两点之间的边
    pub fn get_edge_between(&self, src: NodeId, dst: NodeId) -> Option<EdgeId> {
        self.pair_to_edge.get(&(src, dst)).copied()
    }

    /// 获取节点的出度
    pub fn out_degree(&self, node_id: NodeId) -> usize {
        self.get_outgoing(node_id).len()
    }

    /// 获取节点的入度
    pub fn in_degree(&self, node_id: NodeId) -> usize {
        self.get_incoming(node_id).len()
    }

    /// 获取邻居（出边指向的节点）
    pub fn neighbors(&self, node_id: NodeId) -> Vec<NodeId> {
        self.get_outgoing(node_id)
            .iter()
            .filter_map(|&edge_id| self.get_endpoints(edge_id).map(|(_, dst)| dst))
            .collect()
    }
}
