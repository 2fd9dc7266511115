//! 图数据结构
//!
//! 内存中的有向供水网络，启动时一次性构建，之后以 `Arc<Graph>` 只读共享

use super::edge::{Edge, EdgeId, EdgeRecord};
use super::index::{EdgeIndex, NodeIndex};
use super::node::{Node, NodeId};
use crate::error::{Error, Result};
use crate::types::NodeKind;
use std::collections::{HashSet, VecDeque};

/// 供水网络图
#[derive(Debug, Default)]
pub struct Graph {
    /// 节点（下标即 NodeId）
    nodes: Vec<Node>,
    /// 边（下标即 EdgeId）
    edges: Vec<Edge>,
    /// 节点索引
    node_index: NodeIndex,
    /// 边索引
    edge_index: EdgeIndex,
}

impl Graph {
    /// 创建空图
    pub fn new() -> Self {
        Self::default()
    }

    /// 由 (源, 目标, 距离, 容量) 列表构建图
    pub fn from_edges<'a, I>(edges: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str, f64, f64)>,
    {
        let mut graph = Self::new();
        for (src, dst, distance, capacity) in edges {
            graph.add_edge(src, dst, distance, capacity);
        }
        graph
    }

    // ==================== 节点操作 ====================

    /// 获取或创建节点
    pub fn ensure_node(&mut self, name: &str) -> NodeId {
        if let Some(existing_id) = self.node_index.get_by_name(name) {
            return existing_id;
        }

        let id = NodeId::new(self.nodes.len());
        let node = Node::new(id, name.to_string());

        self.node_index.add_name(name.to_string(), id);
        self.node_index.add_kind(node.kind(), id);
        self.nodes.push(node);

        id
    }

    /// 修改节点类型
    pub fn set_node_kind(&mut self, name: &str, kind: NodeKind) -> Result<()> {
        let id = self
            .node_index
            .get_by_name(name)
            .ok_or_else(|| Error::NodeNotFound(name.to_string()))?;
        let node = &mut self.nodes[id.index()];
        let old = node.kind();
        if old != kind {
            node.set_kind(kind);
            self.node_index.reassign_kind(id, old, kind);
        }
        Ok(())
    }

    /// 通过名称获取节点
    pub fn node(&self, name: &str) -> Option<&Node> {
        let id = self.node_index.get_by_name(name)?;
        self.node_by_id(id)
    }

    /// 通过名称获取节点 ID
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.node_index.get_by_name(name)
    }

    /// 通过 ID 获取节点
    pub fn node_by_id(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// 节点名称，未知 ID 返回空串
    pub fn name_of(&self, id: NodeId) -> &str {
        self.node_by_id(id).map(Node::name).unwrap_or_default()
    }

    /// 所有节点（插入顺序）
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// 所有节点名称（插入顺序）
    pub fn node_names(&self) -> Vec<&str> {
        self.node_index.names().collect()
    }

    /// 获取某类型的所有节点
    pub fn nodes_by_kind(&self, kind: NodeKind) -> Vec<&Node> {
        self.node_index
            .get_by_kind(kind)
            .into_iter()
            .filter_map(|id| self.node_by_id(id))
            .collect()
    }

    /// 获取节点数量
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ==================== 边操作 ====================

    /// 添加边；同一有向点对已存在时覆盖其属性
    pub fn add_edge(&mut self, source: &str, destination: &str, distance: f64, capacity: f64) -> EdgeId {
        let src = self.ensure_node(source);
        let dst = self.ensure_node(destination);

        if let Some(existing) = self.edge_index.get_edge_between(src, dst) {
            self.edges[existing.index()].overwrite(distance, capacity);
            return existing;
        }

        let id = EdgeId::new(self.edges.len());
        self.edges.push(Edge::new(id, src, dst, distance, capacity));
        self.edge_index.add_edge(id, src, dst);

        id
    }

    /// 获取边
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index())
    }

    /// 所有边（插入顺序）
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// 获取两个节点 ID 之间的边
    pub fn edge_between_ids(&self, src: NodeId, dst: NodeId) -> Option<&Edge> {
        let id = self.edge_index.get_edge_between(src, dst)?;
        self.edge(id)
    }

    /// 获取两个命名节点之间的边
    pub fn edge_between(&self, source: &str, destination: &str) -> Option<&Edge> {
        let src = self.node_id(source)?;
        let dst = self.node_id(destination)?;
        self.edge_between_ids(src, dst)
    }

    /// 获取节点的所有出边
    pub fn outgoing(&self, node_id: NodeId) -> Vec<&Edge> {
        self.edge_index
            .get_outgoing(node_id)
            .iter()
            .filter_map(|&id| self.edge(id))
            .collect()
    }

    /// 获取节点的所有入边
    pub fn incoming(&self, node_id: NodeId) -> Vec<&Edge> {
        self.edge_index
            .get_incoming(node_id)
            .iter()
            .filter_map(|&id| self.edge(id))
            .collect()
    }

    /// 命名节点的出边，未知节点返回空列表
    pub fn out_edges(&self, name: &str) -> Vec<EdgeRecord> {
        match self.node_id(name) {
            Some(id) => self.outgoing(id).into_iter().map(|e| self.record(e)).collect(),
            None => Vec::new(),
        }
    }

    /// 命名节点的入边，未知节点返回空列表
    pub fn in_edges(&self, name: &str) -> Vec<EdgeRecord> {
        match self.node_id(name) {
            Some(id) => self.incoming(id).into_iter().map(|e| self.record(e)).collect(),
            None => Vec::new(),
        }
    }

    /// 将边转换为带名称的视图
    pub fn record(&self, edge: &Edge) -> EdgeRecord {
        EdgeRecord {
            source: self.name_of(edge.src()).to_string(),
            destination: self.name_of(edge.dst()).to_string(),
            distance: edge.distance(),
            capacity: edge.capacity(),
        }
    }

    /// 获取边数量
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // ==================== 邻居查询 ====================

    /// 获取节点的邻居（出边指向的节点）
    pub fn neighbors(&self, node_id: NodeId) -> Vec<NodeId> {
        self.edge_index.neighbors(node_id)
    }

    /// 获取节点的出度
    pub fn out_degree(&self, node_id: NodeId) -> usize {
        self.edge_index.out_degree(node_id)
    }

    /// 获取节点的入度
    pub fn in_degree(&self, node_id: NodeId) -> usize {
        self.edge_index.in_degree(node_id)
    }

    /// 判断是否存在 source 到 destination 的有向路径（忽略距离和容量）
    pub fn has_path(&self, source: &str, destination: &str) -> bool {
        let (Some(start), Some(end)) = (self.node_id(source), self.node_id(destination)) else {
            return false;
        };
        self.reachable_from(start).contains(&end)
    }

    /// BFS 求从 start 可达的所有节点（包括 start 自身）
    pub fn reachable_from(&self, start: NodeId) -> HashSet<NodeId> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();

        visited.insert(start);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            for neighbor in self.neighbors(current) {
                if visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }

        visited
    }
}
