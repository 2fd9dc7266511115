//! 最短路径算法
//!
//! 以管道距离为权重的单源 Bellman-Ford，计算委托给 petgraph。
//! 不可达时返回 `None`，而不是无穷大距离。

use crate::error::{Error, Result};
use crate::graph::{Graph, NodeId};
use petgraph::algo::bellman_ford;
use petgraph::graph::{DiGraph, NodeIndex as PetIndex};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// 最短路径结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortestPath {
    /// 起点名称
    pub source: String,
    /// 终点名称
    pub target: String,
    /// 路径总距离（km）
    pub distance: f64,
    /// 从起点到终点（含两端）的节点名称序列
    pub path: Vec<String>,
    /// 与 `path` 对应的节点 ID
    #[serde(skip)]
    pub nodes: Vec<NodeId>,
}

/// Bellman-Ford 最短路径查找器
pub struct BellmanFord {
    graph: Arc<Graph>,
}

impl BellmanFord {
    /// 创建查找器
    pub fn new(graph: Arc<Graph>) -> Self {
        Self { graph }
    }

    /// 计算 source 到 target 的最短路径
    ///
    /// 起点或终点不存在、或终点不可达时返回 `Ok(None)`；
    /// 只有从起点可达负权环时才返回错误。
    pub fn shortest_path(&self, source: &str, target: &str) -> Result<Option<ShortestPath>> {
        let (Some(src), Some(dst)) = (self.graph.node_id(source), self.graph.node_id(target))
        else {
            debug!(source, target, "shortest path requested for unknown node");
            return Ok(None);
        };

        let view = self.distance_view();
        let paths = bellman_ford(&view, PetIndex::new(src.index()))
            .map_err(|_| Error::NegativeCycle(source.to_string()))?;

        let distance = paths.distances[dst.index()];
        if !distance.is_finite() {
            return Ok(None);
        }

        // 沿前驱回溯；步数以节点数为上限
        let mut nodes = vec![dst];
        let mut current = PetIndex::new(dst.index());
        for _ in 0..view.node_count() {
            if current.index() == src.index() {
                break;
            }
            match paths.predecessors[current.index()] {
                Some(prev) => {
                    nodes.push(view[prev]);
                    current = prev;
                }
                None => return Ok(None),
            }
        }
        nodes.reverse();

        let path = nodes
            .iter()
            .map(|&id| self.graph.name_of(id).to_string())
            .collect();

        Ok(Some(ShortestPath {
            source: source.to_string(),
            target: target.to_string(),
            distance,
            path,
            nodes,
        }))
    }

    /// 计算从 source 出发到所有可达节点的距离（按节点插入顺序）
    pub fn distances_from(&self, source: &str) -> Result<Vec<(String, f64)>> {
        let Some(src) = self.graph.node_id(source) else {
            return Ok(Vec::new());
        };

        let view = self.distance_view();
        let paths = bellman_ford(&view, PetIndex::new(src.index()))
            .map_err(|_| Error::NegativeCycle(source.to_string()))?;

        Ok(self
            .graph
            .nodes()
            .filter_map(|node| {
                let d = paths.distances[node.id().index()];
                d.is_finite().then(|| (node.name().to_string(), d))
            })
            .collect())
    }

    /// 以距离为边权的 petgraph 视图，节点下标与 NodeId 一致
    fn distance_view(&self) -> DiGraph<NodeId, f64> {
        let mut view =
            DiGraph::with_capacity(self.graph.node_count(), self.graph.edge_count());
        for node in self.graph.nodes() {
            view.add_node(node.id());
        }
        for edge in self.graph.edges() {
            view.add_edge(
                PetIndex::new(edge.src().index()),
                PetIndex::new(edge.dst().index()),
                edge.distance(),
            );
        }
        view
    }
}
