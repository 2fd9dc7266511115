//! 最大流算法
//!
//! 实现 Edmonds-Karp 算法（基于 BFS 的 Ford-Fulkerson）
//! 用于分析供水网络从水源到用水点的最大输水能力

use crate::graph::{Graph, NodeId};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::sync::Arc;
use tracing::debug;

/// 残余容量低于此值视为饱和
const EPSILON: f64 = 1e-9;

/// 最大流结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaxFlow {
    /// 最大流量值
    pub value: f64,
    /// 流量分配（边 -> 流量），只包含正流量的边
    pub flow: BTreeMap<(NodeId, NodeId), f64>,
    /// 最小割的源侧节点集
    pub source_side: BTreeSet<NodeId>,
}

impl MaxFlow {
    /// 某条边上的流量，无流量返回 0
    pub fn flow_on(&self, src: NodeId, dst: NodeId) -> f64 {
        self.flow.get(&(src, dst)).copied().unwrap_or(0.0)
    }
}

/// Edmonds-Karp 最大流算法
pub struct EdmondsKarp {
    graph: Arc<Graph>,
}

impl EdmondsKarp {
    /// 创建算法实例
    pub fn new(graph: Arc<Graph>) -> Self {
        Self { graph }
    }

    /// 计算命名节点之间的最大流；节点不存在时返回零流
    pub fn max_flow(&self, source: &str, sink: &str) -> MaxFlow {
        match (self.graph.node_id(source), self.graph.node_id(sink)) {
            (Some(s), Some(t)) => self.max_flow_between(s, t),
            _ => {
                debug!(source, sink, "max flow requested for unknown node");
                MaxFlow::default()
            }
        }
    }

    /// 计算从 source 到 sink 的最大流
    pub fn max_flow_between(&self, source: NodeId, sink: NodeId) -> MaxFlow {
        if source == sink {
            return MaxFlow::default();
        }

        // 容量矩阵
        let mut capacity: HashMap<(NodeId, NodeId), f64> = HashMap::new();
        // 邻接表（含反向边），按边插入顺序构建以保证结果可复现
        let mut adj: Vec<Vec<NodeId>> = vec![Vec::new(); self.graph.node_count()];

        for edge in self.graph.edges() {
            let (src, dst) = (edge.src(), edge.dst());
            *capacity.entry((src, dst)).or_insert(0.0) += edge.capacity().max(0.0);

            if !adj[src.index()].contains(&dst) {
                adj[src.index()].push(dst);
            }
            if !adj[dst.index()].contains(&src) {
                adj[dst.index()].push(src);
            }
        }

        // 流量矩阵（反对称：flow(v, u) = -flow(u, v)）
        let mut flow: HashMap<(NodeId, NodeId), f64> = HashMap::new();
        let mut max_flow_value = 0.0;

        // Edmonds-Karp: 重复 BFS 找增广路径
        while let Some((path, bottleneck)) =
            self.bfs_find_path(source, sink, &capacity, &flow, &adj)
        {
            for pair in path.windows(2) {
                let (u, v) = (pair[0], pair[1]);
                *flow.entry((u, v)).or_insert(0.0) += bottleneck;
                *flow.entry((v, u)).or_insert(0.0) -= bottleneck;
            }
            max_flow_value += bottleneck;
        }

        let source_side = self.find_source_side(source, &capacity, &flow, &adj);

        // 只保留正流量
        let positive_flow: BTreeMap<(NodeId, NodeId), f64> =
            flow.into_iter().filter(|(_, v)| *v > EPSILON).collect();

        MaxFlow {
            value: max_flow_value,
            flow: positive_flow,
            source_side,
        }
    }

    /// BFS 找增广路径
    fn bfs_find_path(
        &self,
        source: NodeId,
        sink: NodeId,
        capacity: &HashMap<(NodeId, NodeId), f64>,
        flow: &HashMap<(NodeId, NodeId), f64>,
        adj: &[Vec<NodeId>],
    ) -> Option<(Vec<NodeId>, f64)> {
        let mut parent: HashMap<NodeId, NodeId> = HashMap::new();
        let mut visited = BTreeSet::new();
        let mut queue = VecDeque::new();

        visited.insert(source);
        queue.push_back(source);

        while let Some(u) = queue.pop_front() {
            if u == sink {
                break;
            }

            for &v in &adj[u.index()] {
                if !visited.contains(&v) && residual(capacity, flow, u, v) > EPSILON {
                    visited.insert(v);
                    parent.insert(v, u);
                    queue.push_back(v);
                }
            }
        }

        if !parent.contains_key(&sink) {
            return None;
        }

        let mut path = vec![sink];
        let mut current = sink;
        while current != source {
            current = *parent.get(&current)?;
            path.push(current);
        }
        path.reverse();

        let bottleneck = path
            .windows(2)
            .map(|pair| residual(capacity, flow, pair[0], pair[1]))
            .fold(f64::INFINITY, f64::min);

        Some((path, bottleneck))
    }

    /// 找最小割的源侧节点（残余图中从源点可达的节点）
    fn find_source_side(
        &self,
        source: NodeId,
        capacity: &HashMap<(NodeId, NodeId), f64>,
        flow: &HashMap<(NodeId, NodeId), f64>,
        adj: &[Vec<NodeId>],
    ) -> BTreeSet<NodeId> {
        let mut visited = BTreeSet::new();
        let mut queue = VecDeque::new();

        visited.insert(source);
        queue.push_back(source);

        while let Some(u) = queue.pop_front() {
            for &v in &adj[u.index()] {
                if !visited.contains(&v) && residual(capacity, flow, u, v) > EPSILON {
                    visited.insert(v);
                    queue.push_back(v);
                }
            }
        }

        visited
    }

    /// 分析输水瓶颈：返回流量等于容量的边 (src, dst, capacity)
    pub fn bottleneck_edges(&self, result: &MaxFlow) -> Vec<(NodeId, NodeId, f64)> {
        self.graph
            .edges()
            .filter_map(|edge| {
                let used = result.flow_on(edge.src(), edge.dst());
                let saturated = used > EPSILON && (edge.capacity() - used).abs() < 1e-6;
                saturated.then(|| (edge.src(), edge.dst(), edge.capacity()))
            })
            .collect()
    }
}

/// 残余容量 = 容量 - 已用流量
fn residual(
    capacity: &HashMap<(NodeId, NodeId), f64>,
    flow: &HashMap<(NodeId, NodeId), f64>,
    u: NodeId,
    v: NodeId,
) -> f64 {
    let cap = capacity.get(&(u, v)).copied().unwrap_or(0.0);
    let used = flow.get(&(u, v)).copied().unwrap_or(0.0);
    cap - used
}
