//! 查询分发

use super::outcome::{FlowAssignment, FlowSummary, QueryOutcome};
use super::request::{validate, QueryRequest};
use crate::algorithm::{BellmanFord, EdmondsKarp, ShortestPath};
use crate::error::Result;
use crate::graph::{Graph, NodeId};
use crate::metrics::{self, Metrics};
use crate::types::Algorithm;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 查询服务：校验用户选择并调用相应算法
#[derive(Clone)]
pub struct QueryService {
    graph: Arc<Graph>,
    metrics: Arc<Metrics>,
}

impl QueryService {
    /// 使用全局指标创建服务
    pub fn new(graph: Arc<Graph>) -> Self {
        Self::with_metrics(graph, metrics::global_metrics())
    }

    pub fn with_metrics(graph: Arc<Graph>, metrics: Arc<Metrics>) -> Self {
        Self { graph, metrics }
    }

    pub fn graph(&self) -> &Arc<Graph> {
        &self.graph
    }

    /// 执行一次查询
    ///
    /// 无效选择、不可达和零流量都是正常结果；
    /// 只有遇到负权环时返回错误。
    pub fn run(&self, request: &QueryRequest) -> Result<QueryOutcome> {
        let timer = self.metrics.record_query_start();

        let selection = match validate(request, |name| self.graph.node_id(name).is_some()) {
            Ok(selection) => selection,
            Err(issue) => {
                debug!(?issue, "query selection rejected");
                self.metrics.record_invalid_selection();
                self.metrics.record_query_complete(timer, true);
                return Ok(QueryOutcome::InvalidSelection { issue });
            }
        };

        info!(
            origin = selection.origin,
            destination = selection.destination,
            algorithm = %selection.algorithm,
            "dispatching query"
        );
        self.metrics.record_algorithm(selection.algorithm);

        let outcome = match selection.algorithm {
            Algorithm::ShortestPath => self
                .shortest_path(selection.origin, selection.destination)
                .map(|path| match path {
                    Some(path) => QueryOutcome::Path(path),
                    None => {
                        self.metrics.record_unreachable();
                        QueryOutcome::Unreachable {
                            origin: selection.origin.to_string(),
                            destination: selection.destination.to_string(),
                        }
                    }
                }),
            Algorithm::MaxFlow => {
                let summary = self.flow_summary(selection.origin, selection.destination);
                if summary.is_zero() {
                    self.metrics.record_zero_flow();
                }
                Ok(QueryOutcome::Flow(summary))
            }
        };

        if let Err(e) = &outcome {
            warn!(error = %e, "query failed");
        }
        self.metrics.record_query_complete(timer, outcome.is_ok());
        outcome
    }

    /// 最短路径；不可达或节点不存在时为 `None`
    pub fn shortest_path(&self, origin: &str, destination: &str) -> Result<Option<ShortestPath>> {
        BellmanFord::new(self.graph.clone()).shortest_path(origin, destination)
    }

    /// 从 origin 出发到各可达节点的最短距离（含 origin 自身）
    pub fn distances_from(&self, origin: &str) -> Result<Vec<(String, f64)>> {
        BellmanFord::new(self.graph.clone()).distances_from(origin)
    }

    /// 最大流及按名称排序的流量分配
    pub fn flow_summary(&self, source: &str, sink: &str) -> FlowSummary {
        let solver = EdmondsKarp::new(self.graph.clone());
        let result = solver.max_flow(source, sink);

        let assignment = |src: NodeId, dst: NodeId, flow: f64| FlowAssignment {
            source: self.graph.name_of(src).to_string(),
            destination: self.graph.name_of(dst).to_string(),
            flow,
            capacity: self
                .graph
                .edge_between_ids(src, dst)
                .map(|edge| edge.capacity())
                .unwrap_or(0.0),
        };

        let mut assignments: Vec<FlowAssignment> = result
            .flow
            .iter()
            .map(|(&(src, dst), &flow)| assignment(src, dst, flow))
            .collect();
        assignments.sort_by(|a, b| {
            (&a.source, &a.destination).cmp(&(&b.source, &b.destination))
        });

        let mut bottlenecks: Vec<FlowAssignment> = solver
            .bottleneck_edges(&result)
            .into_iter()
            .map(|(src, dst, capacity)| assignment(src, dst, capacity))
            .collect();
        bottlenecks.sort_by(|a, b| {
            (&a.source, &a.destination).cmp(&(&b.source, &b.destination))
        });

        FlowSummary {
            source: source.to_string(),
            sink: sink.to_string(),
            value: result.value,
            assignments,
            bottlenecks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SelectionIssue;

    fn service(edges: &[(&str, &str, f64, f64)]) -> (QueryService, Arc<Metrics>) {
        let graph = Arc::new(Graph::from_edges(edges.iter().copied()));
        let metrics = Arc::new(Metrics::new());
        (QueryService::with_metrics(graph, metrics.clone()), metrics)
    }

    fn line() -> (QueryService, Arc<Metrics>) {
        service(&[("A", "B", 5.0, 10.0), ("B", "C", 7.0, 4.0)])
    }

    #[test]
    fn test_shortest_path_query() {
        let (service, metrics) = line();

        let outcome = service
            .run(&QueryRequest::new("A", "C", "shortest-path"))
            .unwrap();
        match &outcome {
            QueryOutcome::Path(path) => {
                assert_eq!(path.distance, 12.0);
                assert_eq!(path.path, vec!["A", "B", "C"]);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(metrics.snapshot().shortest_path_queries, 1);
    }

    #[test]
    fn test_unreachable_query() {
        let (service, metrics) = line();

        let outcome = service
            .run(&QueryRequest::new("C", "A", "bellman-ford"))
            .unwrap();
        assert_eq!(
            outcome,
            QueryOutcome::Unreachable {
                origin: "C".into(),
                destination: "A".into()
            }
        );
        assert_eq!(metrics.snapshot().unreachable_routes, 1);
    }

    #[test]
    fn test_max_flow_query() {
        let (service, _) = line();

        let outcome = service.run(&QueryRequest::new("A", "C", "max-flow")).unwrap();
        let QueryOutcome::Flow(summary) = outcome else {
            panic!("expected flow outcome");
        };
        assert_eq!(summary.value, 4.0);
        assert_eq!(summary.assignments.len(), 2);
        assert_eq!(summary.assignments[0].source, "A");
        assert_eq!(summary.assignments[0].flow, 4.0);
        assert_eq!(summary.assignments[1].capacity, 4.0);
        assert_eq!(summary.bottlenecks.len(), 1);
        assert_eq!(summary.bottlenecks[0].source, "B");
        assert_eq!(summary.bottlenecks[0].destination, "C");
    }

    #[test]
    fn test_zero_flow_is_a_flow_outcome() {
        let (service, metrics) = service(&[("A", "B", 1.0, 5.0), ("C", "D", 1.0, 5.0)]);

        let outcome = service
            .run(&QueryRequest::new("A", "D", "ford-fulkerson"))
            .unwrap();
        let QueryOutcome::Flow(summary) = outcome else {
            panic!("expected flow outcome");
        };
        assert!(summary.is_zero());
        assert!(summary.assignments.is_empty());
        assert_eq!(metrics.snapshot().zero_flow_results, 1);
    }

    #[test]
    fn test_invalid_selections_skip_algorithms() {
        let (service, metrics) = line();

        let cases = [
            (QueryRequest::default(), SelectionIssue::MissingSelection),
            (
                QueryRequest::new("A", "A", "max-flow"),
                SelectionIssue::SameNode,
            ),
            (
                QueryRequest::new("A", "C", "dijkstra"),
                SelectionIssue::UnknownAlgorithm("dijkstra".into()),
            ),
            (
                QueryRequest::new("A", "Z", "max-flow"),
                SelectionIssue::UnknownNode("Z".into()),
            ),
        ];

        for (request, expected) in cases {
            let outcome = service.run(&request).unwrap();
            assert_eq!(outcome, QueryOutcome::InvalidSelection { issue: expected });
        }

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.invalid_selections, 4);
        assert_eq!(snapshot.shortest_path_queries, 0);
        assert_eq!(snapshot.max_flow_queries, 0);
        assert_eq!(snapshot.total_queries, 4);
    }

    #[test]
    fn test_distances_from_origin() {
        let (service, _) = line();

        assert_eq!(
            service.distances_from("B").unwrap(),
            vec![("B".to_string(), 0.0), ("C".to_string(), 7.0)]
        );
        assert!(service.distances_from("Z").unwrap().is_empty());
    }

    #[test]
    fn test_negative_cycle_is_reported() {
        let (service, metrics) = service(&[
            ("A", "B", 1.0, 1.0),
            ("B", "C", -2.0, 1.0),
            ("C", "B", 1.0, 1.0),
        ]);

        assert!(service.run(&QueryRequest::new("A", "C", "path")).is_err());
        assert_eq!(metrics.snapshot().failed_queries, 1);
    }
}
