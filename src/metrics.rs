//! 性能指标收集模块
//!
//! 记录路线查询、流量查询和网络加载情况，支持导出 Prometheus 文本格式

use crate::graph::Graph;
use crate::import::ImportStats;
use crate::types::Algorithm;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// 系统全局指标
#[derive(Debug)]
pub struct Metrics {
    /// 查询统计
    query_stats: QueryStats,
    /// 查询结果分类
    outcome_stats: OutcomeStats,
    /// 网络加载统计
    network_stats: NetworkStats,
    /// 启动时间
    start_time: Instant,
}

#[derive(Debug, Default)]
struct QueryStats {
    total_queries: AtomicU64,
    success_queries: AtomicU64,
    failed_queries: AtomicU64,
    /// 查询总耗时（微秒）
    total_duration_us: AtomicU64,
    /// 慢查询数（>1s）
    slow_queries: AtomicU64,
}

#[derive(Debug, Default)]
struct OutcomeStats {
    shortest_path_queries: AtomicU64,
    max_flow_queries: AtomicU64,
    invalid_selections: AtomicU64,
    unreachable_routes: AtomicU64,
    zero_flow_results: AtomicU64,
}

#[derive(Debug, Default)]
struct NetworkStats {
    nodes_loaded: AtomicU64,
    edges_loaded: AtomicU64,
    rows_skipped: AtomicU64,
    fields_coerced: AtomicU64,
}

/// 可导出的指标快照
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    // 查询指标
    pub total_queries: u64,
    pub success_queries: u64,
    pub failed_queries: u64,
    pub avg_query_duration_ms: f64,
    pub slow_queries: u64,
    pub qps: f64,

    // 结果分类
    pub shortest_path_queries: u64,
    pub max_flow_queries: u64,
    pub invalid_selections: u64,
    pub unreachable_routes: u64,
    pub zero_flow_results: u64,

    // 网络
    pub nodes_loaded: u64,
    pub edges_loaded: u64,
    pub rows_skipped: u64,
    pub fields_coerced: u64,

    pub uptime_seconds: u64,
}

/// Prometheus 格式指标
#[derive(Debug, Clone)]
pub struct PrometheusMetrics {
    pub content: String,
}

impl Metrics {
    /// 创建新的指标收集器
    pub fn new() -> Self {
        Self {
            query_stats: QueryStats::default(),
            outcome_stats: OutcomeStats::default(),
            network_stats: NetworkStats::default(),
            start_time: Instant::now(),
        }
    }

    /// 记录查询开始
    pub fn record_query_start(&self) -> QueryTimer {
        self.query_stats.total_queries.fetch_add(1, Ordering::Relaxed);
        QueryTimer::new()
    }

    /// 记录查询完成
    pub fn record_query_complete(&self, timer: QueryTimer, success: bool) {
        let duration = timer.elapsed();

        if success {
            self.query_stats.success_queries.fetch_add(1, Ordering::Relaxed);
        } else {
            self.query_stats.failed_queries.fetch_add(1, Ordering::Relaxed);
        }

        self.query_stats
            .total_duration_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);

        if duration.as_secs() >= 1 {
            self.query_stats.slow_queries.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// 记录一次已执行的算法
    pub fn record_algorithm(&self, algorithm: Algorithm) {
        let counter = match algorithm {
            Algorithm::ShortestPath => &self.outcome_stats.shortest_path_queries,
            Algorithm::MaxFlow => &self.outcome_stats.max_flow_queries,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// 记录无效的查询选择
    pub fn record_invalid_selection(&self) {
        self.outcome_stats.invalid_selections.fetch_add(1, Ordering::Relaxed);
    }

    /// 记录不可达的路线
    pub fn record_unreachable(&self) {
        self.outcome_stats.unreachable_routes.fetch_add(1, Ordering::Relaxed);
    }

    /// 记录零流量结果
    pub fn record_zero_flow(&self) {
        self.outcome_stats.zero_flow_results.fetch_add(1, Ordering::Relaxed);
    }

    /// 记录加载完成的网络规模
    pub fn record_graph_loaded(&self, graph: &Graph, stats: &ImportStats) {
        let net = &self.network_stats;
        net.nodes_loaded.store(graph.node_count() as u64, Ordering::Relaxed);
        net.edges_loaded.store(graph.edge_count() as u64, Ordering::Relaxed);
        net.rows_skipped.store(stats.skipped_rows as u64, Ordering::Relaxed);
        net.fields_coerced.store(stats.coerced_fields as u64, Ordering::Relaxed);
    }

    /// 获取指标快照
    pub fn snapshot(&self) -> MetricsSnapshot {
        let total_queries = self.query_stats.total_queries.load(Ordering::Relaxed);
        let total_duration_us = self.query_stats.total_duration_us.load(Ordering::Relaxed);
        let uptime = self.start_time.elapsed().as_secs();

        let avg_query_duration_ms = if total_queries > 0 {
            (total_duration_us as f64) / (total_queries as f64) / 1000.0
        } else {
            0.0
        };

        let qps = if uptime > 0 {
            (total_queries as f64) / (uptime as f64)
        } else {
            0.0
        };

        let outcomes = &self.outcome_stats;
        let net = &self.network_stats;

        MetricsSnapshot {
            total_queries,
            success_queries: self.query_stats.success_queries.load(Ordering::Relaxed),
            failed_queries: self.query_stats.failed_queries.load(Ordering::Relaxed),
            avg_query_duration_ms,
            slow_queries: self.query_stats.slow_queries.load(Ordering::Relaxed),
            qps,
            shortest_path_queries: outcomes.shortest_path_queries.load(Ordering::Relaxed),
            max_flow_queries: outcomes.max_flow_queries.load(Ordering::Relaxed),
            invalid_selections: outcomes.invalid_selections.load(Ordering::Relaxed),
            unreachable_routes: outcomes.unreachable_routes.load(Ordering::Relaxed),
            zero_flow_results: outcomes.zero_flow_results.load(Ordering::Relaxed),
            nodes_loaded: net.nodes_loaded.load(Ordering::Relaxed),
            edges_loaded: net.edges_loaded.load(Ordering::Relaxed),
            rows_skipped: net.rows_skipped.load(Ordering::Relaxed),
            fields_coerced: net.fields_coerced.load(Ordering::Relaxed),
            uptime_seconds: uptime,
        }
    }

    /// 导出为 Prometheus 格式
    pub fn to_prometheus(&self) -> PrometheusMetrics {
        let s = self.snapshot();
        let mut content = String::new();

        let integers: [(&str, &str, &str, u64); 14] = [
            ("queries_total", "Total number of queries", "counter", s.total_queries),
            ("queries_success_total", "Number of successful queries", "counter", s.success_queries),
            ("queries_failed_total", "Number of failed queries", "counter", s.failed_queries),
            ("slow_queries_total", "Number of slow queries (>1s)", "counter", s.slow_queries),
            ("shortest_path_queries_total", "Shortest path computations", "counter", s.shortest_path_queries),
            ("max_flow_queries_total", "Max flow computations", "counter", s.max_flow_queries),
            ("invalid_selections_total", "Rejected query selections", "counter", s.invalid_selections),
            ("unreachable_routes_total", "Routes with no path", "counter", s.unreachable_routes),
            ("zero_flow_results_total", "Flow queries with zero value", "counter", s.zero_flow_results),
            ("nodes_loaded", "Nodes in the loaded network", "gauge", s.nodes_loaded),
            ("edges_loaded", "Edges in the loaded network", "gauge", s.edges_loaded),
            ("rows_skipped", "CSV rows skipped while loading", "gauge", s.rows_skipped),
            ("fields_coerced", "Numeric fields coerced to zero", "gauge", s.fields_coerced),
            ("uptime_seconds", "System uptime in seconds", "counter", s.uptime_seconds),
        ];
        for (name, help, kind, value) in integers {
            push_metric(&mut content, name, help, kind, &value.to_string());
        }

        push_metric(
            &mut content,
            "query_duration_avg_ms",
            "Average query duration in milliseconds",
            "gauge",
            &format!("{:.2}", s.avg_query_duration_ms),
        );
        push_metric(
            &mut content,
            "qps",
            "Queries per second",
            "gauge",
            &format!("{:.2}", s.qps),
        );

        PrometheusMetrics { content }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

fn push_metric(content: &mut String, name: &str, help: &str, kind: &str, value: &str) {
    let _ = writeln!(content, "# HELP hydronet_{} {}", name, help);
    let _ = writeln!(content, "# TYPE hydronet_{} {}", name, kind);
    let _ = writeln!(content, "hydronet_{} {}", name, value);
}

/// 查询计时器
pub struct QueryTimer {
    start: Instant,
}

impl QueryTimer {
    fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// 全局指标实例
static METRICS: once_cell::sync::Lazy<Arc<Metrics>> =
    once_cell::sync::Lazy::new(|| Arc::new(Metrics::new()));

/// 获取全局指标实例
pub fn global_metrics() -> Arc<Metrics> {
    METRICS.clone()
}
