//! 数据导入模块
//!
//! 从 CSV 边列表构建供水网络图。每行一条有向边，
//! 数值字段缺失或无法解析时按 0 处理。

use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::metrics;
use crate::types::NodeKind;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

const SOURCE_COLUMN: &str = "Source Node";
const DESTINATION_COLUMN: &str = "Destination Node";

/// 导入统计
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ImportStats {
    /// 读取的数据行数（不含表头）
    pub rows: usize,
    /// 写入的边数（含覆盖已有边的行）
    pub edges_imported: usize,
    /// 被跳过的行数
    pub skipped_rows: usize,
    /// 无法解析而按 0 处理的数值字段数
    pub coerced_fields: usize,
    pub duration_ms: u64,
}

/// CSV 中的一行；带单位和不带单位的列同时存在时，带单位的非空值优先
#[derive(Debug, Deserialize)]
struct EdgeRow {
    #[serde(rename = "Source Node")]
    source: String,
    #[serde(rename = "Destination Node")]
    destination: String,
    #[serde(rename = "Flow Capacity", default)]
    flow_capacity: Option<String>,
    #[serde(rename = "Flow Capacity (L/s)", default)]
    flow_capacity_ls: Option<String>,
    #[serde(rename = "Distance Between Nodes", default)]
    distance: Option<String>,
    #[serde(rename = "Distance Between Nodes (km)", default)]
    distance_km: Option<String>,
    #[serde(rename = "Node Type", default)]
    node_type: Option<String>,
}

/// 边列表导入器
pub struct EdgeListImporter {
    delimiter: u8,
}

impl Default for EdgeListImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeListImporter {
    /// 创建导入器（默认逗号分隔）
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    /// 设置分隔符
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// 从文件构建新图
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<(Graph, ImportStats)> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| Error::ImportError(format!("无法打开 {}: {}", path.display(), e)))?;
        self.load_reader(file)
    }

    /// 从任意读取器构建新图
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<(Graph, ImportStats)> {
        let start = std::time::Instant::now();
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        for required in [SOURCE_COLUMN, DESTINATION_COLUMN] {
            if !headers.iter().any(|h| h == required) {
                return Err(Error::ImportError(format!("缺少必需的列: {}", required)));
            }
        }

        let mut graph = Graph::new();
        let mut stats = ImportStats::default();

        for (line, row) in csv_reader.deserialize::<EdgeRow>().enumerate() {
            stats.rows += 1;
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    warn!(row = line + 1, error = %e, "skipping malformed row");
                    stats.skipped_rows += 1;
                    continue;
                }
            };

            let source = row.source.trim();
            let destination = row.destination.trim();
            if source.is_empty() || destination.is_empty() {
                warn!(row = line + 1, "skipping row with empty node name");
                stats.skipped_rows += 1;
                continue;
            }

            let capacity = row.flow_capacity_ls.or(row.flow_capacity);
            let distance = row.distance_km.or(row.distance);
            let capacity = coerce_number(capacity.as_deref(), &mut stats.coerced_fields);
            let distance = coerce_number(distance.as_deref(), &mut stats.coerced_fields);

            graph.add_edge(source, destination, distance, capacity);
            stats.edges_imported += 1;

            if let Some(kind) = row.node_type.as_deref().and_then(NodeKind::from_declared) {
                graph.set_node_kind(destination, kind)?;
            }
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;
        Ok((graph, stats))
    }
}

/// 空字段按 0 处理；无法解析或非有限值按 0 处理并计数
fn coerce_number(field: Option<&str>, coerced: &mut usize) -> f64 {
    match field.map(str::trim) {
        None | Some("") => 0.0,
        Some(raw) => match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                *coerced += 1;
                0.0
            }
        },
    }
}

/// 从 CSV 加载供水网络，记录指标并返回可共享的只读图
pub fn load_network<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Arc<Graph>> {
    let path = path.as_ref();
    let (graph, stats) = EdgeListImporter::new()
        .with_delimiter(delimiter)
        .load_path(path)?;

    info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        rows = stats.rows,
        skipped = stats.skipped_rows,
        coerced = stats.coerced_fields,
        duration_ms = stats.duration_ms,
        "water network loaded"
    );
    metrics::global_metrics().record_graph_loaded(&graph, &stats);

    Ok(Arc::new(graph))
}
