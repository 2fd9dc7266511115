//! HTTP 服务器模块
//!
//! 提供供水网络的 REST API：节点与管道浏览、可达性、路线和流量查询

use crate::error::{Error, Result};
use crate::graph::{EdgeRecord, Graph};
use crate::metrics;
use crate::query::{QueryRequest, QueryResponse, QueryService};
use crate::types::NodeKind;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 应用状态
#[derive(Clone)]
pub struct AppState {
    pub graph: Arc<Graph>,
    pub queries: QueryService,
}

impl AppState {
    pub fn new(graph: Arc<Graph>) -> Self {
        let queries = QueryService::new(graph.clone());
        Self { graph, queries }
    }
}

/// 构建路由
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // 健康检查
        .route("/health", get(health_check))
        // 指标和统计
        .route("/metrics", get(metrics_handler))
        .route("/stats", get(stats_handler))
        // 网络浏览
        .route("/nodes", get(list_nodes))
        .route("/nodes/:name/outgoing", get(get_outgoing_edges))
        .route("/nodes/:name/incoming", get(get_incoming_edges))
        .route("/nodes/:name/distances", get(get_distances))
        .route("/edges", get(list_edges))
        .route("/reachable", get(reachable))
        // 查询
        .route("/query", post(run_query))
        .route("/algorithm/shortest-path", post(shortest_path))
        .route("/algorithm/max-flow", post(max_flow))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// 启动服务器
pub async fn start_server(config: ServerConfig, graph: Arc<Graph>) -> Result<()> {
    let app = build_router(AppState::new(graph));

    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::ServerError(format!("绑定地址失败: {}", e)))?;
    info!(%addr, "hydronet server listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::ServerError(format!("服务器错误: {}", e)))?;

    Ok(())
}

// ==================== 处理器 ====================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Prometheus 格式指标
async fn metrics_handler() -> impl IntoResponse {
    let prom = metrics::global_metrics().to_prometheus();
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        prom.content,
    )
}

/// 网络规模与查询统计
async fn stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = metrics::global_metrics().snapshot();
    let graph = &state.graph;

    let kinds: IndexMap<&'static str, usize> = NodeKind::ALL
        .iter()
        .map(|kind| (kind.as_str(), graph.nodes_by_kind(*kind).len()))
        .collect();

    Json(ApiResponse::success(serde_json::json!({
        "network": {
            "nodes": graph.node_count(),
            "edges": graph.edge_count(),
            "kinds": kinds,
        },
        "query": {
            "total": snapshot.total_queries,
            "success": snapshot.success_queries,
            "failed": snapshot.failed_queries,
            "avg_duration_ms": snapshot.avg_query_duration_ms,
            "shortest_path": snapshot.shortest_path_queries,
            "max_flow": snapshot.max_flow_queries,
            "invalid_selections": snapshot.invalid_selections,
            "unreachable": snapshot.unreachable_routes,
            "zero_flow": snapshot.zero_flow_results,
        },
        "system": {
            "uptime_seconds": snapshot.uptime_seconds,
            "version": env!("CARGO_PKG_VERSION"),
        }
    })))
}

/// 节点概要
#[derive(Debug, Serialize)]
pub struct NodeInfo {
    pub name: String,
    pub kind: NodeKind,
    pub out_degree: usize,
    pub in_degree: usize,
}

async fn list_nodes(State(state): State<AppState>) -> impl IntoResponse {
    let graph = &state.graph;
    let nodes: Vec<NodeInfo> = graph
        .nodes()
        .map(|node| NodeInfo {
            name: node.name().to_string(),
            kind: node.kind(),
            out_degree: graph.out_degree(node.id()),
            in_degree: graph.in_degree(node.id()),
        })
        .collect();
    Json(ApiResponse::success(nodes))
}

async fn list_edges(State(state): State<AppState>) -> impl IntoResponse {
    let graph = &state.graph;
    let edges: Vec<EdgeRecord> = graph.edges().map(|edge| graph.record(edge)).collect();
    Json(ApiResponse::success(edges))
}

/// 出边
async fn get_outgoing_edges(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    if state.graph.node(&name).is_none() {
        return node_not_found(&name);
    }
    Json(ApiResponse::success(state.graph.out_edges(&name))).into_response()
}

/// 入边
async fn get_incoming_edges(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    if state.graph.node(&name).is_none() {
        return node_not_found(&name);
    }
    Json(ApiResponse::success(state.graph.in_edges(&name))).into_response()
}

/// 到某个节点的最短距离
#[derive(Debug, Serialize)]
pub struct NodeDistance {
    pub node: String,
    pub distance: f64,
}

/// 从节点出发到各可达节点的最短距离
async fn get_distances(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    if state.graph.node(&name).is_none() {
        return node_not_found(&name);
    }

    match state.queries.distances_from(&name) {
        Ok(distances) => {
            let data: Vec<NodeDistance> = distances
                .into_iter()
                .map(|(node, distance)| NodeDistance { node, distance })
                .collect();
            Json(ApiResponse::success(data)).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// 可达性查询参数
#[derive(Debug, Deserialize)]
pub struct ReachableParams {
    pub source: String,
    pub target: String,
}

async fn reachable(
    State(state): State<AppState>,
    Query(params): Query<ReachableParams>,
) -> impl IntoResponse {
    let reachable = state.graph.has_path(&params.source, &params.target);
    Json(ApiResponse::success(serde_json::json!({
        "source": params.source,
        "target": params.target,
        "reachable": reachable,
    })))
}

/// 执行一次 (起点, 终点, 算法) 查询
async fn run_query(State(state): State<AppState>, Json(req): Json<QueryRequest>) -> Response {
    match state.queries.run(&req) {
        Ok(outcome) => {
            Json(ApiResponse::success(QueryResponse::from(outcome))).into_response()
        }
        Err(e) => error_response(e),
    }
}

/// 最短路径请求
#[derive(Debug, Deserialize)]
pub struct PathRequest {
    pub source: String,
    pub target: String,
}

/// 最短路径；不可达时 data 为 null
async fn shortest_path(State(state): State<AppState>, Json(req): Json<PathRequest>) -> Response {
    for name in [&req.source, &req.target] {
        if state.graph.node(name).is_none() {
            return node_not_found(name);
        }
    }

    match state.queries.shortest_path(&req.source, &req.target) {
        Ok(path) => Json(ApiResponse::success(path)).into_response(),
        Err(e) => error_response(e),
    }
}

/// 最大流请求
#[derive(Debug, Deserialize)]
pub struct MaxFlowRequest {
    pub source: String,
    pub sink: String,
}

async fn max_flow(State(state): State<AppState>, Json(req): Json<MaxFlowRequest>) -> Response {
    for name in [&req.source, &req.sink] {
        if state.graph.node(name).is_none() {
            return node_not_found(name);
        }
    }

    let summary = state.queries.flow_summary(&req.source, &req.sink);
    Json(ApiResponse::success(summary)).into_response()
}

fn node_not_found(name: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error(&Error::NodeNotFound(name.to_string()).to_string())),
    )
        .into_response()
}

fn error_response(e: Error) -> Response {
    let status = match e {
        Error::NodeNotFound(_) => StatusCode::NOT_FOUND,
        Error::NegativeCycle(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ApiResponse::<()>::error(&e.to_string()))).into_response()
}

/// API 响应
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(msg: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.to_string()),
        }
    }
}

impl<T> IntoResponse for ApiResponse<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        let graph = Arc::new(Graph::from_edges([
            ("A", "B", 5.0, 10.0),
            ("B", "C", 7.0, 4.0),
            ("D", "A", 1.0, 1.0),
        ]));
        build_router(AppState::new(graph))
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    async fn get(uri: &str) -> (StatusCode, Value) {
        send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await
    }

    async fn post(uri: &str, body: Value) -> (StatusCode, Value) {
        send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_metrics_is_plain_text() {
        let response = app()
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("hydronet_queries_total"));
    }

    #[tokio::test]
    async fn test_nodes_and_edges() {
        let (status, body) = get("/nodes").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 4);
        assert_eq!(body["data"][0]["name"], "A");
        assert_eq!(body["data"][0]["out_degree"], 1);
        assert_eq!(body["data"][0]["in_degree"], 1);

        let (_, body) = get("/edges").await;
        assert_eq!(body["data"].as_array().unwrap().len(), 3);

        let (_, body) = get("/stats").await;
        assert_eq!(body["data"]["network"]["nodes"], 4);
        assert_eq!(body["data"]["network"]["kinds"]["consumption_point"], 4);
    }

    #[tokio::test]
    async fn test_node_edges() {
        let (status, body) = get("/nodes/B/outgoing").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["destination"], "C");
        assert_eq!(body["data"][0]["capacity"], 4.0);

        let (_, body) = get("/nodes/B/incoming").await;
        assert_eq!(body["data"][0]["source"], "A");

        let (status, body) = get("/nodes/Z/outgoing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_node_distances() {
        let (status, body) = get("/nodes/D/distances").await;
        assert_eq!(status, StatusCode::OK);
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 4);
        assert_eq!(data[0]["node"], "A");
        assert_eq!(data[0]["distance"], 1.0);
        assert_eq!(data[2]["node"], "C");
        assert_eq!(data[2]["distance"], 13.0);

        let (_, body) = get("/nodes/C/distances").await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, _) = get("/nodes/Z/distances").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_reachable() {
        let (_, body) = get("/reachable?source=D&target=C").await;
        assert_eq!(body["data"]["reachable"], true);

        let (_, body) = get("/reachable?source=C&target=D").await;
        assert_eq!(body["data"]["reachable"], false);
    }

    #[tokio::test]
    async fn test_query_route() {
        let (status, body) = post(
            "/query",
            serde_json::json!({"origin": "A", "destination": "C", "algorithm": "shortest-path"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["outcome"]["outcome"], "path");
        assert_eq!(body["data"]["outcome"]["distance"], 12.0);

        let (status, body) = post("/query", serde_json::json!({"origin": "A"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["outcome"]["outcome"], "invalid_selection");
        assert_eq!(body["data"]["summary"], "请选择起点、终点和算法。");
    }

    #[tokio::test]
    async fn test_shortest_path_route() {
        let (status, body) = post(
            "/algorithm/shortest-path",
            serde_json::json!({"source": "D", "target": "C"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["path"], serde_json::json!(["D", "A", "B", "C"]));
        assert_eq!(body["data"]["distance"], 13.0);

        let (status, body) = post(
            "/algorithm/shortest-path",
            serde_json::json!({"source": "C", "target": "A"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(body["data"].is_null());

        let (status, _) = post(
            "/algorithm/shortest-path",
            serde_json::json!({"source": "A", "target": "Z"}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_max_flow_route() {
        let (status, body) = post(
            "/algorithm/max-flow",
            serde_json::json!({"source": "A", "sink": "C"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["value"], 4.0);
        assert_eq!(body["data"]["bottlenecks"][0]["source"], "B");

        let (_, body) = post(
            "/algorithm/max-flow",
            serde_json::json!({"source": "C", "sink": "A"}),
        )
        .await;
        assert_eq!(body["data"]["value"], 0.0);
    }
}
