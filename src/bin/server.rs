//! hydronet 服务器入口
//!
//! 加载供水网络并启动 HTTP API 服务器

use anyhow::Context;
use clap::Parser;
use hydronet::import::load_network;
use hydronet::logging::init_tracing;
use hydronet::server::{start_server, ServerConfig};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "hydronet-server")]
#[command(about = "hydronet 供水网络 HTTP API 服务器")]
struct Args {
    /// 边列表 CSV 文件
    #[arg(short, long, env = "HYDRONET_DATASET", default_value = "data/lima_sample.csv")]
    dataset: String,

    /// CSV 字段分隔符（单个 ASCII 字符）
    #[arg(long, env = "HYDRONET_DELIMITER", default_value_t = ',')]
    delimiter: char,

    /// 监听地址
    #[arg(short = 'H', long, env = "HYDRONET_HOST", default_value = "127.0.0.1")]
    host: String,

    /// 监听端口
    #[arg(short, long, env = "HYDRONET_PORT", default_value = "8080")]
    port: u16,

    /// 日志级别（RUST_LOG 优先）
    #[arg(short, long, env = "HYDRONET_LOG", default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let delimiter = u8::try_from(args.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| anyhow::anyhow!("分隔符必须是单个 ASCII 字符: {:?}", args.delimiter))?;
    let graph = load_network(&args.dataset, delimiter)
        .with_context(|| format!("无法加载数据集 {}", args.dataset))?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "network ready"
    );

    let config = ServerConfig {
        host: args.host,
        port: args.port,
    };
    start_server(config, graph).await?;

    Ok(())
}
