use std::net::SocketAddr;

use taskboard_tool::{TaskBoard, http_api};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = std::env::var("TASKBOARD_TOOL_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;

    println!("taskboard-tool HTTP API listening on http://{addr}");
    let board = TaskBoard::new();
    http_api::serve(addr, board).await?;
    Ok(())
}
