/*
 * Responsibility
 * - tokio runtime entry point
 * - call app::run() (no logic here)
 */
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    authgate::app::run().await
}
