use anyhow::Result;
use freerooms::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
