use anyhow::Result;
use days_until::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
