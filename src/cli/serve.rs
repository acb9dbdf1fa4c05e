use anyhow::Result;

use crate::api;
use crate::core::{AppConfig, init_tracing};

pub async fn run(host: String, port: String) -> Result<()> {
    init_tracing();
    let config = AppConfig::from_env()?;
    api::serve(host, port, config).await
}
