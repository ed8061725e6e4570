//! Binary entrypoint for the FieldHook API server.
use fieldhook_api::{run, ServiceConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Config path from FIELDHOOK_CONFIG, listen address overridable with FIELDHOOK_ADDR
    let config = ServiceConfig::from_env()?;
    run(config).await
}
