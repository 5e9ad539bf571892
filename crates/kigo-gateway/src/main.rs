use std::sync::Arc;

use clap::Parser;
use tracing::info;

use kigo_flow::{HaikuFlow, MemoryCheckpointer};
use kigo_gateway::handlers::{EchoHandler, HaikuHandler};
use kigo_gateway::logging::init_logging;
use kigo_gateway::{run_server, GatewayState, HandlerRegistry, JwtVerifier};
use kigo_llm::AnthropicProvider;

#[derive(Parser, Debug)]
#[command(name = "kigo-gateway")]
#[command(about = "Kigo real-time haiku gateway")]
#[command(version)]
struct Cli {
    /// Config file path (defaults to ~/.kigo/config.json)
    #[arg(long, env = "KIGO_CONFIG")]
    config: Option<String>,

    /// Server port (overrides config)
    #[arg(long, env = "KIGO_PORT")]
    port: Option<u16>,

    /// Log filter (overrides config logging level)
    #[arg(long, env = "RUST_LOG")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => kigo_config::expand_tilde(path),
        None => kigo_config::default_config_path()
            .ok_or_else(|| anyhow::anyhow!("cannot locate home directory, pass --config"))?,
    };
    let mut config = kigo_config::load_config(&config_path).await?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    init_logging(&config.logging, cli.log_level.as_deref())?;

    info!("config loaded from {}", config_path.display());

    let completion = Arc::new(AnthropicProvider::from_config(&config.llm)?);
    let checkpoints = Arc::new(MemoryCheckpointer::new());
    let flow = Arc::new(HaikuFlow::new(completion, checkpoints));

    let registry = Arc::new(
        HandlerRegistry::new()
            .with_handler("haiku", Arc::new(HaikuHandler::new(flow)))
            .with_handler("echo", Arc::new(EchoHandler)),
    );

    let verifier = Arc::new(JwtVerifier::new(
        &config.auth.jwt_secret,
        config.auth.token_ttl_secs,
    ));

    let state = Arc::new(GatewayState { verifier, registry });

    run_server(
        state,
        &config.server.host,
        config.server.port,
        &config.server.ws_path,
    )
    .await
}
