use clap::Parser;
use mimic_server::config::ServerConfig;
use mimic_server::MimicServer;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// HTTP stub server: register canned responses, serve them back.
#[derive(Parser, Debug)]
#[command(name = "mimic")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen host for both listeners
    #[arg(long)]
    host: Option<String>,

    /// Stub traffic port (0 = ephemeral)
    #[arg(short, long, env = "MIMIC_PORT")]
    port: Option<u16>,

    /// Admin API port (0 = ephemeral)
    #[arg(long, env = "MIMIC_ADMIN_PORT")]
    admin_port: Option<u16>,

    /// Directory of JSON mapping files to register at startup
    #[arg(long, env = "MIMIC_MAPPINGS_DIR")]
    mappings_dir: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn into_config(self) -> anyhow::Result<ServerConfig> {
        let mut config = match self.config {
            Some(ref path) => ServerConfig::from_file(path)?,
            None => ServerConfig::default(),
        };

        if let Some(host) = self.host {
            config.listen.host = host;
        }
        if let Some(port) = self.port {
            config.listen.port = port;
        }
        if let Some(port) = self.admin_port {
            config.admin.port = port;
        }
        if let Some(dir) = self.mappings_dir {
            config.mappings_dir = Some(dir);
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("mimic={0},mimic_server={0}", args.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("mimic v{} starting", env!("CARGO_PKG_VERSION"));

    let config = args.into_config()?;
    let server = MimicServer::start(&config).await?;

    tracing::info!(
        "Serving stubs on http://{} (admin API on http://{}/__admin)",
        server.stub_addr(),
        server.admin_addr()
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("Received Ctrl-C, shutting down");
    server.shutdown().await;

    Ok(())
}
