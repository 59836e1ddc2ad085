use clap::{Parser, Subcommand};
use lib::config::{self, Config};
use lib::handler::{handle_message, InboundMessage};
use lib::llm::GeminiClient;
use lib::persona::Persona;
use lib::responder::Responder;

#[derive(Parser)]
#[command(name = "botica")]
#[command(about = "Botica — pharmacy WhatsApp webhook bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Create the configuration directory and a default config file.
    Init {
        /// Config file path (default: BOTICA_CONFIG_PATH or ~/.botica/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,
    },

    /// Run the webhook gateway (health probe + Twilio messaging webhook).
    Serve {
        /// Config file path (default: BOTICA_CONFIG_PATH or ~/.botica/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// HTTP port (default from config or 8000)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// One-shot: run a message through the pipeline locally and print the reply.
    Ask {
        /// The message to send, as if received on WhatsApp.
        message: String,

        /// Config file path (default: BOTICA_CONFIG_PATH or ~/.botica/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("botica {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Init { config }) => {
            if let Err(e) = run_init(config) {
                log::error!("init failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Serve { config, port }) => {
            if let Err(e) = run_serve(config, port).await {
                log::error!("serve failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Ask { message, config }) => {
            if let Err(e) = run_ask(config, message).await {
                log::error!("ask failed: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

fn run_init(config_path: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(config::default_config_path);
    let dir = lib::init::init_config_dir(&path)?;
    println!("initialized configuration at {}", dir.display());
    Ok(())
}

async fn run_serve(
    config_path: Option<std::path::PathBuf>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let (mut config, _path) = config::load_config(config_path)?;
    if let Some(p) = port {
        config.gateway.port = p;
    }
    log::info!(
        "starting gateway on {}:{}",
        config.gateway.bind,
        config.gateway.port
    );
    lib::gateway::run_gateway(config).await
}

async fn run_ask(
    config_path: Option<std::path::PathBuf>,
    message: String,
) -> anyhow::Result<()> {
    let (config, _path) = config::load_config(config_path)?;
    let responder = build_responder(&config)?;
    let inbound = InboundMessage {
        sender: "cli".to_string(),
        body: Some(message),
    };
    let outbound = handle_message(&responder, &inbound).await;
    println!("{}", outbound.text);
    Ok(())
}

fn build_responder(config: &Config) -> anyhow::Result<Responder<GeminiClient>> {
    let api_key = config::resolve_google_api_key(config).ok_or_else(|| {
        anyhow::anyhow!(
            "Gemini API key not configured; set GOOGLE_API_KEY or gemini.apiKey in the config file"
        )
    })?;
    let client = GeminiClient::new(
        api_key,
        config.gemini.model.clone(),
        config.gemini.base_url.clone(),
    );
    let persona = Persona::from_config(&config.persona);
    Ok(Responder::new(client, persona))
}
