use chat_relay::relay_state::{RelayConfig, RelayState};
use chat_relay::server::startup;
use clap::Parser;
use tokio::signal;

#[derive(Parser, Debug)]
#[command(about = "HTTP relay between a chat page and an OpenAI-style completion provider")]
struct Args {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// Model identifier sent to the completion provider.
    #[arg(long, default_value = "gpt-3.5-turbo")]
    model: String,

    #[arg(long, default_value = "https://api.openai.com/v1/chat/completions")]
    provider_url: String,

    /// Instruction string the transcript of every session starts with.
    #[arg(long, default_value = "You are a software developer")]
    system_prompt: String,

    /// Origin allowed by CORS on all paths.
    #[arg(long, default_value = "http://localhost:3000")]
    allowed_origin: String,

    /// Provider request timeout in seconds.
    #[arg(long, default_value_t = 600)]
    timeout: u64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // The credential comes from the environment only; refusing to start here
    // keeps a missing key from surfacing as per-request failures later.
    let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
        anyhow::anyhow!("Missing OpenAI API key! Please set the OPENAI_API_KEY environment variable.")
    })?;

    let config = RelayConfig {
        host: args.host,
        port: args.port,
        model: args.model,
        provider_url: args.provider_url,
        api_key,
        system_prompt: args.system_prompt,
        allowed_origin: args.allowed_origin,
        timeout: args.timeout,
    };
    let relay_state = RelayState::new(&config)?;

    actix_web::rt::System::new().block_on(async move {
        tokio::select! {
            res = startup(config, relay_state) => {
                res.map_err(anyhow::Error::from)
            }
            _ = signal::ctrl_c() => {
                println!("Received Ctrl+C, shutting down");
                Ok(())
            }
        }
    })
}
