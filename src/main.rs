//! tinychat CLI entry point
//!
//! Loads configuration, connects to the model runtime, and runs the
//! interactive chat loop. Any error is printed to stderr and the process exits
//! with status 1.

use tinychat::cli::{output::Output, repl, Cli};
use tinychat::{ChatConfig, ChatSession, GenerationService, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load .env before clap so TINYCHAT_* variables from it are honored
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = Output::for_terminal(cli.no_color);
    init_tracing(cli.verbose);

    if let Err(e) = run(cli, &output).await {
        output.error(&e.to_string());
        std::process::exit(1);
    }
}

/// Logs go to stderr so they never interleave with replies on stdout.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "warn,tinychat=debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli, output: &Output) -> Result<()> {
    let mut config = ChatConfig::discover(cli.config.as_deref())?;
    cli.apply_to(&mut config);
    config.validate()?;

    let provider = config.provider();

    if cli.verbose {
        output.kv("Provider", provider.name());
        output.kv("Model", provider.model());
        output.kv("Window", &format!("{} turns", config.memory.window));
        output.kv(
            "Sampling",
            &format!(
                "max_new_tokens={} temperature={} top_p={} gpu={}",
                config.generation.max_new_tokens,
                config.generation.temperature,
                config.generation.top_p,
                config.generation.use_gpu
            ),
        );
    }

    let service = provider.create_service().await?;
    info!(
        model = service.model_name(),
        kind = %service.model_kind(),
        "Generation service ready"
    );

    let mut session = ChatSession::new(service, config.generation, config.memory.window);

    output.greeting();
    repl::run(&mut session, output).await
}
