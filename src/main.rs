use tracing_subscriber::EnvFilter;

mod cli_exec;
mod cli_runtime;
mod cli_subcommands;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,authcore=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = cli_runtime::run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
