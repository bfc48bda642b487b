//! `http-demo` — sends one form POST to an echo endpoint and prints the
//! status code, the echoed `data` and the `Content-Type`.

use anyhow::Result;
use clap::Parser;

use simrun::demo::{DemoClient, DEFAULT_ENDPOINT};
use simrun::logging;

#[derive(Debug, Parser)]
#[command(name = "http-demo", version, about = "Posts a fixed form to an echo endpoint")]
struct Cli {
    /// Endpoint to POST to
    #[arg(long, env = "HTTP_DEMO_URL", default_value = DEFAULT_ENDPOINT)]
    url: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_stdout_logging()?;

    let client = DemoClient::new(cli.url)?;
    let response = client.post().await?;

    println!("{}", response.report());
    Ok(())
}
