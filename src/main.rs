use anyhow::Result;
use clap::Parser;
use dwsim_agent::cli::CliArgs;

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    dwsim_agent::run(args).await
}
