//! Main application entry point (CLI binary).
//!
//! A thin wrapper around the `webfinger_client` library: parses arguments,
//! initializes logging, runs one lookup and prints the result as JSON.

use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use webfinger_client::config::Opt;
use webfinger_client::initialization::init_logger_with;
use webfinger_client::{Config, WebFinger};

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::parse();

    init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    match run(&opt).await {
        Ok(output) => {
            println!("{output}");
            Ok(())
        }
        Err(e) => {
            eprintln!("webfinger error: {:#}", e);
            process::exit(1);
        }
    }
}

async fn run(opt: &Opt) -> Result<String> {
    let webfinger =
        WebFinger::new(Config::from(opt)).context("Failed to initialize WebFinger client")?;

    let output = if let Some(rel) = &opt.rel {
        let link = webfinger.lookup_link(&opt.address, rel).await?;
        serde_json::to_string_pretty(&link)?
    } else {
        let result = webfinger.lookup(&opt.address).await?;
        if opt.raw {
            serde_json::to_string_pretty(&result.raw)?
        } else {
            serde_json::to_string_pretty(&result)?
        }
    };
    Ok(output)
}
