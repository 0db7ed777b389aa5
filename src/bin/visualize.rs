//! Call a running API and show its predictions over the input text

use std::io::{self, IsTerminal};

use anyhow::Result;
use burn_pipelines_api::{
    api::{PredictResponse, TextInput, TokenizeResponse},
    pipelines::Pipeline,
    utils::logging::init_logger,
    visualize::{report, Endpoints},
};
use pico_args::Arguments;
use serde::de::DeserializeOwned;
use url::Url;

const HELP: &str = "\
Usage: visualize [OPTIONS] TEXT

Arguments:
  TEXT                 The text to run through the API

Options:
  -h, --help           Print help
      --ip             API Endpoint IP (default: 0.0.0.0)
      --port           API Endpoint PORT (default: 80)
";

#[derive(Debug)]
struct Args {
    /// Prints the usage menu
    help: bool,

    /// API Endpoint IP
    ip: String,

    /// API Endpoint PORT
    port: u16,

    /// The text to run through the API
    text: Option<String>,
}

fn parse_args() -> Result<Args, pico_args::Error> {
    let mut pargs = Arguments::from_env();

    let args = Args {
        help: pargs.contains(["-h", "--help"]),
        ip: pargs
            .opt_value_from_str("--ip")?
            .unwrap_or_else(|| "0.0.0.0".to_string()),
        port: pargs.opt_value_from_str("--port")?.unwrap_or(80),
        text: pargs.opt_free_from_str()?,
    };

    Ok(args)
}

async fn post<T: DeserializeOwned>(client: &reqwest::Client, url: Url, text: &str) -> Result<T> {
    let response = client
        .post(url)
        .json(&TextInput {
            text: text.to_string(),
        })
        .send()
        .await?
        .error_for_status()?;

    Ok(response.json().await?)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();

    let args = parse_args()?;

    let Some(text) = args.text.filter(|_| !args.help) else {
        println!("{}", HELP);
        return Ok(());
    };

    let endpoints = Endpoints::new(&args.ip, args.port)?;
    let client = reqwest::Client::new();

    let response: PredictResponse = post(&client, endpoints.predict, &text).await?;

    // Only pipelines that render entities inline need the full words
    let needs_tokens = Pipeline::try_from_type(&response.kind)
        .map(|pipeline| pipeline.needs_tokens())
        .unwrap_or_default();

    let tokens = if needs_tokens {
        let tokenized: TokenizeResponse = post(&client, endpoints.tokenize, &text).await?;
        Some(tokenized.tokens)
    } else {
        None
    };

    print!(
        "{}",
        report(
            &text,
            &response,
            tokens.as_deref(),
            io::stdout().is_terminal()
        )
    );

    Ok(())
}
