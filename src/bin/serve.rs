//! Serve the configured pipeline over HTTP

use std::sync::Arc;

use anyhow::Result;
use burn::backend::{libtorch::LibTorchDevice, LibTorch};
use burn_pipelines_api::{
    api,
    config::{Config, DEFAULT_CONFIG_PATH},
    pipelines::{init_pipeline, Predict},
    utils::logging::init_logger,
};
use pico_args::Arguments;
use tokio::net::TcpListener;

const HELP: &str = "\
Usage: serve [CONFIG]

Arguments:
  CONFIG               Path to the YAML config (default: config/api_config.yaml)

Options:
  -h, --help           Print help
";

#[derive(Debug)]
struct Args {
    /// Prints the usage menu
    help: bool,

    /// Path to the YAML config
    config: String,
}

fn parse_args() -> Result<Args, pico_args::Error> {
    let mut pargs = Arguments::from_env();

    let args = Args {
        help: pargs.contains(["-h", "--help"]),
        config: pargs
            .opt_free_from_str()?
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string()),
    };

    Ok(args)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();

    let args = parse_args()?;

    if args.help {
        println!("{}", HELP);
        return Ok(());
    }

    let config = Config::load(&args.config)?;
    let device = LibTorchDevice::from(config.device);

    log::info!("Loaded config from {} (device: {})", args.config, config.device);

    let pipeline = init_pipeline::<LibTorch>(&config, device).await?;

    log::info!("{} ready with {}", pipeline.pipeline(), pipeline.model_name());

    let app = api::router(Arc::new(pipeline));

    let address = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&address).await?;

    log::info!("Listening on http://{}", address);

    axum::serve(listener, app).await?;

    Ok(())
}
