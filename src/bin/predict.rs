//! Run the configured pipeline over every line of a file

use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{anyhow, Result};
use burn::backend::{libtorch::LibTorchDevice, LibTorch};
use burn_pipelines_api::{
    config::Config,
    pipelines::{init_pipeline, FinalPrediction, Predict},
    utils::{files::read_inputs, logging::init_logger},
};
use pico_args::Arguments;
use serde::Serialize;

const HELP: &str = "\
Usage: predict CONFIG INPUT_FILE

Arguments:
  CONFIG               Path to the YAML config
  INPUT_FILE           A text file with one input per line

Predictions are written next to INPUT_FILE, with a .json extension.

Options:
  -h, --help           Print help
";

#[derive(Debug)]
struct Args {
    /// Prints the usage menu
    help: bool,

    /// Path to the YAML config
    config: String,

    /// The input text file
    input_file: String,
}

fn parse_args() -> Result<Args, pico_args::Error> {
    let mut pargs = Arguments::from_env();

    let help = pargs.contains(["-h", "--help"]);
    if help {
        return Ok(Args {
            help,
            config: String::new(),
            input_file: String::new(),
        });
    }

    let args = Args {
        help,
        config: pargs.free_from_str()?,
        input_file: pargs.free_from_str()?,
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

    // Both files must exist before anything is loaded
    if !Path::new(&args.config).is_file() {
        return Err(anyhow!("config_path \"{}\" does not exist", args.config));
    }

    if !Path::new(&args.input_file).is_file() {
        return Err(anyhow!("input_file \"{}\" does not exist", args.input_file));
    }

    let config = Config::load(&args.config)?;
    let device = LibTorchDevice::from(config.device);

    let pipeline = init_pipeline::<LibTorch>(&config, device).await?;

    let inputs = read_inputs(&args.input_file).await?;
    let total = inputs.len();

    let mut predictions: BTreeMap<usize, Vec<FinalPrediction>> = BTreeMap::new();

    for (ix, text) in inputs.iter().enumerate() {
        predictions.insert(ix, pipeline.predict(text)?);

        if (ix + 1) % 100 == 0 || ix + 1 == total {
            log::info!("Predicted {}/{} lines", ix + 1, total);
        }
    }

    let output_path = Path::new(&args.input_file).with_extension("json");

    // Four-space indentation, keeping non-ASCII text as-is
    let mut output = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut output, formatter);
    predictions.serialize(&mut serializer)?;

    fs::write(&output_path, output)?;

    log::info!("Wrote predictions to {}", output_path.display());

    Ok(())
}
