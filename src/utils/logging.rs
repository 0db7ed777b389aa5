use log::LevelFilter;

/// Install the terminal logger, defaulting to `info` unless `RUST_LOG` says otherwise
pub fn init_logger() {
    let _ = pretty_env_logger::formatted_timed_builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .try_init();
}
