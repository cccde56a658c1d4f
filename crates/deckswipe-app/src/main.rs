//! Command-line entry point: `deckswipe [config.json] script.json`.

use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (config_path, script_path) = match args.as_slice() {
        [script] => (None, script),
        [config, script] => (Some(Path::new(config)), script),
        _ => {
            eprintln!("usage: deckswipe [config.json] script.json");
            return ExitCode::from(2);
        }
    };

    log::info!("Starting deckswipe");
    let result = deckswipe_app::run_files(config_path, Path::new(script_path))
        .and_then(|summary| summary.to_json());
    match result {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("{err}");
            eprintln!("deckswipe: {err}");
            ExitCode::FAILURE
        }
    }
}
