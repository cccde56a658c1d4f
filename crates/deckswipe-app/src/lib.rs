//! Deckswipe session driver
//!
//! Replays scripted gesture sessions against a card deck without a window,
//! advancing the swiper at 60 fps and summarising every swipe and tap.

mod error;
mod script;
mod session;

pub use error::{AppError, AppResult};
pub use script::{FRAME_NANOS, Script, Step};
pub use session::{Summary, SwipedCards, run_script};

use deckswipe_core::SwiperConfig;
use std::path::Path;

fn read(path: &Path) -> AppResult<String> {
    std::fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a script and an optional config file, then replay the session.
///
/// Config fields the file leaves out take their defaults for the script's viewport.
pub fn run_files(config_path: Option<&Path>, script_path: &Path) -> AppResult<Summary> {
    let script = Script::from_json_str(&read(script_path)?)?;
    let config = match config_path {
        Some(path) => SwiperConfig::from_json_str_for_viewport(&read(path)?, script.viewport)?,
        None => SwiperConfig::for_viewport(script.viewport),
    };
    log::info!(
        "Loaded {} with a {}x{} viewport",
        script_path.display(),
        script.viewport.width,
        script.viewport.height
    );
    run_script(config, &script)
}
