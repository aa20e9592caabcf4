//! Tiled texture diagnostic harness.
//!
//! Left click loads `image.png` into tile (0, 0); right click clears the tile
//! and writes a 32x32 copy of the image at (12, 12).

mod dispatch;

use tilecheck_engine::config::{GpuInit, HarnessConfig, LoggingConfig, RuntimeConfig};
use tilecheck_engine::fatal;
use tilecheck_engine::logging::init_logging;
use tilecheck_engine::window::Runtime;

use dispatch::HarnessApp;

fn main() {
    init_logging(LoggingConfig::default());
    fatal::install_panic_hook();

    let app = HarnessApp::new(HarnessConfig::default());
    if let Err(err) = Runtime::run(RuntimeConfig::default(), GpuInit::default(), app) {
        fatal::fail(err);
    }

    log::info!("window closed; exiting");
}
