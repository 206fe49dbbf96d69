mod echo;
mod handler;
#[cfg(not(feature = "bgfx"))]
mod headless;

use anyhow::Result;
use gfxbridge_engine::logging::{init_logging, LoggingConfig};
use gfxbridge_engine::runtime::{Runtime, RuntimeConfig, Window};

#[cfg(feature = "bgfx")]
use gfxbridge_engine::native::bgfx::{BgfxRenderer, PlatformData};

use echo::EchoApp;
use handler::DemoHandler;

fn main() -> Result<()> {
    init_logging(LoggingConfig {
        native_level: log::LevelFilter::Debug,
        ..LoggingConfig::default()
    });

    let config = RuntimeConfig {
        title: "gfxbridge input echo".to_string(),
        ..RuntimeConfig::default()
    };

    log::info!("press Esc or right-meta+Q to quit");
    Runtime::run(config, make_renderer, EchoApp::default())
}

#[cfg(not(feature = "bgfx"))]
fn make_renderer(_window: &Window) -> Result<headless::HeadlessRenderer> {
    Ok(headless::HeadlessRenderer::new(DemoHandler::default()))
}

#[cfg(feature = "bgfx")]
fn make_renderer(window: &Window) -> Result<BgfxRenderer> {
    let platform = PlatformData::from_window(window)?;
    let size = window.inner_size();
    Ok(BgfxRenderer::new(platform, size.width, size.height, DemoHandler::default()))
}
