mod app;
mod config;
mod controls;
mod headless;
mod loader;
mod studio;

use anyhow::Result;
use winit::dpi::PhysicalSize;

use sprig_engine::device::GpuInit;
use sprig_engine::logging::{LoggingConfig, init_logging};
use sprig_engine::window::{Runtime, RuntimeConfig};

use crate::app::StudioApp;
use crate::config::{Parsed, StudioConfig, USAGE};
use crate::studio::Studio;

fn main() {
    init_logging(LoggingConfig::quiet_gpu());

    let config = match StudioConfig::from_args(std::env::args().skip(1)) {
        Ok(Parsed::Run(config)) => config,
        Ok(Parsed::Help) => {
            println!("{USAGE}");
            return;
        }
        Err(e) => {
            eprintln!("{e:#}\n\n{USAGE}");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(config) {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(config: StudioConfig) -> Result<()> {
    if config.headless {
        return headless::run(&config);
    }

    let studio = Studio::new(&config)?;
    let window = RuntimeConfig {
        title: "sprig".to_string(),
        initial_size: PhysicalSize::new(config.width, config.height),
    };

    Runtime::run(window, GpuInit::default(), StudioApp::new(studio))
}
