use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use sprig_engine::tick::ManualTicks;

use crate::config::StudioConfig;
use crate::studio::Studio;

const LOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Renders `config.frames` ticks without a window and writes the final
/// frame to `config.out`.
pub fn run(config: &StudioConfig) -> Result<()> {
    let mut studio = Studio::new(config)?;

    let loaded = studio.scene.settle_loads(LOAD_TIMEOUT);
    if loaded < studio.sprites().len() {
        log::warn!("{loaded}/{} sprite loads completed", studio.sprites().len());
    }
    studio.apply_controls();

    let start = Instant::now();
    let mut ticks = ManualTicks::at_fps(start, config.fps);
    studio.scene.start_at(&mut ticks, start);

    let mut frames = 0;
    while frames < config.frames {
        let Some(at) = ticks.fire() else { break };
        if studio.scene.on_tick(&mut ticks, at) {
            frames += 1;
        }
    }
    studio.scene.teardown(&mut ticks);

    studio
        .scene
        .surface()
        .save_png(&config.out)
        .with_context(|| format!("writing {}", config.out.display()))?;

    log::info!("rendered {frames} frame(s) to {}", config.out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::Preset;

    fn out_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("sprig-studio-{}-{name}.png", std::process::id()))
    }

    #[test]
    fn writes_a_png_of_the_canvas_size() {
        let out = out_path("size");
        let config = StudioConfig {
            headless: true,
            frames: 3,
            seed: Some(5),
            out: out.clone(),
            ..StudioConfig::default()
        };
        run(&config).unwrap();

        let img = image::open(&out).unwrap();
        assert_eq!((img.width(), img.height()), (900, 600));
        let _ = std::fs::remove_file(out);
    }

    #[test]
    fn same_seed_renders_identically() {
        let render = |name: &str| {
            let out = out_path(name);
            let config = StudioConfig {
                headless: true,
                frames: 5,
                seed: Some(11),
                preset: Preset::Static,
                width: 300,
                height: 300,
                out: out.clone(),
                ..StudioConfig::default()
            };
            run(&config).unwrap();
            let bytes = image::open(&out).unwrap().to_rgba8().into_raw();
            let _ = std::fs::remove_file(out);
            bytes
        };
        assert_eq!(render("a"), render("b"));
    }
}
