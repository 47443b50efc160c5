use std::sync::Arc;

use anyhow::{Context, Result};

use sprig_engine::coords::Vec2;
use sprig_engine::scene::{Scene, SceneConfig, SpriteId};
use sprig_engine::surface::Canvas;

use crate::config::StudioConfig;
use crate::controls::{EffectControls, Targets};
use crate::loader::StudioLoader;

/// Sprite grid positions, column-major.
const GRID_X: [f64; 2] = [125.0, 425.0];
const GRID_Y: [f64; 2] = [25.0, 325.0];

/// Scene, sprites and effect controls shared by the windowed and headless
/// front ends.
pub struct Studio {
    pub scene: Scene<Canvas>,
    pub controls: EffectControls,
    sprites: Vec<SpriteId>,
    image: String,
}

impl Studio {
    pub fn new(config: &StudioConfig) -> Result<Self> {
        let loader = Arc::new(StudioLoader::new(&config.assets));
        let scene_config = SceneConfig {
            seed: config.seed,
            ..SceneConfig::default()
        };

        let mut scene = Scene::new(Canvas::new(config.width, config.height), loader, scene_config)
            .context("cannot build scene")?;

        let mut sprites = Vec::with_capacity(GRID_X.len() * GRID_Y.len());
        for x in GRID_X {
            for y in GRID_Y {
                sprites.push(scene.spawn_sprite(&config.image, Vec2::new(x, y)));
            }
        }

        let targets = Targets {
            source: sprites[0],
            dest: sprites[1],
        };
        let controls = EffectControls::new(config.preset, targets, config.fps);

        log::info!(
            "scene {}x{} with {} sprites of {}",
            config.width,
            config.height,
            sprites.len(),
            config.image
        );

        Ok(Self {
            scene,
            controls,
            sprites,
            image: config.image.clone(),
        })
    }

    pub fn sprites(&self) -> &[SpriteId] {
        &self.sprites
    }

    /// Reissues the image load for every sprite.
    pub fn reload(&mut self) {
        for &id in &self.sprites {
            self.scene.reload(id, &self.image);
        }
        log::info!("reloading {}", self.image);
    }

    /// Installs a new update hook when the controls changed. Returns whether
    /// anything was installed or cleared.
    pub fn apply_controls(&mut self) -> bool {
        if let Some(dest) = self.scene.sprite(self.sprites[1]) {
            let (w, h) = (dest.buffer().width(), dest.buffer().height());
            self.controls.set_pixel_count(w as u64 * h as u64);
        }

        if !self.controls.take_dirty() {
            return false;
        }

        match self.controls.build_hook() {
            Some(hook) => self.scene.set_update(hook),
            None => self.scene.clear_update(),
        }
        log::info!("{}", self.controls.describe());
        true
    }
}
