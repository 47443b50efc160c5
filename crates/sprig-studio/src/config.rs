use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use crate::controls::Preset;

/// Studio settings, from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct StudioConfig {
    /// Render without a window and write the last frame to `out`.
    pub headless: bool,
    pub frames: u32,
    pub fps: f64,
    pub seed: Option<u64>,
    /// Directory file URLs resolve against.
    pub assets: PathBuf,
    /// Image loaded into each of the four sprites. `gen:` URLs are generated.
    pub image: String,
    pub out: PathBuf,
    pub preset: Preset,
    pub width: u32,
    pub height: u32,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            headless: false,
            frames: 120,
            fps: 60.0,
            seed: None,
            assets: PathBuf::from("data"),
            image: "gen:rings".to_string(),
            out: PathBuf::from("sprig.png"),
            preset: Preset::Dissolve,
            width: 900,
            height: 600,
        }
    }
}

/// Parse outcome: either a config to run or a request for usage text.
#[derive(Debug)]
pub enum Parsed {
    Run(StudioConfig),
    Help,
}

pub const USAGE: &str = "\
Usage: sprig-studio [options]

  --headless          render without a window, write the final frame as PNG
  --frames N          frames to render in headless mode (default 120)
  --fps F             tick rate for headless mode (default 60)
  --seed S            seed the effect random source
  --assets DIR        directory image paths resolve against (default data)
  --image NAME        image for every sprite; gen:rings, gen:checker,
                      gen:gradient or a file name (default gen:rings)
  --out PATH          PNG written in headless mode (default sprig.png)
  --preset NAME       dissolve | static | drift | off (default dissolve)
  --size WxH          canvas size (default 900x600)
  -h, --help          show this text";

impl StudioConfig {
    /// Parses arguments, excluding the program name.
    pub fn from_args<I>(args: I) -> Result<Parsed>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = StudioConfig::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .with_context(|| format!("missing value for {flag}"))
            };

            match arg.as_str() {
                "-h" | "--help" => return Ok(Parsed::Help),
                "--headless" => config.headless = true,
                "--frames" => {
                    config.frames = value("--frames")?
                        .parse()
                        .context("--frames expects a whole number")?;
                }
                "--fps" => {
                    let fps: f64 = value("--fps")?.parse().context("--fps expects a number")?;
                    if !(fps.is_finite() && fps > 0.0) {
                        bail!("--fps must be positive, got {fps}");
                    }
                    config.fps = fps;
                }
                "--seed" => {
                    config.seed = Some(value("--seed")?.parse().context("--seed expects an integer")?);
                }
                "--assets" => config.assets = PathBuf::from(value("--assets")?),
                "--image" => config.image = value("--image")?,
                "--out" => config.out = PathBuf::from(value("--out")?),
                "--preset" => {
                    let name = value("--preset")?;
                    config.preset = Preset::from_name(&name)
                        .with_context(|| format!("unknown preset `{name}`"))?;
                }
                "--size" => {
                    let size = value("--size")?;
                    (config.width, config.height) = parse_size(&size)
                        .with_context(|| format!("--size expects WxH, got `{size}`"))?;
                }
                other => bail!("unknown argument `{other}`"),
            }
        }

        Ok(Parsed::Run(config))
    }
}

fn parse_size(s: &str) -> Option<(u32, u32)> {
    let (w, h) = s.split_once(['x', 'X'])?;
    let w: u32 = w.trim().parse().ok()?;
    let h: u32 = h.trim().parse().ok()?;
    Some((w, h))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Parsed> {
        StudioConfig::from_args(args.iter().map(|s| s.to_string()))
    }

    fn run(args: &[&str]) -> StudioConfig {
        match parse(args).unwrap() {
            Parsed::Run(c) => c,
            Parsed::Help => panic!("unexpected help"),
        }
    }

    #[test]
    fn no_arguments_gives_defaults() {
        assert_eq!(run(&[]), StudioConfig::default());
    }

    #[test]
    fn headless_options() {
        let c = run(&[
            "--headless", "--frames", "10", "--fps", "30", "--seed", "9", "--out", "x.png",
            "--preset", "drift", "--size", "64x48",
        ]);
        assert!(c.headless);
        assert_eq!(c.frames, 10);
        assert_eq!(c.fps, 30.0);
        assert_eq!(c.seed, Some(9));
        assert_eq!(c.out, PathBuf::from("x.png"));
        assert_eq!(c.preset, Preset::Drift);
        assert_eq!((c.width, c.height), (64, 48));
    }

    #[test]
    fn help_flag() {
        assert!(matches!(parse(&["--help"]).unwrap(), Parsed::Help));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse(&["--frames"]).is_err());
        assert!(parse(&["--fps", "0"]).is_err());
        assert!(parse(&["--preset", "sparkle"]).is_err());
        assert!(parse(&["--size", "12"]).is_err());
        assert!(parse(&["--wat"]).is_err());
    }
}
