#![deny(unsafe_code)]
//! CLI binary for terrain-mesh.
//!
//! Subcommands:
//! - `render`: run a simulation N steps, write a PNG
//! - `stats`: run a simulation N steps, print mesh statistics
//! - `themes`: print built-in theme names

mod error;

use clap::{Args, Parser, Subcommand, ValueEnum};
use error::CliError;
use glam::Vec2;
use log::info;
use std::path::{Path, PathBuf};
use std::process;
use terrain_mesh_core::effects::DEFAULT_SHOCKWAVE_STRENGTH;
use terrain_mesh_core::{
    HeightMode, PointerMode, PointerState, Rgba, Scene, Simulation, SimulationConfig, Theme,
};

#[derive(Parser)]
#[command(name = "terrain-mesh", about = "Animated low-poly terrain renderer")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the simulation and write the final frame as a PNG.
    Render {
        #[command(flatten)]
        sim: SimArgs,

        /// Output file path.
        #[arg(short, long, default_value = "terrain.png")]
        output: PathBuf,

        /// Background color behind the mesh (#hex, rgb() or rgba()).
        #[arg(long, default_value = "#000000")]
        background: String,
    },
    /// Run the simulation and print mesh statistics.
    Stats {
        #[command(flatten)]
        sim: SimArgs,
    },
    /// List built-in themes.
    Themes,
}

#[derive(Clone, Copy, ValueEnum)]
enum WellMode {
    Attract,
    Repel,
}

#[derive(Clone, Copy, ValueEnum)]
enum PointerArg {
    Push,
    Pull,
    Swirl,
}

impl From<PointerArg> for PointerMode {
    fn from(p: PointerArg) -> Self {
        match p {
            PointerArg::Push => PointerMode::Push,
            PointerArg::Pull => PointerMode::Pull,
            PointerArg::Swirl => PointerMode::Swirl,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum HeightArg {
    Static,
    Animate,
    Mouse,
}

impl From<HeightArg> for HeightMode {
    fn from(h: HeightArg) -> Self {
        match h {
            HeightArg::Static => HeightMode::Static,
            HeightArg::Animate => HeightMode::Animate,
            HeightArg::Mouse => HeightMode::Mouse,
        }
    }
}

#[derive(Args)]
struct SimArgs {
    /// Canvas width in pixels.
    #[arg(short = 'W', long, default_value_t = 800.0)]
    width: f32,

    /// Canvas height in pixels.
    #[arg(short = 'H', long, default_value_t = 600.0)]
    height: f32,

    /// Number of points.
    #[arg(short, long, default_value_t = 400)]
    points: usize,

    /// Seed for point placement and terrain noise.
    #[arg(long, default_value_t = 42)]
    seed: u32,

    /// Number of simulation steps.
    #[arg(short, long, default_value_t = 120)]
    steps: usize,

    /// Time per step.
    #[arg(long, default_value_t = 1.0)]
    dt: f32,

    /// Drift speed multiplier.
    #[arg(long, default_value_t = 1.0)]
    speed: f32,

    /// Settings JSON file with `noise`, `physics`, `pointer`, `lighting` and
    /// `theme` groups. Flags below override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Theme name (see `themes`).
    #[arg(short, long)]
    theme: Option<String>,

    /// How point heights evolve.
    #[arg(long, value_enum)]
    height_mode: Option<HeightArg>,

    /// Scene JSON file; replaces every other simulation option.
    #[arg(long, conflicts_with = "config")]
    scene: Option<PathBuf>,

    /// Trigger a shockwave at the canvas center before stepping.
    #[arg(long)]
    shockwave: bool,

    /// Place a gravity well at the canvas center.
    #[arg(long, value_enum)]
    well: Option<WellMode>,

    /// Hold the pointer at `X,Y` for every step, using the configured
    /// pointer radius and strength.
    #[arg(long, value_name = "X,Y", value_parser = parse_position)]
    pointer: Option<Vec2>,

    /// Interaction of the held pointer.
    #[arg(long, value_enum, default_value_t = PointerArg::Push, requires = "pointer")]
    pointer_mode: PointerArg,
}

fn parse_position(s: &str) -> Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got `{s}`"))?;
    let coord = |v: &str| {
        v.trim()
            .parse::<f32>()
            .ok()
            .filter(|f| f.is_finite())
            .ok_or_else(|| format!("`{v}` is not a finite number"))
    };
    Ok(Vec2::new(coord(x)?, coord(y)?))
}

fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| CliError::Io(format!("{}: {e}", path.display())))
}

impl SimArgs {
    fn scene(&self) -> Result<Scene, CliError> {
        if let Some(path) = &self.scene {
            return Ok(Scene::from_json(&read_file(path)?)?);
        }
        let mut scene = Scene::new(self.width, self.height, self.points, self.seed);
        scene.steps = self.steps;
        scene.dt = self.dt;
        scene.speed = self.speed;
        if let Some(path) = &self.config {
            let value: serde_json::Value = serde_json::from_str(&read_file(path)?)
                .map_err(|e| CliError::Input(format!("{}: {e}", path.display())))?;
            scene.config = SimulationConfig::from_json(&value);
        }
        if let Some(name) = &self.theme {
            scene.config.theme = Theme::from_name(name)?;
        }
        if let Some(mode) = self.height_mode {
            scene.config.noise.mode = mode.into();
        }
        scene.validate()?;
        Ok(scene)
    }

    /// Builds the scene, applies one-off effects, and steps it.
    fn run(&self) -> Result<(Scene, Simulation), CliError> {
        let scene = self.scene()?;
        let mut sim = scene.build();
        let center = (sim.width() * 0.5, sim.height() * 0.5);
        if self.shockwave {
            sim.trigger_shockwave(center.0, center.1, DEFAULT_SHOCKWAVE_STRENGTH);
        }
        if let Some(mode) = self.well {
            sim.set_gravity_well(center.0, center.1, true, matches!(mode, WellMode::Attract));
        }
        let pointer = match self.pointer {
            Some(at) => sim.config().pointer.pointer_at(at, self.pointer_mode.into()),
            None => PointerState::disabled(),
        };
        for _ in 0..scene.steps {
            sim.step(scene.dt, scene.speed, pointer);
        }
        info!(
            "ran {} steps: {} triangles over {} points",
            scene.steps,
            sim.triangle_count(),
            sim.point_count()
        );
        Ok((scene, sim))
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Themes => {
            let themes = Theme::list_names();
            if cli.json {
                let info = serde_json::json!({ "themes": themes });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Themes:");
                for name in themes {
                    println!("  {name}");
                }
            }
        }
        Command::Stats { sim: args } => {
            let (scene, sim) = args.run()?;
            let (lo, hi) = sim.height_range().unwrap_or((0.0, 0.0));
            if cli.json {
                let info = serde_json::json!({
                    "width": sim.width(),
                    "height": sim.height(),
                    "seed": scene.seed,
                    "steps": scene.steps,
                    "triangles": sim.triangle_count(),
                    "strokeVertices": sim.stroke_vertex_count(),
                    "points": sim.point_count(),
                    "heightRange": [lo, hi],
                    "bufferSizes": sim.buffer_sizes(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("canvas:          {}x{}", sim.width(), sim.height());
                println!("steps:           {} (seed {})", scene.steps, scene.seed);
                println!("points:          {}", sim.point_count());
                println!("triangles:       {}", sim.triangle_count());
                println!("stroke vertices: {}", sim.stroke_vertex_count());
                println!("height range:    {lo:.4} .. {hi:.4}");
            }
        }
        Command::Render {
            sim: args,
            output,
            background,
        } => {
            let background = Rgba::parse(&background)?;
            let (scene, sim) = args.run()?;

            terrain_mesh_raster::snapshot::write_png(&sim, background, &output)?;

            if cli.json {
                let info = serde_json::json!({
                    "width": sim.width(),
                    "height": sim.height(),
                    "points": sim.point_count(),
                    "steps": scene.steps,
                    "seed": scene.seed,
                    "triangles": sim.triangle_count(),
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {}x{} ({} points, {} steps, seed {}) -> {}",
                    sim.width(),
                    sim.height(),
                    sim.point_count(),
                    scene.steps,
                    scene.seed,
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
