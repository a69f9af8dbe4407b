use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use slopepath::cli_utils::{parse_cell, parse_size, validate_output_path};
use slopepath::config::{Settings, get_config_path, load_config, load_config_from, save_config_to};
use slopepath::export::export_slope_map_png;
use slopepath::terrain::slope_between;
use slopepath::{
    GridCell, HeightField, PathResult, PathfindingConfigPatch, PathfindingEngine, TerrainError,
    TerrainNoiseGenerator, TerrainResult, get_terrain_preset,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Clone)]
#[command(name = "slopepath")]
#[command(about = "Plan slope-aware rover routes over generated terrain")]
struct Args {
    /// Terrain size in grid cells (format: WIDTHxHEIGHT)
    #[arg(long, default_value = "64x64")]
    size: String,

    /// Terrain preset (flat, hills, mountains, dunes); uses the settings file when omitted
    #[arg(long)]
    terrain_type: Option<String>,

    /// Random seed for terrain and for picking endpoints
    #[arg(long)]
    seed: Option<u32>,

    /// Terrain amplitude (height variation)
    #[arg(long)]
    amplitude: Option<f32>,

    /// Base frequency for noise (terrain feature density)
    #[arg(long)]
    frequency: Option<f64>,

    /// Number of noise octaves for detail
    #[arg(long)]
    octaves: Option<u32>,

    /// Load a saved heightfield instead of generating one
    #[arg(long)]
    load: Option<PathBuf>,

    /// Settings file to use instead of the user config
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start cell (format: X,Y); random when omitted
    #[arg(long)]
    start: Option<String>,

    /// Goal cell (format: X,Y); random when omitted
    #[arg(long)]
    goal: Option<String>,

    /// Steepest traversable slope in degrees
    #[arg(long)]
    max_slope: Option<f32>,

    /// Weight of the slope penalty
    #[arg(long)]
    slope_weight: Option<f32>,

    /// Weight of the distance term
    #[arg(long)]
    distance_weight: Option<f32>,

    /// Restrict movement to the 4 orthogonal directions
    #[arg(long)]
    no_diagonal: bool,

    /// Simplify the route with straight-line smoothing
    #[arg(long)]
    smooth: bool,

    /// Write the slope map as a grayscale PNG
    #[arg(long)]
    slope_png: Option<String>,

    /// Store the effective pathfinding options in the user settings file
    #[arg(long)]
    save_settings: bool,
}

impl Args {
    fn options_patch(&self) -> PathfindingConfigPatch {
        PathfindingConfigPatch {
            max_slope_degrees: self.max_slope,
            allow_diagonal_moves: self.no_diagonal.then_some(false),
            slope_weight: self.slope_weight,
            distance_weight: self.distance_weight,
        }
    }
}

fn main() -> TerrainResult<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("slopepath=info")),
        )
        .init();

    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => load_config_from(path)?,
        None => load_config(),
    };
    let seed = args.seed.unwrap_or_else(rand::random);

    let field = build_field(&args, &settings, seed)?;
    let mut engine = PathfindingEngine::new(Arc::new(field), settings.pathfinding);
    engine.update_options(&args.options_patch());

    let mut rng = Pcg64::seed_from_u64(seed as u64);
    let start = resolve_cell(args.start.as_deref(), engine.height_field(), &mut rng)?;
    let goal = resolve_cell(args.goal.as_deref(), engine.height_field(), &mut rng)?;

    if args.save_settings {
        let updated = Settings {
            pathfinding: engine.options(),
            ..settings
        };
        let path = settings_path(&args)?;
        save_config_to(&updated, &path)?;
        info!("Settings saved to {}", path.display());
    }

    let result = engine.find_path(start, goal);
    print_route_summary(&engine, start, goal, &result, args.smooth);

    if let Some(output) = &args.slope_png {
        validate_output_path(output)?;
        let map = engine.generate_slope_map();
        println!(
            "\nSlope map: max {:.1} deg, mean {:.1} deg, {:.1}% above the ceiling",
            map.max(),
            map.mean(),
            map.fraction_above(engine.options().max_slope_degrees) * 100.0
        );
        export_slope_map_png(&map, engine.options().max_slope_degrees, output)?;
    }

    Ok(())
}

/// Settings file named by `--config`, else the user config location
fn settings_path(args: &Args) -> TerrainResult<PathBuf> {
    match &args.config {
        Some(path) => Ok(path.clone()),
        None => get_config_path(),
    }
}

/// Load the requested heightfield or generate one from a preset or the settings
fn build_field(args: &Args, settings: &Settings, seed: u32) -> TerrainResult<HeightField> {
    if let Some(path) = &args.load {
        info!("Loading heightfield from {}", path.display());
        return HeightField::load_from_file(path);
    }

    let (width, height) = parse_size(&args.size)?;

    let mut generator = match &args.terrain_type {
        Some(name) => {
            get_terrain_preset(name, Some(seed)).ok_or_else(|| TerrainError::InvalidArgument {
                reason: format!(
                    "Unknown terrain preset '{name}'. Valid presets: flat, hills, mountains, dunes"
                ),
            })?
        }
        None => {
            let mut generator = TerrainNoiseGenerator::new(settings.terrain.clone());
            if args.seed.is_some() {
                generator.config.seed = seed;
            }
            generator
        }
    };

    if let Some(amplitude) = args.amplitude {
        generator.config.amplitude_scale = amplitude;
    }
    if let Some(frequency) = args.frequency {
        generator.config.noise_scale = frequency;
    }
    if let Some(octaves) = args.octaves {
        generator.config.octaves = octaves;
    }

    generator.generate(width, height)
}

/// Parse an explicit cell or draw a random in-bounds one
fn resolve_cell(
    cell: Option<&str>,
    field: &HeightField,
    rng: &mut Pcg64,
) -> TerrainResult<GridCell> {
    match cell {
        Some(text) => parse_cell(text),
        None => Ok(GridCell::new(
            rng.gen_range(0..field.width()) as i32,
            rng.gen_range(0..field.height()) as i32,
        )),
    }
}

fn print_route_summary(
    engine: &PathfindingEngine,
    start: GridCell,
    goal: GridCell,
    result: &PathResult,
    smooth: bool,
) {
    let field = engine.height_field();
    let options = engine.options();

    println!(
        "Terrain: {}x{} cells, elevation [{:.2}, {:.2}]",
        field.width(),
        field.height(),
        field.min_elevation(),
        field.max_elevation()
    );
    println!(
        "Options: max slope {:.1} deg, slope weight {:.2}, distance weight {:.2}, diagonal moves {}",
        options.max_slope_degrees,
        options.slope_weight,
        options.distance_weight,
        options.allow_diagonal_moves
    );
    println!("Route: {start} -> {goal}");

    if !result.success {
        println!(
            "  No route found ({} cells explored in {:?})",
            result.nodes_explored, result.elapsed
        );
        println!(
            "  Region reachable from start: {} cells",
            engine.reachable_cells(start).len()
        );
        return;
    }

    println!(
        "  Found {} waypoints, cost {:.3} ({} cells explored in {:?})",
        result.path.len(),
        result.total_cost,
        result.nodes_explored,
        result.elapsed
    );

    let steepest = result
        .path
        .windows(2)
        .map(|step| slope_between(field, step[0], step[1]))
        .fold(0.0, f32::max);
    println!("  Steepest step: {steepest:.1} deg");

    if smooth {
        let smoothed = engine.smooth_path(&result.path);
        println!("  Smoothed to {} waypoints:", smoothed.len());
        for waypoint in &smoothed {
            println!("    {waypoint}");
        }
    }
}
