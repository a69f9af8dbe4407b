use clap::Parser;
use slopepath::cli_utils::{parse_size, validate_output_path};
use slopepath::export::export_heightmap_png;
use slopepath::terrain::slope_map;
use slopepath::{HeightField, TerrainError, TerrainNoiseGenerator, TerrainResult, get_terrain_preset};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Clone)]
#[command(name = "terrain_gen")]
#[command(about = "Generate and save heightfields for the slopepath planner")]
struct Args {
    /// Terrain size in grid cells (format: WIDTHxHEIGHT)
    #[arg(long, default_value = "64x64")]
    size: String,

    /// Terrain type preset (flat, hills, mountains, dunes)
    #[arg(long, default_value = "hills")]
    terrain_type: String,

    /// Random seed for reproducible generation
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

    /// Constant added to every elevation
    #[arg(long)]
    offset: Option<f32>,

    /// Keep raw noise values instead of rescaling them to [0, 1] first
    #[arg(long)]
    raw: bool,

    /// Output file path for the binary heightfield
    #[arg(long, default_value = "terrain.bin")]
    output: String,

    /// Also write a grayscale heightmap PNG
    #[arg(long)]
    png: Option<String>,
}

fn build_generator(args: &Args) -> TerrainResult<TerrainNoiseGenerator> {
    let mut generator =
        get_terrain_preset(&args.terrain_type, args.seed).ok_or_else(|| {
            TerrainError::InvalidArgument {
                reason: format!(
                    "Unknown terrain type '{}'. Valid types: flat, hills, mountains, dunes",
                    args.terrain_type
                ),
            }
        })?;

    if let Some(amplitude) = args.amplitude {
        generator.config.amplitude_scale = amplitude;
    }
    if let Some(frequency) = args.frequency {
        generator.config.noise_scale = frequency;
    }
    if let Some(octaves) = args.octaves {
        generator.config.octaves = octaves;
    }
    if let Some(offset) = args.offset {
        generator.config.vertical_offset = offset;
    }
    if args.raw {
        generator.config.normalize = false;
    }

    Ok(generator)
}

fn main() -> TerrainResult<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("slopepath=info,terrain_gen=info")),
        )
        .init();

    let args = Args::parse();

    let (width, height) = parse_size(&args.size)?;
    validate_output_path(&args.output)?;
    if let Some(png) = &args.png {
        validate_output_path(png)?;
    }

    let generator = build_generator(&args)?;
    let field = generator.generate(width, height)?;

    field.save_to_file(&args.output)?;
    if let Some(png) = &args.png {
        export_heightmap_png(&field, png)?;
    }

    print_field_summary(&field, &generator, &args.output);
    Ok(())
}

fn print_field_summary(field: &HeightField, generator: &TerrainNoiseGenerator, output: &str) {
    let slopes = slope_map(field);

    println!("Heightfield saved successfully to: {output}");
    println!("\nHeightfield summary:");
    println!(
        "  Size: {}x{} ({} samples)",
        field.width(),
        field.height(),
        field.len()
    );
    println!(
        "  Seed: {}, octaves: {}, frequency: {}",
        generator.config.seed, generator.config.octaves, generator.config.noise_scale
    );
    println!(
        "  Elevation: [{:.2}, {:.2}]",
        field.min_elevation(),
        field.max_elevation()
    );
    println!(
        "  Slope: max {:.1} deg, mean {:.1} deg",
        slopes.max(),
        slopes.mean()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_args() -> Args {
        Args {
            size: "32x16".to_string(),
            terrain_type: "mountains".to_string(),
            seed: Some(12345),
            amplitude: None,
            frequency: None,
            octaves: None,
            offset: None,
            raw: false,
            output: "test_output.bin".to_string(),
            png: None,
        }
    }

    #[test]
    fn test_main_integration() {
        let args = test_args();
        let (width, height) = parse_size(&args.size).unwrap();
        assert_eq!((width, height), (32, 16));

        let generator = build_generator(&args).unwrap();
        assert_eq!(generator.config.seed, 12345);

        let field = generator.generate(width, height).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(&args.output);
        field.save_to_file(&path).unwrap();
        assert_eq!(HeightField::load_from_file(&path).unwrap(), field);
    }

    #[test]
    fn test_flag_overrides() {
        let args = Args {
            amplitude: Some(2.0),
            offset: Some(-1.0),
            octaves: Some(3),
            raw: true,
            ..test_args()
        };
        let generator = build_generator(&args).unwrap();
        assert_eq!(generator.config.amplitude_scale, 2.0);
        assert_eq!(generator.config.vertical_offset, -1.0);
        assert_eq!(generator.config.octaves, 3);
        assert!(!generator.config.normalize);
    }

    #[test]
    fn test_unknown_terrain_type() {
        let args = Args {
            terrain_type: "canyon".to_string(),
            ..test_args()
        };
        assert!(build_generator(&args).is_err());
    }
}
