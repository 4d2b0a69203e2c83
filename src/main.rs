//! Terragen CLI - procedural terrain generator.
//!
//! Generates a heightmap, slope map, biome texture and triangle mesh from
//! fractal noise and writes them to disk.

use clap::{Parser, Subcommand, ValueEnum};
use rand::Rng;
use std::path::{Path, PathBuf};
use std::time::Instant;

use terragen::biomes::Biome;
use terragen::config::TerrainConfig;
use terragen::export::{
    export_biome_map_png, export_grid_png, export_obj, BiomeMapOptions, PngExportOptions,
};
use terragen::mesh::{edge_count, triangle_count};
use terragen::noise::NoiseBackend;
use terragen::pipeline::{BiomeStage, HeightmapStage, MeshStage, Pipeline, SlopeStage};
use terragen::terrain::{SlopeDivisor, Terrain};

/// Procedural terrain generator.
#[derive(Parser)]
#[command(name = "terragen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate terrain layers and a mesh.
    Generate {
        /// Grid cells along x.
        #[arg(long, default_value = "512")]
        width: u32,

        /// Grid cells along y.
        #[arg(long, default_value = "512")]
        height: u32,

        /// Noise seed (random in 0..1000 when omitted).
        #[arg(short, long)]
        seed: Option<i32>,

        /// Load the base configuration from a JSON file. Grid and noise flags
        /// are ignored when a file is given; --seed still overrides it.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory for generated files.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Base name for output files.
        #[arg(short, long, default_value = "terrain")]
        name: String,

        /// Number of noise octaves (1-16).
        #[arg(long, default_value = "6")]
        octaves: u8,

        /// Spatial scale divisor (grid cells per noise unit).
        #[arg(long, default_value = "256.0")]
        scale: f32,

        /// Frequency multiplier per octave (lacunarity).
        #[arg(long, default_value = "2.0")]
        lacunarity: f32,

        /// Amplitude decay per octave (persistence).
        #[arg(long, default_value = "0.5")]
        persistence: f32,

        /// Height curve exponent (>1 flattens lowlands and sharpens peaks).
        #[arg(long, default_value = "2.0")]
        exponent: f32,

        /// Noise implementation.
        #[arg(long, default_value = "simplex")]
        backend: Backend,

        /// Disable periodic wrapping (terrain will not tile).
        #[arg(long)]
        no_wrap: bool,

        /// Average slope over the neighbors that exist instead of a fixed 8.
        /// Changes slope values along the grid border.
        #[arg(long)]
        exact_edge_slope: bool,

        /// Skip mesh construction and OBJ export.
        #[arg(long)]
        skip_mesh: bool,
    },

    /// Display mesh sizes for a grid.
    Info {
        /// Grid cells along x.
        #[arg(long, default_value = "512")]
        width: u32,

        /// Grid cells along y.
        #[arg(long, default_value = "512")]
        height: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    /// 4D simplex fBm (simdnoise).
    Simplex,
    /// OpenSimplex fBm (noise crate).
    OpenSimplex,
}

impl From<Backend> for NoiseBackend {
    fn from(b: Backend) -> Self {
        match b {
            Backend::Simplex => NoiseBackend::Simplex,
            Backend::OpenSimplex => NoiseBackend::OpenSimplex,
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            width,
            height,
            seed,
            config,
            output,
            name,
            octaves,
            scale,
            lacunarity,
            persistence,
            exponent,
            backend,
            no_wrap,
            exact_edge_slope,
            skip_mesh,
        } => {
            let mut cfg = match config {
                Some(path) => TerrainConfig::from_json_file(&path).unwrap_or_else(|e| {
                    eprintln!("Error loading config {}: {}", path.display(), e);
                    std::process::exit(1);
                }),
                None => {
                    if octaves < 1 || octaves > 16 {
                        eprintln!("Error: Octaves must be between 1 and 16");
                        std::process::exit(1);
                    }
                    let mut cfg = TerrainConfig::new(width, height, 0);
                    cfg.noise.octaves = octaves;
                    cfg.noise.scale = scale;
                    cfg.noise.lacunarity = lacunarity;
                    cfg.noise.persistence = persistence;
                    cfg.height_exponent = exponent;
                    cfg.backend = backend.into();
                    cfg.wrap = !no_wrap;
                    if exact_edge_slope {
                        cfg.slope_divisor = SlopeDivisor::NeighborCount;
                    }
                    cfg
                }
            };

            // Generate seed if not provided
            cfg.seed = seed.unwrap_or_else(|| rand::rng().random_range(0..1000));

            if let Err(e) = cfg.validate() {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }

            run_generate(cfg, &output, &name, skip_mesh);
        }
        Commands::Info { width, height } => {
            run_info(width, height);
        }
    }
}

fn run_generate(cfg: TerrainConfig, output: &Path, name: &str, skip_mesh: bool) {
    println!("Terragen - Procedural Terrain Generator");
    println!("=======================================");
    println!("Grid: {}x{}", cfg.width, cfg.height);
    println!("Seed: {}", cfg.seed);
    println!("Noise: {} ({} octaves, scale {})", cfg.backend.name(), cfg.noise.octaves, cfg.noise.scale);
    println!("Wrap: {}", if cfg.wrap { "periodic" } else { "off" });
    if cfg.slope_divisor == SlopeDivisor::NeighborCount {
        println!("Slope: averaging over existing neighbors (border slopes differ from the default)");
    }
    println!("Output: {}", output.display());

    let start = Instant::now();

    let mut terrain = Terrain::new(cfg.width, cfg.height, cfg.seed);
    let mut pipeline = Pipeline::new(cfg);
    pipeline
        .add_stage(HeightmapStage::new())
        .add_stage(SlopeStage)
        .add_stage(BiomeStage);
    if !skip_mesh {
        pipeline.add_stage(MeshStage);
    } else {
        println!("Mesh construction: SKIPPED");
    }

    println!("\nRunning generation pipeline...");
    pipeline
        .run_with_callbacks(
            &mut terrain,
            |name, i, total| {
                println!("  [{}/{}] Starting: {}", i + 1, total, name);
            },
            |name, i, total| {
                println!("  [{}/{}] Completed: {}", i + 1, total, name);
            },
        )
        .unwrap_or_else(|e| {
            eprintln!("Error during generation: {}", e);
            std::process::exit(1);
        });

    println!("Generation completed in {:.2?}", start.elapsed());

    if let Some(map) = &terrain.heightmap {
        println!("Raw noise range: [{:.4}, {:.4}]", map.raw_min, map.raw_max);
    }
    if let Some(counts) = terrain.biome_histogram() {
        let total = terrain.cell_count().max(1) as f32;
        for biome in Biome::ALL {
            let n = counts[biome.index()];
            println!("  {:<7} {:>6.2}%", biome.name(), 100.0 * n as f32 / total);
        }
    }

    println!("\nExporting...");
    let export_start = Instant::now();

    std::fs::create_dir_all(output).unwrap_or_else(|e| {
        eprintln!("Error creating output directory: {}", e);
        std::process::exit(1);
    });

    let png_options = PngExportOptions::default();
    if let Some(heights) = terrain.heights() {
        let path = output.join(format!("{}_heightmap.png", name));
        export_grid_png(heights, &path, &png_options).unwrap_or_else(|e| {
            eprintln!("Error exporting heightmap: {}", e);
            std::process::exit(1);
        });
        println!("  Exported {}", path.display());
    }

    if let Some(slopes) = &terrain.slopes {
        let path = output.join(format!("{}_slopemap.png", name));
        export_grid_png(slopes, &path, &png_options).unwrap_or_else(|e| {
            eprintln!("Error exporting slope map: {}", e);
            std::process::exit(1);
        });
        println!("  Exported {}", path.display());
    }

    if let Some(biomes) = &terrain.biomes {
        let path = output.join(format!("{}_texture.png", name));
        export_biome_map_png(biomes, &path, &BiomeMapOptions::default()).unwrap_or_else(|e| {
            eprintln!("Error exporting biome texture: {}", e);
            std::process::exit(1);
        });
        println!("  Exported {}", path.display());
    }

    if let Some(mesh) = &terrain.mesh {
        let path = output.join(format!("{}.obj", name));
        export_obj(mesh, &path).unwrap_or_else(|e| {
            eprintln!("Error exporting mesh: {}", e);
            std::process::exit(1);
        });
        println!(
            "  Exported {} ({} vertices, {} triangles)",
            path.display(),
            mesh.vertex_count(),
            mesh.triangle_count()
        );
    }

    println!("Export completed in {:.2?}", export_start.elapsed());
}

fn run_info(width: u32, height: u32) {
    let cells = width as u64 * height as u64;

    println!("Terrain Grid Information");
    println!("========================");
    println!("Grid: {}x{} ({} cells)", width, height, cells);
    println!("Vertices: {}", cells);
    println!("Triangles: {}", triangle_count(width, height));
    println!("Edges: {}", edge_count(width, height));

    // Heights, slopes (f32) and biomes (1 byte) per cell, plus 12-byte vertices.
    let grid_bytes = cells * (4 + 4 + 1);
    let mesh_bytes = cells * 12 + triangle_count(width, height) as u64 * 12;
    println!(
        "Approx. memory: {:.1} MB grids, {:.1} MB mesh",
        grid_bytes as f64 / (1024.0 * 1024.0),
        mesh_bytes as f64 / (1024.0 * 1024.0)
    );

    if width <= 1 || height <= 1 {
        println!("Warning: grids need at least 2 cells along each axis");
    }
}
