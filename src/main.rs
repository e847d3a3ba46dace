use std::fs;
use std::process;

use clap::Parser;

use terrain_grid::ascii::{self, AsciiMode, AsciiRenderer};
use terrain_grid::config::GridConfig;
use terrain_grid::editor::{Editor, ScriptStep};
use terrain_grid::grid::Grid;
use terrain_grid::ChunkRenderer;

#[derive(Parser, Debug)]
#[command(name = "terrain_editor")]
#[command(about = "Apply scripted edits to a terrain grid and preview the result")]
struct Args {
    /// Grid config file (JSON). Missing fields use defaults.
    #[arg(short, long)]
    config: Option<String>,

    /// Width of the grid in cells
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Height of the grid in cells
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Seed for decoration placement hashing
    #[arg(short, long)]
    seed: Option<u64>,

    /// Edit script (JSON list of { "x", "z", "command" } steps)
    #[arg(long)]
    script: Option<String>,

    /// View to print: elevation, water, rivers, roads or chunks
    #[arg(short, long, default_value = "elevation")]
    mode: String,

    /// Edit single corners without moving the cells that share them
    #[arg(long)]
    allow_cliffs: bool,

    /// Brush size in cells
    #[arg(short, long, default_value = "1")]
    brush: usize,

    /// Print the legend for the chosen view
    #[arg(long)]
    legend: bool,
}

fn load_config(args: &Args) -> GridConfig {
    let mut config = match &args.config {
        Some(path) => match GridConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path, e);
                process::exit(1);
            }
        },
        None => GridConfig::default(),
    };
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(seed) = args.seed {
        config.placement_seed = seed;
    }
    config
}

fn load_script(path: &str) -> Vec<ScriptStep> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Failed to read script {}: {}", path, e);
            process::exit(1);
        }
    };
    match serde_json::from_str(&text) {
        Ok(steps) => steps,
        Err(e) => {
            eprintln!("Failed to parse script {}: {}", path, e);
            process::exit(1);
        }
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let Some(mode) = AsciiMode::from_name(&args.mode) else {
        let names: Vec<&str> = AsciiMode::all().iter().map(|m| m.name()).collect();
        eprintln!("Unknown view '{}', expected one of: {}", args.mode, names.join(", "));
        process::exit(1);
    };

    let config = load_config(&args);
    println!("Grid size: {}x{}", config.width, config.height);
    println!(
        "Chunk size: {}x{}, max road slope {}",
        config.chunk_width, config.chunk_height, config.max_road_slope
    );

    let mut grid = match Grid::build(config) {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("Invalid grid config: {}", e);
            process::exit(1);
        }
    };

    // Draw every chunk once so the canvas starts complete.
    let mut renderer = AsciiRenderer::new(grid.width(), grid.height(), mode);
    for chunk in grid.chunks() {
        renderer.rebuild(chunk, &grid);
    }

    if let Some(path) = &args.script {
        let steps = load_script(path);
        let editor = Editor {
            allow_cliffs: args.allow_cliffs,
            brush_size: args.brush,
        };
        println!("Applying {} edit steps...", steps.len());
        let report = editor.run_script(&mut grid, &steps);
        println!("Applied {} edits, rejected {}", report.applied, report.rejected);

        let rebuilt = grid.rebuild_dirty_chunks(&mut renderer);
        println!("Rebuilt {} of {} chunks", rebuilt, grid.chunks().len());
    }

    println!();
    println!("=== {} ===", mode.name().to_uppercase());
    print!("{}", renderer.render());
    if args.legend {
        print!("{}", ascii::legend(mode));
    }
}

