use clap::Parser;
use crystal_sim_core::{BoundaryPolicy, CrystalSimulation, ResolutionPreset, SolverConfig};
use tracing::{error, info};

/// Density ramp used for the ASCII preview, liquid to solid
const PREVIEW_RAMP: &[u8] = b" .:-=+*#%@";

/// Crystal growth demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "crystal-sim-demo")]
#[command(about = "Dendritic crystal growth simulation demo", long_about = None)]
struct Args {
    /// Resolution preset (preview, standard, fine); ignored when width/height are given
    #[arg(short, long, default_value = "standard")]
    preset: String,

    /// Grid cells along x
    #[arg(long)]
    width: Option<usize>,

    /// Grid cells along y
    #[arg(long)]
    height: Option<usize>,

    /// Grid cells along z (omit for a planar grid)
    #[arg(short, long)]
    depth: Option<usize>,

    /// Number of frames to run
    #[arg(short, long, default_value_t = 200)]
    frames: u64,

    /// Boundary policy (periodic, neumann); defaults by grid rank
    #[arg(short, long)]
    boundary: Option<String>,

    /// Start from a vortex orientation field (cw, ccw)
    #[arg(short, long)]
    vortex: Option<String>,

    /// Interface noise amplitude
    #[arg(short, long, default_value_t = 0.0)]
    noise: f32,

    /// Report interval in frames
    #[arg(short, long, default_value_t = 20)]
    report_interval: u64,

    /// Width of the final ASCII preview in characters (0 disables it)
    #[arg(long, default_value_t = 64)]
    preview_width: usize,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    println!("=== Crystal Growth Demo ===\n");

    let config = build_config(&args);
    let mut sim = match CrystalSimulation::init(config) {
        Ok(sim) => sim,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    match args.vortex.as_deref().map(str::to_lowercase).as_deref() {
        Some("cw" | "clockwise") => sim.set_orientation_vortex(true),
        Some("ccw" | "counter-clockwise") => sim.set_orientation_vortex(false),
        Some(other) => println!("Unknown vortex direction '{}', keeping uniform field", other),
        None => {}
    }

    let grid = *sim.grid();
    println!(
        "Grid: {}x{}x{}, {} substeps/frame, {} frames\n",
        grid.nx(),
        grid.ny(),
        grid.nz(),
        sim.config().substeps_per_frame,
        args.frames
    );

    for frame in 1..=args.frames {
        sim.step();
        if args.report_interval > 0 && frame % args.report_interval == 0 {
            println!("{}", sim.stats());
        }
    }

    if args.preview_width > 0 {
        print_preview(&sim, args.preview_width);
    }

    let average_ms = sim.frame_timer().average_frame_time_ms();
    let stats = sim.teardown();
    info!("Average frame time {:.2}ms", average_ms);
    println!("\nFinal: {}", stats);
}

fn build_config(args: &Args) -> SolverConfig {
    let preset = match args.preset.to_lowercase().as_str() {
        "preview" => ResolutionPreset::Preview,
        "standard" => ResolutionPreset::Standard,
        "fine" => ResolutionPreset::Fine,
        other => {
            println!("Unknown preset '{}', using standard", other);
            ResolutionPreset::recommended()
        }
    };

    let mut config = SolverConfig::from_preset(preset, args.depth);
    if let Some(width) = args.width {
        config.grid.width = width;
    }
    if let Some(height) = args.height {
        config.grid.height = height;
    }
    if let Some(boundary) = &args.boundary {
        config.grid.boundary = match boundary.to_lowercase().as_str() {
            "neumann" | "clamp" => BoundaryPolicy::Neumann,
            "periodic" | "wrap" => BoundaryPolicy::Periodic,
            other => {
                println!("Unknown boundary '{}', using periodic", other);
                BoundaryPolicy::Periodic
            }
        };
    }
    config.model.noise_amplitude = args.noise;
    config
}

/// Print the active slice of `phi`, top row first
fn print_preview(sim: &CrystalSimulation, columns: usize) {
    let grid = sim.grid();
    let phi = sim.read_phi();
    let slice = &phi[grid.slice_range(grid.active_slice())];

    let columns = columns.min(grid.nx()).max(1);
    // Terminal cells are roughly twice as tall as they are wide
    let rows = (grid.ny() * columns / grid.nx() / 2).max(1);

    println!("\nActive slice (z = {}):", grid.active_slice());
    for row in (0..rows).rev() {
        let y = row * grid.ny() / rows;
        let line: String = (0..columns)
            .map(|col| {
                let x = col * grid.nx() / columns;
                let value = slice[x + y * grid.nx()].clamp(0.0, 1.0);
                let level = (value * (PREVIEW_RAMP.len() - 1) as f32).round() as usize;
                char::from(PREVIEW_RAMP[level])
            })
            .collect();
        println!("|{}|", line);
    }
}
