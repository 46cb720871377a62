//! Interactive Crystal Growth Demo
//!
//! A terminal REPL driving the crystal growth simulation one command at a
//! time. Each command maps directly onto a `CrystalSimulation` method.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package demo-interactive
//! ```
//!
//! # Commands
//!
//! - `step [n]` - Advance n frames (default 1)
//! - `reset` - Reinitialize fields and reseed the nucleus
//! - `pause` - Toggle run/pause
//! - `uniform` - Set the orientation field to 0 everywhere
//! - `vortex [cw|ccw]` - Vortex orientation field (default ccw)
//! - `paint <sx> <sy> <angle_deg> [radius] [blend]` - Brush the orientation field
//!   - sx, sy: screen coordinates on the 800x800 reference window, y down
//!   - radius: screen units (default 40), blend: 0..1 (default 1)
//! - `rotate <dx> <dy>` - Orbit the camera (degrees)
//! - `zoom <d>` - Move the camera toward (negative) or away from the origin
//! - `camera` - Show camera state
//! - `status` - Show simulation statistics
//! - `preview [width]` - ASCII relief map of the active slice
//! - `help` - Show available commands
//! - `quit` - Exit

use crystal_sim_core::simulation::DEFAULT_RELIEF_THICKNESS;
use crystal_sim_core::{CrystalSimulation, SolverConfig};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, Write};
use std::time::Instant;

/// Default grid dimensions
const DEFAULT_WIDTH: usize = 128;
const DEFAULT_HEIGHT: usize = 128;

/// Default brush radius in screen units
const DEFAULT_BRUSH_RADIUS: f32 = 40.0;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("╔═══════════════════════════════════════════════════════════╗");
    println!("║        Crystal Growth Simulation - Interactive REPL       ║");
    println!("╚═══════════════════════════════════════════════════════════╝");
    println!();

    let (width, height) = prompt_grid_dimensions();
    let mut sim = match CrystalSimulation::init(SolverConfig::planar(width, height)) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Failed to create simulation: {}", e);
            return;
        }
    };
    println!("Created {}x{} simulation with a seeded nucleus", width, height);

    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Failed to create readline: {}", e);
            return;
        }
    };

    println!("\nType 'help' for available commands.\n");

    loop {
        let readline = rl.readline("crystal> ");
        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                let parts: Vec<&str> = line.split_whitespace().collect();

                if parts.is_empty() {
                    continue;
                }

                match parts[0].to_lowercase().as_str() {
                    "step" | "s" => {
                        let count = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(1);
                        step_simulation(&mut sim, count);
                    }
                    "reset" | "r" => {
                        sim.reset();
                        println!("Simulation reset.");
                    }
                    "pause" | "p" => {
                        sim.toggle_pause();
                        println!("{}", if sim.is_paused() { "Paused." } else { "Running." });
                    }
                    "uniform" | "u" => {
                        sim.set_orientation_uniform();
                        println!("Orientation field set to uniform.");
                    }
                    "vortex" | "v" => {
                        let clockwise = matches!(parts.get(1).copied(), Some("cw" | "clockwise"));
                        sim.set_orientation_vortex(clockwise);
                        println!(
                            "Orientation field set to {} vortex.",
                            if clockwise { "clockwise" } else { "counter-clockwise" }
                        );
                    }
                    "paint" => {
                        let (Some(sx), Some(sy), Some(angle)) = (
                            parse_arg::<f32>(&parts, 1),
                            parse_arg::<f32>(&parts, 2),
                            parse_arg::<f32>(&parts, 3),
                        ) else {
                            println!("Usage: paint <sx> <sy> <angle_deg> [radius] [blend]");
                            continue;
                        };
                        let radius = parse_arg(&parts, 4).unwrap_or(DEFAULT_BRUSH_RADIUS);
                        let blend = parse_arg(&parts, 5).unwrap_or(1.0);
                        let touched =
                            sim.paint_orientation(sx, sy, angle.to_radians(), radius, blend);
                        if touched == 0 {
                            println!("Position ({}, {}) is outside the grid.", sx, sy);
                        } else {
                            println!("Painted {} cells.", touched);
                        }
                    }
                    "rotate" | "rot" => {
                        if let (Some(dx), Some(dy)) = (parse_arg(&parts, 1), parse_arg(&parts, 2)) {
                            sim.rotate_camera(dx, dy);
                            show_camera(&sim);
                        } else {
                            println!("Usage: rotate <dx> <dy>");
                        }
                    }
                    "zoom" | "z" => {
                        if let Some(delta) = parse_arg(&parts, 1) {
                            sim.zoom_camera(delta);
                            show_camera(&sim);
                        } else {
                            println!("Usage: zoom <delta>");
                        }
                    }
                    "camera" | "c" => show_camera(&sim),
                    "status" | "st" => show_status(&sim),
                    "preview" | "pv" => {
                        let columns = parse_arg(&parts, 1).unwrap_or(64);
                        show_preview(&sim, columns);
                    }
                    "help" | "?" => show_help(),
                    "quit" | "q" | "exit" => {
                        println!("Goodbye!");
                        break;
                    }
                    _ => {
                        println!(
                            "Unknown command: '{}'. Type 'help' for available commands.",
                            parts[0]
                        );
                    }
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }

    let stats = sim.teardown();
    println!("Final: {}", stats);
}

fn parse_arg<T: std::str::FromStr>(parts: &[&str], index: usize) -> Option<T> {
    parts.get(index).and_then(|s| s.parse().ok())
}

fn prompt_grid_dimensions() -> (usize, usize) {
    println!("Enter grid dimensions (or press Enter for defaults):");
    let width = prompt_usize("  Width in cells", DEFAULT_WIDTH);
    let height = prompt_usize("  Height in cells", DEFAULT_HEIGHT);
    println!();
    (width.clamp(8, 1024), height.clamp(8, 1024))
}

fn prompt_usize(label: &str, default: usize) -> usize {
    print!("{} [{}]: ", label, default);
    if io::stdout().flush().is_err() {
        return default;
    }
    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(_) => input.trim().parse().unwrap_or(default),
        Err(_) => default,
    }
}

fn step_simulation(sim: &mut CrystalSimulation, count: u32) {
    if sim.is_paused() {
        println!("Simulation is paused. Use 'pause' to resume.");
        return;
    }
    println!("Stepping {} frame(s)...", count);

    let start = Instant::now();
    let solid_before = sim.stats().solid_fraction;
    for _ in 0..count {
        sim.step();
    }
    println!(
        "  Frame {}: solid fraction {:.4} → {:.4}, Time: {}ms",
        sim.stats().frame,
        solid_before,
        sim.stats().solid_fraction,
        start.elapsed().as_millis()
    );
    if sim.stats().non_finite_cells > 0 {
        println!("  Warning: {} non-finite cells", sim.stats().non_finite_cells);
    }
}

fn show_status(sim: &CrystalSimulation) {
    let stats = sim.stats();
    let grid = sim.grid();
    println!("\n═══════════════ SIMULATION STATUS ═══════════════");
    println!("Grid:            {}x{}x{}", grid.nx(), grid.ny(), grid.nz());
    println!("State:           {}", if sim.is_paused() { "paused" } else { "running" });
    println!("Frame:           {}", stats.frame);
    println!("Substeps:        {}", stats.substeps);
    println!("Time:            {:.4}", stats.simulation_time);
    println!("Solid fraction:  {:.4}", stats.solid_fraction);
    println!("Phi range:       [{:.4}, {:.4}]", stats.phi_min, stats.phi_max);
    println!(
        "Temperature:     [{:.4}, {:.4}]",
        stats.temperature_min, stats.temperature_max
    );
    println!(
        "Frame time:      {:.2}ms (avg {:.2}ms)",
        sim.frame_timer().last_frame_time_ms(),
        sim.frame_timer().average_frame_time_ms()
    );
    println!("══════════════════════════════════════════════════\n");
}

fn show_camera(sim: &CrystalSimulation) {
    let camera = sim.camera();
    let eye = camera.eye_position();
    println!(
        "Camera: pitch {:.1}°, yaw {:.1}°, distance {:.2} (eye at {:.2}, {:.2}, {:.2})",
        camera.rot_x_deg, camera.rot_y_deg, camera.distance, eye.x, eye.y, eye.z
    );
}

/// ASCII relief map of the active slice, top row first
fn show_preview(sim: &CrystalSimulation, columns: usize) {
    let grid = sim.grid();
    let relief = sim.relief(DEFAULT_RELIEF_THICKNESS);
    let columns = columns.clamp(1, grid.nx());
    let rows = (grid.ny() * columns / grid.nx() / 2).max(1);

    println!("\nLegend: · = liquid  ░ interface  ▓ mostly solid  █ solid");
    for row in (0..rows).rev() {
        let y = row * grid.ny() / rows;
        let line: String = (0..columns)
            .map(|col| {
                let x = col * grid.nx() / columns;
                match relief[x + y * grid.nx()] {
                    None => '·',
                    Some(h) if h >= 0.9 * DEFAULT_RELIEF_THICKNESS => '█',
                    Some(h) if h >= 0.5 * DEFAULT_RELIEF_THICKNESS => '▓',
                    Some(_) => '░',
                }
            })
            .collect();
        println!("│{}│", line);
    }
    println!();
}

fn show_help() {
    println!("\n═══════════════ AVAILABLE COMMANDS ═══════════════");
    println!("  step [n], s [n]      - Advance n frames (default 1)");
    println!("  reset, r             - Reinitialize fields and reseed the nucleus");
    println!("  pause, p             - Toggle run/pause");
    println!("  uniform, u           - Orientation 0 everywhere");
    println!("  vortex [cw|ccw], v   - Vortex orientation field (default ccw)");
    println!("  paint <sx> <sy> <angle_deg> [radius] [blend]");
    println!("                         Brush the orientation field at a screen position");
    println!("                         (800x800 reference window, y down; radius default 40)");
    println!("  rotate <dx> <dy>     - Orbit the camera by degrees");
    println!("  zoom <d>, z          - Change camera distance");
    println!("  camera, c            - Show camera state");
    println!("  status, st           - Show simulation statistics");
    println!("  preview [w], pv      - ASCII relief map of the active slice");
    println!("  help, ?              - Show this help");
    println!("  quit, q              - Exit");
    println!("══════════════════════════════════════════════════\n");
}
