use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(
    version = "0.1.0",
    name = "kartsim",
    about = "An arcade kart race simulator with checkpoint-based lap tracking"
)]
pub struct SimOpts {
    // FLAGS ---------------------------------------------------------------------------------------
    /// Activate debug printing (only for non-realtime mode)
    #[clap(short, long)]
    pub debug: bool,

    /// Simulate the race in real time and print live HUD updates
    #[clap(short, long)]
    pub realtime: bool,

    /// Print race events (countdown ticks, lap completions) while simulating
    #[clap(short = 'e', long)]
    pub print_events: bool,

    // OPTIONS -------------------------------------------------------------------------------------
    /// Set path to the simulation parameter file (OPTIONAL: if not set, uses built-in defaults)
    #[clap(short, long)]
    pub parfile_path: Option<PathBuf>,

    /// Set real-time factor (only relevant in real-time mode)
    #[clap(long, default_value = "1.0")]
    pub realtime_factor: f64,

    /// Set simulation timestep size in seconds, should be in the range [0.001, 1.0]
    #[clap(short, long, default_value = "0.05")]
    pub timestep_size: f64,

    /// Override the simulation time cap in seconds (OPTIONAL: parameter file value otherwise)
    #[clap(long)]
    pub t_max: Option<f64>,
}
