use crate::core::progress::RaceState;
use crate::post::race_result::RaceResult;

// the event enum crosses the same boundary as the HUD snapshot
pub use crate::core::progress::ProgressEvent;

/// Upper bound on the rate at which HUD snapshots are sent to the presentation side in realtime
/// mode.
pub const MAX_HUD_UPDATE_FREQUENCY: f64 = 20.0;

/// HudState is the display snapshot polled by the presentation adapter: everything the HUD shows
/// in one struct. Speed is already converted to km/h; times are in seconds.
#[derive(Debug, Clone)]
pub struct HudState {
    pub race_state: RaceState,
    pub v_kmh: f64,
    pub cur_lap: u32,
    pub tot_no_laps: u32,
    pub t_elapsed: f64,
    pub t_best: Option<f64>,

    // final results payload (sent once when the race finishes)
    pub final_result: Option<RaceResult>,
}
