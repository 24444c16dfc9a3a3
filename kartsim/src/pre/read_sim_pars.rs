use crate::core::race::RacePars;
use crate::core::track::TrackPars;
use crate::core::vehicle::VehiclePars;
use anyhow::Context;
use serde::Deserialize;
use std::fs::OpenOptions;
use std::path::Path;

/// SimPars is used to store all other parameter structs.
#[derive(Debug, Deserialize, Clone)]
pub struct SimPars {
    pub race_pars: RacePars,
    pub track_pars: TrackPars,
    pub vehicle_pars: VehiclePars,
}

/// read_sim_pars reads the JSON file and decodes the JSON string into the simulation parameters
/// struct.
pub fn read_sim_pars(filepath: &Path) -> anyhow::Result<SimPars> {
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!(
            "Failed to open parameter file {}!",
            filepath.to_str().unwrap()
        ))?;
    let pars = serde_json::from_reader(&fh).context(format!(
        "Failed to parse parameter file {}!",
        filepath.to_str().unwrap()
    ))?;
    Ok(pars)
}

/// default_sim_pars returns the built-in parameter set that is used when no parameter file is
/// inserted on the command line. It describes a three-lap race on a ring track of 30m/40m radii.
pub fn default_sim_pars() -> SimPars {
    SimPars {
        race_pars: RacePars {
            tot_no_laps: 3,
            t_countdown: 3.0,
            t_max: 600.0,
        },
        track_pars: TrackPars {
            r_inner: 30.0,
            r_outer: 40.0,
            h_wall: 2.0,
        },
        vehicle_pars: VehiclePars {
            v_max: 30.0,
            a_accel: 15.0,
            a_brake: 25.0,
            a_coast: 8.0,
            turn_rate: 2.5,
            v_turn_min: 0.5,
            c_bounce: 0.3,
            d_clearance: 1.0,
            h_ride: 0.5,
        },
    }
}
