use crate::core::checkpoint::place_checkpoints;
use crate::core::progress::{ProgressEvent, ProgressTracker, RaceState};
use crate::core::track::{Track, TrackPars};
use crate::core::vehicle::{TickInput, Vehicle, VehiclePars};
use crate::post::race_result::RaceResult;
use anyhow::Result;
use serde::Deserialize;
use std::f64::consts::FRAC_PI_2;

/// * `tot_no_laps` - Total number of laps to complete
/// * `t_countdown` - (s) Length of the pre-race countdown
/// * `t_max` - (s) Simulation time cap; a race not finished by then is aborted by the driver
#[derive(Debug, Deserialize, Clone)]
pub struct RacePars {
    pub tot_no_laps: u32,
    #[serde(default = "default_t_countdown")]
    pub t_countdown: f64,
    #[serde(default = "default_t_max")]
    pub t_max: f64,
}

fn default_t_countdown() -> f64 {
    3.0
}

fn default_t_max() -> f64 {
    600.0
}

/// Race wires the vehicle, the track and the progress tracker together and owns the race clock.
/// One `simulate_timestep` call corresponds to one rendered frame on the presentation side.
#[derive(Debug)]
pub struct Race {
    pub cur_racetime: f64,
    pub t_max: f64,
    tot_no_laps: u32,
    track: Track,
    vehicle: Vehicle,
    progress: ProgressTracker,
}

impl Race {
    pub fn new(
        race_pars: &RacePars,
        track_pars: &TrackPars,
        vehicle_pars: &VehiclePars,
    ) -> Result<Race> {
        if race_pars.tot_no_laps == 0 {
            anyhow::bail!("Total number of laps must be at least 1!")
        }

        let track = Track::new(track_pars)?;
        let checkpoints = place_checkpoints(&track);

        // spawn on the centerline at the start/finish angle, heading along the lane
        let vehicle = Vehicle::new(vehicle_pars, 0.0, track.r_center, FRAC_PI_2);

        let progress = ProgressTracker::new(checkpoints, race_pars.tot_no_laps, race_pars.t_countdown);

        Ok(Race {
            cur_racetime: 0.0,
            t_max: race_pars.t_max,
            tot_no_laps: race_pars.tot_no_laps,
            track,
            vehicle,
            progress,
        })
    }

    // ---------------------------------------------------------------------------------------------
    // MAIN METHOD ---------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// simulate_timestep advances the whole simulation by one tick: race clock, countdown,
    /// vehicle motion and race progression, in that order. While vehicle control is disallowed
    /// (every state but Racing) a neutral input is substituted for the supplied one.
    pub fn simulate_timestep(&mut self, input: &TickInput, dt: f64) -> Vec<ProgressEvent> {
        let dt = dt.max(0.0);

        // increment discretization variable
        self.cur_racetime += dt;

        let mut events = self.progress.tick_countdown(self.cur_racetime, dt);

        let effective_input = if self.progress.can_move() {
            *input
        } else {
            TickInput::neutral()
        };
        self.vehicle.integrate(&effective_input, dt, &self.track);

        events.extend(
            self.progress
                .update(self.cur_racetime, self.vehicle.x, self.vehicle.z),
        );

        events
    }

    /// start_countdown kicks off the pre-race countdown (maps to the confirm/start press on the
    /// presentation side).
    pub fn start_countdown(&mut self) -> Vec<ProgressEvent> {
        self.progress.start_countdown()
    }

    /// reset returns the session to the Waiting state: progress cleared, vehicle back on the
    /// start line, race clock rewound. The track and checkpoint geometry are untouched.
    pub fn reset(&mut self) {
        self.progress.reset();
        self.vehicle.reset(0.0, self.track.r_center, FRAC_PI_2);
        self.cur_racetime = 0.0;
    }

    // ---------------------------------------------------------------------------------------------
    // DISPLAY QUERY SURFACE -----------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    pub fn race_state(&self) -> RaceState {
        self.progress.race_state()
    }

    pub fn get_finished(&self) -> bool {
        self.progress.race_state() == RaceState::Finished
    }

    pub fn speed_kmh(&self) -> f64 {
        self.vehicle.speed_kmh()
    }

    pub fn get_current_lap(&self) -> u32 {
        self.progress.get_current_lap()
    }

    pub fn tot_no_laps(&self) -> u32 {
        self.tot_no_laps
    }

    pub fn get_total_time(&self) -> f64 {
        self.progress.get_total_time(self.cur_racetime)
    }

    pub fn get_best_laptime(&self) -> Option<f64> {
        self.progress.get_best_laptime()
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn get_race_result(&self) -> RaceResult {
        let laptimes = self.progress.get_laptimes().to_vec();

        RaceResult {
            tot_no_laps: self.tot_no_laps,
            t_best: if laptimes.is_empty() {
                None
            } else {
                Some(helpers::general::min_val(&laptimes))
            },
            t_total: laptimes.iter().sum(),
            t_total_wallclock: self.progress.get_wallclock_total().unwrap_or(0.0),
            laptimes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vehicle::{Pedal, Steer};
    use approx::assert_relative_eq;

    fn demo_race() -> Race {
        Race::new(
            &RacePars {
                tot_no_laps: 3,
                t_countdown: 3.0,
                t_max: 600.0,
            },
            &TrackPars {
                r_inner: 30.0,
                r_outer: 40.0,
                h_wall: 2.0,
            },
            &VehiclePars {
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
        )
        .unwrap()
    }

    fn full_throttle() -> TickInput {
        TickInput {
            pedal: Pedal::Accelerate,
            steer: Steer::Straight,
        }
    }

    #[test]
    fn control_is_disallowed_before_the_go_signal() {
        let mut race = demo_race();
        race.start_countdown();

        for _ in 0..10 {
            race.simulate_timestep(&full_throttle(), 0.1);
        }

        // one second into a three second countdown, the vehicle must not have moved
        assert_eq!(race.race_state(), RaceState::Countdown);
        assert_relative_eq!(race.vehicle().speed, 0.0);
        assert_relative_eq!(race.vehicle().z, 35.0);
    }

    #[test]
    fn go_signal_releases_the_vehicle() {
        let mut race = demo_race();
        race.start_countdown();

        for _ in 0..31 {
            race.simulate_timestep(&full_throttle(), 0.1);
        }

        assert_eq!(race.race_state(), RaceState::Racing);
        assert!(race.vehicle().speed > 0.0);
        assert!(race.speed_kmh() > 0.0);
    }

    #[test]
    fn rejects_zero_laps() {
        let result = Race::new(
            &RacePars {
                tot_no_laps: 0,
                t_countdown: 3.0,
                t_max: 600.0,
            },
            &TrackPars {
                r_inner: 30.0,
                r_outer: 40.0,
                h_wall: 2.0,
            },
            &VehiclePars {
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
        );

        assert!(result.is_err());
    }

    #[test]
    fn reset_rewinds_clock_and_pose() {
        let mut race = demo_race();
        race.start_countdown();

        for _ in 0..100 {
            race.simulate_timestep(&full_throttle(), 0.1);
        }
        assert!(race.cur_racetime > 0.0);

        race.reset();

        assert_eq!(race.race_state(), RaceState::Waiting);
        assert_relative_eq!(race.cur_racetime, 0.0);
        assert_relative_eq!(race.vehicle().speed, 0.0);
        assert_relative_eq!(race.vehicle().x, 0.0);
        assert_relative_eq!(race.vehicle().z, 35.0);
        assert_relative_eq!(race.get_total_time(), 0.0);
    }
}
