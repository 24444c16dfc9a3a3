use crate::core::track::Track;
use crate::core::vehicle::{Pedal, Steer, TickInput, Vehicle};
use helpers::general::wrap_angle;
use std::f64::consts::FRAC_PI_2;

/// Heading error below which the autopilot keeps the wheel straight.
const STEER_DEADBAND: f64 = 0.05;

/// Heading bias per meter of radial offset from the centerline, normalized by the half lane
/// width.
const CENTERLINE_GAIN: f64 = 0.5;

/// Heading error beyond which the autopilot brakes instead of accelerating at speed.
const BRAKE_ERR_THRESHOLD: f64 = 0.6;

/// Autopilot is the input half of the presentation boundary for headless runs: it polls the
/// vehicle pose once per tick and produces the same `TickInput` a keyboard adapter would. It
/// follows the track centerline by steering towards the tangent heading at the vehicle's current
/// angle, biased back towards the centerline when drifting off it.
#[derive(Debug)]
pub struct Autopilot {
    v_max: f64,
}

impl Autopilot {
    pub fn new(v_max: f64) -> Autopilot {
        Autopilot { v_max }
    }

    /// The method returns the input for the next tick.
    pub fn next_input(&self, vehicle: &Vehicle, track: &Track) -> TickInput {
        // angular position on the ring; a point at angle a sits at (r sin a, r cos a)
        let angle = vehicle.x.atan2(vehicle.z);

        // tangent heading in the direction of increasing angle, biased inward/outward to hold
        // the centerline
        let radial_err = vehicle.center_dist() - track.r_center;
        let correction = radial_err / (track.width / 2.0) * CENTERLINE_GAIN;
        let target_heading = angle + FRAC_PI_2 + correction;

        let err = wrap_angle(target_heading - vehicle.heading);

        let steer = if err > STEER_DEADBAND {
            Steer::Right
        } else if err < -STEER_DEADBAND {
            Steer::Left
        } else {
            Steer::Straight
        };

        let pedal = if err.abs() > BRAKE_ERR_THRESHOLD && vehicle.speed > 0.5 * self.v_max {
            Pedal::Brake
        } else {
            Pedal::Accelerate
        };

        TickInput { pedal, steer }
    }
}
