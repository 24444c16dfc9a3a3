use crate::core::track::Track;
use serde::Deserialize;

/// Reverse top speed as a fraction of the forward top speed.
pub const REVERSE_SPEED_RATIO: f64 = 0.3;

/// Longitudinal pedal command. Accelerate and brake are mutually exclusive by construction, so
/// there is no "both pressed" case to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pedal {
    Coast,
    Accelerate,
    Brake,
}

/// Steering command for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steer {
    Straight,
    Left,
    Right,
}

/// Per-tick input as polled from the presentation adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickInput {
    pub pedal: Pedal,
    pub steer: Steer,
}

impl TickInput {
    /// A neutral input, used while vehicle control is disallowed.
    pub fn neutral() -> TickInput {
        TickInput {
            pedal: Pedal::Coast,
            steer: Steer::Straight,
        }
    }
}

/// * `v_max` - (m/s) Maximum forward speed
/// * `a_accel` - (m/s^2) Acceleration while the accelerator is applied
/// * `a_brake` - (m/s^2) Deceleration while the brake is applied
/// * `a_coast` - (m/s^2) Speed decay towards zero while coasting
/// * `turn_rate` - (rad/s) Fixed steering rate, independent of speed
/// * `v_turn_min` - (m/s) Minimum speed magnitude required for steering to act
/// * `c_bounce` - (-) Rebound damping factor applied to the speed on a wall strike
/// * `d_clearance` - (m) Radial buffer between the vehicle and the track walls
/// * `h_ride` - (m) Fixed ground-clearance height of the renderable vehicle
#[derive(Debug, Deserialize, Clone)]
pub struct VehiclePars {
    pub v_max: f64,
    pub a_accel: f64,
    pub a_brake: f64,
    pub a_coast: f64,
    pub turn_rate: f64,
    #[serde(default = "default_v_turn_min")]
    pub v_turn_min: f64,
    #[serde(default = "default_c_bounce")]
    pub c_bounce: f64,
    #[serde(default = "default_d_clearance")]
    pub d_clearance: f64,
    #[serde(default = "default_h_ride")]
    pub h_ride: f64,
}

fn default_v_turn_min() -> f64 {
    0.5
}

fn default_c_bounce() -> f64 {
    0.3
}

fn default_d_clearance() -> f64 {
    1.0
}

fn default_h_ride() -> f64 {
    0.5
}

/// Vehicle holds the arcade motion state: planar position, yaw heading and a signed scalar speed.
/// The forward direction is (sin(heading), cos(heading)) in the xz plane; the y coordinate is the
/// constant `h_ride` and roll/pitch are always zero.
#[derive(Debug)]
pub struct Vehicle {
    pub x: f64,
    pub z: f64,
    pub heading: f64,
    pub speed: f64,
    v_max: f64,
    a_accel: f64,
    a_brake: f64,
    a_coast: f64,
    turn_rate: f64,
    v_turn_min: f64,
    c_bounce: f64,
    d_clearance: f64,
    h_ride: f64,
}

impl Vehicle {
    pub fn new(vehicle_pars: &VehiclePars, x: f64, z: f64, heading: f64) -> Vehicle {
        Vehicle {
            x,
            z,
            heading,
            speed: 0.0,
            v_max: vehicle_pars.v_max,
            a_accel: vehicle_pars.a_accel,
            a_brake: vehicle_pars.a_brake,
            a_coast: vehicle_pars.a_coast,
            turn_rate: vehicle_pars.turn_rate,
            v_turn_min: vehicle_pars.v_turn_min,
            c_bounce: vehicle_pars.c_bounce,
            d_clearance: vehicle_pars.d_clearance,
            h_ride: vehicle_pars.h_ride,
        }
    }

    /// integrate advances the motion state by one tick. The annulus invariant holds after every
    /// call: the planar center distance stays within [r_inner + d_clearance,
    /// r_outer - d_clearance], assuming the vehicle was spawned inside it.
    pub fn integrate(&mut self, input: &TickInput, dt: f64, track: &Track) {
        let dt = dt.max(0.0);

        // steering: inert below the speed threshold, fixed rate otherwise, inverted in reverse
        if self.speed.abs() > self.v_turn_min {
            let turn_direction = match input.steer {
                Steer::Left => -1.0,
                Steer::Straight => 0.0,
                Steer::Right => 1.0,
            };
            let reverse_mult = if self.speed < 0.0 { -1.0 } else { 1.0 };

            self.heading += turn_direction * self.turn_rate * reverse_mult * dt;
        }

        // longitudinal control
        match input.pedal {
            Pedal::Accelerate => self.speed += self.a_accel * dt,
            Pedal::Brake => self.speed -= self.a_brake * dt,
            Pedal::Coast => {
                // one-sided decay towards zero, never flipping the sign
                if self.speed > 0.0 {
                    self.speed = (self.speed - self.a_coast * dt).max(0.0)
                } else if self.speed < 0.0 {
                    self.speed = (self.speed + self.a_coast * dt).min(0.0)
                }
            }
        }

        self.speed = self
            .speed
            .clamp(-REVERSE_SPEED_RATIO * self.v_max, self.v_max);

        // position candidate along the forward vector
        let x_cand = self.x + self.heading.sin() * self.speed * dt;
        let z_cand = self.z + self.heading.cos() * self.speed * dt;
        let dist = (x_cand * x_cand + z_cand * z_cand).sqrt();

        if track.contains(dist, self.d_clearance) {
            self.x = x_cand;
            self.z = z_cand;
        } else {
            // wall strike: damped rebound, then radial clamp onto the violated bound at the
            // pre-update angle so the vehicle cannot teleport across the ring
            self.speed *= -self.c_bounce;

            let angle = self.x.atan2(self.z);
            let r_clamped = dist.clamp(
                track.inner_bound(self.d_clearance),
                track.outer_bound(self.d_clearance),
            );

            self.x = r_clamped * angle.sin();
            self.z = r_clamped * angle.cos();
        }
    }

    /// reset overwrites the pose and brings the vehicle to a standstill; used between race
    /// attempts.
    pub fn reset(&mut self, x: f64, z: f64, heading: f64) {
        self.x = x;
        self.z = z;
        self.heading = heading;
        self.speed = 0.0;
    }

    /// The method returns the planar distance from the track center.
    pub fn center_dist(&self) -> f64 {
        (self.x * self.x + self.z * self.z).sqrt()
    }

    /// The method returns the constant render height of the vehicle.
    pub fn ride_height(&self) -> f64 {
        self.h_ride
    }

    /// The method returns the current speed converted to km/h for display.
    pub fn speed_kmh(&self) -> f64 {
        self.speed * 3.6
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::track::{Track, TrackPars};
    use approx::assert_relative_eq;

    fn demo_track() -> Track {
        Track::new(&TrackPars {
            r_inner: 30.0,
            r_outer: 40.0,
            h_wall: 2.0,
        })
        .unwrap()
    }

    fn demo_pars() -> VehiclePars {
        VehiclePars {
            v_max: 30.0,
            a_accel: 15.0,
            a_brake: 25.0,
            a_coast: 8.0,
            turn_rate: 2.5,
            v_turn_min: 0.5,
            c_bounce: 0.3,
            d_clearance: 1.0,
            h_ride: 0.5,
        }
    }

    fn accelerate() -> TickInput {
        TickInput {
            pedal: Pedal::Accelerate,
            steer: Steer::Straight,
        }
    }

    #[test]
    fn steering_is_inert_at_rest() {
        let track = demo_track();
        let mut vehicle = Vehicle::new(&demo_pars(), 0.0, 35.0, 0.0);

        vehicle.integrate(
            &TickInput {
                pedal: Pedal::Coast,
                steer: Steer::Left,
            },
            0.5,
            &track,
        );

        assert_relative_eq!(vehicle.heading, 0.0);
        assert_relative_eq!(vehicle.speed, 0.0);
    }

    #[test]
    fn steering_inverts_in_reverse() {
        let track = demo_track();
        let pars = demo_pars();
        let mut vehicle = Vehicle::new(&pars, 0.0, 35.0, 0.0);

        vehicle.speed = 5.0;
        vehicle.integrate(
            &TickInput {
                pedal: Pedal::Coast,
                steer: Steer::Right,
            },
            0.1,
            &track,
        );
        assert!(vehicle.heading > 0.0);

        vehicle.reset(0.0, 35.0, 0.0);
        vehicle.speed = -5.0;
        vehicle.integrate(
            &TickInput {
                pedal: Pedal::Coast,
                steer: Steer::Right,
            },
            0.1,
            &track,
        );
        assert!(vehicle.heading < 0.0);
    }

    #[test]
    fn speed_stays_clamped() {
        // a wide ring, so a straight full-throttle run reaches the clamp before any wall strike
        // could damp the speed
        let track = Track::new(&TrackPars {
            r_inner: 1000.0,
            r_outer: 2000.0,
            h_wall: 2.0,
        })
        .unwrap();
        let pars = demo_pars();
        let mut vehicle = Vehicle::new(&pars, 0.0, 1500.0, std::f64::consts::FRAC_PI_2);

        for _ in 0..200 {
            vehicle.integrate(&accelerate(), 0.1, &track);
            assert!(vehicle.speed <= pars.v_max);
        }
        assert_relative_eq!(vehicle.speed, pars.v_max);

        for _ in 0..200 {
            vehicle.integrate(
                &TickInput {
                    pedal: Pedal::Brake,
                    steer: Steer::Straight,
                },
                0.1,
                &track,
            );
            assert!(vehicle.speed >= -REVERSE_SPEED_RATIO * pars.v_max);
        }
        assert_relative_eq!(vehicle.speed, -REVERSE_SPEED_RATIO * pars.v_max);
    }

    #[test]
    fn straight_run_on_the_demo_ring_ends_in_a_damped_rebound() {
        // on the 30/40m ring the straight tangent leaves the annulus after ~17m, so holding the
        // throttle must end in wall strikes, never at v_max
        let track = demo_track();
        let pars = demo_pars();
        let mut vehicle = Vehicle::new(&pars, 0.0, 35.0, std::f64::consts::FRAC_PI_2);

        for _ in 0..200 {
            vehicle.integrate(&accelerate(), 0.1, &track);
            assert!(vehicle.speed <= pars.v_max);

            let dist = vehicle.center_dist();
            assert!(
                track.inner_bound(pars.d_clearance) - 1e-9 <= dist
                    && dist <= track.outer_bound(pars.d_clearance) + 1e-9
            );
        }

        assert!(vehicle.speed < pars.v_max);
    }

    #[test]
    fn coasting_never_overshoots_zero() {
        let track = demo_track();
        let mut vehicle = Vehicle::new(&demo_pars(), 0.0, 35.0, 0.0);

        vehicle.speed = 1.0;
        vehicle.integrate(&TickInput::neutral(), 0.5, &track);
        assert_relative_eq!(vehicle.speed, 0.0);

        vehicle.speed = -1.0;
        vehicle.integrate(&TickInput::neutral(), 0.5, &track);
        assert_relative_eq!(vehicle.speed, 0.0);
    }

    #[test]
    fn wall_bounce_reverses_and_clamps() {
        let track = demo_track();
        let mut vehicle = Vehicle::new(&demo_pars(), 0.0, 38.9, 0.0);

        // heading 0 points along +z, i.e. radially outward at this position
        vehicle.speed = 20.0;
        vehicle.integrate(&TickInput::neutral(), 0.1, &track);

        assert!(vehicle.speed < 0.0);
        // coasting decays 20 m/s by a_coast * dt before the strike, then the rebound damps it
        assert_relative_eq!(vehicle.speed, -(20.0 - 0.8) * 0.3, epsilon = 1e-6);
        assert_relative_eq!(vehicle.center_dist(), 39.0, epsilon = 1e-9);
    }

    #[test]
    fn annulus_invariant_holds_under_arbitrary_input() {
        let track = demo_track();
        let pars = demo_pars();
        let mut vehicle = Vehicle::new(&pars, 0.0, 35.0, std::f64::consts::FRAC_PI_2);

        let steers = [Steer::Right, Steer::Right, Steer::Straight, Steer::Left];
        let pedals = [Pedal::Accelerate, Pedal::Accelerate, Pedal::Brake, Pedal::Coast];
        let dts = [0.016, 0.1, 0.25, 0.0, 1.0];

        for i in 0..2000 {
            let input = TickInput {
                pedal: pedals[i % pedals.len()],
                steer: steers[i % steers.len()],
            };
            vehicle.integrate(&input, dts[i % dts.len()], &track);

            let dist = vehicle.center_dist();
            assert!(
                track.inner_bound(pars.d_clearance) - 1e-9 <= dist
                    && dist <= track.outer_bound(pars.d_clearance) + 1e-9,
                "annulus invariant violated at tick {}: dist = {:.3}",
                i,
                dist
            );
        }
    }

    #[test]
    fn negative_dt_is_clamped() {
        let track = demo_track();
        let mut vehicle = Vehicle::new(&demo_pars(), 0.0, 35.0, 0.0);

        vehicle.integrate(&accelerate(), -1.0, &track);

        assert_relative_eq!(vehicle.speed, 0.0);
        assert_relative_eq!(vehicle.z, 35.0);
    }
}
