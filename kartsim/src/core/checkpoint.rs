use crate::core::track::Track;

/// Number of checkpoint gates on the track. Gate 0 is the start/finish line.
pub const NO_CHECKPOINTS: usize = 4;

/// Extra detection margin beyond the half track width, so that a vehicle hugging a wall still
/// registers the gate.
pub const CHECKPOINT_MARGIN: f64 = 2.0;

/// A checkpoint is an ordered gate on the track centerline. Checkpoints are created once at race
/// setup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    pub index: usize,
    pub x: f64,
    pub z: f64,
    pub r_detect: f64,
}

impl Checkpoint {
    /// The method returns the planar distance from the given position to the gate center.
    pub fn planar_dist_to(&self, x: f64, z: f64) -> f64 {
        let dx = x - self.x;
        let dz = z - self.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// The method checks whether the given position lies within the detection radius.
    pub fn detects(&self, x: f64, z: f64) -> bool {
        self.planar_dist_to(x, z) < self.r_detect
    }
}

/// place_checkpoints creates the gate sequence for a race: evenly spaced gates on the track
/// centerline, starting at angle 0 (the start/finish line). Positions follow the vehicle's
/// forward convention, i.e. a point at angle a sits at (r * sin(a), r * cos(a)).
pub fn place_checkpoints(track: &Track) -> Vec<Checkpoint> {
    let r_detect = track.width / 2.0 + CHECKPOINT_MARGIN;
    let mut checkpoints = Vec::with_capacity(NO_CHECKPOINTS);

    for index in 0..NO_CHECKPOINTS {
        let angle = index as f64 / NO_CHECKPOINTS as f64 * 2.0 * std::f64::consts::PI;

        checkpoints.push(Checkpoint {
            index,
            x: track.r_center * angle.sin(),
            z: track.r_center * angle.cos(),
            r_detect,
        });
    }

    checkpoints
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::track::TrackPars;
    use approx::assert_relative_eq;

    fn demo_track() -> Track {
        Track::new(&TrackPars {
            r_inner: 30.0,
            r_outer: 40.0,
            h_wall: 2.0,
        })
        .unwrap()
    }

    #[test]
    fn gates_sit_on_centerline_quarters() {
        let checkpoints = place_checkpoints(&demo_track());
        assert_eq!(checkpoints.len(), NO_CHECKPOINTS);

        // gate 0 at angle 0 -> (0, r_center), gate 1 at 90 deg -> (r_center, 0)
        assert_relative_eq!(checkpoints[0].x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(checkpoints[0].z, 35.0, epsilon = 1e-9);
        assert_relative_eq!(checkpoints[1].x, 35.0, epsilon = 1e-9);
        assert_relative_eq!(checkpoints[1].z, 0.0, epsilon = 1e-9);
        assert_relative_eq!(checkpoints[2].x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(checkpoints[2].z, -35.0, epsilon = 1e-9);
        assert_relative_eq!(checkpoints[3].x, -35.0, epsilon = 1e-9);
        assert_relative_eq!(checkpoints[3].z, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn detection_radius_covers_full_lane_width() {
        let checkpoints = place_checkpoints(&demo_track());

        for checkpoint in checkpoints.iter() {
            assert_relative_eq!(checkpoint.r_detect, 7.0);
        }

        // a vehicle hugging the outer wall at the gate angle is still detected
        assert!(checkpoints[0].detects(0.0, 39.0));
        assert!(!checkpoints[0].detects(0.0, 27.0));
    }
}
