use anyhow::Result;
use serde::Deserialize;

/// * `r_inner` - (m) Inner radius of the drivable annulus
/// * `r_outer` - (m) Outer radius of the drivable annulus
/// * `h_wall` - (m) Height of the boundary walls (used by the presentation layer only)
#[derive(Debug, Deserialize, Clone)]
pub struct TrackPars {
    pub r_inner: f64,
    pub r_outer: f64,
    pub h_wall: f64,
}

#[derive(Debug)]
pub struct Track {
    pub r_inner: f64,
    pub r_outer: f64,
    pub h_wall: f64,
    pub width: f64,
    pub r_center: f64,
}

impl Track {
    pub fn new(track_pars: &TrackPars) -> Result<Track> {
        if track_pars.r_inner <= 0.0 {
            anyhow::bail!(
                "Inner track radius must be positive, but is {:.3}m!",
                track_pars.r_inner
            )
        }

        if track_pars.r_inner >= track_pars.r_outer {
            anyhow::bail!(
                "Inner track radius {:.3}m must be smaller than outer track radius {:.3}m!",
                track_pars.r_inner,
                track_pars.r_outer
            )
        }

        Ok(Track {
            r_inner: track_pars.r_inner,
            r_outer: track_pars.r_outer,
            h_wall: track_pars.h_wall,
            width: track_pars.r_outer - track_pars.r_inner,
            r_center: (track_pars.r_inner + track_pars.r_outer) / 2.0,
        })
    }

    /// The method returns the smallest center distance the vehicle may occupy.
    pub fn inner_bound(&self, clearance: f64) -> f64 {
        self.r_inner + clearance
    }

    /// The method returns the largest center distance the vehicle may occupy.
    pub fn outer_bound(&self, clearance: f64) -> f64 {
        self.r_outer - clearance
    }

    /// The method checks whether a center distance lies within the drivable annulus, reduced by
    /// the given vehicle clearance on both sides.
    pub fn contains(&self, dist: f64, clearance: f64) -> bool {
        self.inner_bound(clearance) <= dist && dist <= self.outer_bound(clearance)
    }
}
