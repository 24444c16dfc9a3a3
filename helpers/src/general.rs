use std::error::Error;
use std::f64::consts::PI;
use std::fmt;

/// InputValueError is used if some simulation option or parameter does not fulfill the posed
/// requirements, e.g., by exceeding the allowed time step range.
#[derive(Debug, Clone)]
pub struct InputValueError;

impl fmt::Display for InputValueError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Invalid input value")
    }
}

impl Error for InputValueError {}

/// format_time renders a duration given in milliseconds as "M:SS.mmm" (minutes unpadded, seconds
/// zero-padded to two digits, milliseconds zero-padded to three digits).
pub fn format_time(t_ms: u64) -> String {
    let minutes = t_ms / 60_000;
    let seconds = (t_ms % 60_000) / 1_000;
    let millis = t_ms % 1_000;

    format!("{}:{:02}.{:03}", minutes, seconds, millis)
}

/// format_time_s renders a duration given in seconds (simulation time unit) as "M:SS.mmm".
pub fn format_time_s(t_s: f64) -> String {
    format_time((t_s.max(0.0) * 1000.0).round() as u64)
}

/// format_time_opt renders an optional duration in seconds, using a "-:--.---" placeholder if no
/// value is available (e.g., best lap time before the first completed lap).
pub fn format_time_opt(t_s: Option<f64>) -> String {
    match t_s {
        Some(t) => format_time_s(t),
        None => String::from("-:--.---"),
    }
}

/// wrap_angle normalizes an angle in radians into the interval (-PI, PI].
pub fn wrap_angle(angle: f64) -> f64 {
    let mut wrapped = angle % (2.0 * PI);

    if wrapped > PI {
        wrapped -= 2.0 * PI
    } else if wrapped <= -PI {
        wrapped += 2.0 * PI
    }

    wrapped
}

/// argmin returns the index of the minimum value in the array x (the first one on ties).
pub fn argmin<T: std::cmp::PartialOrd + std::marker::Copy>(x: &[T]) -> usize {
    let mut idx_min = 0;
    let mut val_min = x[0];

    for (i, &val) in x.iter().enumerate().skip(1) {
        if val < val_min {
            val_min = val;
            idx_min = i;
        }
    }

    idx_min
}

/// min_val returns the minimum value in the array x.
pub fn min_val<T: std::cmp::PartialOrd + std::marker::Copy>(x: &[T]) -> T {
    let &min_val = x.iter().fold(
        &x[0],
        |val_min, val| {
            if val_min < val {
                val_min
            } else {
                val
            }
        },
    );
    min_val
}
