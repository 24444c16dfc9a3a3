use helpers::general::{argmin, format_time_opt, format_time_s};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// RaceResult contains all race information that is required for post-processing the results.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RaceResult {
    pub tot_no_laps: u32,
    pub laptimes: Vec<f64>,
    pub t_best: Option<f64>,
    /// Total race time as the sum of the recorded lap times.
    pub t_total: f64,
    /// Total race time as measured on the race clock (go signal to finish).
    pub t_total_wallclock: f64,
}

impl RaceResult {
    /// The method returns the index of the fastest recorded lap, if any lap was completed.
    pub fn best_lap_index(&self) -> Option<usize> {
        if self.laptimes.is_empty() {
            None
        } else {
            Some(argmin(&self.laptimes))
        }
    }

    /// print_lap_and_race_times prints the resulting lap and race times to the console output.
    pub fn print_lap_and_race_times(&self) {
        println!("RESULT: Lap times");

        let best_lap = self.best_lap_index();
        let mut t_race = 0.0;

        for (lap, t_lap) in self.laptimes.iter().enumerate() {
            t_race += t_lap;

            if Some(lap) == best_lap {
                println!(
                    "{:3}, {} (race time {}) *best*",
                    lap + 1,
                    format_time_s(*t_lap),
                    format_time_s(t_race)
                );
            } else {
                println!(
                    "{:3}, {} (race time {})",
                    lap + 1,
                    format_time_s(*t_lap),
                    format_time_s(t_race)
                );
            }
        }

        println!("RESULT: Total race time {}", format_time_s(self.t_total));
        println!("RESULT: Best lap time {}", format_time_opt(self.t_best));
    }

    /// write_laptimes_csv writes the lap times to a CSV file in output/ (or at the inserted path).
    /// Returns the path to the written file.
    pub fn write_laptimes_csv(&self, path: Option<&Path>) -> anyhow::Result<String> {
        let out_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            let out_dir = Path::new("output");
            std::fs::create_dir_all(out_dir)?;
            out_dir.join("laptimes.csv")
        };

        let mut wtr = csv::Writer::from_path(&out_path)?;
        wtr.write_record(&["lap", "t_lap_s", "t_race_s"])?;

        let mut t_race = 0.0;

        for (lap, t_lap) in self.laptimes.iter().enumerate() {
            t_race += t_lap;
            wtr.write_record(&[
                format!("{}", lap + 1),
                format!("{:.3}", t_lap),
                format!("{:.3}", t_race),
            ])?;
        }

        wtr.flush()?;

        Ok(out_path.to_string_lossy().into_owned())
    }
}
