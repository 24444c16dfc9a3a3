use anyhow::Context;
use clap::Parser;
use helpers::general::{format_time_opt, format_time_s, InputValueError};
use kartsim::post::race_result::RaceResult;
use kartsim::pre::read_sim_pars::{default_sim_pars, read_sim_pars};
use kartsim::pre::sim_opts::SimOpts;
use plotters::prelude::*;
use std::io::Write;
use std::thread;
use std::time::Instant;

fn export_results_plot(result: &RaceResult) -> anyhow::Result<String> {
    let out_dir = std::path::Path::new("output");
    std::fs::create_dir_all(out_dir)?;
    let ts = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)?
        .as_secs();
    let filename = format!("laptimes_plot_{}.png", ts);
    let out_path = out_dir.join(filename);

    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for t_lap in result.laptimes.iter() {
        if *t_lap < y_min {
            y_min = *t_lap;
        }
        if *t_lap > y_max {
            y_max = *t_lap;
        }
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        y_min = 0.0;
        y_max = 1.0;
    }
    let margin = ((y_max - y_min) * 0.05).max(0.5);
    y_min -= margin;
    y_max += margin;

    let root = BitMapBackend::new(out_path.to_str().unwrap(), (1280, 720)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Lap times", ("sans-serif", 24).into_font())
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(1u32..result.tot_no_laps + 1, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Lap")
        .y_desc("s")
        .label_style(("sans-serif", 16))
        .axis_desc_style(("sans-serif", 16))
        .draw()?;

    let series: Vec<(u32, f64)> = result
        .laptimes
        .iter()
        .enumerate()
        .map(|(lap, t_lap)| (lap as u32 + 1, *t_lap))
        .collect();
    chart.draw_series(LineSeries::new(series.into_iter(), &BLUE))?;

    if let Some(t_best) = result.t_best {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(1u32, t_best), (result.tot_no_laps + 1, t_best)],
            RED.stroke_width(1),
        )))?;
    }

    root.present()?;
    Ok(out_path.to_string_lossy().into_owned())
}

fn print_result(result: &RaceResult) -> anyhow::Result<()> {
    result.print_lap_and_race_times();

    let csv_path = result.write_laptimes_csv(None)?;
    println!("INFO: Lap times written to {}", csv_path);

    match export_results_plot(result) {
        Ok(path) => println!("INFO: Lap time plot written to {}", path),
        Err(e) => eprintln!("WARNING: Failed to write the lap time plot: {}", e),
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    // PRE-PROCESSING ------------------------------------------------------------------------------
    // get simulation options from the command line arguments
    let sim_opts: SimOpts = SimOpts::parse();

    // check the inserted time step size
    if sim_opts.timestep_size < 0.001 || sim_opts.timestep_size > 1.0 {
        return Err(InputValueError).context(format!(
            "Time step size {:.4}s is outside the allowed range [0.001, 1.0]!",
            sim_opts.timestep_size
        ));
    }

    // get simulation parameters
    let mut sim_pars = if let Some(parfile_path) = &sim_opts.parfile_path {
        println!("INFO: Reading simulation parameters from {:?}", parfile_path);
        read_sim_pars(parfile_path)?
    } else {
        println!("INFO: No parameter file inserted, using built-in defaults");
        default_sim_pars()
    };

    if let Some(t_max) = sim_opts.t_max {
        sim_pars.race_pars.t_max = t_max;
    }

    // print race details
    println!(
        "INFO: Simulating a {}-lap race on a {:.0}m/{:.0}m ring track with a time step size of {:.3}s",
        sim_pars.race_pars.tot_no_laps,
        sim_pars.track_pars.r_inner,
        sim_pars.track_pars.r_outer,
        sim_opts.timestep_size
    );

    // EXECUTION -----------------------------------------------------------------------------------
    if !sim_opts.realtime {
        // NON-REALTIME CASE - run the simulation as fast as possible
        println!("INFO: Running simulation without real-time pacing...");
        let t_start = Instant::now();

        let race_result = kartsim::core::handle_race::handle_race(
            &sim_pars,
            sim_opts.timestep_size,
            sim_opts.debug,
            None,
            1.0,
            sim_opts.print_events,
        )?;

        println!("INFO: Execution time: {}ms", t_start.elapsed().as_millis());

        print_result(&race_result)?;
    } else {
        // REALTIME CASE - simulate in real time and print live HUD updates
        println!("INFO: Running real-time simulation...");

        // create the channel between the simulation thread and the HUD printer
        let (tx, rx) = flume::unbounded();

        // run the simulation in a separate thread
        let sim_opts_thread = sim_opts.clone();
        let sim_pars_thread = sim_pars.clone();

        let sim_handle = thread::spawn(move || {
            kartsim::core::handle_race::handle_race(
                &sim_pars_thread,
                sim_opts_thread.timestep_size,
                false,
                Some(&tx),
                sim_opts_thread.realtime_factor,
                sim_opts_thread.print_events,
            )
        });

        // print HUD snapshots until the sender side is dropped
        for hud in rx.iter() {
            if hud.final_result.is_none() {
                print!(
                    "\rHUD: [{:?}] lap {}/{} | {:5.1} km/h | {} | best {}     ",
                    hud.race_state,
                    hud.cur_lap,
                    hud.tot_no_laps,
                    hud.v_kmh,
                    format_time_s(hud.t_elapsed),
                    format_time_opt(hud.t_best)
                );
                std::io::stdout().flush()?;
            } else {
                println!();
            }
        }

        let race_result = sim_handle
            .join()
            .map_err(|_| anyhow::anyhow!("Simulation thread panicked!"))??;

        print_result(&race_result)?;
    }

    Ok(())
}
