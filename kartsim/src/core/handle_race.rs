use crate::core::progress::ProgressEvent;
use crate::core::race::Race;
use crate::interfaces::autopilot::Autopilot;
use crate::interfaces::hud_interface::{HudState, MAX_HUD_UPDATE_FREQUENCY};
use crate::post::race_result::RaceResult;
use crate::pre::read_sim_pars::SimPars;
use anyhow::Context;
use flume::Sender;
use helpers::general::format_time_s;
use std::thread::sleep;
use std::time::{Duration, Instant};

/// handle_race creates and simulates a race session on the basis of the inserted parameters, and
/// returns the result for post-processing. The autopilot stands in for the presentation
/// adapter's input side. If a sender is inserted, the race is simulated in real time and HUD
/// snapshots are sent through it.
pub fn handle_race(
    sim_pars: &SimPars,
    timestep_size: f64,
    print_debug: bool,
    tx: Option<&Sender<HudState>>,
    realtime_factor: f64,
    print_events: bool,
) -> anyhow::Result<RaceResult> {
    let mut race = Race::new(
        &sim_pars.race_pars,
        &sim_pars.track_pars,
        &sim_pars.vehicle_pars,
    )?;
    let autopilot = Autopilot::new(sim_pars.vehicle_pars.v_max);

    for event in race.start_countdown() {
        if print_events {
            print_event(&event);
        }
    }

    // check if sender was inserted -> in that case simulate in real-time for the HUD
    let sim_realtime = tx.is_some();

    if !sim_realtime {
        let mut t_race_update_print = 0.0;

        while !race.get_finished() {
            if race.cur_racetime > race.t_max {
                anyhow::bail!(
                    "Race was not finished within the simulation time cap of {:.0}s!",
                    race.t_max
                );
            }

            let input = autopilot.next_input(race.vehicle(), race.track());
            let events = race.simulate_timestep(&input, timestep_size);

            if print_events {
                for event in events.iter() {
                    print_event(event);
                }
            }

            if print_debug && race.cur_racetime > t_race_update_print + 0.9999 {
                println!(
                    "INFO: Simulating... Current race time is {:.3}s, current lap is {}/{}",
                    race.cur_racetime,
                    race.get_current_lap(),
                    race.tot_no_laps()
                );
                t_race_update_print = race.cur_racetime;
            }
        }
    } else {
        let mut t_race_update_hud = 0.0;

        while !race.get_finished() {
            if race.cur_racetime > race.t_max {
                anyhow::bail!(
                    "Race was not finished within the simulation time cap of {:.0}s!",
                    race.t_max
                );
            }

            let t_start = Instant::now();
            let input = autopilot.next_input(race.vehicle(), race.track());
            let events = race.simulate_timestep(&input, timestep_size);

            if print_events {
                for event in events.iter() {
                    print_event(event);
                }
            }

            if race.cur_racetime > t_race_update_hud + 1.0 / MAX_HUD_UPDATE_FREQUENCY - 0.001 {
                // send current HUD snapshot
                tx.unwrap()
                    .send(hud_snapshot(&race, None))
                    .context("Failed to send HUD state to the presentation side!")?;
                t_race_update_hud = race.cur_racetime;
            }

            // sleep until the time step is finished in real-time as well (calculation in ms)
            let t_sleep = (timestep_size * 1000.0 / realtime_factor) as i64
                - t_start.elapsed().as_millis() as i64;

            if t_sleep > 0 {
                sleep(Duration::from_millis(t_sleep as u64));
            }
        }

        // after the real-time loop finishes, send the final snapshot once
        if let Some(tx) = tx {
            let result = race.get_race_result();
            tx.send(hud_snapshot(&race, Some(result)))
                .context("Failed to send the final race result to the presentation side!")?;
        }
    }

    // return race result
    Ok(race.get_race_result())
}

fn hud_snapshot(race: &Race, final_result: Option<RaceResult>) -> HudState {
    HudState {
        race_state: race.race_state(),
        v_kmh: race.speed_kmh(),
        cur_lap: race.get_current_lap(),
        tot_no_laps: race.tot_no_laps(),
        t_elapsed: race.get_total_time(),
        t_best: race.get_best_laptime(),
        final_result,
    }
}

fn print_event(event: &ProgressEvent) {
    match event {
        ProgressEvent::CountdownTick(value) => println!("EVENT: {}", value),
        ProgressEvent::CountdownGo => println!("EVENT: GO!"),
        ProgressEvent::LapComplete { lap, t_lap } => {
            println!("EVENT: Lap {} completed in {}", lap, format_time_s(*t_lap))
        }
        ProgressEvent::RaceFinish { t_total, t_best } => println!(
            "EVENT: Race finished in {}, best lap {}",
            format_time_s(*t_total),
            format_time_s(*t_best)
        ),
    }
}
