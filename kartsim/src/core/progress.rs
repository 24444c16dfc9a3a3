use crate::core::checkpoint::Checkpoint;

/// Race lifecycle states. Transitions are strictly forward; `reset` is the only way back to
/// `Waiting` and is legal from every state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceState {
    Waiting,
    Countdown,
    Racing,
    Finished,
}

impl Default for RaceState {
    fn default() -> Self {
        RaceState::Waiting
    }
}

/// Progress events are returned synchronously from the tracker methods and forwarded to the
/// presentation side by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    CountdownTick(u32),
    CountdownGo,
    LapComplete { lap: u32, t_lap: f64 },
    RaceFinish { t_total: f64, t_best: f64 },
}

/// ProgressTracker owns the race-progression state machine: checkpoint sequencing, lap counting,
/// lap/best-lap timing and the Waiting -> Countdown -> Racing -> Finished lifecycle.
///
/// All timing is injected: every method takes the current race clock in seconds, advanced by the
/// frame driver. The countdown is an elapsed-time accumulator ticked from the same per-frame
/// update as racing, so there are no deferred timer callbacks that could outlive a reset.
#[derive(Debug)]
pub struct ProgressTracker {
    // parameters
    checkpoints: Vec<Checkpoint>,
    tot_no_laps: u32,
    countdown_len: f64,

    // state machine
    state: RaceState,
    countdown_elapsed: f64,
    countdown_value: u32,

    // race progress
    cur_checkpoint: usize,
    lap_count: u32,
    laptimes: Vec<f64>,
    t_best: Option<f64>,
    t_race_start: Option<f64>,
    t_last_lap: Option<f64>,
    t_finish: Option<f64>,
}

impl ProgressTracker {
    pub fn new(checkpoints: Vec<Checkpoint>, tot_no_laps: u32, countdown_len: f64) -> ProgressTracker {
        let countdown_len = countdown_len.max(0.0);

        ProgressTracker {
            countdown_value: countdown_len.ceil() as u32,
            checkpoints,
            tot_no_laps,
            countdown_len,
            state: RaceState::Waiting,
            countdown_elapsed: 0.0,
            cur_checkpoint: 0,
            lap_count: 0,
            laptimes: Vec::new(),
            t_best: None,
            t_race_start: None,
            t_last_lap: None,
            t_finish: None,
        }
    }

    /// start_countdown moves the tracker from Waiting into Countdown. Calls from any other state
    /// are silently ignored.
    pub fn start_countdown(&mut self) -> Vec<ProgressEvent> {
        let mut events = Vec::new();

        if self.state == RaceState::Waiting {
            self.state = RaceState::Countdown;
            self.countdown_elapsed = 0.0;
            self.countdown_value = self.countdown_len.ceil() as u32;

            if self.countdown_value > 0 {
                events.push(ProgressEvent::CountdownTick(self.countdown_value));
            }
        }

        events
    }

    /// tick_countdown advances the countdown accumulator by the tick duration. One CountdownTick
    /// is emitted per full second stepped down; reaching zero emits CountdownGo, stamps the race
    /// start time with the supplied race clock and enters Racing. No-op outside Countdown.
    pub fn tick_countdown(&mut self, now_s: f64, dt: f64) -> Vec<ProgressEvent> {
        let mut events = Vec::new();

        if self.state != RaceState::Countdown {
            return events;
        }

        self.countdown_elapsed += dt.max(0.0);

        let remaining = (self.countdown_len - self.countdown_elapsed).ceil().max(0.0) as u32;

        while self.countdown_value > remaining {
            self.countdown_value -= 1;

            if self.countdown_value > 0 {
                events.push(ProgressEvent::CountdownTick(self.countdown_value));
            }
        }

        if self.countdown_elapsed >= self.countdown_len {
            events.push(ProgressEvent::CountdownGo);
            self.t_race_start = Some(now_s);
            self.state = RaceState::Racing;
        }

        events
    }

    /// update evaluates checkpoint proximity for the given vehicle position. It is intentionally
    /// safe to call unconditionally every frame: outside Racing (and once all laps are done) it
    /// is a silent no-op.
    pub fn update(&mut self, now_s: f64, x: f64, z: f64) -> Vec<ProgressEvent> {
        if self.state != RaceState::Racing {
            return Vec::new();
        }

        // defensive fallback in case the countdown path was skipped
        if self.t_race_start.is_none() {
            self.t_race_start = Some(now_s);
        }

        if self.lap_count >= self.tot_no_laps {
            return Vec::new();
        }

        if self.checkpoints[self.cur_checkpoint].detects(x, z) {
            self.hit_checkpoint(self.cur_checkpoint, now_s)
        } else {
            Vec::new()
        }
    }

    /// hit_checkpoint registers a gate hit. Out-of-order hits are silently ignored: the index
    /// must match the expected checkpoint, and the sequence only ever advances by exactly one
    /// (mod checkpoint count) per successful hit.
    pub fn hit_checkpoint(&mut self, index: usize, now_s: f64) -> Vec<ProgressEvent> {
        let mut events = Vec::new();

        if self.state != RaceState::Racing || index != self.cur_checkpoint {
            return events;
        }

        self.cur_checkpoint += 1;

        if self.cur_checkpoint >= self.checkpoints.len() {
            // lap complete
            self.cur_checkpoint = 0;
            self.lap_count += 1;

            let t_ref = self.t_last_lap.or(self.t_race_start).unwrap_or(now_s);
            let t_lap = now_s - t_ref;

            self.laptimes.push(t_lap);
            self.t_last_lap = Some(now_s);

            if self.t_best.map_or(true, |best| t_lap < best) {
                self.t_best = Some(t_lap);
            }

            events.push(ProgressEvent::LapComplete {
                lap: self.lap_count,
                t_lap,
            });

            if self.lap_count == self.tot_no_laps {
                self.state = RaceState::Finished;
                self.t_finish = Some(now_s);

                events.push(ProgressEvent::RaceFinish {
                    t_total: now_s - self.t_race_start.unwrap_or(now_s),
                    t_best: self.t_best.unwrap_or(t_lap),
                });
            }
        }

        events
    }

    /// reset returns every progress field to its construction-time value. The checkpoint geometry
    /// is kept; only the session state is cleared. Safe to call in any state, including
    /// mid-countdown.
    pub fn reset(&mut self) {
        self.state = RaceState::Waiting;
        self.countdown_elapsed = 0.0;
        self.countdown_value = self.countdown_len.ceil() as u32;
        self.cur_checkpoint = 0;
        self.lap_count = 0;
        self.laptimes.clear();
        self.t_best = None;
        self.t_race_start = None;
        self.t_last_lap = None;
        self.t_finish = None;
    }

    /// can_move reports whether vehicle control is currently allowed.
    pub fn can_move(&self) -> bool {
        self.state == RaceState::Racing
    }

    /// get_total_time returns the elapsed wall-clock race time while Racing, and the sum of the
    /// recorded lap times once Finished. The two paths are deliberately distinct (live clock vs
    /// lap-delta sum) and must not be unified.
    pub fn get_total_time(&self, now_s: f64) -> f64 {
        match self.state {
            RaceState::Racing => now_s - self.t_race_start.unwrap_or(now_s),
            RaceState::Finished => self.laptimes.iter().sum(),
            _ => 0.0,
        }
    }

    /// get_current_lap returns the lap currently in progress, capped at the final lap number.
    pub fn get_current_lap(&self) -> u32 {
        (self.lap_count + 1).min(self.tot_no_laps)
    }

    pub fn race_state(&self) -> RaceState {
        self.state
    }

    pub fn get_cur_checkpoint(&self) -> usize {
        self.cur_checkpoint
    }

    pub fn get_lap_count(&self) -> u32 {
        self.lap_count
    }

    pub fn get_laptimes(&self) -> &[f64] {
        &self.laptimes
    }

    pub fn get_best_laptime(&self) -> Option<f64> {
        self.t_best
    }

    pub fn get_t_race_start(&self) -> Option<f64> {
        self.t_race_start
    }

    /// The method returns the wall-clock duration between race start and finish, available once
    /// Finished.
    pub fn get_wallclock_total(&self) -> Option<f64> {
        match (self.t_race_start, self.t_finish) {
            (Some(start), Some(finish)) => Some(finish - start),
            _ => None,
        }
    }
}
