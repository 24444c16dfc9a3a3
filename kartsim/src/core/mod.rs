pub mod checkpoint;
pub mod handle_race;
pub mod progress;
pub mod race;
pub mod track;
pub mod vehicle;
