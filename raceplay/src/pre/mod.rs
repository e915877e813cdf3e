pub mod play_opts;
pub mod read_race_data;
