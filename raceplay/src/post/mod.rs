pub mod playback_result;
pub mod race_overview;
