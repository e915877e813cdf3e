pub mod car;
pub mod graph;
pub mod handle_playback;
pub mod narration;
pub mod path_result;
pub mod playback;
pub mod race_dataset;
pub mod renderer;
pub mod resource_sim;
pub mod scheduler;
