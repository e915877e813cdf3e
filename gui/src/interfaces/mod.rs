pub mod playback_interface;
