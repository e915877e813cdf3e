use crate::core::playback::PlaybackConfig;
use clap::Parser;
use helpers::general::InputValueError;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser, Clone)]
#[clap(
    version = "0.1.0",
    author = "Alexander Heilmeier <alexander.heilmeier@tum.de>",
    name = "raceplay",
    about = "Replays precomputed race strategies on a track graph"
)]
pub struct PlayOpts {
    // FLAGS ---------------------------------------------------------------------------------------
    /// Activate debug printing
    #[clap(short, long)]
    pub debug: bool,

    /// Activate GUI - the track graph is drawn and the cars are animated on it
    #[clap(short, long)]
    pub gui: bool,

    /// Do not wait in real time between two steps (only for non-GUI mode)
    #[clap(short, long)]
    pub fast: bool,

    // OPTIONS -------------------------------------------------------------------------------------
    /// Set path to the race data file (JSON document of the strategy backend)
    #[clap(short = 'p', long)]
    pub datafile_path: Option<PathBuf>,

    /// Set real-time factor, delays are divided by it
    #[clap(short, long, default_value = "1.0")]
    pub realtime_factor: f64,

    /// Set time between two steps of a car in milliseconds
    #[clap(short, long, default_value = "1000")]
    pub step_interval: u64,

    /// Set pause between two cars in milliseconds
    #[clap(short, long, default_value = "2000")]
    pub car_delay: u64,

    /// Set path of the narration transcript (default: output/last_run.txt)
    #[clap(short = 'o', long)]
    pub transcript_path: Option<PathBuf>,
}

impl PlayOpts {
    /// playback_config checks the timing options and converts them into the playback
    /// configuration.
    pub fn playback_config(&self) -> Result<PlaybackConfig, InputValueError> {
        if !(self.realtime_factor.is_finite() && self.realtime_factor > 0.0) {
            return Err(InputValueError::new("real-time factor must be positive"));
        }
        if self.step_interval == 0 {
            return Err(InputValueError::new("step interval must be positive"));
        }
        if self.car_delay == 0 {
            return Err(InputValueError::new("car delay must be positive"));
        }

        Ok(PlaybackConfig {
            step_interval: Duration::from_millis(self.step_interval),
            car_delay: Duration::from_millis(self.car_delay),
            print_debug: self.debug,
        })
    }

    /// realtime_factor_opt returns None if timers should be fired without waiting.
    pub fn realtime_factor_opt(&self) -> Option<f64> {
        if self.fast && !self.gui {
            None
        } else {
            Some(self.realtime_factor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_playback_config() {
        let opts = PlayOpts::parse_from(&["raceplay", "-p", "data.json"]);
        let config = opts.playback_config().unwrap();
        assert_eq!(config.step_interval, PlaybackConfig::default().step_interval);
        assert_eq!(config.car_delay, PlaybackConfig::default().car_delay);
        assert_eq!(opts.datafile_path, Some(PathBuf::from("data.json")));
        assert_eq!(opts.realtime_factor_opt(), Some(1.0));
    }

    #[test]
    fn fast_mode_is_ignored_with_gui() {
        let opts = PlayOpts::parse_from(&["raceplay", "--fast"]);
        assert_eq!(opts.realtime_factor_opt(), None);
        let opts = PlayOpts::parse_from(&["raceplay", "--fast", "--gui"]);
        assert_eq!(opts.realtime_factor_opt(), Some(1.0));
    }

    #[test]
    fn invalid_timing_is_rejected() {
        let opts = PlayOpts::parse_from(&["raceplay", "-s", "0"]);
        assert!(opts.playback_config().is_err());
        let opts = PlayOpts::parse_from(&["raceplay", "-r", "0"]);
        assert!(opts.playback_config().is_err());
    }
}
