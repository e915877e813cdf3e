use crate::core::narration::NarrationLine;
use std::fmt::Write;
use std::io::Write as IoWrite;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeKind {
    Played { no_steps: usize, no_pit_stops: usize },
    Infeasible,
}

/// CarOutcome stores how the playback of a car ended.
#[derive(Debug, Clone, PartialEq)]
pub struct CarOutcome {
    pub car_no: u32,
    pub kind: OutcomeKind,
}

/// ResourceSample contains the resources of a car right after it moved to `node`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceSample {
    pub car_no: u32,
    pub step: usize,
    pub node: usize,
    pub fuel: f64,
    pub tyre_distance: f64,
    pub pit_stop: bool,
}

/// PlaybackResult contains everything that is required for post-processing a playback run.
#[derive(Debug, Clone, Default)]
pub struct PlaybackResult {
    pub transcript: Vec<NarrationLine>,
    pub outcomes: Vec<CarOutcome>,
    pub samples: Vec<ResourceSample>,
}

impl PlaybackResult {
    /// samples_for_car returns the resource samples of one car in step order.
    pub fn samples_for_car(&self, car_no: u32) -> Vec<&ResourceSample> {
        self.samples
            .iter()
            .filter(|sample| sample.car_no == car_no)
            .collect()
    }

    fn format_outcomes(&self) -> anyhow::Result<String> {
        let mut tmp_string = String::new();
        for outcome in self.outcomes.iter() {
            match outcome.kind {
                OutcomeKind::Played {
                    no_steps,
                    no_pit_stops,
                } => writeln!(
                    &mut tmp_string,
                    "Car {:3}: {:4} steps, {:2} pit stops",
                    outcome.car_no, no_steps, no_pit_stops
                )?,
                OutcomeKind::Infeasible => writeln!(
                    &mut tmp_string,
                    "Car {:3}: no feasible strategy",
                    outcome.car_no
                )?,
            }
        }
        Ok(tmp_string)
    }

    /// write_transcript_to_file writes the outcomes and the full narration to a text file in
    /// output/. Returns the path to the written file.
    pub fn write_transcript_to_file(
        &self,
        path: Option<&std::path::Path>,
    ) -> anyhow::Result<String> {
        let mut content = String::new();
        writeln!(&mut content, "RESULT: Outcomes")?;
        content.push_str(&self.format_outcomes()?);
        writeln!(&mut content, "RESULT: Narration")?;
        for line in self.transcript.iter() {
            writeln!(&mut content, "{}", line)?;
        }

        let out_path = output_path(path, "last_run.txt")?;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .truncate(true)
            .write(true)
            .open(&out_path)?;
        file.write_all(content.as_bytes())?;
        file.flush()?;

        Ok(out_path.to_string_lossy().into_owned())
    }

    /// write_samples_csv writes the resource samples of all cars to a CSV file in output/.
    /// Returns the path to the written file.
    pub fn write_samples_csv(&self, path: Option<&std::path::Path>) -> anyhow::Result<String> {
        let out_path = output_path(path, "resource_trace.csv")?;

        let mut csv_writer = csv::Writer::from_path(&out_path)?;
        for sample in self.samples.iter() {
            csv_writer.serialize(sample)?;
        }
        csv_writer.flush()?;

        Ok(out_path.to_string_lossy().into_owned())
    }

    /// print_outcomes prints how the playback of every car ended to the console output.
    pub fn print_outcomes(&self) {
        println!("RESULT: Outcomes");
        match self.format_outcomes() {
            Ok(tmp_string) => print!("{}", tmp_string),
            Err(e) => eprintln!("WARNING: Could not format outcomes: {}", e),
        }
    }
}

/// output_path returns the given path or output/<default_name>, the parent directory is created
/// if missing.
fn output_path(
    path: Option<&std::path::Path>,
    default_name: &str,
) -> anyhow::Result<std::path::PathBuf> {
    let out_path = match path {
        Some(p) => p.to_path_buf(),
        None => std::path::Path::new("output").join(default_name),
    };
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(out_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> PlaybackResult {
        PlaybackResult {
            transcript: vec![NarrationLine::AllCarsVisualized],
            outcomes: vec![
                CarOutcome {
                    car_no: 1,
                    kind: OutcomeKind::Played {
                        no_steps: 3,
                        no_pit_stops: 1,
                    },
                },
                CarOutcome {
                    car_no: 2,
                    kind: OutcomeKind::Infeasible,
                },
            ],
            samples: vec![
                ResourceSample {
                    car_no: 1,
                    step: 0,
                    node: 0,
                    fuel: 8.0,
                    tyre_distance: 0.0,
                    pit_stop: false,
                },
                ResourceSample {
                    car_no: 1,
                    step: 1,
                    node: 1,
                    fuel: 8.0,
                    tyre_distance: 0.0,
                    pit_stop: true,
                },
            ],
        }
    }

    #[test]
    fn outcomes_are_formatted_per_car() {
        let text = result().format_outcomes().unwrap();
        assert_eq!(
            text,
            "Car   1:    3 steps,  1 pit stops\nCar   2: no feasible strategy\n"
        );
    }

    #[test]
    fn samples_are_filtered_by_car() {
        let result = result();
        assert_eq!(result.samples_for_car(1).len(), 2);
        assert!(result.samples_for_car(2).is_empty());
    }

    #[test]
    fn transcript_and_csv_are_written() {
        let dir = std::env::temp_dir().join(format!("raceplay_result_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let result = result();

        let transcript_path = dir.join("transcript.txt");
        result
            .write_transcript_to_file(Some(&transcript_path))
            .unwrap();
        let content = std::fs::read_to_string(&transcript_path).unwrap();
        assert!(content.contains("RESULT: Narration\nAll cars visualized!\n"));

        let csv_path = dir.join("trace.csv");
        result.write_samples_csv(Some(&csv_path)).unwrap();
        let csv_content = std::fs::read_to_string(&csv_path).unwrap();
        let mut csv_lines = csv_content.lines();
        assert_eq!(
            csv_lines.next(),
            Some("car_no,step,node,fuel,tyre_distance,pit_stop")
        );
        assert_eq!(csv_lines.next(), Some("1,0,0,8.0,0.0,false"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
