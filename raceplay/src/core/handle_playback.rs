use crate::core::narration::NarrationSink;
use crate::core::playback::{PlaybackConfig, PlaybackController};
use crate::core::race_dataset::RaceDataset;
use crate::core::renderer::{build_scene, GraphRenderer, Palette};
use crate::core::scheduler::TimerQueue;
use crate::post::playback_result::PlaybackResult;
use std::thread::sleep;
use std::time::{Duration, Instant};

/// Maximum wall-clock time to wait for the renderer's layout to settle before playback starts.
pub const MAX_LAYOUT_WAIT: Duration = Duration::from_secs(10);

/// handle_playback initializes the renderer with the track graph, replays all cars of the dataset
/// and returns the results for post-processing.
///
/// With a `realtime_factor` the timers are fired in real time (scaled by the factor), without it
/// the playback runs through virtual time as fast as possible.
pub fn handle_playback<R: GraphRenderer, N: NarrationSink>(
    dataset: &RaceDataset,
    config: &PlaybackConfig,
    mut renderer: R,
    narration: N,
    realtime_factor: Option<f64>,
) -> anyhow::Result<PlaybackResult> {
    let palette = Palette::new()?;

    let graph = dataset.graph();
    let (nodes, edges) = build_scene(graph, |id| palette.default_color(graph, id));
    renderer.initialize(nodes, edges)?;

    if realtime_factor.is_some() {
        wait_for_layout(&mut renderer, config.print_debug);
    }

    let mut controller = PlaybackController::new(
        dataset.to_owned(),
        config.to_owned(),
        palette,
        TimerQueue::new(),
        renderer,
        narration,
    );
    controller.start()?;

    let t_start = Instant::now();
    while let Some((due, id)) = controller.scheduler_mut().pop_next() {
        if let Some(realtime_factor) = realtime_factor {
            // sleep until the timer is due in real time as well (calculation in ms)
            let t_due = (due.as_secs_f64() * 1000.0 / realtime_factor) as i64;
            let t_sleep = t_due - t_start.elapsed().as_millis() as i64;

            if t_sleep > 0 {
                sleep(Duration::from_millis(t_sleep as u64));
            } else if t_sleep < -(config.step_interval.as_millis() as i64) {
                println!("WARNING: Could not keep up with real-time!")
            }
        }

        if config.print_debug {
            println!("DEBUG: Firing timer {:?} at {:.3}s", id, due.as_secs_f64());
        }
        controller.on_timer(id)?;

        if controller.is_done() {
            break;
        }
    }

    Ok(controller.into_result())
}

fn wait_for_layout<R: GraphRenderer>(renderer: &mut R, print_debug: bool) {
    let t_start = Instant::now();
    while !renderer.poll_stabilized() {
        if t_start.elapsed() > MAX_LAYOUT_WAIT {
            println!("WARNING: Graph layout did not stabilize, starting playback anyway!");
            return;
        }
        sleep(Duration::from_millis(20));
    }
    if print_debug {
        println!(
            "DEBUG: Graph layout stabilized after {}ms",
            t_start.elapsed().as_millis()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::car::CarPars;
    use crate::core::narration::{NarrationLine, Transcript};
    use crate::core::path_result::PathPars;
    use crate::core::race_dataset::RacePars;
    use crate::core::renderer::SceneRecorder;
    use crate::post::playback_result::OutcomeKind;

    #[test]
    fn fast_playback_runs_all_cars() {
        let race_pars = RacePars {
            n: 2,
            pit_nodes: vec![],
            cars: vec![
                CarPars {
                    fuel_capacity: 10.0,
                    tyre_cost: 1.0,
                },
                CarPars {
                    fuel_capacity: 20.0,
                    tyre_cost: 2.0,
                },
            ],
        };
        let paths = vec![
            None,
            Some(PathPars {
                total_time: 3.0,
                pit_stops: vec![],
                node_sequence: vec![0, 1],
            }),
        ];
        let dataset = RaceDataset::new(&race_pars, &[(0, 1, 3.0)], &paths).unwrap();

        let result = handle_playback(
            &dataset,
            &PlaybackConfig::default(),
            SceneRecorder::default(),
            Transcript::new(false),
            None,
        )
        .unwrap();

        assert_eq!(result.outcomes.len(), 2);
        assert_eq!(result.outcomes[0].kind, OutcomeKind::Infeasible);
        assert_eq!(
            result.outcomes[1].kind,
            OutcomeKind::Played {
                no_steps: 2,
                no_pit_stops: 0
            }
        );
        assert_eq!(result.transcript.last(), Some(&NarrationLine::AllCarsVisualized));
        assert_eq!(result.samples.len(), 2);
    }
}
