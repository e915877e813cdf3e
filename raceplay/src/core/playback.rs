use crate::core::car::Car;
use crate::core::narration::{NarrationLine, NarrationSink};
use crate::core::path_result::PathResult;
use crate::core::race_dataset::RaceDataset;
use crate::core::renderer::{GraphRenderer, Palette, ACTIVE_BORDER_WIDTH, DEFAULT_BORDER_WIDTH};
use crate::core::resource_sim::{advance, apply_pit_stop, is_pit_stop, PlaybackState};
use crate::core::scheduler::{Scheduler, TimerId};
use crate::post::playback_result::{CarOutcome, OutcomeKind, PlaybackResult, ResourceSample};
use std::time::Duration;

/// * `step_interval` - Period of the tick that moves the active car by one node
/// * `car_delay` - Pause after a car finished (or was found infeasible) before the next one starts
/// * `print_debug` - Print timer dispatching and car transitions
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    pub step_interval: Duration,
    pub car_delay: Duration,
    pub print_debug: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        PlaybackConfig {
            step_interval: Duration::from_millis(1000),
            car_delay: Duration::from_millis(2000),
            print_debug: false,
        }
    }
}

/// Per-car playback state machine. `Infeasible` is reached without ever entering `Stepping`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CarPhase {
    NotStarted,
    Stepping,
    Finished,
    Infeasible,
}

/// Fleet-level state. `Done` is terminal: the controller ignores all timers afterwards until it
/// is started again explicitly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FleetPhase {
    Idle,
    Running,
    Done,
}

/// PlaybackController animates the fleet one car after another. It owns the clock (scheduler),
/// the state of the active car and the writers of the rendered graph and the narration.
#[derive(Debug)]
pub struct PlaybackController<S, R, N> {
    dataset: RaceDataset,
    config: PlaybackConfig,
    palette: Palette,
    scheduler: S,
    renderer: R,
    narration: N,
    fleet_phase: FleetPhase,
    fleet_idx: usize,
    car_phase: CarPhase,
    state: Option<PlaybackState>,
    no_pit_stops: usize,
    result: PlaybackResult,
}

impl<S: Scheduler, R: GraphRenderer, N: NarrationSink> PlaybackController<S, R, N> {
    pub fn new(
        dataset: RaceDataset,
        config: PlaybackConfig,
        palette: Palette,
        scheduler: S,
        renderer: R,
        narration: N,
    ) -> PlaybackController<S, R, N> {
        PlaybackController {
            dataset,
            config,
            palette,
            scheduler,
            renderer,
            narration,
            fleet_phase: FleetPhase::Idle,
            fleet_idx: 0,
            car_phase: CarPhase::NotStarted,
            state: None,
            no_pit_stops: 0,
            result: PlaybackResult::default(),
        }
    }

    // ---------------------------------------------------------------------------------------------
    // ENTRY POINTS --------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// start (re)starts the playback with the first car. Any running playback is stopped first,
    /// so repeated calls never leave more than one tick armed.
    pub fn start(&mut self) -> anyhow::Result<()> {
        self.stop();

        self.fleet_idx = 0;
        self.result = PlaybackResult::default();
        self.narration.clear()?;
        self.fleet_phase = FleetPhase::Running;

        self.animate_next_car()
    }

    /// stop cancels all pending timers and discards the state of the active car.
    pub fn stop(&mut self) {
        self.scheduler.cancel_timer(TimerId::StepTick);
        self.scheduler.cancel_timer(TimerId::NextCar);
        self.state = None;
        self.car_phase = CarPhase::NotStarted;
        self.fleet_phase = FleetPhase::Idle;
    }

    /// on_timer dispatches a fired timer. Timers arriving outside of a running playback are
    /// ignored.
    pub fn on_timer(&mut self, id: TimerId) -> anyhow::Result<()> {
        if self.fleet_phase != FleetPhase::Running {
            if self.config.print_debug {
                println!("DEBUG: Ignoring timer {:?} while playback is {:?}", id, self.fleet_phase);
            }
            return Ok(());
        }

        match id {
            TimerId::StepTick => self.tick(),
            TimerId::NextCar => self.animate_next_car(),
        }
    }

    // ---------------------------------------------------------------------------------------------
    // TRANSITIONS ---------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// animate_next_car starts the car at the current fleet position or finishes the playback if
    /// the fleet is exhausted.
    fn animate_next_car(&mut self) -> anyhow::Result<()> {
        if self.fleet_idx >= self.dataset.fleet().len() {
            return self.finish_fleet();
        }

        let car = self.dataset.fleet()[self.fleet_idx].to_owned();
        self.car_phase = CarPhase::NotStarted;
        self.narrate(NarrationLine::CarHeader {
            car_no: car.car_no,
            fuel_capacity: car.fuel_capacity,
            tyre_cost: car.tyre_cost,
        })?;

        let path = match self.dataset.path_result(self.fleet_idx) {
            Some(path) => path.to_owned(),
            None => return self.mark_infeasible(&car),
        };

        self.start_stepping(&car, &path)
    }

    fn mark_infeasible(&mut self, car: &Car) -> anyhow::Result<()> {
        if self.config.print_debug {
            println!("DEBUG: Car {} has no feasible strategy", car.car_no);
        }
        self.narrate(NarrationLine::Infeasible { car_no: car.car_no })?;
        self.car_phase = CarPhase::Infeasible;
        self.result.outcomes.push(CarOutcome {
            car_no: car.car_no,
            kind: OutcomeKind::Infeasible,
        });

        self.move_to_next_car();
        Ok(())
    }

    fn start_stepping(&mut self, car: &Car, path: &PathResult) -> anyhow::Result<()> {
        self.narrate(NarrationLine::Summary {
            total_time: path.total_time,
            pit_stop_nodes: path.pit_stop_nodes(),
        })?;

        self.reset_node_visuals()?;

        let start_node = match path.start_node() {
            Some(node) => node,
            // empty paths are rejected when the dataset is built
            None => anyhow::bail!("Path of car {} is empty!", car.car_no),
        };
        self.state = Some(PlaybackState::new(car, start_node));
        self.no_pit_stops = 0;
        self.car_phase = CarPhase::Stepping;

        // there must never be two cars ticking at the same time
        self.scheduler.cancel_timer(TimerId::StepTick);
        self.scheduler
            .set_interval(TimerId::StepTick, self.config.step_interval);

        if self.config.print_debug {
            println!(
                "DEBUG: Car {} starts at node {} with {} steps",
                car.car_no,
                start_node,
                path.node_sequence.len()
            );
        }
        Ok(())
    }

    /// tick moves the active car to the next node of its sequence or finishes the car if the
    /// sequence is exhausted.
    fn tick(&mut self) -> anyhow::Result<()> {
        let mut state = match (self.car_phase, self.state) {
            (CarPhase::Stepping, Some(state)) => state,
            _ => {
                // stale tick of a car that is not stepping anymore
                self.scheduler.cancel_timer(TimerId::StepTick);
                return Ok(());
            }
        };
        let car = &self.dataset.fleet()[self.fleet_idx];
        let car_no = car.car_no;
        let path = match self.dataset.path_result(self.fleet_idx) {
            Some(path) => path,
            None => anyhow::bail!("Car {} is stepping without a path!", car_no),
        };

        let step = state.step;
        if step >= path.node_sequence.len() {
            let no_steps = path.node_sequence.len();
            let last_node = path.node_sequence.last().copied();
            return self.finish_car(car_no, no_steps, last_node);
        }

        let target_node = path.node_sequence[step];
        let prev_node = step.checked_sub(1).map(|prev_step| path.node_sequence[prev_step]);

        if prev_node.is_some() {
            state = advance(&state, self.dataset.graph(), target_node);
        }

        let pit_stop = is_pit_stop(self.dataset.graph(), &path.pit_stops, target_node);
        if pit_stop {
            state = apply_pit_stop(&state, car);
            self.no_pit_stops += 1;
            self.narrate(NarrationLine::PitStop { node: target_node })?;
        }

        self.renderer.set_node_visual(
            target_node,
            self.palette.car_color(self.fleet_idx),
            ACTIVE_BORDER_WIDTH,
        )?;
        if let Some(prev_node) = prev_node {
            // a repeated node stays highlighted
            if prev_node != target_node {
                self.restore_node_visual(prev_node)?;
            }
        }

        self.narrate(NarrationLine::Move {
            node: target_node,
            fuel: state.fuel,
            tyre_distance: state.tyre_distance,
        })?;
        self.result.samples.push(ResourceSample {
            car_no,
            step,
            node: target_node,
            fuel: state.fuel,
            tyre_distance: state.tyre_distance,
            pit_stop,
        });

        state.step += 1;
        self.state = Some(state);
        Ok(())
    }

    fn finish_car(
        &mut self,
        car_no: u32,
        no_steps: usize,
        last_node: Option<usize>,
    ) -> anyhow::Result<()> {
        self.scheduler.cancel_timer(TimerId::StepTick);

        if let Some(last_node) = last_node {
            self.restore_node_visual(last_node)?;
        }

        self.car_phase = CarPhase::Finished;
        self.state = None;
        self.result.outcomes.push(CarOutcome {
            car_no,
            kind: OutcomeKind::Played {
                no_steps,
                no_pit_stops: self.no_pit_stops,
            },
        });

        if self.config.print_debug {
            println!("DEBUG: Car {} finished its path", car_no);
        }
        self.move_to_next_car();
        Ok(())
    }

    fn move_to_next_car(&mut self) {
        self.fleet_idx += 1;
        self.scheduler
            .set_timer(TimerId::NextCar, self.config.car_delay);
    }

    fn finish_fleet(&mut self) -> anyhow::Result<()> {
        self.scheduler.cancel_timer(TimerId::StepTick);
        self.scheduler.cancel_timer(TimerId::NextCar);
        self.state = None;
        self.fleet_phase = FleetPhase::Done;
        self.narrate(NarrationLine::AllCarsVisualized)
    }

    // ---------------------------------------------------------------------------------------------
    // HELPERS -------------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    fn narrate(&mut self, line: NarrationLine) -> anyhow::Result<()> {
        self.narration.append(&line)?;
        self.result.transcript.push(line);
        Ok(())
    }

    fn restore_node_visual(&mut self, node: usize) -> anyhow::Result<()> {
        let color = self.palette.default_color(self.dataset.graph(), node);
        self.renderer
            .set_node_visual(node, color, DEFAULT_BORDER_WIDTH)
    }

    fn reset_node_visuals(&mut self) -> anyhow::Result<()> {
        for node in 0..self.dataset.graph().node_count {
            self.restore_node_visual(node)?;
        }
        Ok(())
    }

    // ---------------------------------------------------------------------------------------------
    // GETTERS -------------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    pub fn is_done(&self) -> bool {
        self.fleet_phase == FleetPhase::Done
    }

    pub fn fleet_phase(&self) -> FleetPhase {
        self.fleet_phase
    }

    pub fn car_phase(&self) -> CarPhase {
        self.car_phase
    }

    pub fn playback_state(&self) -> Option<&PlaybackState> {
        self.state.as_ref()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn narration(&self) -> &N {
        &self.narration
    }

    pub fn result(&self) -> &PlaybackResult {
        &self.result
    }

    pub fn into_result(self) -> PlaybackResult {
        self.result
    }
}
