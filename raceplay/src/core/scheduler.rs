use std::collections::HashMap;
use std::time::Duration;

/// Timers used by the playback.
/// * `StepTick` - Repeating tick that moves the active car by one node
/// * `NextCar` - One-shot delay between two cars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerId {
    StepTick,
    NextCar,
}

/// Scheduler abstracts the clock driving the playback. There is at most one armed timer per id,
/// arming an id again replaces the pending timer.
pub trait Scheduler {
    /// Fire `id` once after `delay`.
    fn set_timer(&mut self, id: TimerId, delay: Duration);
    /// Fire `id` every `period` until it is cancelled.
    fn set_interval(&mut self, id: TimerId, period: Duration);
    fn cancel_timer(&mut self, id: TimerId);
    fn is_armed(&self, id: TimerId) -> bool;
}

#[derive(Debug, Clone, Copy)]
struct TimerEntry {
    due: Duration,
    sequence: u64,
    period: Option<Duration>,
}

/// TimerQueue is a deterministic scheduler working on virtual time. Timers are fired in the order
/// of their due time, timers due at the same time in the order they were armed. The caller
/// decides whether to wait in real time between two timers.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    sequence: u64,
    timers: HashMap<TimerId, TimerEntry>,
}

impl TimerQueue {
    pub fn new() -> TimerQueue {
        Default::default()
    }

    /// now returns the virtual time of the last fired timer.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn armed_count(&self) -> usize {
        self.timers.len()
    }

    /// peek_next returns the next timer to fire without firing it.
    pub fn peek_next(&self) -> Option<(Duration, TimerId)> {
        self.timers
            .iter()
            .min_by_key(|(_, entry)| (entry.due, entry.sequence))
            .map(|(&id, entry)| (entry.due, id))
    }

    /// pop_next fires the next timer: the virtual time jumps to its due time, a repeating timer is
    /// re-armed for its next period, a one-shot timer is removed.
    pub fn pop_next(&mut self) -> Option<(Duration, TimerId)> {
        let (due, id) = self.peek_next()?;
        self.now = due;

        let period = self.timers.get(&id).and_then(|entry| entry.period);
        match period {
            Some(period) => {
                let sequence = self.next_sequence();
                self.timers.insert(
                    id,
                    TimerEntry {
                        due: due + period,
                        sequence,
                        period: Some(period),
                    },
                );
            }
            None => {
                self.timers.remove(&id);
            }
        }

        Some((due, id))
    }

    fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }

    fn arm(&mut self, id: TimerId, delay: Duration, period: Option<Duration>) {
        let sequence = self.next_sequence();
        self.timers.insert(
            id,
            TimerEntry {
                due: self.now + delay,
                sequence,
                period,
            },
        );
    }
}

impl Scheduler for TimerQueue {
    fn set_timer(&mut self, id: TimerId, delay: Duration) {
        self.arm(id, delay, None);
    }

    fn set_interval(&mut self, id: TimerId, period: Duration) {
        // a zero period would never let virtual time advance
        let period = period.max(Duration::from_millis(1));
        self.arm(id, period, Some(period));
    }

    fn cancel_timer(&mut self, id: TimerId) {
        self.timers.remove(&id);
    }

    fn is_armed(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_fires_once() {
        let mut queue = TimerQueue::new();
        queue.set_timer(TimerId::NextCar, Duration::from_millis(2000));
        assert_eq!(
            queue.pop_next(),
            Some((Duration::from_millis(2000), TimerId::NextCar))
        );
        assert_eq!(queue.pop_next(), None);
        assert_eq!(queue.now(), Duration::from_millis(2000));
    }

    #[test]
    fn interval_repeats_until_cancelled() {
        let mut queue = TimerQueue::new();
        queue.set_interval(TimerId::StepTick, Duration::from_millis(1000));
        let fired: Vec<Duration> = (0..3).filter_map(|_| queue.pop_next()).map(|(t, _)| t).collect();
        assert_eq!(
            fired,
            vec![
                Duration::from_millis(1000),
                Duration::from_millis(2000),
                Duration::from_millis(3000)
            ]
        );
        queue.cancel_timer(TimerId::StepTick);
        assert!(!queue.is_armed(TimerId::StepTick));
        assert_eq!(queue.pop_next(), None);
    }

    #[test]
    fn rearming_replaces_pending_timer() {
        let mut queue = TimerQueue::new();
        queue.set_interval(TimerId::StepTick, Duration::from_millis(1000));
        queue.set_interval(TimerId::StepTick, Duration::from_millis(500));
        assert_eq!(queue.armed_count(), 1);
        assert_eq!(
            queue.pop_next(),
            Some((Duration::from_millis(500), TimerId::StepTick))
        );
    }

    #[test]
    fn equal_due_times_fire_in_arming_order() {
        let mut queue = TimerQueue::new();
        queue.set_timer(TimerId::NextCar, Duration::from_millis(1000));
        queue.set_interval(TimerId::StepTick, Duration::from_millis(1000));
        assert_eq!(queue.pop_next().map(|(_, id)| id), Some(TimerId::NextCar));
        assert_eq!(queue.pop_next().map(|(_, id)| id), Some(TimerId::StepTick));
    }

    #[test]
    fn delays_are_relative_to_virtual_now() {
        let mut queue = TimerQueue::new();
        queue.set_timer(TimerId::NextCar, Duration::from_millis(300));
        queue.pop_next();
        queue.set_timer(TimerId::NextCar, Duration::from_millis(300));
        assert_eq!(queue.peek_next(), Some((Duration::from_millis(600), TimerId::NextCar)));
    }
}
