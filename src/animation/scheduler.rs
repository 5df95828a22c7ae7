use std::cell::{Cell, RefCell};
use std::time::Duration;

use super::{FrameControl, FrameScheduler, FrameTick};

/// Scheduler that only advances when told to.
///
/// Headless hosts drive it from their own loop; tests step it frame by
/// frame.
#[derive(Default)]
pub struct ManualFrameScheduler {
    tasks: RefCell<Vec<FrameTick>>,
    scheduled: Cell<usize>,
    last_interval: Cell<Option<Duration>>,
}

impl ManualFrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one frame of every active task and returns how many remain.
    pub fn advance(&self) -> usize {
        let mut running = std::mem::take(&mut *self.tasks.borrow_mut());
        running.retain_mut(|tick| tick() == FrameControl::Continue);

        let mut tasks = self.tasks.borrow_mut();
        running.append(&mut tasks);
        *tasks = running;
        tasks.len()
    }

    /// Advances until no task is active or `max_frames` frames have run.
    pub fn run_until_idle(&self, max_frames: usize) -> usize {
        let mut frames = 0;
        while frames < max_frames && self.active_tasks() > 0 {
            self.advance();
            frames += 1;
        }
        frames
    }

    pub fn active_tasks(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Total number of tasks ever scheduled.
    pub fn scheduled_count(&self) -> usize {
        self.scheduled.get()
    }

    pub fn last_interval(&self) -> Option<Duration> {
        self.last_interval.get()
    }
}

impl FrameScheduler for ManualFrameScheduler {
    fn schedule_frames(&self, interval: Duration, tick: FrameTick) {
        self.scheduled.set(self.scheduled.get() + 1);
        self.last_interval.set(Some(interval));
        self.tasks.borrow_mut().push(tick);
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    #[test]
    fn tasks_run_until_they_break() {
        let scheduler = ManualFrameScheduler::new();
        let ticks = Rc::new(Cell::new(0));
        let counter = ticks.clone();
        scheduler.schedule_frames(
            Duration::from_millis(16),
            Box::new(move || {
                counter.set(counter.get() + 1);
                if counter.get() == 3 {
                    FrameControl::Break
                } else {
                    FrameControl::Continue
                }
            }),
        );

        assert_eq!(scheduler.run_until_idle(10), 3);
        assert_eq!(ticks.get(), 3);
        assert_eq!(scheduler.active_tasks(), 0);
        assert_eq!(scheduler.scheduled_count(), 1);
        assert_eq!(scheduler.last_interval(), Some(Duration::from_millis(16)));
    }

    #[test]
    fn advance_without_tasks_is_harmless() {
        let scheduler = ManualFrameScheduler::new();
        assert_eq!(scheduler.advance(), 0);
        assert_eq!(scheduler.run_until_idle(5), 0);
    }
}
