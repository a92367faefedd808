use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, RwLock,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use super::sim_error::SimError;
use super::TICK_FREQUENCY_MILLIS;

const MAX_INTERVAL_MILLIS: u64 = 10000;

/// Host scheduler for the simulation: calls a callback once per interval on a
/// dedicated thread, until the callback asks to stop or [`Timer::stop`] is called.
///
/// Each callback invocation is one controller tick, so the interactive thread is
/// never blocked for a whole run.
pub struct Timer {
    pub interval: RwLock<Duration>,
    pub running: AtomicBool,
}

impl Timer {
    pub fn new(interval_millis: u64) -> Result<Arc<Self>, SimError> {
        validate_interval(interval_millis)?;
        Ok(Arc::new(Self {
            interval: RwLock::new(Duration::from_millis(interval_millis)),
            running: AtomicBool::new(false),
        }))
    }

    /// Changes the time between ticks. Takes effect on the next tick.
    pub fn set_interval(&self, interval_millis: u64) -> Result<(), SimError> {
        validate_interval(interval_millis)?;
        let mut interval = self
            .interval
            .write()
            .map_err(|_| SimError::LockError("Failed to lock the tick interval".to_string()))?;
        *interval = Duration::from_millis(interval_millis);
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        self.interval
            .read()
            .map(|interval| *interval)
            .unwrap_or(Duration::from_millis(TICK_FREQUENCY_MILLIS))
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Starts ticking. The callback receives the tick number (starting at 1)
    /// and returns `false` to end the run.
    pub fn start(
        self: Arc<Self>,
        mut tick_callback: impl FnMut(usize) -> bool + Send + 'static,
    ) -> Result<JoinHandle<()>, SimError> {
        self.running.store(true, Ordering::SeqCst);

        thread::Builder::new()
            .name("sim-timer".to_string())
            .spawn(move || {
                let mut tick_count = 0;
                while self.is_running() {
                    let now = Instant::now();
                    tick_count += 1;

                    if !tick_callback(tick_count) {
                        self.stop();
                        break;
                    }

                    let sleep_duration = self.interval().saturating_sub(now.elapsed());
                    thread::sleep(sleep_duration);
                }
            })
            .map_err(|e| SimError::TimerStartError(e.to_string()))
    }
}

fn validate_interval(interval_millis: u64) -> Result<(), SimError> {
    if interval_millis == 0 || interval_millis > MAX_INTERVAL_MILLIS {
        return Err(SimError::InvalidInterval(interval_millis.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_callback_stops_the_timer() {
        let timer = Timer::new(1).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_in_thread = Arc::clone(&seen);

        let handle = Arc::clone(&timer)
            .start(move |tick| {
                seen_in_thread.lock().unwrap().push(tick);
                tick < 3
            })
            .unwrap();
        handle.join().unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_stop_ends_the_thread() {
        let timer = Timer::new(5).unwrap();
        let handle = Arc::clone(&timer).start(|_| true).unwrap();
        timer.stop();
        handle.join().unwrap();
        assert!(!timer.is_running());
    }

    #[test]
    fn test_interval_bounds() {
        assert!(matches!(Timer::new(0), Err(SimError::InvalidInterval(_))));
        let timer = Timer::new(100).unwrap();
        assert!(timer.set_interval(20000).is_err());
        timer.set_interval(250).unwrap();
        assert_eq!(timer.interval(), Duration::from_millis(250));
    }
}
