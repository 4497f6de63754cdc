use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Single-slot debounce. At most one job waits at any time; scheduling a new
/// job aborts the waiting one. A job that already fired is not affected.
pub struct Debouncer<T> {
    delay: Duration,
    runtime: Handle,
    slot: Arc<Mutex<Option<(u64, T)>>>,
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration, runtime: Handle) -> Self {
        Self {
            delay,
            runtime,
            slot: Arc::new(Mutex::new(None)),
            generation: 0,
            timer: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `run(job)` once `delay` passes without another call to `schedule`.
    pub fn schedule<F, Fut>(&mut self, job: T, run: F)
    where
        F: FnOnce(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();

        self.generation += 1;
        let generation = self.generation;
        *lock(&self.slot) = Some((generation, job));

        let slot = Arc::clone(&self.slot);
        let delay = self.delay;
        self.timer = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let job = {
                let mut slot = lock(&slot);
                match slot.take() {
                    Some((g, job)) if g == generation => Some(job),
                    other => {
                        *slot = other;
                        None
                    }
                }
            };
            if let Some(job) = job {
                // Detached so a later abort of this timer cannot cut the job short.
                tokio::spawn(run(job));
            }
        }));
    }

    /// Cancel the waiting job and hand it back instead of running it.
    pub fn take_pending(&mut self) -> Option<T> {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        lock(&self.slot).take().map(|(_, job)| job)
    }

    pub fn cancel(&mut self) {
        let _ = self.take_pending();
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.slot).is_some()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

fn lock<T>(slot: &Mutex<T>) -> MutexGuard<'_, T> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use std::pin::Pin;

    use super::*;

    type Job = Pin<Box<dyn Future<Output = ()> + Send>>;

    fn recorder() -> (
        Arc<Mutex<Vec<&'static str>>>,
        impl Fn(&'static str) -> Job + Clone + Send + 'static,
    ) {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&fired);
        let run = move |job: &'static str| -> Job {
            let sink = Arc::clone(&sink);
            Box::pin(async move {
                sink.lock().unwrap().push(job);
            })
        };
        (fired, run)
    }

    #[tokio::test(start_paused = true)]
    async fn only_last_job_fires() {
        let (fired, run) = recorder();
        let mut debouncer = Debouncer::new(Duration::from_secs(1), Handle::current());

        debouncer.schedule("a", run.clone());
        tokio::time::sleep(Duration::from_millis(900)).await;
        debouncer.schedule("ab", run.clone());
        tokio::time::sleep(Duration::from_millis(900)).await;
        debouncer.schedule("abc", run.clone());
        assert!(fired.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(*fired.lock().unwrap(), vec!["abc"]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn take_pending_prevents_firing() {
        let (fired, run) = recorder();
        let mut debouncer = Debouncer::new(Duration::from_secs(1), Handle::current());

        debouncer.schedule("draft", run);
        assert_eq!(debouncer.take_pending(), Some("draft"));
        assert_eq!(debouncer.take_pending(), None);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(fired.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_aborts_waiting_job() {
        let (fired, run) = recorder();
        let mut debouncer = Debouncer::new(Duration::from_secs(1), Handle::current());
        debouncer.schedule("lost", run);
        drop(debouncer);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(fired.lock().unwrap().is_empty());
    }
}
