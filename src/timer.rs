//! Cancelable timers owned by the components that arm them.
//!
//! A [`TimerHandle`] cancels its task when dropped, so replacing or clearing
//! the `Option<TimerHandle>` a component keeps is enough to release it.

use std::time::Duration;

use tokio::select;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep};
use tokio_util::sync::CancellationToken;

#[derive(Debug)]
pub struct TimerHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Send `make()` to `tx` every `period`, starting one period from now.
    ///
    /// Ticks never overlap: the next period starts after the previous tick
    /// was accepted by the receiver.
    pub fn interval<T, F>(period: Duration, tx: Sender<T>, mut make: F) -> Self
    where
        T: Send + 'static,
        F: FnMut() -> T + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        select! {
                            biased;
                            _ = token.cancelled() => break,
                            sent = tx.send(make()) => {
                                if sent.is_err() {
                                    break;
                                }
                            }
                        }
                    }
                }
            }
        });
        Self { cancel, task }
    }

    /// Send `message` to `tx` once after `delay`.
    pub fn once<T>(delay: Duration, tx: Sender<T>, message: T) -> Self
    where
        T: Send + 'static,
    {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let task = tokio::spawn(async move {
            select! {
                biased;
                _ = token.cancelled() => {}
                _ = sleep(delay) => {
                    select! {
                        biased;
                        _ = token.cancelled() => {}
                        _ = tx.send(message) => {}
                    }
                }
            }
        });
        Self { cancel, task }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn interval_ticks_once_per_period() {
        let (tx, mut rx) = mpsc::channel::<u32>(8);
        let mut n = 0;
        let handle = TimerHandle::interval(Duration::from_millis(100), tx, move || {
            n += 1;
            n
        });

        sleep(Duration::from_millis(350)).await;
        let mut seen = Vec::new();
        while let Ok(v) = rx.try_recv() {
            seen.push(v);
        }
        assert_eq!(seen, vec![1, 2, 3]);

        drop(handle);
        sleep(Duration::from_millis(1000)).await;
        assert!(rx.try_recv().is_err(), "no ticks after the handle is dropped");
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_timeout_never_fires() {
        let (tx, mut rx) = mpsc::channel::<&'static str>(1);
        let handle = TimerHandle::once(Duration::from_millis(50), tx, "fired");
        drop(handle);
        sleep(Duration::from_millis(200)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_fires_after_delay() {
        let (tx, mut rx) = mpsc::channel::<&'static str>(1);
        let handle = TimerHandle::once(Duration::from_millis(50), tx, "fired");
        sleep(Duration::from_millis(49)).await;
        assert!(rx.try_recv().is_err());
        sleep(Duration::from_millis(2)).await;
        assert_eq!(rx.try_recv().ok(), Some("fired"));
        tokio::task::yield_now().await;
        assert!(handle.is_finished());
    }
}
