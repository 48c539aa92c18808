#![forbid(unsafe_code)]

//! Background tick sources for hosts that run on real time.
//!
//! A [`Subscription`] runs on its own thread and sends messages through a
//! channel. The [`SubscriptionManager`] starts and stops subscriptions to
//! match whatever set the host declares after each update, so playback
//! state decides which tickers exist.
//!
//! # How it works
//!
//! 1. After every update the host declares its active subscriptions
//! 2. The manager compares them by [`SubId`] with what is running
//! 3. New subscriptions are started, removed ones are stopped
//! 4. Messages are drained and routed back through the host's update
//!
//! Tick messages are tagged with the [`crate::TickEpoch`] that armed them,
//! so a tick that was already in the channel when its ticker was stopped is
//! recognised as stale by the controller.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError, mpsc};
use std::thread;
use std::time::Duration;

/// A unique identifier for a subscription.
pub type SubId = u64;

/// A subscription produces messages from an external event source.
///
/// Implementations loop, sending messages until the stop signal fires or the
/// receiver is dropped.
pub trait Subscription<M: Send + 'static>: Send {
    /// Subscriptions with the same ID are considered identical.
    fn id(&self) -> SubId;

    /// Run on a background thread until stopped.
    fn run(&self, sender: mpsc::Sender<M>, stop: StopSignal);
}

/// Signal for stopping a subscription.
#[derive(Clone)]
pub struct StopSignal {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopSignal {
    /// Create a new stop signal pair (signal, trigger).
    pub(crate) fn new() -> (Self, StopTrigger) {
        let inner = Arc::new((Mutex::new(false), Condvar::new()));
        let signal = Self {
            inner: Arc::clone(&inner),
        };
        (signal, StopTrigger { inner })
    }

    /// Wait for either the stop signal or a timeout.
    ///
    /// Returns `true` if stopped, `false` if timed out.
    pub fn wait_timeout(&self, duration: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let stopped = lock.lock().unwrap_or_else(PoisonError::into_inner);
        if *stopped {
            return true;
        }
        let (stopped, _) = cvar
            .wait_timeout_while(stopped, duration, |stopped| !*stopped)
            .unwrap_or_else(PoisonError::into_inner);
        *stopped
    }
}

/// Trigger to stop a subscription from the runtime side.
pub(crate) struct StopTrigger {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl StopTrigger {
    pub(crate) fn stop(&self) {
        let (lock, cvar) = &*self.inner;
        let mut stopped = lock.lock().unwrap_or_else(PoisonError::into_inner);
        *stopped = true;
        cvar.notify_all();
    }
}

struct RunningSubscription {
    id: SubId,
    trigger: StopTrigger,
    thread: Option<thread::JoinHandle<()>>,
}

impl RunningSubscription {
    /// Stop the subscription and join its thread.
    fn stop(mut self) {
        self.trigger.stop();
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for RunningSubscription {
    fn drop(&mut self) {
        self.trigger.stop();
    }
}

/// Owns the running subscriptions and the channel they feed.
pub struct SubscriptionManager<M: Send + 'static> {
    active: Vec<RunningSubscription>,
    sender: mpsc::Sender<M>,
    receiver: mpsc::Receiver<M>,
}

impl<M: Send + 'static> Default for SubscriptionManager<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Send + 'static> SubscriptionManager<M> {
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            active: Vec::new(),
            sender,
            receiver,
        }
    }

    /// Ids of the subscriptions currently running.
    pub fn active_ids(&self) -> Vec<SubId> {
        self.active.iter().map(|running| running.id).collect()
    }

    /// Start what is new, stop what is gone, leave the rest running.
    pub fn reconcile(&mut self, subscriptions: Vec<Box<dyn Subscription<M>>>) {
        let wanted: HashSet<SubId> = subscriptions.iter().map(|s| s.id()).collect();

        let mut remaining = Vec::with_capacity(self.active.len());
        for running in self.active.drain(..) {
            if wanted.contains(&running.id) {
                remaining.push(running);
            } else {
                tracing::debug!(sub_id = running.id, "stopping subscription");
                running.stop();
            }
        }
        self.active = remaining;

        let mut active_ids: HashSet<SubId> = self.active.iter().map(|r| r.id).collect();
        for sub in subscriptions {
            let id = sub.id();
            if !active_ids.insert(id) {
                continue;
            }

            tracing::debug!(sub_id = id, "starting subscription");
            let (signal, trigger) = StopSignal::new();
            let sender = self.sender.clone();
            let thread = thread::Builder::new()
                .name(format!("mviz-sub-{id}"))
                .spawn(move || sub.run(sender, signal));
            match thread {
                Ok(handle) => self.active.push(RunningSubscription {
                    id,
                    trigger,
                    thread: Some(handle),
                }),
                Err(err) => {
                    tracing::warn!(sub_id = id, error = %err, "failed to spawn subscription thread");
                }
            }
        }
    }

    /// Drain pending messages without blocking.
    pub fn drain_messages(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }

    /// Block for up to `timeout` waiting for one message.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<M> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Stop all running subscriptions.
    pub fn stop_all(&mut self) {
        for running in self.active.drain(..) {
            tracing::debug!(sub_id = running.id, "stopping subscription");
            running.stop();
        }
    }
}

impl<M: Send + 'static> Drop for SubscriptionManager<M> {
    fn drop(&mut self) {
        self.stop_all();
    }
}

// --- Built-in subscriptions ---

/// An interval that a running ticker re-reads before every wait.
///
/// Updating it does not disturb the wait already in progress.
#[derive(Debug, Clone)]
pub struct SharedInterval(Arc<AtomicU64>);

impl SharedInterval {
    pub fn new(interval: Duration) -> Self {
        Self(Arc::new(AtomicU64::new(duration_nanos(interval))))
    }

    pub fn get(&self) -> Duration {
        Duration::from_nanos(self.0.load(Ordering::Acquire))
    }

    pub fn set(&self, interval: Duration) {
        self.0.store(duration_nanos(interval), Ordering::Release);
    }
}

fn duration_nanos(interval: Duration) -> u64 {
    u64::try_from(interval.as_nanos()).unwrap_or(u64::MAX).max(1)
}

/// A subscription that fires at a host-adjustable interval.
///
/// # Example
///
/// ```ignore
/// let epoch = controller.play().unwrap();
/// let sub = Every::with_shared(epoch.get(), interval.clone(), move || Msg::Tick(epoch));
/// ```
pub struct Every<M: Send + 'static> {
    id: SubId,
    interval: SharedInterval,
    make_msg: Box<dyn Fn() -> M + Send + Sync>,
}

impl<M: Send + 'static> Every<M> {
    /// Ticker with an explicit id, reading `interval` before every wait.
    pub fn with_shared(
        id: SubId,
        interval: SharedInterval,
        make_msg: impl Fn() -> M + Send + Sync + 'static,
    ) -> Self {
        Self {
            id,
            interval,
            make_msg: Box::new(make_msg),
        }
    }
}

impl<M: Send + 'static> Subscription<M> for Every<M> {
    fn id(&self) -> SubId {
        self.id
    }

    fn run(&self, sender: mpsc::Sender<M>, stop: StopSignal) {
        loop {
            if stop.wait_timeout(self.interval.get()) {
                break;
            }
            if sender.send((self.make_msg)()).is_err() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum TestMsg {
        Tick,
        Value(i32),
    }

    fn every(id: SubId, millis: u64, msg: TestMsg) -> Box<dyn Subscription<TestMsg>> {
        Box::new(Every::with_shared(
            id,
            SharedInterval::new(Duration::from_millis(millis)),
            move || msg,
        ))
    }

    #[test]
    fn stop_signal_wait_returns_true_when_stopped() {
        let (signal, trigger) = StopSignal::new();
        trigger.stop();
        assert!(signal.wait_timeout(Duration::from_millis(100)));
    }

    #[test]
    fn stop_signal_wait_returns_false_on_timeout() {
        let (signal, _trigger) = StopSignal::new();
        assert!(!signal.wait_timeout(Duration::from_millis(10)));
    }

    #[test]
    fn stop_wakes_a_long_wait() {
        let (signal, trigger) = StopSignal::new();
        let handle = thread::spawn(move || signal.wait_timeout(Duration::from_secs(30)));
        thread::sleep(Duration::from_millis(10));
        trigger.stop();
        assert!(handle.join().unwrap());
    }

    #[test]
    fn every_fires_until_stopped() {
        let sub = every(1, 10, TestMsg::Tick);
        let (tx, rx) = mpsc::channel();
        let (signal, trigger) = StopSignal::new();
        let handle = thread::spawn(move || sub.run(tx, signal));

        thread::sleep(Duration::from_millis(50));
        trigger.stop();
        handle.join().unwrap();

        let msgs: Vec<_> = rx.try_iter().collect();
        assert!(!msgs.is_empty(), "should have received at least one tick");
        assert!(msgs.iter().all(|m| *m == TestMsg::Tick));
    }

    #[test]
    fn every_picks_up_interval_changes() {
        let interval = SharedInterval::new(Duration::from_secs(30));
        let sub = Every::with_shared(3, interval.clone(), || TestMsg::Tick);
        let (tx, rx) = mpsc::channel();
        let (signal, trigger) = StopSignal::new();
        let handle = thread::spawn(move || sub.run(tx, signal));

        // The 30s wait in progress keeps its deadline.
        interval.set(Duration::from_millis(1));
        thread::sleep(Duration::from_millis(30));
        assert!(rx.try_recv().is_err());

        trigger.stop();
        handle.join().unwrap();
    }

    #[test]
    fn shared_interval_is_seen_by_clones() {
        let interval = SharedInterval::new(Duration::from_millis(600));
        let other = interval.clone();
        interval.set(Duration::from_millis(300));
        assert_eq!(other.get(), Duration::from_millis(300));
        interval.set(Duration::ZERO);
        assert_eq!(other.get(), Duration::from_nanos(1));
    }

    #[test]
    fn manager_starts_subscriptions() {
        let mut mgr = SubscriptionManager::<TestMsg>::new();
        mgr.reconcile(vec![every(1, 5, TestMsg::Value(42))]);
        assert_eq!(mgr.active_ids(), vec![1]);
        assert_eq!(
            mgr.recv_timeout(Duration::from_secs(1)),
            Some(TestMsg::Value(42))
        );
    }

    #[test]
    fn manager_dedupes_duplicate_ids() {
        let mut mgr = SubscriptionManager::<TestMsg>::new();
        mgr.reconcile(vec![
            every(7, 5, TestMsg::Value(1)),
            every(7, 5, TestMsg::Value(2)),
        ]);
        assert_eq!(mgr.active_ids(), vec![7]);
        thread::sleep(Duration::from_millis(30));
        let msgs = mgr.drain_messages();
        assert!(!msgs.is_empty());
        assert!(msgs.iter().all(|m| *m == TestMsg::Value(1)), "{msgs:?}");
    }

    #[test]
    fn manager_stops_removed() {
        let mut mgr = SubscriptionManager::<TestMsg>::new();
        mgr.reconcile(vec![every(99, 5, TestMsg::Tick)]);
        thread::sleep(Duration::from_millis(20));
        assert!(!mgr.drain_messages().is_empty());

        // reconcile joins the ticker thread, so nothing arrives afterwards.
        mgr.reconcile(vec![]);
        let _ = mgr.drain_messages();
        thread::sleep(Duration::from_millis(30));
        assert!(mgr.drain_messages().is_empty());
        assert!(mgr.active_ids().is_empty());
    }

    #[test]
    fn manager_keeps_unchanged() {
        let mut mgr = SubscriptionManager::<TestMsg>::new();
        mgr.reconcile(vec![every(50, 10, TestMsg::Tick)]);
        thread::sleep(Duration::from_millis(30));
        let _ = mgr.drain_messages();

        mgr.reconcile(vec![every(50, 10, TestMsg::Tick)]);
        thread::sleep(Duration::from_millis(30));
        assert!(!mgr.drain_messages().is_empty(), "subscription should still be running");
    }

    #[test]
    fn manager_stop_all() {
        let mut mgr = SubscriptionManager::<TestMsg>::new();
        mgr.reconcile(vec![
            every(1, 5, TestMsg::Value(1)),
            every(2, 5, TestMsg::Value(2)),
        ]);
        thread::sleep(Duration::from_millis(20));
        mgr.stop_all();
        let _ = mgr.drain_messages();
        thread::sleep(Duration::from_millis(30));
        assert!(mgr.drain_messages().is_empty());
        assert!(mgr.active_ids().is_empty());
    }
}
