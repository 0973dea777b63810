// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Keytip-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Keytip and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Bounded polling for effects that show up late.
//!
//! Activating a block usually makes the host open an editor a moment later. A [`RetryTask`]
//! probes for it a fixed number of times with a fixed delay in between, then gives up. Hosts
//! with their own event loop call [`RetryTask::step`] once per tick; async hosts can await
//! [`RetryTask::run`]. Either way the task can be cancelled through a [`CancelHandle`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

use crate::logging::targets;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 200,
            delay: Duration::from_millis(15),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryStep<T> {
    Pending,
    Found(T),
    Exhausted,
    Cancelled,
}

#[derive(Debug, Default)]
struct CancelState {
    cancelled: AtomicBool,
    notify: Notify,
}

#[derive(Debug, Clone)]
pub struct CancelHandle {
    state: Arc<CancelState>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::SeqCst);
        self.state.notify.notify_one();
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct RetryTask {
    what: &'static str,
    policy: RetryPolicy,
    attempts: u32,
    state: Arc<CancelState>,
}

impl RetryTask {
    /// `what` names the awaited effect in log output.
    pub fn new(what: &'static str, policy: RetryPolicy) -> Self {
        Self {
            what,
            policy,
            attempts: 0,
            state: Arc::new(CancelState::default()),
        }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            state: Arc::clone(&self.state),
        }
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Probes once unless the task is cancelled or out of attempts.
    pub fn step<T>(&mut self, probe: impl FnOnce() -> Option<T>) -> RetryStep<T> {
        if self.state.cancelled.load(Ordering::SeqCst) {
            return RetryStep::Cancelled;
        }
        if self.attempts >= self.policy.max_attempts {
            return RetryStep::Exhausted;
        }

        self.attempts += 1;
        if let Some(value) = probe() {
            return RetryStep::Found(value);
        }
        if self.attempts >= self.policy.max_attempts {
            tracing::warn!(
                target: targets::RETRY,
                what = self.what,
                attempts = self.attempts,
                "giving up"
            );
            return RetryStep::Exhausted;
        }
        RetryStep::Pending
    }

    /// Steps until the probe succeeds, attempts run out, or the task is cancelled.
    ///
    /// Never returns [`RetryStep::Pending`].
    pub async fn run<T>(&mut self, mut probe: impl FnMut() -> Option<T>) -> RetryStep<T> {
        loop {
            match self.step(&mut probe) {
                RetryStep::Pending => {}
                done => return done,
            }
            tokio::select! {
                _ = tokio::time::sleep(self.policy.delay) => {}
                _ = self.state.notify.notified() => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::time::Duration;

    use super::{RetryPolicy, RetryStep, RetryTask};

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            delay: Duration::from_millis(15),
        }
    }

    #[test]
    fn step_reports_pending_until_found() {
        let mut task = RetryTask::new("editor", policy(5));
        assert_eq!(task.step(|| None::<u8>), RetryStep::Pending);
        assert_eq!(task.step(|| None::<u8>), RetryStep::Pending);
        assert_eq!(task.step(|| Some(7u8)), RetryStep::Found(7));
        assert_eq!(task.attempts(), 3);
    }

    #[test]
    fn step_stops_probing_after_ceiling() {
        let mut task = RetryTask::new("editor", policy(2));
        let probes = Cell::new(0);
        let probe = || {
            probes.set(probes.get() + 1);
            None::<()>
        };
        assert_eq!(task.step(probe), RetryStep::Pending);
        assert_eq!(task.step(probe), RetryStep::Exhausted);
        assert_eq!(task.step(probe), RetryStep::Exhausted);
        assert_eq!(probes.get(), 2);
    }

    #[test]
    fn cancelled_task_does_not_probe() {
        let mut task = RetryTask::new("editor", policy(5));
        task.cancel_handle().cancel();
        assert_eq!(task.step(|| -> Option<()> { panic!("probed") }), RetryStep::Cancelled);
        assert_eq!(task.attempts(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn run_waits_between_attempts() {
        let mut task = RetryTask::new("editor", policy(10));
        let start = tokio::time::Instant::now();
        let mut remaining = 3;
        let result = task
            .run(|| {
                remaining -= 1;
                (remaining == 0).then_some("ready")
            })
            .await;

        assert_eq!(result, RetryStep::Found("ready"));
        assert_eq!(task.attempts(), 3);
        assert_eq!(start.elapsed(), Duration::from_millis(30));
    }

    #[tokio::test(start_paused = true)]
    async fn run_gives_up_at_ceiling() {
        let mut task = RetryTask::new("editor", RetryPolicy::default());
        let result = task.run(|| None::<()>).await;
        assert_eq!(result, RetryStep::Exhausted);
        assert_eq!(task.attempts(), 200);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_interrupts_run() {
        let mut task = RetryTask::new("editor", policy(100));
        let handle = task.cancel_handle();
        let (result, ()) = tokio::join!(task.run(|| None::<()>), async {
            tokio::time::sleep(Duration::from_millis(40)).await;
            handle.cancel();
        });

        assert_eq!(result, RetryStep::Cancelled);
        assert!(handle.is_cancelled());
        assert!(task.attempts() >= 3 && task.attempts() <= 4, "attempts = {}", task.attempts());
    }
}
