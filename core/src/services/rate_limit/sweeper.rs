//! Periodic idle eviction for scoped limiter registries
//!
//! The sweeper is a tokio task owned through a [`SweeperHandle`]: it starts
//! when the handle is created and stops when the handle is shut down or
//! dropped, so no eviction loop outlives the gate that started it.

use std::sync::Arc;
use std::time::Duration;

use sentinel_shared::ConfigError;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::registry::ScopedLimiterRegistry;

/// Spawns the eviction loop for a set of registries
pub struct IdleSweeper;

impl IdleSweeper {
    /// Start sweeping every registry in `registries` every `interval`,
    /// evicting entries idle for longer than `idle_timeout`. The first sweep
    /// runs one interval after start.
    ///
    /// Fails when `interval` is zero or too large to schedule.
    pub fn start(
        registries: Vec<Arc<ScopedLimiterRegistry>>,
        interval: Duration,
        idle_timeout: Duration,
    ) -> Result<SweeperHandle, ConfigError> {
        if interval.is_zero() {
            return Err(ConfigError::InvalidDuration {
                field: "sweep_interval".to_string(),
            });
        }
        let first_tick = time::Instant::now()
            .checked_add(interval)
            .ok_or_else(|| ConfigError::InvalidValue {
                name: "sweep_interval".to_string(),
                value: format!("{}s", interval.as_secs()),
            })?;

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            info!(
                "Idle sweeper started - will run every {} seconds",
                interval.as_secs()
            );

            let mut ticker = time::interval_at(first_tick, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        for registry in &registries {
                            sweep_once(registry, idle_timeout);
                        }
                    }
                    _ = &mut shutdown_rx => break,
                }
            }

            info!("Idle sweeper stopped");
        });

        Ok(SweeperHandle {
            shutdown: Some(shutdown_tx),
            task: Some(task),
        })
    }
}

fn sweep_once(registry: &ScopedLimiterRegistry, idle_timeout: Duration) {
    let evicted = registry.evict_idle(idle_timeout);
    if evicted > 0 {
        info!(tier = registry.tier(), evicted, remaining = registry.len(), "Evicted idle rate limiters");
    } else {
        debug!(tier = registry.tier(), remaining = registry.len(), "Idle sweep found nothing to evict");
    }
}

/// Handle controlling a running sweeper
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl SweeperHandle {
    /// Signals the sweeper to stop and waits for it to exit
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Idle sweeper task ended abnormally: {}", e);
            }
        }
    }

    /// Whether the sweeper task has exited
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
