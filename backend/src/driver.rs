use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use wheel_shared::animation::Frame;
use wheel_shared::error::SpinError;
use wheel_shared::shared_wheel_game::{SpinOutcome, WheelGame};
use wheel_shared::triggers::{StreamEvent, TriggerSettings};
use wheel_shared::wheel_config::WheelConfig;

#[derive(Debug, Clone)]
struct QueuedSpin {
    reason: String,
}

/// Plays the presentation layer around a [`WheelGame`]: turns stream events into queued
/// spins, starts them one at a time, and books results into the [`WheelConfig`].
pub struct SpinDriver {
    wheel: WheelGame,
    config: WheelConfig,
    triggers: TriggerSettings,
    rng: StdRng,
    queue: VecDeque<QueuedSpin>,
    active: Option<u64>,
    spin_gap_ms: f64,
    next_start_ms: f64,
    settled_tx: mpsc::UnboundedSender<SpinOutcome>,
    settled_rx: mpsc::UnboundedReceiver<SpinOutcome>,
}

impl SpinDriver {
    pub fn new(
        config: WheelConfig,
        triggers: TriggerSettings,
        spin_gap_ms: f64,
        rng: StdRng,
    ) -> Self {
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        Self {
            wheel: WheelGame::new(config.animation_config),
            config,
            triggers,
            rng,
            queue: VecDeque::new(),
            active: None,
            spin_gap_ms: spin_gap_ms.max(0.0),
            next_start_ms: 0.0,
            settled_tx,
            settled_rx,
        }
    }

    pub fn with_entropy(
        config: WheelConfig,
        triggers: TriggerSettings,
        spin_gap_ms: f64,
    ) -> Self {
        Self::new(config, triggers, spin_gap_ms, StdRng::from_entropy())
    }

    pub fn config(&self) -> &WheelConfig {
        &self.config
    }

    pub fn wheel(&self) -> &WheelGame {
        &self.wheel
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Nothing spinning and nothing waiting.
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.active.is_none()
    }

    /// Queues the spins `event` earns and returns how many that was.
    pub fn handle_event(&mut self, event: &StreamEvent) -> u32 {
        let spins = self.triggers.spins_for(event);
        if spins == 0 {
            debug!("Ignoring {} from {}", event.kind(), event.user());
            return 0;
        }
        info!("{} from {} queues {} spin(s)", event.kind(), event.user(), spins);
        for _ in 0..spins {
            self.queue.push_back(QueuedSpin {
                reason: format!("{} from {}", event.kind(), event.user()),
            });
        }
        spins
    }

    /// Queues a spin that no stream event asked for, e.g. a button press.
    pub fn request_manual_spin(&mut self) {
        self.queue.push_back(QueuedSpin {
            reason: "manual".to_string(),
        });
    }

    /// One render-loop step at `now_ms`: start the next queued spin if the wheel is free,
    /// move the wheel, and book anything that settled.
    pub fn tick(&mut self, now_ms: f64) -> Option<Frame> {
        if self.active.is_none() && now_ms >= self.next_start_ms {
            self.start_next(now_ms);
        }

        let frame = match self.active {
            Some(generation) => self.wheel.advance_for(generation, now_ms),
            None => None,
        };
        if frame.map_or(false, |f| f.done) {
            self.active = None;
        }

        self.drain_settled(now_ms);
        frame
    }

    fn start_next(&mut self, now_ms: f64) {
        while let Some(spin) = self.queue.pop_front() {
            let available = self.config.available_options();
            let on_settled = settle_sender(self.settled_tx.clone());
            let result = self.wheel.request_spin(&available, &mut self.rng, now_ms, on_settled);

            match result {
                Ok(index) => {
                    self.active = Some(self.wheel.generation());
                    debug!("Spin for {} heading to {}", spin.reason, available[index].text);
                    return;
                }
                Err(SpinError::NoOptionsAvailable) => {
                    warn!("Dropping spin for {}: no options available", spin.reason);
                }
                Err(SpinError::AlreadySpinning) => {
                    self.queue.push_front(spin);
                    return;
                }
            }
        }
    }

    fn drain_settled(&mut self, now_ms: f64) {
        while let Ok(outcome) = self.settled_rx.try_recv() {
            let timestamp_ms = chrono::Utc::now().timestamp_millis().max(0) as u64;
            self.config.record_spin(outcome.text(), timestamp_ms);
            info!(
                "Wheel landed on {} (spin #{}, {} queued)",
                outcome.text(),
                self.config.statistics.total_spins,
                self.queue.len()
            );

            if self.config.is_tournament_complete() {
                info!("Tournament complete, restoring all {} options", self.config.options.len());
                self.config.reset_tournament();
            }
            self.next_start_ms = now_ms + self.spin_gap_ms;
        }
    }
}

fn settle_sender(tx: mpsc::UnboundedSender<SpinOutcome>) -> impl FnOnce(SpinOutcome) {
    move |outcome| {
        if let Err(mpsc::error::SendError(lost)) = tx.send(outcome) {
            warn!("Settle channel closed, dropping result {}", lost.text());
        }
    }
}
