//! Aggregate progress across concurrent transfers.

use std::sync::{Mutex, PoisonError};

use tokio::sync::watch;

/// Folds per-file progress into one percentage.
///
/// `percent = round(100 * (terminal + sum(in-flight fractions)) / total)`,
/// held at 99 until every file is terminal and never allowed to decrease.
/// Each change is published on the watch channel given at construction.
#[derive(Debug)]
pub struct ProgressAggregator {
    state: Mutex<State>,
    tx: watch::Sender<u8>,
}

#[derive(Debug)]
struct State {
    fractions: Vec<f64>,
    terminal: Vec<bool>,
    last: u8,
}

impl State {
    fn percent(&self) -> u8 {
        let total = self.fractions.len();
        if total == 0 {
            return 100;
        }
        let done = self.terminal.iter().filter(|t| **t).count();
        let in_flight: f64 = self
            .fractions
            .iter()
            .zip(&self.terminal)
            .filter(|(_, terminal)| !**terminal)
            .map(|(fraction, _)| *fraction)
            .sum();

        let raw = (100.0 * (done as f64 + in_flight) / total as f64).round() as u8;
        if done < total { raw.min(99) } else { 100 }
    }
}

impl ProgressAggregator {
    /// Track `total` transfers, publishing on `tx`.
    pub fn new(total: usize, tx: watch::Sender<u8>) -> Self {
        let aggregator = Self {
            state: Mutex::new(State {
                fractions: vec![0.0; total],
                terminal: vec![false; total],
                last: 0,
            }),
            tx,
        };
        aggregator.publish();
        aggregator
    }

    /// Record the fractional progress of transfer `index`.
    ///
    /// Out-of-range indices and reports for terminal transfers are ignored;
    /// a fraction lower than the one already seen is ignored too.
    pub fn report(&self, index: usize, fraction: f64) {
        {
            let mut state = self.lock();
            if index >= state.fractions.len() || state.terminal[index] {
                return;
            }
            let fraction = if fraction.is_finite() {
                fraction.clamp(0.0, 1.0)
            } else {
                0.0
            };
            if fraction <= state.fractions[index] {
                return;
            }
            state.fractions[index] = fraction;
        }
        self.publish();
    }

    /// Mark transfer `index` terminal (succeeded or failed).
    pub fn complete(&self, index: usize) {
        {
            let mut state = self.lock();
            if index >= state.terminal.len() {
                return;
            }
            state.terminal[index] = true;
            state.fractions[index] = 1.0;
        }
        self.publish();
    }

    /// Current aggregate percentage.
    pub fn percent(&self) -> u8 {
        self.lock().last
    }

    /// Whether every transfer is terminal.
    pub fn is_finished(&self) -> bool {
        self.lock().terminal.iter().all(|t| *t)
    }

    fn publish(&self) {
        let value = {
            let mut state = self.lock();
            let value = state.percent().max(state.last);
            state.last = value;
            value
        };
        self.tx.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
