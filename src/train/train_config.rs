use std::sync::mpsc;
use std::sync::{atomic::AtomicBool, Arc};

use crate::gradient::GradientMethod;
use crate::train::step_stats::StepStats;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `steps`         — number of full-batch gradient-descent steps
/// - `learning_rate` — scale applied to every gradient
/// - `method`        — how gradients are computed each step
/// - `report_every`  — cost is evaluated and reported every this many steps
///                     (and after the last one); `0` reports only at the end
/// - `progress_tx`   — optional channel sender for `StepStats`. If the
///                     receiver is dropped the loop stops early.
/// - `stop_flag`     — optional atomic flag; when set from another thread
///                     the loop stops at the next step boundary.
pub struct TrainConfig {
    pub steps: usize,
    pub learning_rate: f64,
    pub method: GradientMethod,
    pub report_every: usize,
    pub progress_tx: Option<mpsc::Sender<StepStats>>,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl TrainConfig {
    /// Backprop, reporting only at the end, no channel and no stop flag.
    pub fn new(steps: usize, learning_rate: f64) -> Self {
        TrainConfig {
            steps,
            learning_rate,
            method: GradientMethod::default(),
            report_every: 0,
            progress_tx: None,
            stop_flag: None,
        }
    }

    pub fn with_method(mut self, method: GradientMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_report_every(mut self, report_every: usize) -> Self {
        self.report_every = report_every;
        self
    }

    pub fn with_progress(mut self, tx: mpsc::Sender<StepStats>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn with_stop_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = Some(flag);
        self
    }
}
