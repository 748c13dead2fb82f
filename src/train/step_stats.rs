use serde::{Deserialize, Serialize};

/// Progress report emitted by `train_loop`.
///
/// When a `progress_tx` channel is configured in `TrainConfig`, the loop
/// sends one `StepStats` every `report_every` steps and once more after the
/// final step. Receivers print or chart them; the demos write them out as
/// JSON lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepStats {
    /// 1-based step number.
    pub step: usize,
    /// Total steps requested for this run.
    pub total_steps: usize,
    /// Cost over the training set after this step's update.
    pub cost: f64,
    /// Wall-clock time since the loop started, in milliseconds.
    pub elapsed_ms: u64,
}
