use std::sync::atomic::Ordering;
use std::time::Instant;

use crate::error::Result;
use crate::loss::mse::cost;
use crate::math::matrix::MatrixView;
use crate::network::network::Network;
use crate::optim::gd::GradientDescent;
use crate::train::step_stats::StepStats;
use crate::train::train_config::TrainConfig;

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Runs `config.steps` full-batch gradient-descent steps on `net` and
/// returns the cost over the training set once the loop ends.
///
/// # Arguments
/// - `net`     — network being trained; updated in place
/// - `grad`    — accumulator with the same architecture as `net`
/// - `inputs`  — one training sample per row
/// - `targets` — matching targets, one row per sample
/// - `config`  — step count, learning rate, gradient method, reporting
///
/// # Early termination
/// The loop stops at a step boundary if:
/// - the `progress_tx` receiver has been dropped, **or**
/// - `config.stop_flag` is set to `true`.
///
/// There is no convergence check; the caller picks the step count.
pub fn train_loop<'a, 'b>(
    net: &mut Network,
    grad: &mut Network,
    inputs: impl Into<MatrixView<'a>>,
    targets: impl Into<MatrixView<'b>>,
    config: &TrainConfig,
) -> Result<f64> {
    let (inputs, targets) = (inputs.into(), targets.into());
    let optimizer = GradientDescent::new(config.learning_rate);
    let t_start = Instant::now();

    let mut steps_done = 0;
    let mut last_report: Option<(usize, f64)> = None;

    for step in 1..=config.steps {
        if stop_requested(config) {
            break;
        }

        // ── Compute gradients, then update ────────────────────────────────
        config.method.compute(net, grad, inputs, targets)?;
        optimizer.step(net, grad);
        steps_done = step;

        if !report_due(step, config) {
            continue;
        }

        // ── Emit progress ─────────────────────────────────────────────────
        let c = cost(net, inputs, targets)?;
        last_report = Some((step, c));

        if let Some(ref tx) = config.progress_tx {
            let stats = StepStats {
                step,
                total_steps: config.steps,
                cost: c,
                elapsed_ms: t_start.elapsed().as_millis() as u64,
            };
            // If the receiver has been dropped, stop training.
            if tx.send(stats).is_err() {
                break;
            }
        }
    }

    match last_report {
        Some((step, c)) if step == steps_done => Ok(c),
        _ => cost(net, inputs, targets),
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn stop_requested(config: &TrainConfig) -> bool {
    config
        .stop_flag
        .as_ref()
        .is_some_and(|flag| flag.load(Ordering::Relaxed))
}

fn report_due(step: usize, config: &TrainConfig) -> bool {
    step == config.steps || (config.report_every > 0 && step % config.report_every == 0)
}
