// Spike analyzer - per-parameter batch statistics and anomaly classification
use crate::domain::analysis::{DomainThreshold, Severity, SpikeAnalysisResult};

/// Number of standard deviations from the mean that marks a spike.
const SPIKE_SIGMAS: f64 = 2.0;

/// Analyze one parameter's values from a batch.
///
/// Returns `None` when there is nothing to analyze, which callers must read as
/// "insufficient data" rather than as zero. Non-finite values are ignored.
///
/// Statistics:
/// - `average` is the arithmetic mean and `std_dev` the population standard
///   deviation (divides by n).
/// - `median` is `sorted[n / 2]`. On even counts that is the upper of the two
///   middle elements; the two are never averaged.
/// - The spike threshold is `average + 2 * std_dev` and a spike is any value
///   strictly above it. For `lower_is_worse` parameters the threshold mirrors
///   to `average - 2 * std_dev` and a spike is any value strictly below it.
///
/// Severity is `Warning` when at least one spike is beyond the domain warning
/// or critical level, `Info` when spikes exist but none are, and `Normal`
/// when there are no spikes.
pub fn analyze(
    parameter: &str,
    values: &[f64],
    threshold: &DomainThreshold,
) -> Option<SpikeAnalysisResult> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let (average, std_dev) = mean_and_std_dev(&sorted);
    let median = sorted[count / 2];
    let min = sorted[0];
    let max = sorted[count - 1];

    let spike_threshold = if threshold.lower_is_worse {
        average - SPIKE_SIGMAS * std_dev
    } else {
        average + SPIKE_SIGMAS * std_dev
    };

    let mut spike_count = 0;
    let mut max_spike: Option<f64> = None;
    let mut spike_beyond_domain = false;
    let mut concerning_count = 0;
    let mut critical_count = 0;

    for &value in &sorted {
        if threshold.is_warning(value) {
            concerning_count += 1;
        }
        if threshold.is_critical(value) {
            critical_count += 1;
        }
        if !threshold.beyond(value, spike_threshold) {
            continue;
        }
        spike_count += 1;
        spike_beyond_domain |= threshold.is_warning(value);
        max_spike = Some(match max_spike {
            Some(worst) if !threshold.beyond(value, worst) => worst,
            _ => value,
        });
    }

    let severity = match (spike_count, spike_beyond_domain) {
        (0, _) => Severity::Normal,
        (_, true) => Severity::Warning,
        (_, false) => Severity::Info,
    };

    let summary = summarize(count, spike_count, spike_threshold, max_spike, threshold.lower_is_worse);

    Some(SpikeAnalysisResult {
        parameter: parameter.to_string(),
        count,
        average,
        median,
        min,
        max,
        std_dev,
        spike_threshold,
        spike_count,
        max_spike,
        concerning_count,
        critical_count,
        severity,
        summary,
    })
}

/// Mean and population standard deviation of non-empty, finite, sorted values.
///
/// Values are divided by a power of two near the largest magnitude first, so
/// sums stay finite even for inputs close to `f64::MAX`. The scaling is exact.
fn mean_and_std_dev(sorted: &[f64]) -> (f64, f64) {
    let n = sorted.len() as f64;
    let largest = sorted[0].abs().max(sorted[sorted.len() - 1].abs());
    let scale = if largest > 0.0 {
        2f64.powi((largest.log2().floor() as i32).min(f64::MAX_EXP - 1))
    } else {
        1.0
    };

    let mean = sorted.iter().map(|v| v / scale).sum::<f64>() / n;
    let variance = sorted.iter().map(|v| (v / scale - mean).powi(2)).sum::<f64>() / n;
    (mean * scale, variance.sqrt() * scale)
}

fn summarize(
    count: usize,
    spike_count: usize,
    spike_threshold: f64,
    max_spike: Option<f64>,
    lower_is_worse: bool,
) -> String {
    let direction = if lower_is_worse { "below" } else { "above" };
    match max_spike {
        Some(worst) if spike_count > 0 => {
            let noun = if spike_count == 1 { "spike" } else { "spikes" };
            let extreme = if lower_is_worse { "lowest" } else { "highest" };
            format!(
                "{spike_count} {noun} detected {direction} {spike_threshold:.2} across {count} samples; {extreme} spike {worst:.2}"
            )
        }
        _ => format!(
            "No spikes detected {direction} {spike_threshold:.2} across {count} samples"
        ),
    }
}
