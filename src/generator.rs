//! Random harmonic task sets.
//!
//! Periods are `base · 2^k` for a shared base, so every period divides the
//! largest one. Per-task utilizations are drawn with UUniFast and turned into
//! whole-tick execution times, so the exact utilization never exceeds the
//! target.
//!
//! # Reference
//! Bini & Buttazzo (2005), "Measuring the Performance of Schedulability Tests"

use rand::Rng;

use crate::config::DEFAULT_TIME_SCALE;
use crate::models::TaskSpec;

/// Bases the period ladder is built from, in time units.
const PERIOD_BASES: [u64; 3] = [1, 2, 5];

/// Highest power of two applied to the base.
const MAX_PERIOD_DOUBLINGS: u32 = 4;

/// Draws `n` harmonic tasks with implicit deadlines and total utilization at
/// most `target_utilization` (clamped to `(0, 1]`).
///
/// Execution times are multiples of one tick at the default time scale and
/// at least one tick.
pub fn generate_harmonic<R: Rng>(rng: &mut R, n: usize, target_utilization: f64) -> Vec<TaskSpec> {
    if n == 0 {
        return Vec::new();
    }
    let target = target_utilization.clamp(f64::EPSILON, 1.0);
    let scale = DEFAULT_TIME_SCALE;

    let base = PERIOD_BASES[rng.random_range(0..PERIOD_BASES.len())];
    let periods: Vec<u64> = (0..n)
        .map(|_| base * scale * (1 << rng.random_range(0..=MAX_PERIOD_DOUBLINGS)))
        .collect();

    let mut execs: Vec<u64> = uunifast(rng, n, target)
        .into_iter()
        .zip(&periods)
        .map(|(u, &p)| ((u * p as f64).floor() as u64).max(1))
        .collect();

    // Raising tiny shares to one tick can push the sum over the target.
    let hyper = periods.iter().copied().max().unwrap_or(scale);
    let budget = (target * hyper as f64).floor() as u64;
    while demand(&execs, &periods, hyper) > budget {
        let Some(i) = (0..n).filter(|&i| execs[i] > 1).max_by_key(|&i| execs[i]) else {
            break;
        };
        execs[i] -= 1;
    }

    execs
        .iter()
        .zip(&periods)
        .map(|(&c, &p)| TaskSpec::implicit(c as f64 / scale as f64, p as f64 / scale as f64))
        .collect()
}

/// Work demanded over one hyperperiod, in ticks.
fn demand(execs: &[u64], periods: &[u64], hyper: u64) -> u64 {
    execs
        .iter()
        .zip(periods)
        .map(|(&c, &p)| c * (hyper / p))
        .sum()
}

/// Splits `total` into `n` uniformly distributed shares.
fn uunifast<R: Rng>(rng: &mut R, n: usize, total: f64) -> Vec<f64> {
    let mut shares = Vec::with_capacity(n);
    let mut sum = total;
    for i in 1..n {
        let next = sum * rng.random::<f64>().powf(1.0 / (n - i) as f64);
        shares.push(sum - next);
        sum = next;
    }
    shares.push(sum);
    shares
}
