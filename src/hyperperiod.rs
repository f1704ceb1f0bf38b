//! Hyperperiod calculation.
//!
//! Periods are scaled to integer ticks, folded with
//! `lcm(a, b) = a / gcd(a, b) * b`, and scaled back. With the default scale
//! of 1000 ticks per unit, periods carrying more than three fractional digits
//! are rounded first and the result is no longer the exact hyperperiod.
//!
//! # Reference
//! Liu (2000), "Real-Time Systems", Ch. 3.3 (Hyperperiod)

use crate::config::SimulationConfig;
use crate::error::{SimError, TaskField};
use crate::models::Ticks;

/// Greatest common divisor (Euclid).
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Least common multiple, `None` on overflow.
pub fn lcm(a: u64, b: u64) -> Option<u64> {
    if a == 0 || b == 0 {
        return Some(0);
    }
    (a / gcd(a, b)).checked_mul(b)
}

/// LCM of tick periods.
pub fn hyperperiod_ticks(periods: &[Ticks]) -> Result<Ticks, SimError> {
    let (&first, rest) = periods.split_first().ok_or(SimError::EmptyTaskSet)?;
    rest.iter().try_fold(first, |acc, &p| {
        lcm(acc, p).ok_or(SimError::HyperperiodOverflow)
    })
}

/// Hyperperiod of decimal periods at the default time scale.
///
/// # Example
/// ```
/// use rm_sim::hyperperiod::hyperperiod;
///
/// assert_eq!(hyperperiod(&[2.0, 3.0]).unwrap(), 6.0);
/// assert_eq!(hyperperiod(&[1.5, 2.5]).unwrap(), 7.5);
/// ```
pub fn hyperperiod(periods: &[f64]) -> Result<f64, SimError> {
    hyperperiod_with(periods, &SimulationConfig::new())
}

/// Hyperperiod of decimal periods at the given config's time scale.
pub fn hyperperiod_with(periods: &[f64], config: &SimulationConfig) -> Result<f64, SimError> {
    config.check()?;
    let ticks = periods
        .iter()
        .enumerate()
        .map(|(task_num, &value)| {
            config.to_ticks(value).ok_or(SimError::InvalidParameter {
                task_num,
                field: TaskField::Period,
                value,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(config.to_units(hyperperiod_ticks(&ticks)?))
}
