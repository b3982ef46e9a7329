//! Experience and leveling
//!
//! Converts accumulated XP into levels, per-level thresholds and
//! progress-bar statistics. Everything here is pure: the engine holds an
//! immutable curve plus a cumulative threshold table computed once at
//! construction.
//!
//! Level costs are rounded half away from zero (`f64::round`), once, on the
//! final `base_xp * multiplier^(level - 1)` product. Cumulative totals are
//! sums of those already-rounded costs.

use serde::{Deserialize, Serialize};

use super::curve::LevelCurve;
use super::error::{CurveError, LevelError};

/// Upper bound on the threshold table length.
/// A curve must push the cumulative total past `i64::MAX` within this many levels.
pub const MAX_CURVE_LEVELS: u32 = 10_000;

/// 2^64, the first float that no longer fits in a u64
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

/// Largest XP total callers can pass in
const MAX_INPUT_XP: u64 = i64::MAX as u64;

/// Where a total XP value sits inside its current level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelProgress {
    /// XP earned since entering the level
    pub current: u64,
    /// XP needed to clear the level
    pub required: u64,
    /// `current / required` as a percentage, clamped to [0, 100]
    pub percentage: f64,
}

/// Maps between accumulated XP and levels for one fixed curve
#[derive(Debug, Clone)]
pub struct LevelingEngine {
    curve: LevelCurve,
    /// `totals[i]` is the XP needed to stand at the start of level `i + 1`.
    /// The table runs until a total exceeds `i64::MAX`, so every valid XP
    /// input lands inside it.
    totals: Vec<u64>,
}

impl Default for LevelingEngine {
    fn default() -> Self {
        Self::new(LevelCurve::default()).expect("default curve is valid")
    }
}

impl LevelingEngine {
    /// Build an engine, rejecting curves that would not give strictly
    /// increasing level costs, could not cover every XP total, or would
    /// need a cost or threshold past 64 bits for a reachable level.
    pub fn new(curve: LevelCurve) -> Result<Self, CurveError> {
        curve.validate()?;

        let mut totals = vec![0u64];
        let mut prev_cost = 0u64;
        loop {
            let total = totals[totals.len() - 1];
            if total > MAX_INPUT_XP {
                break;
            }
            let level = totals.len() as u32;
            if level > MAX_CURVE_LEVELS {
                return Err(CurveError::TooShallow { max_levels: MAX_CURVE_LEVELS });
            }
            // Level `level` is reachable, so its cost and the next threshold must be representable
            let cost = rounded_cost(&curve, level).ok_or(CurveError::CostOverflow { level })?;
            if cost <= prev_cost {
                return Err(CurveError::NotStrictlyIncreasing { level, cost });
            }
            let next = total.checked_add(cost).ok_or(CurveError::CostOverflow { level })?;
            totals.push(next);
            prev_cost = cost;
        }

        Ok(Self { curve, totals })
    }

    pub fn curve(&self) -> &LevelCurve {
        &self.curve
    }

    /// Highest level with a precomputed threshold
    pub fn max_table_level(&self) -> u32 {
        self.totals.len() as u32
    }

    /// XP needed to clear `level` and advance to the next one
    pub fn xp_required_for_level(&self, level: u32) -> Result<u64, LevelError> {
        check_level(level)?;
        rounded_cost(&self.curve, level).ok_or_else(|| {
            LevelError::invalid(format!("XP cost of level {level} does not fit in 64 bits"))
        })
    }

    /// Cumulative XP needed to stand at the start of `target_level`.
    /// Level 1 starts at 0.
    pub fn total_xp_for_level(&self, target_level: u32) -> Result<u64, LevelError> {
        check_level(target_level)?;

        let idx = (target_level - 1) as usize;
        if let Some(&total) = self.totals.get(idx) {
            return Ok(total);
        }

        // Past the table: keep summing rounded costs until we get there or overflow
        let mut total = self.totals[self.totals.len() - 1];
        for level in self.max_table_level()..target_level {
            let cost = self.xp_required_for_level(level)?;
            total = total.checked_add(cost).ok_or_else(|| {
                LevelError::invalid(format!(
                    "cumulative XP for level {target_level} does not fit in 64 bits"
                ))
            })?;
        }
        Ok(total)
    }

    /// Level implied by a total XP value
    pub fn level_from_xp(&self, total_xp: i64) -> Result<u32, LevelError> {
        let xp = check_xp(total_xp)?;
        // totals[0] == 0 so at least one entry always matches
        Ok(self.totals.partition_point(|&t| t <= xp) as u32)
    }

    /// Linear-scan version of [`Self::level_from_xp`]: walk up from level 1
    /// until the next threshold is out of reach.
    pub fn level_from_xp_scan(&self, total_xp: i64) -> Result<u32, LevelError> {
        let xp = check_xp(total_xp)?;
        let mut level = 1u32;
        loop {
            match self.total_xp_for_level(level + 1) {
                Ok(next) if xp >= next => level += 1,
                // An unrepresentable threshold is above any valid input
                _ => return Ok(level),
            }
        }
    }

    /// Progress within `level` for a total XP value.
    ///
    /// The caller's `level` is trusted rather than recomputed, so a cached
    /// level can be passed straight through. If it is out of sync with
    /// `total_xp`, `current` clamps at 0 and `percentage` at [0, 100].
    pub fn level_progress(&self, total_xp: i64, level: u32) -> Result<LevelProgress, LevelError> {
        let xp = check_xp(total_xp)?;
        let level_start = self.total_xp_for_level(level)?;
        let required = self.xp_required_for_level(level)?;

        let current = xp.saturating_sub(level_start);
        let percentage = (current as f64 / required as f64 * 100.0).clamp(0.0, 100.0);

        Ok(LevelProgress { current, required, percentage })
    }

    /// Number of level boundaries crossed going from `old_xp` to `new_xp`
    pub fn levels_gained(&self, old_xp: i64, new_xp: i64) -> Result<u32, LevelError> {
        let old_level = self.level_from_xp(old_xp)?;
        let new_level = self.level_from_xp(new_xp)?;
        Ok(new_level.saturating_sub(old_level))
    }
}

/// Convert a float XP value (JSON numbers, sliders) into an XP input
pub fn xp_from_f64(value: f64) -> Result<i64, LevelError> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(LevelError::invalid(format!("XP must be a whole number, got {value}")));
    }
    if value < 0.0 {
        return Err(LevelError::invalid(format!("XP must not be negative, got {value}")));
    }
    if value >= MAX_INPUT_XP as f64 {
        return Err(LevelError::invalid(format!("XP {value} is out of range")));
    }
    Ok(value as i64)
}

/// Convert a float level value into a level input
pub fn level_from_f64(value: f64) -> Result<u32, LevelError> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(LevelError::invalid(format!("level must be a whole number, got {value}")));
    }
    if value < 1.0 || value > f64::from(u32::MAX) {
        return Err(LevelError::invalid(format!("level {value} is out of range")));
    }
    Ok(value as u32)
}

fn rounded_cost(curve: &LevelCurve, level: u32) -> Option<u64> {
    let cost = curve.raw_cost(level).round();
    if cost.is_finite() && cost < U64_LIMIT {
        Some(cost as u64)
    } else {
        None
    }
}

fn check_level(level: u32) -> Result<(), LevelError> {
    if level < 1 {
        return Err(LevelError::invalid("level must be at least 1, got 0"));
    }
    Ok(())
}

fn check_xp(total_xp: i64) -> Result<u64, LevelError> {
    u64::try_from(total_xp)
        .map_err(|_| LevelError::invalid(format!("XP must not be negative, got {total_xp}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> LevelingEngine {
        LevelingEngine::default()
    }

    #[test]
    fn test_xp_required_for_level() {
        let e = engine();
        assert_eq!(e.xp_required_for_level(1), Ok(300));
        assert_eq!(e.xp_required_for_level(2), Ok(450));
        assert_eq!(e.xp_required_for_level(3), Ok(675));
        // 1012.5 rounds away from zero
        assert_eq!(e.xp_required_for_level(4), Ok(1013));
    }

    #[test]
    fn test_total_xp_for_level() {
        let e = engine();
        assert_eq!(e.total_xp_for_level(1), Ok(0));
        assert_eq!(e.total_xp_for_level(2), Ok(300));
        assert_eq!(e.total_xp_for_level(3), Ok(750));
        assert_eq!(e.total_xp_for_level(4), Ok(1425));
        assert_eq!(e.total_xp_for_level(5), Ok(2438));
    }

    #[test]
    fn test_costs_round_the_exact_product() {
        let e = engine();
        // 300 * 1.5^75 is exactly representable as a double
        assert_eq!(e.xp_required_for_level(76), Ok(4_830_206_342_941_418));
        let before = e.total_xp_for_level(76).unwrap();
        assert_eq!(e.total_xp_for_level(77), Ok(before + 4_830_206_342_941_418));
    }

    #[test]
    fn test_level_from_xp() {
        let e = engine();
        assert_eq!(e.level_from_xp(0), Ok(1));
        assert_eq!(e.level_from_xp(299), Ok(1));
        assert_eq!(e.level_from_xp(300), Ok(2));
        assert_eq!(e.level_from_xp(749), Ok(2));
        assert_eq!(e.level_from_xp(750), Ok(3));
        assert_eq!(e.level_from_xp(1424), Ok(3));
        assert_eq!(e.level_from_xp(1425), Ok(4));
    }

    #[test]
    fn test_level_progress() {
        let e = engine();
        let p = e.level_progress(1000, 3).unwrap();
        assert_eq!(p.current, 250);
        assert_eq!(p.required, 675);
        assert!((p.percentage - 37.037).abs() < 0.01);

        let start = e.level_progress(0, 1).unwrap();
        assert_eq!(start.current, 0);
        assert_eq!(start.required, 300);
        assert_eq!(start.percentage, 0.0);
    }

    #[test]
    fn test_level_progress_tolerates_stale_level() {
        let e = engine();
        // Level too high for the XP: nothing earned yet
        let p = e.level_progress(100, 5).unwrap();
        assert_eq!(p.current, 0);
        assert_eq!(p.percentage, 0.0);

        // Level too low for the XP: bar is full, not overflowing
        let p = e.level_progress(5000, 1).unwrap();
        assert_eq!(p.current, 5000);
        assert_eq!(p.percentage, 100.0);
    }

    #[test]
    fn test_invalid_arguments() {
        let e = engine();
        assert!(matches!(e.xp_required_for_level(0), Err(LevelError::InvalidArgument(_))));
        assert!(matches!(e.total_xp_for_level(0), Err(LevelError::InvalidArgument(_))));
        assert!(matches!(e.level_from_xp(-1), Err(LevelError::InvalidArgument(_))));
        assert!(matches!(e.level_from_xp_scan(-1), Err(LevelError::InvalidArgument(_))));
        assert!(matches!(e.level_progress(-1, 1), Err(LevelError::InvalidArgument(_))));
        assert!(matches!(e.level_progress(10, 0), Err(LevelError::InvalidArgument(_))));
        assert!(matches!(e.levels_gained(-5, 10), Err(LevelError::InvalidArgument(_))));
    }

    #[test]
    fn test_unrepresentable_levels_are_rejected() {
        let e = engine();
        assert!(e.xp_required_for_level(u32::MAX).is_err());
        assert!(e.total_xp_for_level(u32::MAX).is_err());
        assert!(e.level_progress(0, 1_000).is_err());
    }

    #[test]
    fn test_float_inputs() {
        assert_eq!(xp_from_f64(1000.0), Ok(1000));
        assert_eq!(xp_from_f64(0.0), Ok(0));
        assert!(xp_from_f64(10.5).is_err());
        assert!(xp_from_f64(-1.0).is_err());
        assert!(xp_from_f64(f64::NAN).is_err());
        assert!(xp_from_f64(f64::INFINITY).is_err());
        assert!(xp_from_f64(1e30).is_err());

        assert_eq!(level_from_f64(3.0), Ok(3));
        assert!(level_from_f64(0.0).is_err());
        assert!(level_from_f64(2.5).is_err());
        assert!(level_from_f64(-2.0).is_err());
        assert!(level_from_f64(f64::NAN).is_err());
    }

    #[test]
    fn test_costs_strictly_increase() {
        let e = engine();
        let mut prev = 0;
        for level in 1..=e.max_table_level() {
            let cost = e.xp_required_for_level(level).unwrap();
            assert!(cost > 0);
            assert!(cost > prev, "level {level}: {cost} <= {prev}");
            prev = cost;
        }
    }

    #[test]
    fn test_table_matches_iterative_sum() {
        let e = engine();
        let mut sum = 0u64;
        for level in 1..=e.max_table_level() {
            assert_eq!(e.total_xp_for_level(level), Ok(sum), "level {level}");
            sum += e.xp_required_for_level(level).unwrap();
        }
    }

    #[test]
    fn test_consecutive_totals() {
        let e = engine();
        for level in 1..e.max_table_level() {
            let here = e.total_xp_for_level(level).unwrap();
            let next = e.total_xp_for_level(level + 1).unwrap();
            assert_eq!(next, here + e.xp_required_for_level(level).unwrap());
            assert!(next > here);
        }
    }

    #[test]
    fn test_table_covers_every_input() {
        let e = engine();
        let top = e.level_from_xp(i64::MAX).unwrap();
        assert!(top <= e.max_table_level());
        assert!(e.total_xp_for_level(top).unwrap() <= i64::MAX as u64);
        if let Ok(next) = e.total_xp_for_level(top + 1) {
            assert!(next > i64::MAX as u64);
        }
    }

    #[test]
    fn test_level_bounds_hold_at_thresholds() {
        let e = engine();
        for level in 1..=e.max_table_level() {
            let threshold = e.total_xp_for_level(level).unwrap();
            for xp in [threshold.saturating_sub(1), threshold, threshold + 1] {
                let Ok(xp) = i64::try_from(xp) else { continue };
                let found = e.level_from_xp(xp).unwrap();
                assert!(e.total_xp_for_level(found).unwrap() <= xp as u64);
                if let Ok(next) = e.total_xp_for_level(found + 1) {
                    assert!((xp as u64) < next);
                }
                assert_eq!(e.level_from_xp_scan(xp), Ok(found), "xp {xp}");
            }
        }
    }

    #[test]
    fn test_scan_matches_search_for_small_totals() {
        let e = engine();
        for xp in (0..50_000).step_by(7) {
            assert_eq!(e.level_from_xp(xp), e.level_from_xp_scan(xp), "xp {xp}");
        }
    }

    #[test]
    fn test_percentage_always_in_range() {
        let e = engine();
        for xp in [0, 1, 299, 300, 1000, 123_456, 9_999_999] {
            for level in 1..40 {
                let p = e.level_progress(xp, level).unwrap();
                assert!((0.0..=100.0).contains(&p.percentage), "xp {xp} level {level}");
            }
        }
    }

    #[test]
    fn test_levels_gained() {
        let e = engine();
        assert_eq!(e.levels_gained(0, 299), Ok(0));
        assert_eq!(e.levels_gained(299, 300), Ok(1));
        assert_eq!(e.levels_gained(0, 1425), Ok(3));
        assert_eq!(e.levels_gained(1425, 0), Ok(0));
    }

    #[test]
    fn test_alternative_curve() {
        let e = LevelingEngine::new(LevelCurve::new(100.0, 2.0)).unwrap();
        assert_eq!(e.xp_required_for_level(1), Ok(100));
        assert_eq!(e.xp_required_for_level(3), Ok(400));
        assert_eq!(e.total_xp_for_level(4), Ok(700));
        assert_eq!(e.level_from_xp(699), Ok(3));
        assert_eq!(e.level_from_xp(700), Ok(4));
    }

    #[test]
    fn test_misconfigured_curves_rejected() {
        assert_eq!(
            LevelingEngine::new(LevelCurve::new(300.0, 1.0)).unwrap_err(),
            CurveError::MultiplierTooSmall(1.0)
        );
        assert!(matches!(
            LevelingEngine::new(LevelCurve::new(1.0, 1.0001)),
            Err(CurveError::NotStrictlyIncreasing { level: 2, cost: 1 })
        ));
        assert_eq!(
            LevelingEngine::new(LevelCurve::new(1e7, 1.000001)).unwrap_err(),
            CurveError::TooShallow { max_levels: MAX_CURVE_LEVELS }
        );
    }

    #[test]
    fn test_curves_past_64_bits_rejected() {
        // Level 1 itself would cost more than a u64 holds
        assert_eq!(
            LevelingEngine::new(LevelCurve::new(2e19, 1.5)).unwrap_err(),
            CurveError::CostOverflow { level: 1 }
        );
        // Steep enough that a reachable level's cost no longer fits
        assert!(matches!(
            LevelingEngine::new(LevelCurve::new(300.0, 10.0)),
            Err(CurveError::CostOverflow { .. })
        ));
    }

    #[test]
    fn test_every_table_level_has_a_progress_bar() {
        for curve in [LevelCurve::default(), LevelCurve::new(100.0, 2.0), LevelCurve::new(10.0, 1.1)] {
            let e = LevelingEngine::new(curve).unwrap();
            let top = e.level_from_xp(i64::MAX).unwrap();
            for level in 1..=top {
                assert!(e.level_progress(0, level).is_ok(), "{curve:?} level {level}");
            }
        }
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LevelingEngine>();
    }
}
