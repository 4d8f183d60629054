//! Delta-v budget for one finite burn.

use serde::Serialize;

/// Immutable burn budget derived once from the planner's idealized maneuver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BurnPlan {
    pub total_delta_v_km_s: f64,
    pub target_radius_km: f64,
    /// Burn duration in simulation time units.
    pub burn_duration_sim: f64,
    /// Effective number of steps the budget is spread over, never below one.
    pub step_count: f64,
    pub per_step_impulse_km_s: f64,
}

impl BurnPlan {
    /// Spread `total_delta_v_km_s` over `max(burn_duration_sim / step_sim, 1)` steps.
    ///
    /// A non-finite or non-positive total yields a degenerate plan with zero per-step impulse.
    pub fn new(
        total_delta_v_km_s: f64,
        target_radius_km: f64,
        burn_duration_sim: f64,
        step_sim: f64,
    ) -> Self {
        let step_count = effective_step_count(burn_duration_sim, step_sim);
        let total = if total_delta_v_km_s.is_finite() && total_delta_v_km_s > 0.0 {
            total_delta_v_km_s
        } else {
            0.0
        };
        Self {
            total_delta_v_km_s: total,
            target_radius_km,
            burn_duration_sim,
            step_count,
            per_step_impulse_km_s: total / step_count,
        }
    }

    /// Plan with nothing to spend.
    pub fn degenerate(target_radius_km: f64, burn_duration_sim: f64, step_sim: f64) -> Self {
        Self::new(0.0, target_radius_km, burn_duration_sim, step_sim)
    }

    pub fn is_degenerate(&self) -> bool {
        self.per_step_impulse_km_s <= 0.0
    }
}

fn effective_step_count(burn_duration_sim: f64, step_sim: f64) -> f64 {
    let steps = burn_duration_sim / step_sim;
    if steps.is_finite() && steps > 1.0 {
        steps
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn spreads_budget_over_steps() {
        let plan = BurnPlan::new(500.0, 10_000.0, 600.0, 0.1);
        assert_relative_eq!(plan.step_count, 6_000.0, epsilon = 1e-9);
        assert_relative_eq!(plan.per_step_impulse_km_s, 500.0 / 6_000.0, epsilon = 1e-12);
        assert!(!plan.is_degenerate());
    }

    #[test]
    fn collapsed_duration_spends_everything_in_one_step() {
        let plan = BurnPlan::new(0.5, 10_000.0, 1.0e-6, 0.1);
        assert_eq!(plan.step_count, 1.0);
        assert_eq!(plan.per_step_impulse_km_s, 0.5);

        let zero_step = BurnPlan::new(0.5, 10_000.0, 600.0, 0.0);
        assert_eq!(zero_step.step_count, 1.0);
        assert!(zero_step.per_step_impulse_km_s.is_finite());
    }

    #[test]
    fn negative_or_nan_budget_is_degenerate() {
        for dv in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            let plan = BurnPlan::new(dv, 10_000.0, 600.0, 0.1);
            assert!(plan.is_degenerate(), "dv = {dv}");
            assert_eq!(plan.per_step_impulse_km_s, 0.0);
        }
    }
}
