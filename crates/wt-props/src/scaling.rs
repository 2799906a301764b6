//! Scaling factors for stream-state residuals.

/// Multipliers that bring stream variables to order one before the solver
/// compares them. Water flow in a treatment train is O(1) kg/s while solute
/// flows are O(1e-3) kg/s and pressures are O(1e5) Pa, so unscaled residual
/// norms would be dominated by pressure alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalingFactors {
    pub water: f64,
    pub solute: f64,
    pub pressure: f64,
}

impl Default for ScalingFactors {
    fn default() -> Self {
        Self {
            water: 1.0,
            solute: 1.0e2,
            pressure: 1.0e-5,
        }
    }
}
