//! Core trait for unit blocks.

use crate::error::ComponentResult;
use wt_props::ScalingFactors;

/// Per-unit cost results, populated by a cost model after the solve.
///
/// Monetary values are plain dollars; uom has no currency dimension.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UnitCosting {
    /// Installed capital cost, $.
    pub capital_cost: f64,
    /// Annual operating cost, $/yr.
    pub operating_cost: f64,
}

impl UnitCosting {
    pub const ZERO: UnitCosting = UnitCosting {
        capital_cost: 0.0,
        operating_cost: 0.0,
    };
}

/// Trait implemented by every unit block on a flowsheet.
///
/// `evaluate` is the unit's model: it computes outlet streams from inlet
/// streams and the fixed specifications. `initialize` is the startup entry
/// used by the sequential initialization pass; by default it is the same
/// computation, but a unit may refuse it (the idealized-separator membrane
/// variants cannot go through the standard initialization call).
pub trait UnitBlock {
    /// Unit name for diagnostics.
    fn name(&self) -> &str;

    /// Count of free specification variables not yet fixed.
    fn degrees_of_freedom(&self) -> u32 {
        0
    }

    /// True when every inlet port holds a stream state.
    fn is_ready(&self) -> bool;

    /// True when every outlet port holds a computed stream state.
    fn is_initialized(&self) -> bool;

    /// Compute outlet states from inlet states and fixed specifications.
    fn evaluate(&mut self) -> ComponentResult<()>;

    /// Startup entry for the sequential initialization pass.
    fn initialize(&mut self) -> ComponentResult<()> {
        self.evaluate()
    }

    fn scaling(&self) -> Option<&ScalingFactors>;

    fn set_scaling(&mut self, sf: ScalingFactors);
}
