//! The cost-model capability interface.

use serde::{Deserialize, Serialize};
use wt_components::{Mixer, Nanofiltration, Pump, PumpClass, ReverseOsmosis, UnitCosting};
use wt_flowsheet::Flowsheet;

use crate::error::CostingResult;
use crate::financials::FinancialParams;

/// Chemical-dosing mixer service class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MixerClass {
    LimeSoftening,
    HypochloriteMixer,
}

impl MixerClass {
    pub fn key(&self) -> &'static str {
        match self {
            MixerClass::LimeSoftening => "lime_softening",
            MixerClass::HypochloriteMixer => "naocl_mixer",
        }
    }
}

/// System-level cost aggregate for one flowsheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemCosting {
    /// Sum of installed unit capital costs, $.
    pub capital_cost_total: f64,
    /// Capital plus indirect investment, $.
    pub investment_cost_total: f64,
    /// Maintenance, labor, and chemical operating cost, $/yr.
    pub operating_cost_mlc: f64,
    /// All annual operating costs, $/yr.
    pub operating_cost_total: f64,
    /// Product water delivered per year, m3/yr.
    pub annual_water_production_m3: f64,
    /// Levelized cost of water, $/m3.
    pub lcow: f64,
}

/// A swappable costing ruleset.
///
/// One method per costable unit class plus one whole-flowsheet
/// aggregation. Per-unit methods read solved stream states off the unit
/// and return its cost block; the aggregation reads the per-unit cost
/// blocks and the designated product port.
pub trait CostModel {
    fn params(&self) -> &FinancialParams;

    fn cost_nanofiltration(&self, nf: &Nanofiltration) -> CostingResult<UnitCosting>;

    fn cost_reverse_osmosis(&self, ro: &ReverseOsmosis) -> CostingResult<UnitCosting>;

    fn cost_pump(&self, pump: &Pump, class: PumpClass) -> CostingResult<UnitCosting>;

    fn cost_mixer(&self, mixer: &Mixer, class: MixerClass) -> CostingResult<UnitCosting>;

    fn system_costing(&self, fs: &Flowsheet) -> CostingResult<SystemCosting>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixer_class_keys_are_stable() {
        assert_eq!(MixerClass::LimeSoftening.key(), "lime_softening");
        assert_eq!(MixerClass::HypochloriteMixer.key(), "naocl_mixer");
    }
}
