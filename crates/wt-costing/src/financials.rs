//! Default financial parameters and the standard costing ruleset.

use wt_components::{Mixer, Nanofiltration, Pump, PumpClass, ReverseOsmosis, UnitCosting};
use wt_core::units::constants::HOURS_PER_YEAR;
use wt_flowsheet::{BlockTag, Flowsheet};

use crate::error::{CostingError, CostingResult};
use crate::model::{CostModel, MixerClass, SystemCosting};

/// Plant-level financial factors and unit-cost correlation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialParams {
    /// Capital recovery factor, 1/yr.
    pub factor_capital_annualization: f64,
    /// Total investment as a multiple of direct capital.
    pub factor_total_investment: f64,
    /// Maintenance, labor, and chemicals as a fraction of investment, 1/yr.
    pub factor_mlc: f64,
    /// Fraction of the year the plant is on line.
    pub load_factor: f64,
    /// Grid electricity price, $/kWh.
    pub electricity_price_per_kwh: f64,
    /// NF membrane price, $/m2.
    pub nf_membrane_cost_per_m2: f64,
    /// RO membrane price, $/m2.
    pub ro_membrane_cost_per_m2: f64,
    /// Membrane replaced per year as a fraction of installed area.
    pub factor_membrane_replacement: f64,
    /// NF design water flux, m/s (40 LMH).
    pub nf_water_flux: f64,
    /// RO design water flux, m/s (20 LMH).
    pub ro_water_flux: f64,
    /// High-pressure pump capital, $/W of shaft power.
    pub high_pressure_pump_cost_per_watt: f64,
    /// Centrifugal pump capital, $/W of shaft power.
    pub centrifugal_pump_cost_per_watt: f64,
    /// Lime softening mixer capital, $ per m3/h treated.
    pub lime_softening_cost_per_m3ph: f64,
    /// Hypochlorite mixer capital, $ per m3/h treated.
    pub hypochlorite_cost_per_m3ph: f64,
    /// Lime price, $/kg.
    pub lime_cost_per_kg: f64,
    /// Sodium hypochlorite price, $/kg.
    pub naocl_cost_per_kg: f64,
}

impl Default for FinancialParams {
    fn default() -> Self {
        Self {
            factor_capital_annualization: 0.1,
            factor_total_investment: 2.0,
            factor_mlc: 0.03,
            load_factor: 0.9,
            electricity_price_per_kwh: 0.07,
            nf_membrane_cost_per_m2: 15.0,
            ro_membrane_cost_per_m2: 30.0,
            factor_membrane_replacement: 0.2,
            nf_water_flux: 1.11e-5,
            ro_water_flux: 5.56e-6,
            high_pressure_pump_cost_per_watt: 1.908,
            centrifugal_pump_cost_per_watt: 0.889,
            lime_softening_cost_per_m3ph: 1500.0,
            hypochlorite_cost_per_m3ph: 900.0,
            lime_cost_per_kg: 0.17,
            naocl_cost_per_kg: 0.30,
        }
    }
}

impl FinancialParams {
    /// Annual on-line hours.
    pub fn operating_hours(&self) -> f64 {
        self.load_factor * HOURS_PER_YEAR
    }
}

/// The default costing ruleset: simple published-style correlations
/// parameterized by [`FinancialParams`].
#[derive(Debug, Clone, Default)]
pub struct StandardCostModel {
    params: FinancialParams,
}

impl StandardCostModel {
    pub fn new(params: FinancialParams) -> Self {
        Self { params }
    }

    fn membrane_costs(
        &self,
        permeate_m3ps: f64,
        flux: f64,
        price_per_m2: f64,
    ) -> UnitCosting {
        let area_m2 = permeate_m3ps / flux;
        let capital_cost = price_per_m2 * area_m2;
        UnitCosting {
            capital_cost,
            operating_cost: self.params.factor_membrane_replacement * capital_cost,
        }
    }
}

impl CostModel for StandardCostModel {
    fn params(&self) -> &FinancialParams {
        &self.params
    }

    fn cost_nanofiltration(&self, nf: &Nanofiltration) -> CostingResult<UnitCosting> {
        let permeate = nf.permeate().ok_or(CostingError::MissingState {
            what: "nanofiltration permeate must be solved before costing",
        })?;
        Ok(self.membrane_costs(
            permeate.volumetric_flow().value,
            self.params.nf_water_flux,
            self.params.nf_membrane_cost_per_m2,
        ))
    }

    fn cost_reverse_osmosis(&self, ro: &ReverseOsmosis) -> CostingResult<UnitCosting> {
        let permeate = ro.permeate().ok_or(CostingError::MissingState {
            what: "reverse-osmosis permeate must be solved before costing",
        })?;
        Ok(self.membrane_costs(
            permeate.volumetric_flow().value,
            self.params.ro_water_flux,
            self.params.ro_membrane_cost_per_m2,
        ))
    }

    fn cost_pump(&self, pump: &Pump, class: PumpClass) -> CostingResult<UnitCosting> {
        let shaft_watts = pump.shaft_power()?.value;
        let per_watt = match class {
            PumpClass::HighPressure => self.params.high_pressure_pump_cost_per_watt,
            PumpClass::Centrifugal => self.params.centrifugal_pump_cost_per_watt,
        };
        let electricity = self.params.electricity_price_per_kwh * (shaft_watts / 1000.0)
            * self.params.operating_hours();
        Ok(UnitCosting {
            capital_cost: per_watt * shaft_watts,
            operating_cost: electricity,
        })
    }

    fn cost_mixer(&self, mixer: &Mixer, class: MixerClass) -> CostingResult<UnitCosting> {
        let outlet = mixer.outlet().ok_or(CostingError::MissingState {
            what: "mixer outlet must be solved before costing",
        })?;
        let treated_m3ph = outlet.volumetric_flow().value * 3600.0;
        let (capital_per_m3ph, chemical_price) = match class {
            MixerClass::LimeSoftening => (
                self.params.lime_softening_cost_per_m3ph,
                self.params.lime_cost_per_kg,
            ),
            MixerClass::HypochloriteMixer => (
                self.params.hypochlorite_cost_per_m3ph,
                self.params.naocl_cost_per_kg,
            ),
        };
        let dose_kgps = mixer
            .inlet("chemical")
            .map(|s| s.total_flow().value)
            .unwrap_or(0.0);
        let chemicals = chemical_price * dose_kgps * 3600.0 * self.params.operating_hours();
        Ok(UnitCosting {
            capital_cost: capital_per_m3ph * treated_m3ph,
            operating_cost: chemicals,
        })
    }

    fn system_costing(&self, fs: &Flowsheet) -> CostingResult<SystemCosting> {
        let mut capital_cost_total = 0.0;
        let mut unit_operating_total = 0.0;
        for (_tag, costing) in costable_units(fs) {
            // Every present costable unit must be costed before aggregation.
            let costing = costing.ok_or(CostingError::MissingState {
                what: "a present unit was not costed before aggregation",
            })?;
            capital_cost_total += costing.capital_cost;
            unit_operating_total += costing.operating_cost;
        }

        let product = fs.product_port.ok_or(CostingError::InvalidArg {
            what: "flowsheet has no designated product port",
        })?;
        let product_stream = fs.require_port_stream(product)?;
        let annual_water_production_m3 =
            product_stream.volumetric_flow().value * 3600.0 * self.params.operating_hours();
        if annual_water_production_m3 <= 0.0 {
            return Err(CostingError::InvalidArg {
                what: "annual water production must be positive",
            });
        }

        let investment_cost_total = self.params.factor_total_investment * capital_cost_total;
        let operating_cost_mlc = self.params.factor_mlc * investment_cost_total;
        let operating_cost_total = unit_operating_total + operating_cost_mlc;
        let lcow = (investment_cost_total * self.params.factor_capital_annualization
            + operating_cost_total)
            / annual_water_production_m3;

        Ok(SystemCosting {
            capital_cost_total,
            investment_cost_total,
            operating_cost_mlc,
            operating_cost_total,
            annual_water_production_m3,
            lcow,
        })
    }
}

/// Present costable units and their cost blocks, in canonical order.
fn costable_units(fs: &Flowsheet) -> Vec<(BlockTag, Option<UnitCosting>)> {
    let mut units = Vec::new();
    if let Some(nf) = &fs.nf {
        units.push((BlockTag::Nf, nf.costing));
    }
    if let Some(ro) = &fs.ro {
        units.push((BlockTag::Ro, ro.costing));
    }
    if let Some(ro2) = &fs.ro2 {
        units.push((BlockTag::Ro2, ro2.costing));
    }
    if let Some(pump) = &fs.pump_ro {
        units.push((BlockTag::PumpRo, pump.costing));
    }
    if let Some(pump) = &fs.pump_ro2 {
        units.push((BlockTag::PumpRo2, pump.costing));
    }
    if let Some(mx) = &fs.softening_mixer {
        units.push((BlockTag::SofteningMixer, mx.costing));
    }
    if let Some(mx) = &fs.hypochlorite_mixer {
        units.push((BlockTag::HypochloriteMixer, mx.costing));
    }
    units
}
