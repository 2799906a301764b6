//! Reverse-osmosis unit models.

use crate::block::{UnitBlock, UnitCosting};
use crate::error::{ComponentError, ComponentResult};
use wt_core::units::{kgps, pa};
use wt_core::units::constants::P_ATM_PA;
use wt_props::{PropertyPackage, ScalingFactors, Stream};

/// Reverse-osmosis model variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoModel {
    /// Simplified zero-dimensional membrane model.
    Simplified0D,
    /// Idealized separator variant. Flow simulation only; no cost model.
    Separator,
}

impl RoModel {
    pub fn key(&self) -> &'static str {
        match self {
            RoModel::Simplified0D => "0D",
            RoModel::Separator => "Sep",
        }
    }
}

impl std::str::FromStr for RoModel {
    type Err = ComponentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0D" | "0d" => Ok(RoModel::Simplified0D),
            "Sep" | "sep" => Ok(RoModel::Separator),
            _ => Err(ComponentError::InvalidArg {
                what: "unrecognized reverse-osmosis model token",
            }),
        }
    }
}

/// Reverse-osmosis membrane stage.
///
/// Ports: inlet, permeate, retentate. RO rejects essentially all dissolved
/// solids, so one rejection figure covers every solute; the permeate
/// leaves at atmospheric pressure and the retentate keeps the feed
/// pressure.
#[derive(Debug, Clone)]
pub struct ReverseOsmosis {
    name: String,
    model: RoModel,
    recovery: f64,
    rejection: f64,
    inlet: Option<Stream>,
    permeate: Option<Stream>,
    retentate: Option<Stream>,
    scaling: Option<ScalingFactors>,
    pub costing: Option<UnitCosting>,
}

const RO_DEFAULT_RECOVERY: f64 = 0.5;
const RO_DEFAULT_REJECTION: f64 = 0.99;

impl ReverseOsmosis {
    pub fn new(name: impl Into<String>, package: &PropertyPackage, model: RoModel) -> Self {
        Self {
            name: name.into(),
            model,
            recovery: RO_DEFAULT_RECOVERY,
            rejection: RO_DEFAULT_REJECTION,
            inlet: None,
            permeate: None,
            retentate: None,
            scaling: Some(package.default_scaling()),
            costing: None,
        }
    }

    pub fn model(&self) -> RoModel {
        self.model
    }

    pub fn water_recovery(&self) -> f64 {
        self.recovery
    }

    /// Stage recovery is a design choice; second stages typically run lower.
    pub fn set_water_recovery(&mut self, recovery: f64) -> ComponentResult<()> {
        if !(0.0..1.0).contains(&recovery) {
            return Err(ComponentError::InvalidArg {
                what: "RO water recovery must be in [0, 1)",
            });
        }
        self.recovery = recovery;
        Ok(())
    }

    pub fn set_inlet(&mut self, stream: Stream) {
        self.inlet = Some(stream);
    }

    pub fn inlet(&self) -> Option<&Stream> {
        self.inlet.as_ref()
    }

    pub fn permeate(&self) -> Option<&Stream> {
        self.permeate.as_ref()
    }

    pub fn retentate(&self) -> Option<&Stream> {
        self.retentate.as_ref()
    }

    /// Seed the outlet ports with zero-flow placeholders at the inlet
    /// temperature and pressure, for the separator variant whose standard
    /// initialization call is refused. The solve overwrites these.
    pub fn seed_default_outlets(&mut self) -> ComponentResult<()> {
        let inlet = self.inlet.as_ref().ok_or(ComponentError::MissingState {
            what: "reverse-osmosis inlet",
        })?;
        let zero_solutes: Vec<_> = inlet.solutes().map(|(s, _)| (s, kgps(0.0))).collect();
        self.permeate = Some(Stream::new(
            inlet.temperature,
            pa(P_ATM_PA),
            kgps(0.0),
            zero_solutes.clone(),
        )?);
        self.retentate = Some(Stream::new(
            inlet.temperature,
            inlet.pressure,
            kgps(0.0),
            zero_solutes,
        )?);
        Ok(())
    }
}

impl UnitBlock for ReverseOsmosis {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_ready(&self) -> bool {
        self.inlet.is_some()
    }

    fn is_initialized(&self) -> bool {
        self.permeate.is_some() && self.retentate.is_some()
    }

    fn evaluate(&mut self) -> ComponentResult<()> {
        let inlet = self.inlet.as_ref().ok_or(ComponentError::MissingState {
            what: "reverse-osmosis inlet",
        })?;

        let passage = 1.0 - self.rejection;
        let perm_water = inlet.water.value * self.recovery;
        let perm_solutes: Vec<_> = inlet
            .solutes()
            .map(|(s, flow)| {
                let f = match self.model {
                    RoModel::Simplified0D => flow.value * self.recovery * passage,
                    RoModel::Separator => flow.value * passage,
                };
                (s, kgps(f))
            })
            .collect();

        let ret_water = inlet.water.value - perm_water;
        let ret_solutes: Vec<_> = inlet
            .solutes()
            .map(|(s, flow)| {
                let perm = perm_solutes
                    .iter()
                    .find(|(t, _)| *t == s)
                    .map(|(_, f)| f.value)
                    .unwrap_or(0.0);
                (s, kgps((flow.value - perm).max(0.0)))
            })
            .collect();

        self.permeate = Some(Stream::new(
            inlet.temperature,
            pa(P_ATM_PA),
            kgps(perm_water),
            perm_solutes,
        )?);
        self.retentate = Some(Stream::new(
            inlet.temperature,
            inlet.pressure,
            kgps(ret_water),
            ret_solutes,
        )?);
        Ok(())
    }

    fn initialize(&mut self) -> ComponentResult<()> {
        if self.model == RoModel::Separator {
            return Err(ComponentError::NotSupported {
                what: "standard initialization of the separator reverse-osmosis model",
            });
        }
        self.evaluate()
    }

    fn scaling(&self) -> Option<&ScalingFactors> {
        self.scaling.as_ref()
    }

    fn set_scaling(&mut self, sf: ScalingFactors) {
        self.scaling = Some(sf);
    }
}
