//! Pump block.

use crate::block::{UnitBlock, UnitCosting};
use crate::error::{ComponentError, ComponentResult};
use wt_core::units::{watt, Power, Pressure};
use wt_props::{PropertyPackage, ScalingFactors, Stream};

/// Pump service class, used by cost models to pick a correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PumpClass {
    Centrifugal,
    HighPressure,
}

impl PumpClass {
    pub fn key(&self) -> &'static str {
        match self {
            PumpClass::Centrifugal => "centrifugal",
            PumpClass::HighPressure => "high_pressure",
        }
    }
}

/// Pump with a fixed outlet-pressure specification.
///
/// The outlet stream is the inlet stream lifted to the specified pressure;
/// temperature rise from inefficiency is neglected at this fidelity.
#[derive(Debug, Clone)]
pub struct Pump {
    name: String,
    class: PumpClass,
    outlet_pressure: Pressure,
    efficiency: f64,
    inlet: Option<Stream>,
    outlet: Option<Stream>,
    scaling: Option<ScalingFactors>,
    pub costing: Option<UnitCosting>,
}

impl Pump {
    pub fn new(
        name: impl Into<String>,
        package: &PropertyPackage,
        class: PumpClass,
        outlet_pressure: Pressure,
        efficiency: f64,
    ) -> ComponentResult<Self> {
        if efficiency <= 0.0 || efficiency > 1.0 {
            return Err(ComponentError::InvalidArg {
                what: "pump efficiency must be in (0, 1]",
            });
        }
        if outlet_pressure.value <= 0.0 || !outlet_pressure.value.is_finite() {
            return Err(ComponentError::InvalidArg {
                what: "pump outlet pressure must be positive",
            });
        }
        Ok(Self {
            name: name.into(),
            class,
            outlet_pressure,
            efficiency,
            inlet: None,
            outlet: None,
            scaling: Some(package.default_scaling()),
            costing: None,
        })
    }

    pub fn class(&self) -> PumpClass {
        self.class
    }

    pub fn set_inlet(&mut self, stream: Stream) {
        self.inlet = Some(stream);
    }

    pub fn inlet(&self) -> Option<&Stream> {
        self.inlet.as_ref()
    }

    pub fn outlet(&self) -> Option<&Stream> {
        self.outlet.as_ref()
    }

    /// Shaft power drawn at the current operating point.
    ///
    /// W = Q * dP / eta, with Q the inlet volumetric flow.
    pub fn shaft_power(&self) -> ComponentResult<Power> {
        let inlet = self.inlet.as_ref().ok_or(ComponentError::MissingState {
            what: "pump inlet",
        })?;
        let dp = self.outlet_pressure.value - inlet.pressure.value;
        let q = inlet.volumetric_flow().value;
        Ok(watt(q * dp / self.efficiency))
    }
}

impl UnitBlock for Pump {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_ready(&self) -> bool {
        self.inlet.is_some()
    }

    fn is_initialized(&self) -> bool {
        self.outlet.is_some()
    }

    fn evaluate(&mut self) -> ComponentResult<()> {
        let inlet = self.inlet.as_ref().ok_or(ComponentError::MissingState {
            what: "pump inlet",
        })?;
        if self.outlet_pressure.value < inlet.pressure.value {
            return Err(ComponentError::NonPhysical {
                what: "pump outlet pressure below inlet pressure",
            });
        }
        let mut outlet = inlet.clone();
        outlet.pressure = self.outlet_pressure;
        self.outlet = Some(outlet);
        Ok(())
    }

    fn scaling(&self) -> Option<&ScalingFactors> {
        self.scaling.as_ref()
    }

    fn set_scaling(&mut self, sf: ScalingFactors) {
        self.scaling = Some(sf);
    }
}
