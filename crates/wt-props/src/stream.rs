//! Material stream states.

use crate::error::{PropError, PropResult};
use crate::scaling::ScalingFactors;
use crate::solute::Solute;
use wt_core::units::{kgps, m3ps, MassRate, Pressure, Temperature, VolumeRate};
use wt_core::units::constants::RHO_WATER_KGPM3;

/// State of one material stream: temperature, pressure, and mass flows of
/// water plus each tracked solute.
///
/// Solute order follows the property package that created the stream and is
/// preserved by every operation, so streams from the same package can be
/// compared and combined positionally.
#[derive(Debug, Clone, PartialEq)]
pub struct Stream {
    pub temperature: Temperature,
    pub pressure: Pressure,
    pub water: MassRate,
    solutes: Vec<(Solute, MassRate)>,
}

impl Stream {
    /// Create a stream, validating that all flows are finite and non-negative.
    pub fn new(
        temperature: Temperature,
        pressure: Pressure,
        water: MassRate,
        solutes: Vec<(Solute, MassRate)>,
    ) -> PropResult<Self> {
        if !temperature.value.is_finite() || temperature.value <= 0.0 {
            return Err(PropError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }
        if !pressure.value.is_finite() || pressure.value <= 0.0 {
            return Err(PropError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }
        if !water.value.is_finite() || water.value < 0.0 {
            return Err(PropError::NonPhysical {
                what: "water flow must be non-negative and finite",
            });
        }
        for (_, flow) in &solutes {
            if !flow.value.is_finite() || flow.value < 0.0 {
                return Err(PropError::NonPhysical {
                    what: "solute flow must be non-negative and finite",
                });
            }
        }
        Ok(Self {
            temperature,
            pressure,
            water,
            solutes,
        })
    }

    /// Iterate over tracked solutes and their mass flows.
    pub fn solutes(&self) -> impl Iterator<Item = (Solute, MassRate)> + '_ {
        self.solutes.iter().copied()
    }

    /// Mass flow of one solute (zero if not tracked).
    pub fn solute_flow(&self, solute: Solute) -> MassRate {
        self.solutes
            .iter()
            .find(|(s, _)| *s == solute)
            .map(|(_, f)| *f)
            .unwrap_or_else(|| kgps(0.0))
    }

    /// Total mass flow, water plus solutes.
    pub fn total_flow(&self) -> MassRate {
        let solutes: f64 = self.solutes.iter().map(|(_, f)| f.value).sum();
        kgps(self.water.value + solutes)
    }

    /// Volumetric flow at the reference water density.
    pub fn volumetric_flow(&self) -> VolumeRate {
        m3ps(self.total_flow().value / RHO_WATER_KGPM3)
    }

    /// Split on a total-flow basis with equal temperature and pressure.
    ///
    /// Returns `(a, b)` where `a` carries `fraction` of every flow.
    pub fn split(&self, fraction: f64) -> PropResult<(Stream, Stream)> {
        if !(0.0..=1.0).contains(&fraction) || !fraction.is_finite() {
            return Err(PropError::InvalidArg {
                what: "split fraction must be in [0, 1]",
            });
        }
        let part = |f: f64| Stream {
            temperature: self.temperature,
            pressure: self.pressure,
            water: kgps(self.water.value * f),
            solutes: self
                .solutes
                .iter()
                .map(|(s, flow)| (*s, kgps(flow.value * f)))
                .collect(),
        };
        Ok((part(fraction), part(1.0 - fraction)))
    }

    /// Mix with another stream: flows sum, temperature is flow-weighted,
    /// pressure is the minimum of the inlet pressures.
    pub fn mix(&self, other: &Stream) -> PropResult<Stream> {
        let mut solutes = self.solutes.clone();
        for (s, flow) in &other.solutes {
            match solutes.iter_mut().find(|(t, _)| t == s) {
                Some((_, existing)) => *existing = kgps(existing.value + flow.value),
                None => solutes.push((*s, *flow)),
            }
        }
        let m_a = self.total_flow().value;
        let m_b = other.total_flow().value;
        if m_a + m_b <= 0.0 {
            return Err(PropError::NonPhysical {
                what: "cannot mix two zero-flow streams",
            });
        }
        let t_mix =
            (self.temperature.value * m_a + other.temperature.value * m_b) / (m_a + m_b);
        Stream::new(
            Temperature::new::<uom::si::thermodynamic_temperature::kelvin>(t_mix),
            Pressure::new::<uom::si::pressure::pascal>(
                self.pressure.value.min(other.pressure.value),
            ),
            kgps(self.water.value + other.water.value),
            solutes,
        )
    }

    /// Largest scaled absolute difference between two stream states.
    ///
    /// Used by the solver as a per-port residual.
    pub fn scaled_delta(&self, other: &Stream, sf: &ScalingFactors) -> f64 {
        let mut delta = (self.water.value - other.water.value).abs() * sf.water;
        delta = delta.max((self.pressure.value - other.pressure.value).abs() * sf.pressure);
        for (s, flow) in &self.solutes {
            let d = (flow.value - other.solute_flow(*s).value).abs() * sf.solute;
            delta = delta.max(d);
        }
        for (s, flow) in &other.solutes {
            if self.solutes.iter().all(|(t, _)| t != s) {
                delta = delta.max(flow.value.abs() * sf.solute);
            }
        }
        delta
    }
}
