//! Mixer block.

use crate::block::{UnitBlock, UnitCosting};
use crate::error::{ComponentError, ComponentResult};
use wt_props::{ScalingFactors, Stream};

#[derive(Debug, Clone)]
struct MixerInlet {
    name: String,
    stream: Option<Stream>,
}

/// Stream mixer with named inlets.
///
/// The outlet sums all inlet flows; temperature is flow-weighted and the
/// outlet pressure is the minimum inlet pressure.
#[derive(Debug, Clone)]
pub struct Mixer {
    name: String,
    inlets: Vec<MixerInlet>,
    outlet: Option<Stream>,
    scaling: Option<ScalingFactors>,
    pub costing: Option<UnitCosting>,
}

impl Mixer {
    pub fn new(name: impl Into<String>, inlet_names: &[&str]) -> ComponentResult<Self> {
        if inlet_names.is_empty() {
            return Err(ComponentError::InvalidArg {
                what: "mixer needs at least one inlet",
            });
        }
        Ok(Self {
            name: name.into(),
            inlets: inlet_names
                .iter()
                .map(|n| MixerInlet {
                    name: (*n).to_string(),
                    stream: None,
                })
                .collect(),
            outlet: None,
            scaling: None,
            costing: None,
        })
    }

    pub fn inlet_names(&self) -> impl Iterator<Item = &str> {
        self.inlets.iter().map(|i| i.name.as_str())
    }

    pub fn set_inlet(&mut self, inlet: &str, stream: Stream) -> ComponentResult<()> {
        let slot = self
            .inlets
            .iter_mut()
            .find(|i| i.name == inlet)
            .ok_or(ComponentError::InvalidArg {
                what: "no such mixer inlet",
            })?;
        slot.stream = Some(stream);
        Ok(())
    }

    pub fn inlet(&self, inlet: &str) -> Option<&Stream> {
        self.inlets
            .iter()
            .find(|i| i.name == inlet)
            .and_then(|i| i.stream.as_ref())
    }

    pub fn outlet(&self) -> Option<&Stream> {
        self.outlet.as_ref()
    }
}

impl UnitBlock for Mixer {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_ready(&self) -> bool {
        self.inlets.iter().all(|i| i.stream.is_some())
    }

    fn is_initialized(&self) -> bool {
        self.outlet.is_some()
    }

    fn evaluate(&mut self) -> ComponentResult<()> {
        let mut streams = self.inlets.iter().filter_map(|i| i.stream.as_ref());
        let first = streams.next().ok_or(ComponentError::MissingState {
            what: "mixer inlet",
        })?;
        if !self.is_ready() {
            return Err(ComponentError::MissingState {
                what: "mixer inlet",
            });
        }
        let mut mixed = first.clone();
        for s in streams {
            mixed = mixed.mix(s)?;
        }
        self.outlet = Some(mixed);
        Ok(())
    }

    fn scaling(&self) -> Option<&ScalingFactors> {
        self.scaling.as_ref()
    }

    fn set_scaling(&mut self, sf: ScalingFactors) {
        self.scaling = Some(sf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wt_core::units::{k, kgps, pa};
    use wt_props::Solute;

    fn stream(flow: f64, pressure: f64) -> Stream {
        Stream::new(k(298.15), pa(pressure), kgps(flow), vec![]).unwrap()
    }

    #[test]
    fn blend_sums_flows_and_takes_min_pressure() {
        let mut mx = Mixer::new("mixer", &["pretreatment", "bypass"]).unwrap();
        mx.set_inlet("pretreatment", stream(0.9, 1.0e5)).unwrap();
        mx.set_inlet("bypass", stream(0.1, 2.0e5)).unwrap();
        mx.initialize().unwrap();
        let out = mx.outlet().unwrap();
        assert!((out.total_flow().value - 1.0).abs() < 1e-12);
        assert!((out.pressure.value - 1.0e5).abs() < 1e-9);
    }

    #[test]
    fn missing_inlet_blocks_evaluation() {
        let mut mx = Mixer::new("mixer", &["pretreatment", "bypass"]).unwrap();
        mx.set_inlet("bypass", stream(0.1, 1e5)).unwrap();
        assert!(!mx.is_ready());
        assert!(matches!(
            mx.evaluate().unwrap_err(),
            ComponentError::MissingState { .. }
        ));
    }

    #[test]
    fn solutes_merge_across_inlets() {
        let mut mx = Mixer::new("mixer", &["a", "b"]).unwrap();
        let a = Stream::new(k(298.15), pa(1e5), kgps(0.5), vec![(Solute::Na, kgps(0.01))]).unwrap();
        let b = Stream::new(k(298.15), pa(1e5), kgps(0.5), vec![(Solute::Na, kgps(0.02))]).unwrap();
        mx.set_inlet("a", a).unwrap();
        mx.set_inlet("b", b).unwrap();
        mx.evaluate().unwrap();
        assert!((mx.outlet().unwrap().solute_flow(Solute::Na).value - 0.03).abs() < 1e-12);
    }

    #[test]
    fn unknown_inlet_is_rejected() {
        let mut mx = Mixer::new("mixer", &["a"]).unwrap();
        assert!(mx.set_inlet("z", stream(1.0, 1e5)).is_err());
    }
}
