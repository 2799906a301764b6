//! Splitter block.

use crate::block::UnitBlock;
use crate::error::{ComponentError, ComponentResult};
use wt_core::{nearly_equal, Tolerances};
use wt_props::{ScalingFactors, Stream};

#[derive(Debug, Clone)]
struct SplitterOutlet {
    name: String,
    fraction: Option<f64>,
    stream: Option<Stream>,
}

/// Stream splitter with named outlets.
///
/// Splits on a total-flow basis with equal temperature across outlets.
/// With n outlets there are n-1 free split fractions; each call to
/// [`Splitter::fix_split_fraction`] removes one degree of freedom, and the
/// last unfixed fraction is derived from the balance.
#[derive(Debug, Clone)]
pub struct Splitter {
    name: String,
    outlets: Vec<SplitterOutlet>,
    inlet: Option<Stream>,
    scaling: Option<ScalingFactors>,
}

impl Splitter {
    pub fn new(name: impl Into<String>, outlet_names: &[&str]) -> ComponentResult<Self> {
        if outlet_names.len() < 2 {
            return Err(ComponentError::InvalidArg {
                what: "splitter needs at least two outlets",
            });
        }
        Ok(Self {
            name: name.into(),
            outlets: outlet_names
                .iter()
                .map(|n| SplitterOutlet {
                    name: (*n).to_string(),
                    fraction: None,
                    stream: None,
                })
                .collect(),
            inlet: None,
            scaling: None,
        })
    }

    pub fn outlet_names(&self) -> impl Iterator<Item = &str> {
        self.outlets.iter().map(|o| o.name.as_str())
    }

    /// Fix one outlet's split fraction, consuming one degree of freedom.
    pub fn fix_split_fraction(&mut self, outlet: &str, fraction: f64) -> ComponentResult<()> {
        if !(0.0..=1.0).contains(&fraction) || !fraction.is_finite() {
            return Err(ComponentError::InvalidArg {
                what: "split fraction must be in [0, 1]",
            });
        }
        let slot = self
            .outlets
            .iter_mut()
            .find(|o| o.name == outlet)
            .ok_or(ComponentError::InvalidArg {
                what: "no such splitter outlet",
            })?;
        slot.fraction = Some(fraction);
        Ok(())
    }

    /// Fixed split fraction of an outlet, if fixed.
    pub fn split_fraction(&self, outlet: &str) -> Option<f64> {
        self.outlets
            .iter()
            .find(|o| o.name == outlet)
            .and_then(|o| o.fraction)
    }

    pub fn set_inlet(&mut self, stream: Stream) {
        self.inlet = Some(stream);
    }

    pub fn inlet(&self) -> Option<&Stream> {
        self.inlet.as_ref()
    }

    pub fn outlet_stream(&self, outlet: &str) -> Option<&Stream> {
        self.outlets
            .iter()
            .find(|o| o.name == outlet)
            .and_then(|o| o.stream.as_ref())
    }
}

impl UnitBlock for Splitter {
    fn name(&self) -> &str {
        &self.name
    }

    fn degrees_of_freedom(&self) -> u32 {
        let fixed = self.outlets.iter().filter(|o| o.fraction.is_some()).count();
        (self.outlets.len() as u32 - 1).saturating_sub(fixed as u32)
    }

    fn is_ready(&self) -> bool {
        self.inlet.is_some()
    }

    fn is_initialized(&self) -> bool {
        self.outlets.iter().all(|o| o.stream.is_some())
    }

    fn evaluate(&mut self) -> ComponentResult<()> {
        if self.degrees_of_freedom() > 0 {
            return Err(ComponentError::UnderSpecified {
                what: "splitter has a free split fraction",
            });
        }
        let inlet = self.inlet.as_ref().ok_or(ComponentError::MissingState {
            what: "splitter inlet",
        })?;

        let fixed_sum: f64 = self.outlets.iter().filter_map(|o| o.fraction).sum();
        if fixed_sum > 1.0 + 1e-12 {
            return Err(ComponentError::NonPhysical {
                what: "splitter fractions exceed one",
            });
        }
        let all_fixed = self.outlets.iter().all(|o| o.fraction.is_some());
        if all_fixed && !nearly_equal(fixed_sum, 1.0, Tolerances::default()) {
            return Err(ComponentError::NonPhysical {
                what: "splitter fractions must sum to one",
            });
        }

        let remainder = (1.0 - fixed_sum).max(0.0);
        let fractions: Vec<f64> = self
            .outlets
            .iter()
            .map(|o| o.fraction.unwrap_or(remainder))
            .collect();
        for (outlet, fraction) in self.outlets.iter_mut().zip(fractions) {
            let (part, _) = inlet.split(fraction)?;
            outlet.stream = Some(part);
        }
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

    fn water(flow: f64) -> Stream {
        Stream::new(k(298.15), pa(101_325.0), kgps(flow), vec![]).unwrap()
    }

    fn bypass_splitter() -> Splitter {
        Splitter::new("splitter", &["pretreatment", "bypass"]).unwrap()
    }

    #[test]
    fn one_free_fraction_until_fixed() {
        let mut sp = bypass_splitter();
        assert_eq!(sp.degrees_of_freedom(), 1);
        sp.fix_split_fraction("bypass", 0.1).unwrap();
        assert_eq!(sp.degrees_of_freedom(), 0);
        assert_eq!(sp.split_fraction("bypass"), Some(0.1));
    }

    #[test]
    fn evaluate_requires_fixed_fraction() {
        let mut sp = bypass_splitter();
        sp.set_inlet(water(1.0));
        assert!(matches!(
            sp.evaluate().unwrap_err(),
            ComponentError::UnderSpecified { .. }
        ));
    }

    #[test]
    fn remainder_goes_to_the_unfixed_outlet() {
        let mut sp = bypass_splitter();
        sp.fix_split_fraction("bypass", 0.1).unwrap();
        sp.set_inlet(water(1.0));
        sp.evaluate().unwrap();
        let bypass = sp.outlet_stream("bypass").unwrap();
        let pretrt = sp.outlet_stream("pretreatment").unwrap();
        assert!((bypass.total_flow().value - 0.1).abs() < 1e-12);
        assert!((pretrt.total_flow().value - 0.9).abs() < 1e-12);
    }

    #[test]
    fn rejects_unknown_outlet_and_bad_fraction() {
        let mut sp = bypass_splitter();
        assert!(sp.fix_split_fraction("waste", 0.1).is_err());
        assert!(sp.fix_split_fraction("bypass", 1.5).is_err());
    }

    #[test]
    fn single_outlet_is_rejected() {
        assert!(Splitter::new("s", &["only"]).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use wt_core::units::{k, kgps, pa};

    proptest! {
        #[test]
        fn outlets_always_sum_to_the_inlet(fraction in 0.0_f64..=1.0, flow in 0.01_f64..10.0) {
            let mut sp = Splitter::new("s", &["a", "b"]).unwrap();
            sp.fix_split_fraction("a", fraction).unwrap();
            sp.set_inlet(Stream::new(k(298.15), pa(1e5), kgps(flow), vec![]).unwrap());
            sp.evaluate().unwrap();
            let a = sp.outlet_stream("a").unwrap().total_flow().value;
            let b = sp.outlet_stream("b").unwrap().total_flow().value;
            prop_assert!((a + b - flow).abs() < 1e-9);
        }
    }
}
