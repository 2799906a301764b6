//! Feed source block.

use crate::block::UnitBlock;
use crate::error::ComponentResult;
use wt_props::{PropertyPackage, ScalingFactors, Stream};

/// Fully specified feed source.
///
/// The feed state comes from the property package's default seawater
/// composition and never changes after construction, so the block carries
/// zero degrees of freedom and is pre-scaled.
#[derive(Debug, Clone)]
pub struct Feed {
    name: String,
    spec: Stream,
    outlet: Option<Stream>,
    scaling: Option<ScalingFactors>,
}

impl Feed {
    pub fn new(name: impl Into<String>, package: &PropertyPackage) -> Self {
        Self {
            name: name.into(),
            spec: package.default_feed(),
            outlet: None,
            scaling: Some(package.default_scaling()),
        }
    }

    /// Computed outlet state (None before initialization).
    pub fn outlet(&self) -> Option<&Stream> {
        self.outlet.as_ref()
    }
}

impl UnitBlock for Feed {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_ready(&self) -> bool {
        true
    }

    fn is_initialized(&self) -> bool {
        self.outlet.is_some()
    }

    fn evaluate(&mut self) -> ComponentResult<()> {
        self.outlet = Some(self.spec.clone());
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
    use wt_props::Basis;

    #[test]
    fn feed_is_fully_specified() {
        let pkg = PropertyPackage::new(Basis::Ion);
        let feed = Feed::new("feed", &pkg);
        assert_eq!(feed.degrees_of_freedom(), 0);
        assert!(feed.scaling().is_some());
        assert!(!feed.is_initialized());
    }

    #[test]
    fn initialize_produces_default_feed() {
        let pkg = PropertyPackage::new(Basis::Ion);
        let mut feed = Feed::new("feed", &pkg);
        feed.initialize().unwrap();
        let out = feed.outlet().unwrap();
        assert!((out.total_flow().value - 1.0).abs() < 1e-12);
    }
}
