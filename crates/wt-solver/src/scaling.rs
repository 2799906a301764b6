//! Scaling-factor calculation.

use tracing::debug;
use wt_components::UnitBlock;
use wt_props::PropertyPackage;

/// Install the property package's default scaling factors on a block.
///
/// Feed and membrane units arrive pre-scaled from their constructors; this
/// is for the auxiliary units (splitter, mixer) built bare.
pub fn calculate_scaling_factors(block: &mut dyn UnitBlock, package: &PropertyPackage) {
    let sf = package.default_scaling();
    debug!(block = block.name(), "calculated scaling factors");
    block.set_scaling(sf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use wt_components::Splitter;
    use wt_props::Basis;

    #[test]
    fn installs_scaling_on_a_bare_block() {
        let pkg = PropertyPackage::new(Basis::Ion);
        let mut sp = Splitter::new("splitter", &["pretreatment", "bypass"]).unwrap();
        assert!(sp.scaling().is_none());
        calculate_scaling_factors(&mut sp, &pkg);
        assert!(sp.scaling().is_some());
    }
}
