//! Pretreatment network builder.

use tracing::info;
use wt_components::{Feed, Mixer, Nanofiltration, NfModel, Splitter, UnitBlock};
use wt_flowsheet::{BlockTag, Flowsheet, PortRef, PortTag};
use wt_props::PropertyPackage;
use wt_solver::{calculate_scaling_factors, propagate_state};

use crate::error::AppResult;

/// Default bypass split fraction, the network's one free degree of freedom.
pub const DEFAULT_BYPASS_SPLIT: f64 = 0.1;

/// Named outlet ports a pretreatment network hands to the larger train.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PretreatmentPorts {
    /// Treated (or blended) water for the downstream train.
    pub product: PortRef,
    /// Concentrate to disposal. Always the NF retentate.
    pub waste: PortRef,
}

/// Build NF pretreatment including the specified feed and auxiliary
/// equipment, and initialize every unit in flow order.
///
/// With `has_bypass` a splitter and mixer route a fixed fraction of the
/// feed around the membrane; without it the feed goes straight to NF.
/// The separator NF variant is wired and scaled identically to the
/// zero-order variant, but its initialization call is skipped (the
/// standard initializer refuses that variant); its outlets are seeded with
/// placeholders so downstream startup still has states to propagate.
pub fn build_pretreatment_nf(
    fs: &mut Flowsheet,
    package: &PropertyPackage,
    has_bypass: bool,
    nf_model: NfModel,
) -> AppResult<PretreatmentPorts> {
    info!(
        has_bypass,
        nf_model = nf_model.key(),
        basis = package.basis().key(),
        "building NF pretreatment"
    );

    // build feed
    fs.feed = Some(Feed::new("feed", package));

    // build NF
    fs.nf = Some(Nanofiltration::new("NF", package, nf_model));

    if has_bypass {
        // build auxiliary units
        fs.splitter = Some(Splitter::new("splitter", &["pretreatment", "bypass"])?);
        fs.mixer = Some(Mixer::new("mixer", &["pretreatment", "bypass"])?);

        // connect models
        let feed_splitter = fs.connect(
            "s_pretrt_feed_splitter",
            PortRef::new(BlockTag::Feed, PortTag::Outlet),
            PortRef::new(BlockTag::Splitter, PortTag::Inlet),
        );
        let splitter_mixer = fs.connect(
            "s_pretrt_splitter_mixer",
            PortRef::new(BlockTag::Splitter, PortTag::Bypass),
            PortRef::new(BlockTag::Mixer, PortTag::Bypass),
        );
        let splitter_nf = fs.connect(
            "s_pretrt_splitter_NF",
            PortRef::new(BlockTag::Splitter, PortTag::Pretreatment),
            PortRef::new(BlockTag::Nf, PortTag::Inlet),
        );
        let nf_mixer = fs.connect(
            "s_pretrt_NF_mixer",
            PortRef::new(BlockTag::Nf, PortTag::Permeate),
            PortRef::new(BlockTag::Mixer, PortTag::Pretreatment),
        );

        // specify (NF and feed are already specified, mixer has 0 DOF,
        // splitter has 1 DOF)
        if let Some(splitter) = fs.splitter.as_mut() {
            splitter.fix_split_fraction("bypass", DEFAULT_BYPASS_SPLIT)?;
        }

        // scaling (NF and feed are already scaled)
        if let Some(splitter) = fs.splitter.as_mut() {
            calculate_scaling_factors(splitter, package);
        }
        if let Some(mixer) = fs.mixer.as_mut() {
            calculate_scaling_factors(mixer, package);
        }

        // initialize
        if let Some(feed) = fs.feed.as_mut() {
            feed.initialize()?;
        }
        propagate_state(fs, feed_splitter)?;
        if let Some(splitter) = fs.splitter.as_mut() {
            splitter.initialize()?;
        }
        propagate_state(fs, splitter_mixer)?;
        propagate_state(fs, splitter_nf)?;
        if let Some(nf) = fs.nf.as_mut() {
            match nf_model {
                // The separator variant refuses the standard initializer.
                NfModel::Separator => nf.seed_default_outlets()?,
                NfModel::ZeroOrder => nf.initialize()?,
            }
        }
        propagate_state(fs, nf_mixer)?;
        if let Some(mixer) = fs.mixer.as_mut() {
            mixer.initialize()?;
        }

        // outlet ports for pretreatment
        Ok(PretreatmentPorts {
            product: PortRef::new(BlockTag::Mixer, PortTag::Outlet),
            waste: PortRef::new(BlockTag::Nf, PortTag::Retentate),
        })
    } else {
        // no bypass: no auxiliary units

        // connect models
        let feed_nf = fs.connect(
            "s_pretrt_feed_NF",
            PortRef::new(BlockTag::Feed, PortTag::Outlet),
            PortRef::new(BlockTag::Nf, PortTag::Inlet),
        );

        // specify (NF and feed are already specified)
        // scaling (NF and feed are already scaled)

        // initialize
        if let Some(feed) = fs.feed.as_mut() {
            feed.initialize()?;
        }
        propagate_state(fs, feed_nf)?;
        if let Some(nf) = fs.nf.as_mut() {
            match nf_model {
                NfModel::Separator => nf.seed_default_outlets()?,
                NfModel::ZeroOrder => nf.initialize()?,
            }
        }

        // outlet ports for pretreatment
        Ok(PretreatmentPorts {
            product: PortRef::new(BlockTag::Nf, PortTag::Permeate),
            waste: PortRef::new(BlockTag::Nf, PortTag::Retentate),
        })
    }
}

/// Parse a raw variant token and build pretreatment from it.
///
/// An unrecognized token fails with an invalid-argument error before any
/// construction occurs.
pub fn build_pretreatment_nf_from_token(
    fs: &mut Flowsheet,
    package: &PropertyPackage,
    has_bypass: bool,
    nf_token: &str,
) -> AppResult<PretreatmentPorts> {
    let nf_model: NfModel = nf_token.parse()?;
    build_pretreatment_nf(fs, package, has_bypass, nf_model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use wt_props::Basis;

    fn built(has_bypass: bool, model: NfModel) -> (Flowsheet, PretreatmentPorts) {
        let package = PropertyPackage::new(Basis::Ion);
        let mut fs = Flowsheet::new();
        let ports = build_pretreatment_nf(&mut fs, &package, has_bypass, model).unwrap();
        (fs, ports)
    }

    #[test]
    fn bypass_network_declares_four_arcs_and_two_auxiliary_units() {
        let (fs, ports) = built(true, NfModel::ZeroOrder);
        assert_eq!(fs.arcs().len(), 4);
        assert!(fs.has_block(BlockTag::Splitter));
        assert!(fs.has_block(BlockTag::Mixer));
        assert_eq!(ports.product, PortRef::new(BlockTag::Mixer, PortTag::Outlet));
        assert_eq!(ports.waste, PortRef::new(BlockTag::Nf, PortTag::Retentate));
        assert_eq!(fs.degrees_of_freedom(), 0);
    }

    #[test]
    fn bypass_split_fraction_is_fixed_at_one_tenth() {
        for model in [NfModel::ZeroOrder, NfModel::Separator] {
            for basis in [Basis::Ion, Basis::Salt, Basis::Tds] {
                let package = PropertyPackage::new(basis);
                let mut fs = Flowsheet::new();
                build_pretreatment_nf(&mut fs, &package, true, model).unwrap();
                let fraction = fs.splitter.as_ref().unwrap().split_fraction("bypass");
                assert_eq!(fraction, Some(DEFAULT_BYPASS_SPLIT));
            }
        }
    }

    #[test]
    fn no_bypass_network_has_one_arc_and_no_auxiliary_units() {
        let (fs, ports) = built(false, NfModel::ZeroOrder);
        assert_eq!(fs.arcs().len(), 1);
        assert!(!fs.has_block(BlockTag::Splitter));
        assert!(!fs.has_block(BlockTag::Mixer));
        assert_eq!(ports.product, PortRef::new(BlockTag::Nf, PortTag::Permeate));
        assert_eq!(ports.waste, PortRef::new(BlockTag::Nf, PortTag::Retentate));
        assert_eq!(fs.degrees_of_freedom(), 0);
    }

    #[test]
    fn waste_is_the_retentate_for_every_variant() {
        for model in [NfModel::ZeroOrder, NfModel::Separator] {
            for has_bypass in [true, false] {
                let (_, ports) = built(has_bypass, model);
                assert_eq!(ports.waste, PortRef::new(BlockTag::Nf, PortTag::Retentate));
            }
        }
    }

    #[test]
    fn units_are_initialized_in_flow_order() {
        let (fs, _) = built(true, NfModel::ZeroOrder);
        assert!(fs.feed.as_ref().unwrap().is_initialized());
        assert!(fs.splitter.as_ref().unwrap().is_initialized());
        assert!(fs.nf.as_ref().unwrap().is_initialized());
        assert!(fs.mixer.as_ref().unwrap().is_initialized());
    }

    #[test]
    fn separator_variant_is_wired_but_carries_placeholder_outlets() {
        let (fs, _) = built(true, NfModel::Separator);
        let nf = fs.nf.as_ref().unwrap();
        // Seeded placeholders, not a real initialization result.
        assert_eq!(nf.permeate().unwrap().total_flow().value, 0.0);
        assert!(fs.mixer.as_ref().unwrap().is_initialized());
    }

    #[test]
    fn unrecognized_token_fails_before_construction() {
        let package = PropertyPackage::new(Basis::Ion);
        let mut fs = Flowsheet::new();
        let err =
            build_pretreatment_nf_from_token(&mut fs, &package, true, "UF").unwrap_err();
        assert!(matches!(err, AppError::Component(_)));
        assert!(fs.present_blocks().is_empty());
        assert!(fs.arcs().is_empty());
    }
}
