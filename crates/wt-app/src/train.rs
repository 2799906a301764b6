//! Desalination train builder: RO stages, pumps, and dosing mixers.

use tracing::info;
use wt_components::{Mixer, Pump, PumpClass, ReverseOsmosis, RoModel, UnitBlock};
use wt_core::units::{bar, k, kgps, pa};
use wt_core::units::constants::P_ATM_PA;
use wt_costing::MixerClass;
use wt_flowsheet::{BlockTag, Flowsheet, PortRef, PortTag};
use wt_props::{PropertyPackage, Stream};
use wt_solver::{calculate_scaling_factors, propagate_state};

use crate::error::AppResult;
use crate::schema::ResolvedDesalination;

const PUMP_EFFICIENCY: f64 = 0.8;
const RO2_RECOVERY: f64 = 0.4;

/// Lime slurry make-up flow for the softening mixer, kg/s.
const LIME_DOSE_KGPS: f64 = 5.0e-4;
/// Hypochlorite make-up flow for the chlorination mixer, kg/s.
const NAOCL_DOSE_KGPS: f64 = 5.0e-6;

/// Build the RO section downstream of `feed_port` and initialize it in
/// flow order. Returns the product port (stage 1 permeate, or the blended
/// permeate for a two-stage train).
///
/// The second stage recovers additional water from the first stage's
/// concentrate at a higher pressure and a lower recovery.
pub fn build_desalination(
    fs: &mut Flowsheet,
    package: &PropertyPackage,
    feed_port: PortRef,
    spec: &ResolvedDesalination,
) -> AppResult<PortRef> {
    info!(
        two_stage = spec.two_stage,
        ro_model = spec.ro_model.key(),
        "building RO train"
    );

    fs.pump_ro = Some(Pump::new(
        "pump_RO",
        package,
        PumpClass::HighPressure,
        bar(spec.stage1_pressure_bar),
        PUMP_EFFICIENCY,
    )?);
    fs.ro = Some(ReverseOsmosis::new("RO", package, spec.ro_model));

    let feed_pump = fs.connect(
        "s_desal_feed_pumpRO",
        feed_port,
        PortRef::new(BlockTag::PumpRo, PortTag::Inlet),
    );
    let pump_ro = fs.connect(
        "s_desal_pumpRO_RO",
        PortRef::new(BlockTag::PumpRo, PortTag::Outlet),
        PortRef::new(BlockTag::Ro, PortTag::Inlet),
    );

    if !spec.two_stage {
        propagate_state(fs, feed_pump)?;
        if let Some(pump) = fs.pump_ro.as_mut() {
            pump.initialize()?;
        }
        propagate_state(fs, pump_ro)?;
        if let Some(ro) = fs.ro.as_mut() {
            match spec.ro_model {
                RoModel::Separator => ro.seed_default_outlets()?,
                RoModel::Simplified0D => ro.initialize()?,
            }
        }
        return Ok(PortRef::new(BlockTag::Ro, PortTag::Permeate));
    }

    // Stage 2 works the stage 1 concentrate at higher pressure.
    fs.pump_ro2 = Some(Pump::new(
        "pump_RO2",
        package,
        PumpClass::HighPressure,
        bar(spec.stage2_pressure_bar),
        PUMP_EFFICIENCY,
    )?);
    fs.ro2 = Some({
        let mut ro2 = ReverseOsmosis::new("RO2", package, spec.ro_model);
        ro2.set_water_recovery(RO2_RECOVERY)?;
        ro2
    });
    fs.permeate_mixer = Some(Mixer::new("permeate_mixer", &["stage1", "stage2"])?);

    let ro_pump2 = fs.connect(
        "s_desal_RO_pumpRO2",
        PortRef::new(BlockTag::Ro, PortTag::Retentate),
        PortRef::new(BlockTag::PumpRo2, PortTag::Inlet),
    );
    let pump2_ro2 = fs.connect(
        "s_desal_pumpRO2_RO2",
        PortRef::new(BlockTag::PumpRo2, PortTag::Outlet),
        PortRef::new(BlockTag::Ro2, PortTag::Inlet),
    );
    let perm1 = fs.connect(
        "s_desal_RO_permmixer",
        PortRef::new(BlockTag::Ro, PortTag::Permeate),
        PortRef::new(BlockTag::PermeateMixer, PortTag::Stage1),
    );
    let perm2 = fs.connect(
        "s_desal_RO2_permmixer",
        PortRef::new(BlockTag::Ro2, PortTag::Permeate),
        PortRef::new(BlockTag::PermeateMixer, PortTag::Stage2),
    );

    if let Some(mixer) = fs.permeate_mixer.as_mut() {
        calculate_scaling_factors(mixer, package);
    }

    // initialize in flow order
    propagate_state(fs, feed_pump)?;
    if let Some(pump) = fs.pump_ro.as_mut() {
        pump.initialize()?;
    }
    propagate_state(fs, pump_ro)?;
    if let Some(ro) = fs.ro.as_mut() {
        match spec.ro_model {
            RoModel::Separator => ro.seed_default_outlets()?,
            RoModel::Simplified0D => ro.initialize()?,
        }
    }
    propagate_state(fs, ro_pump2)?;
    if let Some(pump) = fs.pump_ro2.as_mut() {
        pump.initialize()?;
    }
    propagate_state(fs, pump2_ro2)?;
    if let Some(ro2) = fs.ro2.as_mut() {
        match spec.ro_model {
            RoModel::Separator => ro2.seed_default_outlets()?,
            RoModel::Simplified0D => ro2.initialize()?,
        }
    }
    propagate_state(fs, perm1)?;
    propagate_state(fs, perm2)?;
    if spec.ro_model != RoModel::Separator {
        // With seeded zero permeates there is nothing to blend yet; the
        // solve computes the mixer on its first pass.
        if let Some(mixer) = fs.permeate_mixer.as_mut() {
            mixer.initialize()?;
        }
    }

    Ok(PortRef::new(BlockTag::PermeateMixer, PortTag::Outlet))
}

/// Attach a chemical-dosing mixer downstream of `upstream` and return its
/// outlet port. The chemical make-up inlet is fixed at construction; only
/// the process inlet is wired with an arc.
pub fn attach_dosing_mixer(
    fs: &mut Flowsheet,
    package: &PropertyPackage,
    upstream: PortRef,
    class: MixerClass,
) -> AppResult<PortRef> {
    let (tag, name, dose) = match class {
        MixerClass::LimeSoftening => (BlockTag::SofteningMixer, "softening_mixer", LIME_DOSE_KGPS),
        MixerClass::HypochloriteMixer => (
            BlockTag::HypochloriteMixer,
            "hypochlorite_mixer",
            NAOCL_DOSE_KGPS,
        ),
    };
    info!(mixer = name, "attaching dosing mixer");

    let mut mixer = Mixer::new(name, &["inlet", "chemical"])?;
    mixer.set_inlet(
        "chemical",
        Stream::new(k(298.15), pa(P_ATM_PA), kgps(dose), vec![])?,
    )?;
    calculate_scaling_factors(&mut mixer, package);
    match tag {
        BlockTag::SofteningMixer => fs.softening_mixer = Some(mixer),
        _ => fs.hypochlorite_mixer = Some(mixer),
    }

    let arc = fs.connect(
        format!("s_dose_{name}"),
        upstream,
        PortRef::new(tag, PortTag::Inlet),
    );
    propagate_state(fs, arc)?;
    if let Some(mixer) = match tag {
        BlockTag::SofteningMixer => fs.softening_mixer.as_mut(),
        _ => fs.hypochlorite_mixer.as_mut(),
    } {
        mixer.initialize()?;
    }

    Ok(PortRef::new(tag, PortTag::Outlet))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pretreatment::build_pretreatment_nf;
    use wt_components::NfModel;
    use wt_props::Basis;

    fn spec(two_stage: bool) -> ResolvedDesalination {
        ResolvedDesalination {
            two_stage,
            ro_model: RoModel::Simplified0D,
            stage1_pressure_bar: 65.0,
            stage2_pressure_bar: 85.0,
        }
    }

    fn pretreat(fs: &mut Flowsheet, package: &PropertyPackage) -> PortRef {
        build_pretreatment_nf(fs, package, true, NfModel::ZeroOrder)
            .unwrap()
            .product
    }

    #[test]
    fn single_stage_product_is_the_ro_permeate() {
        let package = PropertyPackage::new(Basis::Ion);
        let mut fs = Flowsheet::new();
        let feed_port = pretreat(&mut fs, &package);
        let product = build_desalination(&mut fs, &package, feed_port, &spec(false)).unwrap();
        assert_eq!(product, PortRef::new(BlockTag::Ro, PortTag::Permeate));
        assert!(fs.has_block(BlockTag::PumpRo));
        assert!(!fs.has_block(BlockTag::PumpRo2));
        assert!(!fs.has_block(BlockTag::Ro2));
    }

    #[test]
    fn two_stage_blends_both_permeates() {
        let package = PropertyPackage::new(Basis::Ion);
        let mut fs = Flowsheet::new();
        let feed_port = pretreat(&mut fs, &package);
        let product = build_desalination(&mut fs, &package, feed_port, &spec(true)).unwrap();
        assert_eq!(
            product,
            PortRef::new(BlockTag::PermeateMixer, PortTag::Outlet)
        );
        let blended = fs.require_port_stream(product).unwrap();
        let p1 = fs
            .require_port_stream(PortRef::new(BlockTag::Ro, PortTag::Permeate))
            .unwrap();
        let p2 = fs
            .require_port_stream(PortRef::new(BlockTag::Ro2, PortTag::Permeate))
            .unwrap();
        assert!(
            (blended.total_flow().value - p1.total_flow().value - p2.total_flow().value).abs()
                < 1e-12
        );
    }

    #[test]
    fn dosing_mixer_carries_its_chemical_feed() {
        let package = PropertyPackage::new(Basis::Ion);
        let mut fs = Flowsheet::new();
        let feed_port = pretreat(&mut fs, &package);
        let outlet =
            attach_dosing_mixer(&mut fs, &package, feed_port, MixerClass::HypochloriteMixer)
                .unwrap();
        assert_eq!(
            outlet,
            PortRef::new(BlockTag::HypochloriteMixer, PortTag::Outlet)
        );
        let mx = fs.hypochlorite_mixer.as_ref().unwrap();
        assert!(mx.inlet("chemical").is_some());
        assert!(mx.is_initialized());
    }
}
