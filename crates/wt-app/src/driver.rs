//! Standalone build-and-solve drivers.

use tracing::info;
use wt_components::NfModel;
use wt_costing::{
    build_cost_report, cost_flowsheet, CostModel, CostReport, StandardCostModel, SystemCosting,
};
use wt_flowsheet::Flowsheet;
use wt_props::{Basis, PropertyPackage};
use wt_solver::{check_dof, solve_with_user_scaling, SolveOptions, SolveReport};

use crate::error::AppResult;
use crate::pretreatment::{build_pretreatment_nf, PretreatmentPorts};
use crate::schema::TrainConfig;
use crate::train::{attach_dosing_mixer, build_desalination};

/// A standalone model: one flowsheet plus the property package it was
/// built on.
#[derive(Debug)]
pub struct Model {
    pub flowsheet: Flowsheet,
    pub package: PropertyPackage,
}

/// Build, expand, check, and solve a standalone pretreatment network.
///
/// This is packaging around [`build_pretreatment_nf`]: arc expansion,
/// the zero-degrees-of-freedom gate, and the scaled solve with hard
/// failure on non-convergence.
pub fn solve_pretreatment(
    has_bypass: bool,
    nf_model: NfModel,
    basis: Basis,
) -> AppResult<(Model, PretreatmentPorts, SolveReport)> {
    let package = PropertyPackage::new(basis);
    let mut fs = Flowsheet::new();
    let ports = build_pretreatment_nf(&mut fs, &package, has_bypass, nf_model)?;
    fs.product_port = Some(ports.product);

    fs.expand_arcs()?;
    check_dof(&fs)?;
    let report = solve_with_user_scaling(&mut fs, &SolveOptions::default())?;
    info!(passes = report.passes, "pretreatment solved");

    Ok((
        Model {
            flowsheet: fs,
            package,
        },
        ports,
        report,
    ))
}

/// A solved and costed treatment train.
#[derive(Debug)]
pub struct TrainRun {
    pub model: Model,
    pub solve: SolveReport,
    pub costing: SystemCosting,
    pub report: CostReport,
}

/// Build the full train a config describes, solve it, cost it, and build
/// the cost report.
pub fn run_train(config: &TrainConfig) -> AppResult<TrainRun> {
    let resolved = config.resolve()?;
    info!(train = %resolved.name, "running treatment train");

    let package = PropertyPackage::new(resolved.basis);
    let mut fs = Flowsheet::new();

    let pretreatment =
        build_pretreatment_nf(&mut fs, &package, resolved.has_bypass, resolved.nf_model)?;
    let mut product = pretreatment.product;

    if resolved.posttreatment.lime_softening {
        product = attach_dosing_mixer(
            &mut fs,
            &package,
            product,
            wt_costing::MixerClass::LimeSoftening,
        )?;
    }
    if let Some(desal) = &resolved.desalination {
        product = build_desalination(&mut fs, &package, product, desal)?;
    }
    if resolved.posttreatment.chlorination {
        product = attach_dosing_mixer(
            &mut fs,
            &package,
            product,
            wt_costing::MixerClass::HypochloriteMixer,
        )?;
    }
    fs.product_port = Some(product);

    fs.expand_arcs()?;
    check_dof(&fs)?;
    let solve = solve_with_user_scaling(&mut fs, &SolveOptions::default())?;

    let cost_model = StandardCostModel::default();
    let costing = cost_flowsheet(&mut fs, &cost_model)?;
    let report = build_cost_report(&fs, &costing, cost_model.params());

    Ok(TrainRun {
        model: Model {
            flowsheet: fs,
            package,
        },
        solve,
        costing,
        report,
    })
}

/// The default standalone configuration: bypass enabled, zero-order NF,
/// ion-basis chemistry.
pub fn default_pretreatment() -> AppResult<(Model, PretreatmentPorts, SolveReport)> {
    solve_pretreatment(true, NfModel::ZeroOrder, Basis::Ion)
}
