//! Sequential-modular steady solve.

use std::collections::HashMap;

use tracing::{debug, info};
use wt_flowsheet::{port_kind, BlockTag, Flowsheet, PortKind, PortRef, PortTag};
use wt_props::{ScalingFactors, Stream};

use crate::dof::check_dof;
use crate::error::{SolverError, SolverResult};

/// Options for [`solve_with_user_scaling`].
#[derive(Debug, Clone)]
pub struct SolveOptions {
    /// Scaled residual below which the solve is converged.
    pub tolerance: f64,
    /// Maximum evaluate-and-propagate passes over the flowsheet.
    pub max_passes: usize,
    /// Fail with an error on non-convergence instead of reporting it.
    pub fail_on_nonconverge: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            tolerance: 1.0e-8,
            max_passes: 20,
            fail_on_nonconverge: true,
        }
    }
}

/// Outcome of a solve.
#[derive(Debug, Clone)]
pub struct SolveReport {
    pub passes: usize,
    pub residual: f64,
    pub converged: bool,
}

/// Solve the flowsheet to a fixed point using each block's scaling factors
/// for the residual norm.
///
/// Blocks are evaluated in flow order and states pushed along arcs in
/// declaration order until port states stop changing. Arcs must already be
/// expanded and the model must have zero degrees of freedom.
pub fn solve_with_user_scaling(
    fs: &mut Flowsheet,
    options: &SolveOptions,
) -> SolverResult<SolveReport> {
    if !fs.is_expanded() {
        return Err(SolverError::NotExpanded);
    }
    check_dof(fs)?;

    let order = flow_order(fs)?;
    info!(
        blocks = order.len(),
        arcs = fs.arcs().len(),
        "starting sequential-modular solve"
    );

    let mut previous = snapshot(fs);
    let mut residual = f64::INFINITY;
    let mut passes = 0;

    while passes < options.max_passes {
        run_pass(fs, &order)?;
        passes += 1;

        if let Some(tag) = order.iter().find(|t| {
            fs.block(**t)
                .map(|b| !b.is_initialized())
                .unwrap_or(false)
        }) {
            debug!(block = %tag, "block not reached by any arc");
            return Err(SolverError::ProblemSetup {
                what: "a block's inlet is not fed by any arc",
            });
        }

        let current = snapshot(fs);
        residual = snapshot_delta(fs, &previous, &current);
        debug!(pass = passes, residual, "pass complete");
        if residual <= options.tolerance {
            info!(passes, residual, "solve converged");
            return Ok(SolveReport {
                passes,
                residual,
                converged: true,
            });
        }
        previous = current;
    }

    if options.fail_on_nonconverge {
        Err(SolverError::NotConverged { residual, passes })
    } else {
        Ok(SolveReport {
            passes,
            residual,
            converged: false,
        })
    }
}

/// One evaluate-and-propagate sweep in flow order.
fn run_pass(fs: &mut Flowsheet, order: &[BlockTag]) -> SolverResult<()> {
    for &tag in order {
        let ready = fs.block(tag).map(|b| b.is_ready()).unwrap_or(false);
        if ready {
            if let Some(block) = fs.block_mut(tag) {
                block.evaluate()?;
            }
        }
        let outgoing: Vec<_> = fs
            .arcs()
            .iter()
            .filter(|a| a.source.block == tag)
            .map(|a| a.id)
            .collect();
        for arc in outgoing {
            // A not-yet-ready source simply waits for a later pass.
            let source_computed = {
                let a = fs.arc(arc).expect("arc id from iteration");
                fs.port_stream(a.source)?.is_some()
            };
            if source_computed {
                crate::propagate::propagate_state(fs, arc)?;
            }
        }
    }
    Ok(())
}

/// Topological flow order of the present blocks (Kahn's algorithm over the
/// arc adjacency, with canonical order breaking ties for determinism).
fn flow_order(fs: &Flowsheet) -> SolverResult<Vec<BlockTag>> {
    let present = fs.present_blocks();
    let mut indegree: HashMap<BlockTag, usize> =
        present.iter().map(|t| (*t, 0)).collect();
    for arc in fs.arcs() {
        if arc.source.block != arc.destination.block {
            if let Some(d) = indegree.get_mut(&arc.destination.block) {
                *d += 1;
            }
        }
    }

    let mut order = Vec::with_capacity(present.len());
    let mut emitted: HashMap<BlockTag, bool> =
        present.iter().map(|t| (*t, false)).collect();

    while order.len() < present.len() {
        let next = BlockTag::ALL.into_iter().find(|t| {
            emitted.get(t) == Some(&false) && indegree.get(t) == Some(&0)
        });
        let Some(tag) = next else {
            return Err(SolverError::Cyclic);
        };
        emitted.insert(tag, true);
        order.push(tag);
        for arc in fs.arcs() {
            if arc.source.block == tag && arc.destination.block != tag {
                if let Some(d) = indegree.get_mut(&arc.destination.block) {
                    *d = d.saturating_sub(1);
                }
            }
        }
        // Mark so it is never picked again.
        indegree.insert(tag, usize::MAX);
    }
    Ok(order)
}

/// All computed outlet-port states, keyed by port reference.
fn snapshot(fs: &Flowsheet) -> Vec<(PortRef, Stream)> {
    let mut states = Vec::new();
    for tag in fs.present_blocks() {
        for port in PortTag::ALL {
            if port_kind(tag, port) != Some(PortKind::Outlet) {
                continue;
            }
            let r = PortRef::new(tag, port);
            if let Ok(Some(stream)) = fs.port_stream(r) {
                states.push((r, stream.clone()));
            }
        }
    }
    states
}

/// Largest scaled per-port change between two snapshots.
fn snapshot_delta(
    fs: &Flowsheet,
    previous: &[(PortRef, Stream)],
    current: &[(PortRef, Stream)],
) -> f64 {
    let mut delta: f64 = 0.0;
    for (r, stream) in current {
        let sf = fs
            .block(r.block)
            .and_then(|b| b.scaling().copied())
            .unwrap_or_default();
        match previous.iter().find(|(p, _)| p == r) {
            Some((_, prior)) => delta = delta.max(stream.scaled_delta(prior, &sf)),
            // A port computed for the first time this pass.
            None => return f64::INFINITY,
        }
    }
    delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use wt_components::{Feed, Mixer, Nanofiltration, NfModel, Splitter};
    use wt_props::{Basis, PropertyPackage};

    fn pkg() -> PropertyPackage {
        PropertyPackage::new(Basis::Ion)
    }

    fn feed_nf_flowsheet() -> Flowsheet {
        let pkg = pkg();
        let mut fs = Flowsheet::new();
        fs.feed = Some(Feed::new("feed", &pkg));
        fs.nf = Some(Nanofiltration::new("NF", &pkg, NfModel::ZeroOrder));
        fs.connect(
            "feed_to_NF",
            PortRef::new(BlockTag::Feed, PortTag::Outlet),
            PortRef::new(BlockTag::Nf, PortTag::Inlet),
        );
        fs
    }

    #[test]
    fn solve_requires_expanded_arcs() {
        let mut fs = feed_nf_flowsheet();
        let err = solve_with_user_scaling(&mut fs, &SolveOptions::default()).unwrap_err();
        assert!(matches!(err, SolverError::NotExpanded));
    }

    #[test]
    fn feed_forward_network_converges_to_zero_residual() {
        let mut fs = feed_nf_flowsheet();
        fs.expand_arcs().unwrap();
        let report = solve_with_user_scaling(&mut fs, &SolveOptions::default()).unwrap();
        assert!(report.converged);
        assert_eq!(report.residual, 0.0);
        assert!(fs.nf.as_ref().unwrap().permeate().is_some());
    }

    #[test]
    fn under_specified_splitter_blocks_the_solve() {
        let mut fs = feed_nf_flowsheet();
        fs.splitter = Some(Splitter::new("splitter", &["pretreatment", "bypass"]).unwrap());
        fs.expand_arcs().unwrap();
        let err = solve_with_user_scaling(&mut fs, &SolveOptions::default()).unwrap_err();
        assert!(matches!(err, SolverError::UnderSpecified { dof: 1 }));
    }

    #[test]
    fn cycle_is_detected() {
        let mut fs = Flowsheet::new();
        fs.splitter = Some({
            let mut sp = Splitter::new("splitter", &["pretreatment", "bypass"]).unwrap();
            sp.fix_split_fraction("bypass", 0.1).unwrap();
            sp
        });
        fs.mixer = Some(Mixer::new("mixer", &["pretreatment", "bypass"]).unwrap());
        fs.connect(
            "splitter_to_mixer",
            PortRef::new(BlockTag::Splitter, PortTag::Pretreatment),
            PortRef::new(BlockTag::Mixer, PortTag::Pretreatment),
        );
        fs.connect(
            "mixer_back_to_splitter",
            PortRef::new(BlockTag::Mixer, PortTag::Outlet),
            PortRef::new(BlockTag::Splitter, PortTag::Inlet),
        );
        fs.expand_arcs().unwrap();
        let err = solve_with_user_scaling(&mut fs, &SolveOptions::default()).unwrap_err();
        assert!(matches!(err, SolverError::Cyclic));
    }
}
