//! State propagation along arcs.

use tracing::debug;
use wt_core::ArcId;
use wt_flowsheet::Flowsheet;

use crate::error::{SolverError, SolverResult};

/// Copy the computed stream at an arc's source port into its destination
/// port.
///
/// The source unit must already be initialized; propagating from an
/// uncomputed port is an error, which is what enforces the topological
/// initialization order.
pub fn propagate_state(fs: &mut Flowsheet, arc: ArcId) -> SolverResult<()> {
    let (name, source, destination) = {
        let arc = fs.arc(arc).ok_or(SolverError::ProblemSetup {
            what: "unknown arc id",
        })?;
        (arc.name.clone(), arc.source, arc.destination)
    };
    let stream = fs.require_port_stream(source)?.clone();
    fs.set_port_stream(destination, stream)?;
    debug!(arc = %name, %source, %destination, "propagated state");
    Ok(())
}
