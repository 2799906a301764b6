//! Arc validation logic.

use std::collections::HashSet;

use crate::arcs::Arc;
use crate::error::{FlowsheetError, FlowsheetResult};
use crate::flowsheet::Flowsheet;
use crate::ports::{port_kind, PortKind, PortRef};

/// Validate every declared arc against the blocks actually present.
///
/// Checks that both endpoints reference present blocks and legal ports,
/// that each arc runs outlet to inlet, and that no inlet port receives
/// more than one arc.
pub(crate) fn validate_arcs(fs: &Flowsheet) -> FlowsheetResult<()> {
    let mut destinations: HashSet<PortRef> = HashSet::new();

    for arc in fs.arcs() {
        check_endpoint(fs, arc, arc.source, PortKind::Outlet)?;
        check_endpoint(fs, arc, arc.destination, PortKind::Inlet)?;

        if !destinations.insert(arc.destination) {
            return Err(FlowsheetError::DuplicateDestination {
                block: arc.destination.block.key(),
                port: arc.destination.port.key(),
            });
        }
    }
    Ok(())
}

fn check_endpoint(
    fs: &Flowsheet,
    arc: &Arc,
    port: PortRef,
    expected: PortKind,
) -> FlowsheetResult<()> {
    if !fs.has_block(port.block) {
        return Err(FlowsheetError::BlockAbsent {
            block: port.block.key(),
        });
    }
    match port_kind(port.block, port.port) {
        None => Err(FlowsheetError::NoSuchPort {
            block: port.block.key(),
            port: port.port.key(),
        }),
        Some(kind) if kind != expected => Err(FlowsheetError::PortDirection {
            arc: arc.name.clone(),
        }),
        Some(_) => Ok(()),
    }
}
