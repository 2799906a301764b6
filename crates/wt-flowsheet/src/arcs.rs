//! Directed flow arcs.

use crate::ports::PortRef;
use wt_core::ArcId;

/// A declared directed connection from one block's outlet port to another
/// block's inlet port.
///
/// Declaration order is load-bearing: the solver propagates states along
/// arcs in the order they were declared.
#[derive(Debug, Clone)]
pub struct Arc {
    pub id: ArcId,
    pub name: String,
    pub source: PortRef,
    pub destination: PortRef,
}
