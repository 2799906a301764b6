//! wt-flowsheet: the treatment-train flowsheet container.
//!
//! A flowsheet holds a fixed set of optional unit blocks under reserved
//! names, plus the directed arcs connecting their ports. Which blocks are
//! present is expressed with `Option` fields resolved at construction time;
//! downstream code (the costing dispatcher in particular) branches on
//! presence, never on runtime attribute lookup.
//!
//! Arcs are declared first and expanded later: expansion validates every
//! endpoint and freezes the declaration order that the solver uses for
//! state propagation.

pub mod arcs;
pub mod error;
pub mod flowsheet;
pub mod ports;
mod validate;

pub use arcs::Arc;
pub use error::{FlowsheetError, FlowsheetResult};
pub use flowsheet::Flowsheet;
pub use ports::{port_kind, BlockTag, PortKind, PortRef, PortTag};
