//! wt-components: unit-block models for desalination treatment trains.
//!
//! Each unit owns its port states: construction fixes the specifications,
//! `evaluate` computes outlet streams from inlet streams, and the solver
//! propagates outlet states downstream along arcs. Variant selection
//! (zero-order vs. idealized separator membranes) is an enum resolved at
//! construction, never re-derived from strings later.

pub mod block;
pub mod error;
pub mod feed;
pub mod mixer;
pub mod nf;
pub mod pump;
pub mod ro;
pub mod splitter;

pub use block::{UnitBlock, UnitCosting};
pub use error::{ComponentError, ComponentResult};
pub use feed::Feed;
pub use mixer::Mixer;
pub use nf::{Nanofiltration, NfModel};
pub use pump::{Pump, PumpClass};
pub use ro::{ReverseOsmosis, RoModel};
pub use splitter::Splitter;
