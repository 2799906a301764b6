//! wt-props: property packages for desalination flowsheets.
//!
//! A property package fixes the chemistry basis a flowsheet is built on:
//! which solute species exist, the default seawater feed composition, and
//! the default scaling factors for those species. Unit models and the
//! solver stay basis-agnostic by working through [`Stream`] states.

pub mod error;
pub mod package;
pub mod scaling;
pub mod solute;
pub mod stream;

pub use error::{PropError, PropResult};
pub use package::{Basis, PropertyPackage};
pub use scaling::ScalingFactors;
pub use solute::Solute;
pub use stream::Stream;
