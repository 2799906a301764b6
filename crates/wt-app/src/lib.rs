//! wt-app: the service layer tying the watertrain crates together.
//!
//! Exposes the treatment-train configuration schema, the network builders
//! (pretreatment with optional bypass, one- or two-stage reverse osmosis,
//! dosing mixers), and the standalone driver that builds, expands,
//! checks degrees of freedom, solves, and costs a whole train.

pub mod driver;
pub mod error;
pub mod pretreatment;
pub mod schema;
pub mod train;

pub use driver::{run_train, solve_pretreatment, Model, TrainRun};
pub use error::{AppError, AppResult};
pub use pretreatment::{
    build_pretreatment_nf, build_pretreatment_nf_from_token, PretreatmentPorts,
    DEFAULT_BYPASS_SPLIT,
};
pub use schema::{
    DesalinationConfig, PosttreatmentConfig, PretreatmentConfig, ResolvedDesalination,
    ResolvedTrain, TrainConfig,
};
pub use train::{attach_dosing_mixer, build_desalination};
