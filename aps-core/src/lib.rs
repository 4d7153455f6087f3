//! Core building blocks for the APS resource provider.
//!
//! Pure, side-effect free pieces shared by every crate in the workspace:
//! the error taxonomy, identifier resolution, tag reconciliation and the
//! continuation blob codec.

pub mod arn;
pub mod context;
pub mod error;
pub mod tags;

pub use arn::{parse_arn, ResourceArn, ResourceKind};
pub use context::CallbackContext;
pub use error::{ApsError, ErrorCode, Result};
pub use tags::{Tag, TagDiff, TagMap};
