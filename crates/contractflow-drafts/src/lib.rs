//! Draft registry for contractflow
//!
//! Keeps every document version of every contract in the workspace as an
//! immutable [`Draft`]. Registering a new baseline demotes the previous one
//! to [`DraftRole::SupersededBaseline`] without removing it, so audit
//! history stays addressable by id.

mod draft;
mod registry;

pub use draft::{Draft, DraftRole};
pub use registry::{DraftRegistry, RegisterOptions};
