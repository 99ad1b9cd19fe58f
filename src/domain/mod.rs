//! Domain logic - version records and proposals, independent of the console

pub mod assignment;
pub mod record;
pub mod version;

pub use assignment::{Assignment, AssignmentPattern, CONFIG_VERSION_KEY, MODULE_VERSION_KEY};
pub use record::{DocumentKind, VersionRecord};
pub use version::{propose_next, VersionProposal};
