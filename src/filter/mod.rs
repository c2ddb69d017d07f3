//! Cascading filter derivations over the loaded snapshot.
//!
//! Offices depend on AORs; topics and instructors on AOR + office
//! reachability through the fact tables; locations additionally on the
//! topic and instructor selections; classes on everything upstream. All
//! derivations are pure functions of (snapshot, selections) and return
//! empty collections while the manager is not ready.

mod engine;
pub mod options;
mod selection;

pub use engine::{ClassResult, FilterEngine};
pub use selection::{Selection, ALL_SENTINEL};
