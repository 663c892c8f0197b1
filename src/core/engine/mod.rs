//! Plan engine: elective selection, course matching, reconciliation,
//! and completeness tracking

pub mod completeness;
pub mod matching;
pub mod reconcile;
pub mod selection;

pub use completeness::{ects_shortfall, is_complete, total_matched_ects};
pub use matching::{EquivalenceTable, MatchEngine};
pub use reconcile::{reconcile, Reconciliation};
pub use selection::{effective_subjects, toggle_selection, total_credits};
