//! Independent dataset detectors: duplicates, PII and demographic bias.
//!
//! Each detector runs over the same immutable dataset with no data
//! dependency on the others; the orchestrator fans out to them and the
//! metrics/scoring stages fan their outputs back in.

mod bias;
mod duplicates;
mod pii;

pub use bias::BiasDetector;
pub use duplicates::DuplicateDetector;
pub use pii::{COLUMN_NAME_MATCH, PiiDetector};
