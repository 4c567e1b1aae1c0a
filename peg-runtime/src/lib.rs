pub mod cursor;
pub mod tracker;

pub use cursor::{Cursor, EOI};
pub use peg_common::{CapturePosition, ErrorsMark, Mark};
pub use tracker::{ErrorRecord, ErrorTracker};
