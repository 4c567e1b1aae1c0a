//! peg-common
//!
//! Value types shared by the runtime state and the combinator engine:
//! backtracking marks and the packed capture representation.

pub mod capture;
pub mod checkpoint;

pub use capture::CapturePosition;
pub use checkpoint::{CapturesMark, Checkpoint, ErrorsMark, Mark};
