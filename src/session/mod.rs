//! Exam session timing.

mod clock;
mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use timer::{Phase, SessionSnapshot, SessionTimer, SubjectChange};
