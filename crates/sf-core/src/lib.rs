//! sf-core: stable foundation for slidefig.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers + linspace)
//! - interval (validated closed ranges used for domains and viewports)
//! - clock (monotonic time source, injectable for tests)
//! - error (shared error types)

pub mod clock;
pub mod error;
pub mod interval;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use error::{CoreError, CoreResult};
pub use interval::Interval;
pub use numeric::*;
