/*!
 * Core Module
 * Shared primitives: type aliases, clock abstraction, limits
 */

pub mod clock;
pub mod limits;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use types::{FamilyTag, SignalCode};
