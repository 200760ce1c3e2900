/*!
 * Unix Module
 * Host OS signal family: codes, native sources, manager
 */

mod codes;
mod manager;
mod source;

pub use codes::{Disposition, UnixSignal};
pub use manager::{UnixDomainSignal, UnixSignalManager, UNIX_FAMILY};
pub use source::{ManualSignalSource, RawNotifyFn, RawSignalSource};

#[cfg(unix)]
pub use source::TokioSignalSource;
