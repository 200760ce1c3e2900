/*!
 * Signals Module
 * Typed publish/subscribe registry over pluggable signal families
 */

mod directory;
mod dispatcher;
mod family;
mod service;
mod traits;
mod types;

// Re-export public API
pub use directory::ManagerDirectory;
pub use dispatcher::DispatcherStatsSnapshot;
pub use family::FamilyDescriptor;
pub use service::{ServiceConfig, SignalSubscriptionService};
pub use traits::{DomainHandlerFn, SignalManager};
pub use types::{
    DomainSignal, Signal, SignalContext, SignalDefinition, SignalHubError, SignalResult,
};
