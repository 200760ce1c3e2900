/*!
 * Signal Manager Contract
 * Capability trait implemented once per signal family
 */

use super::family::FamilyDescriptor;
use super::types::{DomainSignal, Signal, SignalContext, SignalDefinition, SignalResult};
use std::any::TypeId;
use std::sync::Arc;

/// Callback a manager invokes with a fresh domain payload when a matching
/// raw event fires.
pub type DomainHandlerFn = Arc<dyn Fn(Box<dyn DomainSignal>) + Send + Sync>;

/// Adapter bound to one signal family.
///
/// One long-lived instance per family, created at process start and handed
/// to the subscription service, which resolves it by family tag at
/// subscribe time and by domain payload type at dispatch time.
pub trait SignalManager: Send + Sync {
    /// Family tag plus the domain payload type token, declared explicitly
    /// at construction.
    fn descriptor(&self) -> &FamilyDescriptor;

    /// Stable identifier of the family this manager serves; unique across
    /// all registered managers.
    fn family(&self) -> &str {
        self.descriptor().family()
    }

    /// Runtime type token of this manager's domain payload.
    fn domain_signal_type(&self) -> TypeId {
        self.descriptor().domain_type()
    }

    /// Pure translation from a raw payload and capture timestamp to the
    /// typed signal. Runs on the shared dispatch thread for all families,
    /// so it must be fast and side-effect free.
    fn build_signal(&self, context: &SignalContext) -> SignalResult<Signal>;

    /// Installs `handler` with the external source so that matching raw
    /// events invoke it with a fresh domain payload. Distinct definitions
    /// of the same family each get their own underlying registration.
    fn register_handler(
        &self,
        definition: &SignalDefinition,
        handler: DomainHandlerFn,
    ) -> SignalResult<()>;

    /// Reverses registration for exactly `definition`. Returns whether
    /// anything was actually removed; never errors when nothing was
    /// registered.
    fn unregister_handlers(&self, definition: &SignalDefinition) -> bool;
}
