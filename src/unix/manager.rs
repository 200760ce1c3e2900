/*!
 * Unix Signal Manager
 * Host OS family adapter: per-code handler fan-out over one native hook
 */

use crate::core::types::SignalCode;
use crate::signals::{
    DomainHandlerFn, DomainSignal, FamilyDescriptor, Signal, SignalContext, SignalDefinition,
    SignalHubError, SignalManager, SignalResult,
};
use crate::unix::codes::UnixSignal;
use crate::unix::source::{RawNotifyFn, RawSignalSource};
use ahash::RandomState;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use log::{debug, info};
use std::any::Any;
use std::sync::Arc;

/// Family tag served by [`UnixSignalManager`].
pub const UNIX_FAMILY: &str = "UNIX";

/// Opaque payload wrapping one raw native delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnixDomainSignal {
    code: SignalCode,
}

impl UnixDomainSignal {
    pub fn new(code: SignalCode) -> Self {
        Self { code }
    }

    pub fn code(&self) -> SignalCode {
        self.code
    }
}

impl DomainSignal for UnixDomainSignal {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Manager for the host OS signal family.
///
/// Installs exactly one native hook per signal code and fans each delivery
/// out to the handler list registered for that code. Unregistering removes
/// the bookkeeping only; the native installation stays and is reused when
/// the code is registered again.
pub struct UnixSignalManager {
    descriptor: FamilyDescriptor,
    source: Arc<dyn RawSignalSource>,
    handlers: Arc<DashMap<SignalCode, Vec<DomainHandlerFn>, RandomState>>,
    installed: DashMap<SignalCode, (), RandomState>,
}

impl UnixSignalManager {
    /// Creates a manager over the given native source.
    pub fn new(source: Arc<dyn RawSignalSource>) -> SignalResult<Self> {
        Ok(Self {
            descriptor: FamilyDescriptor::new::<UnixDomainSignal>(UNIX_FAMILY)?,
            source,
            handlers: Arc::new(DashMap::with_hasher(RandomState::new())),
            installed: DashMap::with_hasher(RandomState::new()),
        })
    }

    /// Creates a manager listening on the real OS signal mechanism.
    /// Must be used from within a Tokio runtime.
    #[cfg(unix)]
    pub fn with_tokio_source() -> SignalResult<Self> {
        Self::new(Arc::new(crate::unix::source::TokioSignalSource::new()))
    }

    /// Number of handlers currently registered for `code`.
    pub fn handler_count(&self, code: SignalCode) -> usize {
        self.handlers.get(&code).map_or(0, |entry| entry.value().len())
    }

    /// Installs the native hook for `signal` once; later registrations for
    /// the same code reuse it.
    fn ensure_installed(&self, signal: UnixSignal) -> SignalResult<()> {
        let code = signal.code();
        match self.installed.entry(code) {
            Entry::Occupied(_) => return Ok(()),
            Entry::Vacant(slot) => {
                slot.insert(());
            }
        }

        let handlers = Arc::clone(&self.handlers);
        let notify: RawNotifyFn = Arc::new(move || {
            // Clone the list out so no map lock is held while handlers run.
            let callbacks: Vec<DomainHandlerFn> = handlers
                .get(&code)
                .map(|entry| entry.value().clone())
                .unwrap_or_default();
            for callback in callbacks {
                callback(Box::new(UnixDomainSignal::new(code)));
            }
        });

        if let Err(err) = self.source.install(signal, notify) {
            self.installed.remove(&code);
            return Err(err);
        }
        info!("native hook installed for {}", signal);
        Ok(())
    }
}

impl SignalManager for UnixSignalManager {
    fn descriptor(&self) -> &FamilyDescriptor {
        &self.descriptor
    }

    fn build_signal(&self, context: &SignalContext) -> SignalResult<Signal> {
        let domain = context.domain_as::<UnixDomainSignal>().ok_or_else(|| {
            SignalHubError::DomainTypeMismatch {
                family: self.family().to_string(),
            }
        })?;
        UnixSignal::from_code(domain.code())?;
        Ok(Signal::new(self.family(), domain.code(), context.captured_at()))
    }

    fn register_handler(
        &self,
        definition: &SignalDefinition,
        handler: DomainHandlerFn,
    ) -> SignalResult<()> {
        let signal = UnixSignal::from_code(definition.code())?;
        self.ensure_installed(signal)?;
        self.handlers
            .entry(definition.code())
            .or_default()
            .push(handler);
        debug!("handler registered for {}", signal);
        Ok(())
    }

    fn unregister_handlers(&self, definition: &SignalDefinition) -> bool {
        let removed = self.handlers.remove(&definition.code()).is_some();
        if removed {
            debug!("handlers removed for code {}", definition.code());
        }
        removed
    }
}
