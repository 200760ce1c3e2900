/*!
 * Signal Types
 * Data model of the subscription subsystem: typed signals, subscription
 * keys, opaque domain payloads, and the error taxonomy
 */

use crate::core::types::{FamilyTag, SignalCode};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::time::SystemTime;
use thiserror::Error;

/// Subscription subsystem result type
pub type SignalResult<T> = Result<T, SignalHubError>;

/// Subscription subsystem errors
///
/// Configuration and resolution errors are raised synchronously at
/// construction or subscribe time and are never retried. Teardown paths
/// (double-unregister, disposal of an unknown subscription) do not error.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalHubError {
    #[error("no manager registered for family: {0}")]
    NoManagerForFamily(String),

    #[error("family tag claimed by more than one manager: {0}")]
    DuplicateFamily(String),

    #[error("domain signal type shared by families {first} and {second}")]
    DuplicateDomainType { first: String, second: String },

    #[error("invalid family tag: {0:?}")]
    InvalidFamilyTag(String),

    #[error("invalid signal code: {0}")]
    InvalidCode(SignalCode),

    #[error("domain signal payload does not belong to family {family}")]
    DomainTypeMismatch { family: String },

    #[error("native registration failed: {0}")]
    RegistrationFailed(String),

    #[error("dispatch worker could not be started: {0}")]
    DispatcherStart(String),
}

/// An immutable, typed occurrence delivered to subscribers.
///
/// Constructed once per occurrence by the owning manager's `build_signal`
/// and cloned into each subscriber's stream; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    family: FamilyTag,
    code: SignalCode,
    timestamp: SystemTime,
}

impl Signal {
    /// Creates a signal with the given family tag, discriminant, and
    /// capture timestamp.
    pub fn new(family: &str, code: SignalCode, timestamp: SystemTime) -> Self {
        Self {
            family: FamilyTag::from(family),
            code,
            timestamp,
        }
    }

    /// Family tag of the manager that produced this signal.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Family-specific discriminant (e.g. the POSIX signal number).
    pub fn code(&self) -> SignalCode {
        self.code
    }

    /// Instant captured when the native handler fired.
    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.family, self.code)
    }
}

/// Subscription key selecting which occurrences within a family a
/// subscriber wants.
///
/// Two definitions with equal family and code are the same subscription:
/// the registry keys its table by this equality, so a second subscribe for
/// an equal definition reuses the existing entry instead of installing a
/// second native handler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignalDefinition {
    family: FamilyTag,
    code: SignalCode,
}

impl SignalDefinition {
    pub fn new(family: &str, code: SignalCode) -> Self {
        Self {
            family: FamilyTag::from(family),
            code,
        }
    }

    /// Family tag this definition selects within.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Family-specific discriminant.
    pub fn code(&self) -> SignalCode {
        self.code
    }
}

impl fmt::Display for SignalDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.family, self.code)
    }
}

/// Opaque payload produced by an external source, before translation.
///
/// Only the owning manager knows the concrete type; the dispatcher routes
/// by the payload's runtime `TypeId` and hands it straight back to that
/// manager. Payloads are consumed by one `build_signal` call and dropped.
pub trait DomainSignal: Any + Send + Sync + fmt::Debug {
    /// Upcast for runtime type routing and downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// Translation context handed to `build_signal`: the raw payload plus the
/// instant captured when the native handler fired.
pub struct SignalContext {
    domain: Box<dyn DomainSignal>,
    captured_at: SystemTime,
}

impl SignalContext {
    pub fn new(domain: Box<dyn DomainSignal>, captured_at: SystemTime) -> Self {
        Self {
            domain,
            captured_at,
        }
    }

    /// The raw payload.
    pub fn domain(&self) -> &dyn DomainSignal {
        self.domain.as_ref()
    }

    /// Downcasts the payload to the manager's concrete domain type.
    pub fn domain_as<D: DomainSignal>(&self) -> Option<&D> {
        self.domain.as_any().downcast_ref::<D>()
    }

    /// Instant captured when the native handler fired.
    pub fn captured_at(&self) -> SystemTime {
        self.captured_at
    }
}

impl fmt::Debug for SignalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalContext")
            .field("domain", &self.domain)
            .field("captured_at", &self.captured_at)
            .finish()
    }
}
