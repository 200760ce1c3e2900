/*!
 * Family Descriptor
 * Explicit family tag and domain payload type token for a manager
 */

use crate::core::types::FamilyTag;
use crate::signals::types::{DomainSignal, SignalHubError, SignalResult};
use std::any::TypeId;

/// Identity a concrete manager declares at construction: its family tag
/// and the runtime type token of its domain payload.
///
/// Tags may be given as a plain name (`"UNIX"`) or a dotted registration
/// path (`"signals.manager.UNIX"`); the final dot-separated component is
/// the tag. A tag that resolves to an empty string is a construction-time
/// error: a misconfigured manager must never be allowed to serve the
/// wrong family.
#[derive(Debug, Clone)]
pub struct FamilyDescriptor {
    family: FamilyTag,
    domain_type: TypeId,
    domain_type_name: &'static str,
}

impl FamilyDescriptor {
    /// Builds a descriptor for the domain payload type `D` under `name`.
    pub fn new<D: DomainSignal>(name: &str) -> SignalResult<Self> {
        let tag = name.rsplit('.').next().unwrap_or(name).trim();
        if tag.is_empty() {
            return Err(SignalHubError::InvalidFamilyTag(name.to_string()));
        }
        Ok(Self {
            family: FamilyTag::from(tag),
            domain_type: TypeId::of::<D>(),
            domain_type_name: std::any::type_name::<D>(),
        })
    }

    /// Family tag this descriptor names.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Runtime type token of the family's domain payload.
    pub fn domain_type(&self) -> TypeId {
        self.domain_type
    }

    /// Human-readable domain payload type, for diagnostics.
    pub fn domain_type_name(&self) -> &'static str {
        self.domain_type_name
    }
}
