/*!
 * Manager Directory
 * Validated manager set resolving by family tag and by domain payload type
 */

use crate::core::types::FamilyTag;
use crate::signals::traits::SignalManager;
use crate::signals::types::{SignalHubError, SignalResult};
use ahash::RandomState;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

/// Immutable directory over all known managers.
///
/// The registry resolves the owning manager two ways: by a definition's
/// family tag at subscribe time, and by a domain payload's runtime type at
/// dispatch time. Both indices are built here from the same manager list,
/// and duplicates on either axis fail construction, so the two resolution
/// paths cannot disagree once a service exists.
pub struct ManagerDirectory {
    by_family: HashMap<FamilyTag, Arc<dyn SignalManager>, RandomState>,
    by_domain: HashMap<TypeId, Arc<dyn SignalManager>, RandomState>,
}

impl ManagerDirectory {
    /// Indexes `managers`, rejecting duplicate family tags and duplicate
    /// domain payload types.
    pub fn new(managers: Vec<Arc<dyn SignalManager>>) -> SignalResult<Self> {
        let mut by_family =
            HashMap::with_capacity_and_hasher(managers.len(), RandomState::new());
        let mut by_domain: HashMap<TypeId, Arc<dyn SignalManager>, RandomState> =
            HashMap::with_capacity_and_hasher(managers.len(), RandomState::new());

        for manager in managers {
            let family = FamilyTag::from(manager.family());
            if let Some(previous) = by_domain.insert(manager.domain_signal_type(), Arc::clone(&manager)) {
                return Err(SignalHubError::DuplicateDomainType {
                    first: previous.family().to_string(),
                    second: manager.family().to_string(),
                });
            }
            if by_family.insert(family, Arc::clone(&manager)).is_some() {
                return Err(SignalHubError::DuplicateFamily(manager.family().to_string()));
            }
        }

        Ok(Self {
            by_family,
            by_domain,
        })
    }

    /// Resolves the one manager serving `family`.
    pub fn by_family(&self, family: &str) -> SignalResult<Arc<dyn SignalManager>> {
        self.by_family
            .get(family)
            .cloned()
            .ok_or_else(|| SignalHubError::NoManagerForFamily(family.to_string()))
    }

    /// Resolves the manager owning the given domain payload type.
    pub fn by_domain_type(&self, domain_type: TypeId) -> Option<Arc<dyn SignalManager>> {
        self.by_domain.get(&domain_type).cloned()
    }

    /// Number of registered families.
    pub fn len(&self) -> usize {
        self.by_family.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_family.is_empty()
    }

    /// All registered family tags.
    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.by_family.keys().map(|tag| tag.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::family::FamilyDescriptor;
    use crate::signals::traits::DomainHandlerFn;
    use crate::signals::types::{
        DomainSignal, Signal, SignalContext, SignalDefinition,
    };
    use std::any::Any;

    #[derive(Debug)]
    struct DomainA;
    impl DomainSignal for DomainA {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Debug)]
    struct DomainB;
    impl DomainSignal for DomainB {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct StubManager {
        descriptor: FamilyDescriptor,
    }

    impl StubManager {
        fn of_a(family: &str) -> Arc<dyn SignalManager> {
            Arc::new(Self {
                descriptor: FamilyDescriptor::new::<DomainA>(family).unwrap(),
            })
        }

        fn of_b(family: &str) -> Arc<dyn SignalManager> {
            Arc::new(Self {
                descriptor: FamilyDescriptor::new::<DomainB>(family).unwrap(),
            })
        }
    }

    impl SignalManager for StubManager {
        fn descriptor(&self) -> &FamilyDescriptor {
            &self.descriptor
        }

        fn build_signal(&self, context: &SignalContext) -> SignalResult<Signal> {
            Ok(Signal::new(self.family(), 0, context.captured_at()))
        }

        fn register_handler(
            &self,
            _definition: &SignalDefinition,
            _handler: DomainHandlerFn,
        ) -> SignalResult<()> {
            Ok(())
        }

        fn unregister_handlers(&self, _definition: &SignalDefinition) -> bool {
            false
        }
    }

    #[test]
    fn test_resolution_paths_agree() {
        let directory =
            ManagerDirectory::new(vec![StubManager::of_a("UNIX"), StubManager::of_b("TIMER")])
                .unwrap();

        let by_family = directory.by_family("UNIX").unwrap();
        let by_domain = directory.by_domain_type(TypeId::of::<DomainA>()).unwrap();
        assert_eq!(by_family.family(), by_domain.family());
        assert_eq!(directory.len(), 2);
    }

    #[test]
    fn test_unknown_family() {
        let directory = ManagerDirectory::new(vec![StubManager::of_a("UNIX")]).unwrap();
        assert!(matches!(
            directory.by_family("MISSING"),
            Err(SignalHubError::NoManagerForFamily(_))
        ));
        assert!(directory.by_domain_type(TypeId::of::<DomainB>()).is_none());
    }

    #[test]
    fn test_duplicate_family_rejected() {
        let result =
            ManagerDirectory::new(vec![StubManager::of_a("UNIX"), StubManager::of_b("UNIX")]);
        assert!(matches!(result, Err(SignalHubError::DuplicateFamily(_))));
    }

    #[test]
    fn test_duplicate_domain_type_rejected() {
        let result =
            ManagerDirectory::new(vec![StubManager::of_a("UNIX"), StubManager::of_a("TIMER")]);
        assert!(matches!(
            result,
            Err(SignalHubError::DuplicateDomainType { .. })
        ));
    }
}
