// ---------------------------------------------------------------------------
// DelegateRegistry: stable type key -> constructor table
// ---------------------------------------------------------------------------
//
// Populated once at startup. Load never instantiates a delegate from a
// string other than through this table.

use simulation::delegates::{EndTurnDelegate, MoveDelegate, PurchaseDelegate};
use simulation::{Delegate, DelegateList, DelegateType};
use tracing::{debug, warn};

use crate::container_codec::DelegateState;
use crate::save_error::SaveError;

/// Type alias for the constructor stored in a `DelegateEntry`.
pub type DelegateConstructor = fn() -> Box<dyn Delegate>;

/// One registered delegate type.
pub struct DelegateEntry {
    pub type_key: &'static str,
    pub construct: DelegateConstructor,
}

fn construct_default<T: DelegateType>() -> Box<dyn Delegate> {
    Box::new(T::default())
}

/// Registry of every delegate type a save may reference.
#[derive(Default)]
pub struct DelegateRegistry {
    entries: Vec<DelegateEntry>,
}

impl DelegateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in delegates.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register::<PurchaseDelegate>();
        registry.register::<MoveDelegate>();
        registry.register::<EndTurnDelegate>();
        registry
    }

    /// Register a delegate type under its `TYPE_KEY`.
    ///
    /// Panics in debug builds if the key is already registered; release
    /// builds keep the first registration.
    pub fn register<T: DelegateType>(&mut self) {
        let key = T::TYPE_KEY;
        if self.contains(key) {
            warn!(
                "DelegateRegistry: duplicate type key '{}', ignoring second registration",
                key
            );
            debug_assert!(false, "DelegateRegistry: duplicate type key '{}'", key);
            return;
        }
        self.entries.push(DelegateEntry {
            type_key: key,
            construct: construct_default::<T>,
        });
    }

    pub fn contains(&self, type_key: &str) -> bool {
        self.entries.iter().any(|e| e.type_key == type_key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn resolve(&self, type_key: &str) -> Result<DelegateConstructor, SaveError> {
        self.entries
            .iter()
            .find(|e| e.type_key == type_key)
            .map(|e| e.construct)
            .ok_or_else(|| SaveError::UnknownDelegateType(type_key.to_string()))
    }

    /// Instantiate a delegate of `type_key` and give it its identity.
    pub fn construct(
        &self,
        type_key: &str,
        name: &str,
        display_name: &str,
    ) -> Result<Box<dyn Delegate>, SaveError> {
        let mut delegate = (self.resolve(type_key)?)();
        delegate.initialize(name, display_name);
        Ok(delegate)
    }

    /// Hand a persisted state blob to a delegate.
    pub fn restore(&self, delegate: &mut dyn Delegate, state: &[u8]) -> Result<(), SaveError> {
        delegate
            .load_state(state)
            .map_err(|e| SaveError::DelegateStateCorrupt {
                delegate: delegate.name().to_string(),
                reason: e.to_string(),
            })
    }

    /// Rebuild a whole delegate list in container order.
    ///
    /// All or nothing: the first failure discards everything built so far.
    pub fn reconstruct(&self, entries: &[DelegateState]) -> Result<DelegateList, SaveError> {
        let mut list = DelegateList::new();
        for entry in entries {
            let mut delegate = self.construct(&entry.type_key, &entry.name, &entry.display_name)?;
            if let Some(state) = &entry.state {
                self.restore(delegate.as_mut(), state)?;
            }
            if !list.add_delegate(delegate) {
                return Err(SaveError::CorruptContainer(format!(
                    "duplicate delegate name {}",
                    entry.name
                )));
            }
        }
        debug!("Reconstructed {} delegates", list.len());
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, type_key: &str, state: Option<Vec<u8>>) -> DelegateState {
        DelegateState {
            name: name.to_string(),
            display_name: name.to_uppercase(),
            type_key: type_key.to_string(),
            state,
        }
    }

    #[test]
    fn test_builtin_registers_all_types() {
        let registry = DelegateRegistry::builtin();
        assert_eq!(registry.len(), 3);
        assert!(registry.contains("purchase"));
        assert!(registry.contains("move"));
        assert!(registry.contains("end_turn"));
    }

    #[test]
    fn test_resolve_unknown_type_fails() {
        let registry = DelegateRegistry::builtin();
        match registry.resolve("battle") {
            Err(SaveError::UnknownDelegateType(key)) => assert_eq!(key, "battle"),
            Err(other) => panic!("unexpected {other:?}"),
            Ok(_) => panic!("resolved an unregistered type"),
        }
    }

    #[test]
    fn test_construct_initializes_identity() {
        let registry = DelegateRegistry::builtin();
        let delegate = registry
            .construct("move", "combatMove", "Combat Move")
            .unwrap();
        assert_eq!(delegate.name(), "combatMove");
        assert_eq!(delegate.display_name(), "Combat Move");
        assert_eq!(delegate.type_key(), "move");
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_duplicate_registration_keeps_first() {
        let mut registry = DelegateRegistry::builtin();
        registry.register::<MoveDelegate>();
        assert_eq!(registry.len(), 3);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "duplicate type key")]
    fn test_duplicate_registration_panics_in_debug() {
        let mut registry = DelegateRegistry::builtin();
        registry.register::<MoveDelegate>();
    }

    #[test]
    fn test_restore_maps_error_to_state_corrupt() {
        let registry = DelegateRegistry::builtin();
        let mut delegate = registry.construct("purchase", "buy", "Buy").unwrap();
        match registry.restore(delegate.as_mut(), &[]) {
            Err(SaveError::DelegateStateCorrupt { delegate, .. }) => assert_eq!(delegate, "buy"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_reconstruct_preserves_order() {
        let registry = DelegateRegistry::builtin();
        let mut mover = MoveDelegate::default();
        mover.set_non_combat(true);
        let entries = vec![
            entry("endTurn", "end_turn", None),
            entry("nonCombatMove", "move", mover.save_state()),
            entry("purchase", "purchase", None),
        ];
        let list = registry.reconstruct(&entries).unwrap();
        assert_eq!(list.names(), vec!["endTurn", "nonCombatMove", "purchase"]);
        assert_eq!(list.get("nonCombatMove").unwrap().save_state(), mover.save_state());
    }

    #[test]
    fn test_reconstruct_aborts_on_unknown_type() {
        let registry = DelegateRegistry::builtin();
        let entries = vec![
            entry("purchase", "purchase", None),
            entry("battle", "battle", None),
            entry("endTurn", "end_turn", None),
        ];
        assert!(matches!(
            registry.reconstruct(&entries),
            Err(SaveError::UnknownDelegateType(_))
        ));
    }

    #[test]
    fn test_reconstruct_rejects_duplicate_names() {
        let registry = DelegateRegistry::builtin();
        let entries = vec![
            entry("endTurn", "end_turn", None),
            entry("endTurn", "end_turn", None),
        ];
        assert!(matches!(
            registry.reconstruct(&entries),
            Err(SaveError::CorruptContainer(_))
        ));
    }
}
