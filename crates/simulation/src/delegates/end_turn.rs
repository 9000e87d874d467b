use crate::delegate::{Delegate, DelegateIdentity, DelegateStateError, DelegateType};

/// Hands the turn to the next player. Carries no state of its own.
#[derive(Debug, Default)]
pub struct EndTurnDelegate {
    identity: DelegateIdentity,
}

impl Delegate for EndTurnDelegate {
    fn initialize(&mut self, name: &str, display_name: &str) {
        self.identity.set(name, display_name);
    }

    fn name(&self) -> &str {
        &self.identity.name
    }

    fn display_name(&self) -> &str {
        &self.identity.display_name
    }

    fn type_key(&self) -> &'static str {
        Self::TYPE_KEY
    }

    fn save_state(&self) -> Option<Vec<u8>> {
        None
    }

    fn load_state(&mut self, _state: &[u8]) -> Result<(), DelegateStateError> {
        Ok(())
    }
}

impl DelegateType for EndTurnDelegate {
    const TYPE_KEY: &'static str = "end_turn";
}
