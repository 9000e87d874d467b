use bitcode::{Decode, Encode};

use crate::delegate::{decode_state, Delegate, DelegateIdentity, DelegateStateError, DelegateType};

/// A single unit move made during the current phase.
#[derive(Debug, Clone, PartialEq, Encode, Decode)]
pub struct UnitMove {
    pub unit_type: String,
    pub count: u32,
    pub from: String,
    pub to: String,
}

/// Records the moves made this phase so they can be undone.
#[derive(Debug, Default)]
pub struct MoveDelegate {
    identity: DelegateIdentity,
    state: MoveState,
}

#[derive(Debug, Clone, Default, PartialEq, Encode, Decode)]
struct MoveState {
    moves: Vec<UnitMove>,
    non_combat: bool,
}

impl MoveDelegate {
    pub fn record(&mut self, unit_move: UnitMove) {
        self.state.moves.push(unit_move);
    }

    pub fn undo_last(&mut self) -> Option<UnitMove> {
        self.state.moves.pop()
    }

    pub fn moves(&self) -> &[UnitMove] {
        &self.state.moves
    }

    pub fn set_non_combat(&mut self, non_combat: bool) {
        self.state.non_combat = non_combat;
    }

    pub fn is_non_combat(&self) -> bool {
        self.state.non_combat
    }
}

impl Delegate for MoveDelegate {
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
        Some(bitcode::encode(&self.state))
    }

    fn load_state(&mut self, state: &[u8]) -> Result<(), DelegateStateError> {
        self.state = decode_state(&self.identity.name, state)?;
        Ok(())
    }
}

impl DelegateType for MoveDelegate {
    const TYPE_KEY: &'static str = "move";
}
