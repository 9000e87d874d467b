use std::collections::BTreeMap;

use bitcode::{Decode, Encode};

use crate::delegate::{decode_state, Delegate, DelegateIdentity, DelegateStateError, DelegateType};

/// Tracks units bought by the current player but not yet placed.
#[derive(Debug, Default)]
pub struct PurchaseDelegate {
    identity: DelegateIdentity,
    state: PurchaseState,
}

#[derive(Debug, Clone, Default, PartialEq, Encode, Decode)]
struct PurchaseState {
    pending: BTreeMap<String, u32>,
    spent: u32,
}

impl PurchaseDelegate {
    pub fn purchase(&mut self, unit_type: &str, quantity: u32, unit_cost: u32) {
        let pending = self.state.pending.entry(unit_type.to_string()).or_insert(0);
        *pending = pending.saturating_add(quantity);
        self.state.spent = self
            .state
            .spent
            .saturating_add(quantity.saturating_mul(unit_cost));
    }

    pub fn pending(&self, unit_type: &str) -> u32 {
        self.state.pending.get(unit_type).copied().unwrap_or(0)
    }

    pub fn spent(&self) -> u32 {
        self.state.spent
    }
}

impl Delegate for PurchaseDelegate {
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

impl DelegateType for PurchaseDelegate {
    const TYPE_KEY: &'static str = "purchase";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purchase_state_roundtrip() {
        let mut d = PurchaseDelegate::default();
        d.initialize("purchase", "Purchase Units");
        d.purchase("infantry", 3, 3);
        d.purchase("armour", 1, 5);

        let bytes = d.save_state().unwrap();
        let mut restored = PurchaseDelegate::default();
        restored.initialize("purchase", "Purchase Units");
        restored.load_state(&bytes).unwrap();

        assert_eq!(restored.pending("infantry"), 3);
        assert_eq!(restored.pending("armour"), 1);
        assert_eq!(restored.spent(), 14);
    }

    #[test]
    fn test_purchase_totals_saturate() {
        let mut d = PurchaseDelegate::default();
        d.purchase("battleship", u32::MAX, 20);
        d.purchase("battleship", 1, 20);
        assert_eq!(d.pending("battleship"), u32::MAX);
        assert_eq!(d.spent(), u32::MAX);
    }

    #[test]
    fn test_purchase_rejects_corrupt_state() {
        let mut d = PurchaseDelegate::default();
        d.initialize("purchase", "Purchase Units");
        assert!(d.load_state(&[]).is_err());
    }
}
