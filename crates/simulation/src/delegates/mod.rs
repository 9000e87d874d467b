//! Built-in delegates for a turn: purchase, combat move, end of turn.

mod end_turn;
mod movement;
mod purchase;

pub use end_turn::EndTurnDelegate;
pub use movement::{MoveDelegate, UnitMove};
pub use purchase::PurchaseDelegate;
