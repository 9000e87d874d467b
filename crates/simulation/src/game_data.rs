// ---------------------------------------------------------------------------
// GameData: serializable world data (the save snapshot)
// ---------------------------------------------------------------------------
//
// Delegate behaviour state is not part of this struct; it is
// persisted separately, one block per delegate.

use std::collections::BTreeMap;

use bitcode::{Decode, Encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct PlayerData {
    pub name: String,
    pub alliance: String,
    /// Production currency available to spend.
    pub resources: u32,
    /// Controlled by the engine instead of a human.
    pub ai: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Encode, Decode)]
pub struct TerritoryData {
    pub name: String,
    pub owner: Option<String>,
    pub production: u32,
    pub water: bool,
    /// Unit type name -> count.
    pub units: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Encode, Decode)]
pub struct GameData {
    pub game_name: String,
    pub round: u32,
    pub current_player: Option<String>,
    pub players: Vec<PlayerData>,
    pub territories: Vec<TerritoryData>,
    /// Free-form game options (map properties, house rules).
    pub properties: BTreeMap<String, String>,
}

impl GameData {
    pub fn new(game_name: impl Into<String>) -> Self {
        Self {
            game_name: game_name.into(),
            round: 1,
            ..Default::default()
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        bitcode::encode(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, bitcode::Error> {
        bitcode::decode(bytes)
    }

    pub fn player(&self, name: &str) -> Option<&PlayerData> {
        self.players.iter().find(|p| p.name == name)
    }

    pub fn player_mut(&mut self, name: &str) -> Option<&mut PlayerData> {
        self.players.iter_mut().find(|p| p.name == name)
    }

    pub fn territory(&self, name: &str) -> Option<&TerritoryData> {
        self.territories.iter().find(|t| t.name == name)
    }

    pub fn territory_mut(&mut self, name: &str) -> Option<&mut TerritoryData> {
        self.territories.iter_mut().find(|t| t.name == name)
    }

    pub fn add_player(&mut self, name: &str, alliance: &str, resources: u32) {
        self.players.push(PlayerData {
            name: name.to_string(),
            alliance: alliance.to_string(),
            resources,
            ai: false,
        });
    }

    pub fn add_territory(&mut self, name: &str, owner: Option<&str>, production: u32) {
        self.territories.push(TerritoryData {
            name: name.to_string(),
            owner: owner.map(str::to_string),
            production,
            water: false,
            units: BTreeMap::new(),
        });
    }
}
