//! Challenge cards, reward descriptors, and legacy decks
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::state::TeamId;

/// Deck gate value admitting every team to a legacy deck.
pub const ANY_TEAM: &str = "any";

/// Victory claim sentinel from the oldest ruleset: claim wherever the team
/// currently stands.
pub const CLAIM_CURRENT: &str = "current";

/// Reward descriptor attached to a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Victory {
    /// Name of the location this card targets; the legacy sentinel
    /// [`CLAIM_CURRENT`] means the team's current position.
    #[serde(default)]
    pub claim: Option<String>,
    /// Reward paid by the legacy finish flow.
    #[serde(default)]
    pub budget: i64,
    /// Target location type, when the card is bound to one.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// A challenge card: the task a team must complete and what it pays out.
/// Immutable once loaded from the rules document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    /// Description of the task itself.
    pub challenge: String,
    pub victory: Victory,
    #[serde(default)]
    pub effects: Option<HashMap<String, f64>>,
    /// Reward paid when the challenge is completed for a location claim.
    #[serde(default)]
    pub card_budget: i64,
}

/// A shared deck from the legacy card-driven ruleset. Draws consume cards;
/// a drawn card never returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub deck: Vec<Card>,
    /// Access gate: a team name, or [`ANY_TEAM`] to admit everyone.
    pub team: String,
}

impl Deck {
    /// Whether the named team may draw from this deck.
    #[must_use]
    pub fn allows(&self, team: &TeamId) -> bool {
        self.team == ANY_TEAM || self.team == team.as_str()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.deck.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }
}
