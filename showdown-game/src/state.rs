use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::cards::{Card, Deck};

/// Location type stamped on destinations the rules document does not list.
/// The published seasons only ever travel between countries.
pub const DEFAULT_LOCATION_TYPE: &str = "country";

/// Identifier of a team. Used as the board's map key and for every
/// cross-record reference: pending claims, presence sets, claim owners.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub String);

impl TeamId {
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self(value.trim().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TeamId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TeamId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Contest status of a claimable location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    #[default]
    Unclaimed,
    Pending,
    Claimed,
}

impl ClaimStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unclaimed => "unclaimed",
            Self::Pending => "pending",
            Self::Claimed => "claimed",
        }
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unclaimed" => Ok(Self::Unclaimed),
            "pending" => Ok(Self::Pending),
            "claimed" => Ok(Self::Claimed),
            _ => Err(format!("Unknown claim status: {s}")),
        }
    }
}

/// Where a team currently stands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Optional map coordinate, `(lon, lat)`.
    #[serde(default)]
    pub coord: Option<(f64, f64)>,
}

impl Position {
    #[must_use]
    pub fn new(name: &str, kind: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            coord: None,
        }
    }
}

/// Mutable contest record for one claimable location, carrying the single
/// challenge card bound to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationClaimState {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub challenge_card: Card,
    #[serde(default)]
    pub status: ClaimStatus,
    /// Team whose attempt opened the pending claim. `Some` only while
    /// `status` is pending.
    #[serde(default)]
    pub pending_team: Option<TeamId>,
    /// Permanent owner. `Some` only once `status` is claimed.
    #[serde(default)]
    pub claimed_by: Option<TeamId>,
    #[serde(default)]
    pub teams_at_location: HashSet<TeamId>,
}

impl LocationClaimState {
    /// Fresh unclaimed record around a location's bound challenge card.
    #[must_use]
    pub fn new(name: String, kind: String, challenge_card: Card) -> Self {
        Self {
            name,
            kind,
            challenge_card,
            status: ClaimStatus::Unclaimed,
            pending_team: None,
            claimed_by: None,
            teams_at_location: HashSet::new(),
        }
    }

    /// One-line contest report, used on arrival and when an attempt bounces.
    #[must_use]
    pub fn status_line(&self) -> String {
        match self.status {
            ClaimStatus::Unclaimed => format!("{} is unclaimed.", self.name),
            ClaimStatus::Pending => {
                let holder = self
                    .pending_team
                    .as_ref()
                    .map_or("another team", |team| team.as_str());
                format!("{} has a pending claim by {holder}.", self.name)
            }
            ClaimStatus::Claimed => {
                let owner = self
                    .claimed_by
                    .as_ref()
                    .map_or("another team", |team| team.as_str());
                format!("{} is already permanently claimed by {owner}.", self.name)
            }
        }
    }

    /// Whether the given team is physically present at this location.
    #[must_use]
    pub fn has_team(&self, team: &TeamId) -> bool {
        self.teams_at_location.contains(team)
    }
}

/// Live state for one competing team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    /// `None` until the team travels for the first time.
    #[serde(default)]
    pub current_pos: Option<Position>,
    /// Card drawn from a legacy deck, if any.
    #[serde(default)]
    pub current_card: Option<Card>,
    /// Challenge card for the location claim being pursued, if any.
    #[serde(default)]
    pub current_challenge_card: Option<Card>,
    pub players: Vec<String>,
    pub budget: i64,
    #[serde(default)]
    pub vetos_possible: u32,
    #[serde(default)]
    pub vetos_used: u32,
}

impl Team {
    /// Location name targeted by the active challenge card, if any.
    #[must_use]
    pub fn challenge_target(&self) -> Option<&str> {
        self.current_challenge_card
            .as_ref()
            .and_then(|card| card.victory.claim.as_deref())
    }
}

/// Aggregate root owning every team, deck, and location record for one
/// running game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub name: String,
    pub teams: HashMap<TeamId, Team>,
    #[serde(default)]
    pub decks: HashMap<String, Deck>,
    pub possible_claims: Vec<LocationClaimState>,
    /// Deterministic source for legacy deck draws. Absent until seeded; an
    /// unseeded board draws the first card instead.
    #[serde(skip)]
    pub rng: Option<ChaCha20Rng>,
}

impl Board {
    /// Attach a deterministic RNG for deck draws.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.attach_rng(seed);
        self
    }

    /// Reseed the deck-draw RNG in place.
    pub fn attach_rng(&mut self, seed: u64) {
        self.rng = Some(ChaCha20Rng::seed_from_u64(seed));
    }

    /// Drop the RNG handle, leaving draws deterministic again.
    pub fn detach_rng(&mut self) {
        self.rng = None;
    }

    #[must_use]
    pub fn team(&self, id: &TeamId) -> Option<&Team> {
        self.teams.get(id)
    }

    pub fn team_mut(&mut self, id: &TeamId) -> Option<&mut Team> {
        self.teams.get_mut(id)
    }

    /// Claim record for a location name, if the location is claimable.
    #[must_use]
    pub fn location(&self, name: &str) -> Option<&LocationClaimState> {
        self.possible_claims.iter().find(|claim| claim.name == name)
    }

    pub fn location_mut(&mut self, name: &str) -> Option<&mut LocationClaimState> {
        self.possible_claims
            .iter_mut()
            .find(|claim| claim.name == name)
    }
}
