//! Rules-document parsing and load-time validation. The transport layer
//! reads the season file and hands the JSON text here; this crate never
//! touches the file system itself.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::cards::{Card, Deck};
use crate::state::{Board, LocationClaimState, Position, Team, TeamId};

/// Errors raised while turning a rules document into a playable board.
/// These are the only fatal errors in the crate; everything after load is
/// reported through operation messages.
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("rules document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate claimable location \"{name}\"")]
    DuplicateLocation { name: String },
    #[error("team \"{team}\" starts with {used} vetoes used but only {possible} allowed")]
    VetoOveruse {
        team: TeamId,
        used: u32,
        possible: u32,
    },
}

/// Top-level rules document: a single `rules` object wrapping the board
/// definition, as authored in the season file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesDoc {
    pub rules: GameRules,
}

/// Board definition as authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRules {
    pub name: String,
    pub teams: HashMap<TeamId, TeamRules>,
    #[serde(default)]
    pub decks: HashMap<String, Deck>,
    pub possible_claims: Vec<ClaimRules>,
}

/// Per-team starting state as authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamRules {
    pub players: Vec<String>,
    pub budget: i64,
    #[serde(default)]
    pub vetos_possible: u32,
    #[serde(default)]
    pub vetos_used: u32,
    #[serde(default)]
    pub current_pos: Option<Position>,
}

/// One claimable location and the challenge card bound to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRules {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub challenge_card: Card,
}

impl RulesDoc {
    /// Parse a rules document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`RulesError::Parse`] when the document is malformed or
    /// missing required fields.
    pub fn from_json(json: &str) -> Result<Self, RulesError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate the document and build the initial board.
    ///
    /// # Errors
    ///
    /// Returns a [`RulesError`] when the document violates a load-time
    /// invariant.
    pub fn into_board(self) -> Result<Board, RulesError> {
        self.rules.into_board()
    }
}

impl GameRules {
    fn validate(&self) -> Result<(), RulesError> {
        let mut seen = HashSet::new();
        for claim in &self.possible_claims {
            if !seen.insert(claim.name.as_str()) {
                return Err(RulesError::DuplicateLocation {
                    name: claim.name.clone(),
                });
            }
        }
        for (id, team) in &self.teams {
            if team.vetos_used > team.vetos_possible {
                return Err(RulesError::VetoOveruse {
                    team: id.clone(),
                    used: team.vetos_used,
                    possible: team.vetos_possible,
                });
            }
        }
        Ok(())
    }

    /// Validate and build the initial board. Every location starts unclaimed
    /// with an empty presence set; presence is established only by travel.
    ///
    /// # Errors
    ///
    /// Returns a [`RulesError`] when the document violates a load-time
    /// invariant.
    pub fn into_board(self) -> Result<Board, RulesError> {
        self.validate()?;

        let teams = self
            .teams
            .into_iter()
            .map(|(id, team)| (id, Team::from(team)))
            .collect();
        let possible_claims = self
            .possible_claims
            .into_iter()
            .map(|claim| LocationClaimState::new(claim.name, claim.kind, claim.challenge_card))
            .collect();

        Ok(Board {
            name: self.name,
            teams,
            decks: self.decks,
            possible_claims,
            rng: None,
        })
    }
}

impl From<TeamRules> for Team {
    fn from(rules: TeamRules) -> Self {
        Self {
            current_pos: rules.current_pos,
            current_card: None,
            current_challenge_card: None,
            players: rules.players,
            budget: rules.budget,
            vetos_possible: rules.vetos_possible,
            vetos_used: rules.vetos_used,
        }
    }
}
