//! Session wrapper: one board, one mutation boundary.

use crate::claims;
use crate::decks;
use crate::rules::{RulesDoc, RulesError};
use crate::state::{Board, TeamId};
use crate::travel;
use crate::MessageLog;

/// A running game bound to one board. Every operation takes `&mut self`, so
/// a session observes one operation at a time; hosts sharing a session
/// across threads put their own lock around it.
#[derive(Debug, Clone)]
pub struct ShowdownSession {
    board: Board,
}

impl ShowdownSession {
    /// Wrap an already-built board.
    #[must_use]
    pub const fn new(board: Board) -> Self {
        Self { board }
    }

    /// Parse and validate a rules document, then start a session on it.
    ///
    /// # Errors
    ///
    /// Returns a [`RulesError`] when the document is malformed or violates
    /// a load-time invariant.
    pub fn from_json(json: &str) -> Result<Self, RulesError> {
        Ok(Self::new(RulesDoc::from_json(json)?.into_board()?))
    }

    /// Seed the deck-draw RNG deterministically.
    pub fn reseed(&mut self, seed: u64) {
        self.board.attach_rng(seed);
    }

    /// Move a team, charging the given cost. See [`travel::team_travel`].
    pub fn team_travel(&mut self, team: &TeamId, destination: &str, cost: i64) -> MessageLog {
        travel::team_travel(&mut self.board, team, destination, cost)
    }

    /// Take on a location's challenge. See [`claims::attempt_challenge`].
    pub fn attempt_challenge(&mut self, team: &TeamId, location: Option<&str>) -> MessageLog {
        claims::attempt_challenge(&mut self.board, team, location)
    }

    /// Resolve a team's active challenge. See [`claims::complete_challenge`].
    pub fn complete_challenge(&mut self, team: &TeamId) -> MessageLog {
        claims::complete_challenge(&mut self.board, team)
    }

    /// Draw from a legacy deck. See [`decks::pull_card`].
    pub fn pull_card(&mut self, deck: &str, team: &TeamId) -> MessageLog {
        decks::pull_card(&mut self.board, deck, team)
    }

    /// Resolve a drawn card. See [`decks::finish_card`].
    pub fn finish_card(&mut self, team: &TeamId) -> MessageLog {
        decks::finish_card(&mut self.board, team)
    }

    /// Spend a veto on the current card. See [`decks::veto_current_card`].
    pub fn veto_current_card(&mut self, team: &TeamId) -> MessageLog {
        decks::veto_current_card(&mut self.board, team)
    }

    /// Discard the current card. See [`decks::skip_current_card`].
    pub fn skip_current_card(&mut self, team: &TeamId) -> MessageLog {
        decks::skip_current_card(&mut self.board, team)
    }

    /// Borrow the board read-only, for rendering.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Borrow the board mutably.
    pub const fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Consume the session, returning the board.
    #[must_use]
    pub fn into_board(self) -> Board {
        self.board
    }
}
