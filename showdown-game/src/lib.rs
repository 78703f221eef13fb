//! Showdown Game Engine
//!
//! Platform-agnostic core rules for Schengen Showdown, the team-based
//! location-claiming party game. This crate owns the claim state machine
//! (travel, attempts, contests, completions) and the legacy deck flow,
//! without transport or platform-specific dependencies.

pub mod cards;
pub mod claims;
pub mod decks;
pub mod rules;
pub mod session;
pub mod state;
pub mod travel;

use smallvec::SmallVec;

// Re-export commonly used types
pub use cards::{ANY_TEAM, CLAIM_CURRENT, Card, Deck, Victory};
pub use claims::{attempt_challenge, complete_challenge};
pub use decks::{finish_card, pull_card, skip_current_card, veto_current_card};
pub use rules::{ClaimRules, GameRules, RulesDoc, RulesError, TeamRules};
pub use session::ShowdownSession;
pub use state::{
    Board, ClaimStatus, DEFAULT_LOCATION_TYPE, LocationClaimState, Position, Team, TeamId,
};
pub use travel::team_travel;

/// Ordered trail of player-facing messages produced by one operation.
/// Stays inline for the common one-to-four message case.
pub type MessageLog = SmallVec<[String; 4]>;

/// Trait for abstracting rules-document loading
/// Platform-specific implementations should provide this
pub trait RulesLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the rules document from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the rules document cannot be loaded.
    fn load_rules(&self) -> Result<RulesDoc, Self::Error>;
}

/// Main engine front door binding a rules loader to session construction
pub struct GameEngine<L>
where
    L: RulesLoader,
{
    rules_loader: L,
}

impl<L> GameEngine<L>
where
    L: RulesLoader,
{
    /// Create a new game engine with the provided rules loader
    pub const fn new(rules_loader: L) -> Self {
        Self { rules_loader }
    }

    /// Load and validate the rules, then start a seeded session.
    ///
    /// # Errors
    ///
    /// Returns an error if the rules document cannot be loaded or fails
    /// load-time validation.
    pub fn create_session(&self, seed: u64) -> Result<ShowdownSession, anyhow::Error>
    where
        L::Error: Into<anyhow::Error>,
    {
        let doc = self.rules_loader.load_rules().map_err(Into::into)?;
        let board = doc.into_board()?.with_seed(seed);
        Ok(ShowdownSession::new(board))
    }
}
