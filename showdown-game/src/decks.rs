//! Legacy deck flow: shared-deck draws, card resolution, veto, and skip.
//! Carried over from the first card-driven season so old rules documents
//! keep working.

use log::debug;
use rand::Rng;

use crate::cards::{CLAIM_CURRENT, Card};
use crate::state::{Board, ClaimStatus, Position, TeamId};
use crate::MessageLog;

/// Draw a uniformly random card from a deck for a team, consuming it from
/// the deck. Refused while the team is mid-challenge, when the deck gate
/// does not admit the team, and when the deck is empty. Drawing while
/// already holding a deck card replaces the held card.
pub fn pull_card(board: &mut Board, deck_name: &str, team_id: &TeamId) -> MessageLog {
    let mut messages = MessageLog::new();

    let Some(team) = board.team(team_id) else {
        messages.push(format!("Unknown team {team_id}."));
        return messages;
    };
    if let Some(card) = &team.current_challenge_card {
        messages.push(format!(
            "{team_id} is attempting the challenge '{}'; complete it before drawing cards.",
            card.name
        ));
        return messages;
    }
    let Some(deck) = board.decks.get(deck_name) else {
        messages.push(format!("There is no deck named {deck_name}."));
        return messages;
    };
    if !deck.allows(team_id) {
        messages.push(format!(
            "Team {team_id} not allowed to pull from {deck_name}."
        ));
        return messages;
    }
    if deck.is_empty() {
        messages.push(format!("Deck {deck_name} is empty."));
        return messages;
    }

    let deck_len = deck.len();
    let index = draw_index(deck_len, board.rng.as_mut());
    let Some(deck) = board.decks.get_mut(deck_name) else {
        return messages;
    };
    let card = deck.deck.remove(index);
    messages.push(format!("Card no. {index} removed from deck {deck_name}."));
    messages.push(format!("Team {team_id} pulled card {}.", card.name));
    debug!("{team_id} pulled '{}' from {deck_name}", card.name);

    if let Some(team) = board.team_mut(team_id) {
        team.current_card = Some(card);
    }

    messages
}

/// Uniform draw over the remaining cards. An unseeded board always takes
/// the first card so replays stay deterministic.
fn draw_index<R: Rng>(len: usize, rng: Option<&mut R>) -> usize {
    match rng {
        Some(rng) => rng.gen_range(0..len),
        None => 0,
    }
}

/// Resolve a team's drawn card: pay the reward and, when the card names a
/// location (or carries the `"current"` sentinel), claim it. The card is
/// consumed whether or not the claim part succeeds.
pub fn finish_card(board: &mut Board, team_id: &TeamId) -> MessageLog {
    let mut messages = MessageLog::new();

    let Some(team) = board.team_mut(team_id) else {
        messages.push(format!("Unknown team {team_id}."));
        return messages;
    };
    let Some(card) = team.current_card.take() else {
        messages.push(format!("{team_id} has no card to finish."));
        return messages;
    };

    team.budget += card.victory.budget;
    let budget = team.budget;
    let position = team.current_pos.clone();
    messages.push(format!("Team {team_id} finished card {}.", card.name));
    messages.push(format!("Team {team_id} budget is now {budget}."));

    if card.victory.claim.is_some() {
        resolve_card_claim(board, team_id, &card, position.as_ref(), &mut messages);
    }

    messages
}

/// Match a finished card's victory claim against the claim list and close
/// the claim when the location is still open.
fn resolve_card_claim(
    board: &mut Board,
    team_id: &TeamId,
    card: &Card,
    position: Option<&Position>,
    messages: &mut MessageLog,
) {
    let Some(target) = card.victory.claim.as_deref() else {
        return;
    };

    // The oldest cards carry the "current" sentinel: claim wherever the
    // team stands. Later cards name the location directly.
    let matched = if target == CLAIM_CURRENT {
        position.and_then(|pos| {
            board
                .possible_claims
                .iter()
                .position(|claim| claim.name == pos.name && claim.kind == pos.kind)
        })
    } else {
        board.possible_claims.iter().position(|claim| {
            claim.name == target
                && card
                    .victory
                    .kind
                    .as_deref()
                    .is_none_or(|kind| kind == claim.kind)
        })
    };

    let Some(index) = matched else {
        messages.push(format!("Don't know how to claim card '{}'.", card.name));
        return;
    };

    if let Some(claim) = board.possible_claims.get_mut(index) {
        if claim.status == ClaimStatus::Claimed {
            messages.push(claim.status_line());
            return;
        }
        claim.status = ClaimStatus::Claimed;
        claim.claimed_by = Some(team_id.clone());
        claim.pending_team = None;
        debug!("{team_id} claimed {} via card '{}'", claim.name, card.name);
        messages.push(format!("Team {team_id} claimed {}.", claim.name));
    }
}

/// Allowance gate for vetoes as published in the season ruleset.
///
/// Known defect carried from the shipped rules: the check compares
/// `vetos_used` against itself, so it never passes and vetoing is
/// permanently disabled. Kept as shipped rather than silently corrected
/// to `used < possible`.
// TODO: confirm the intended allowance with the rules author before fixing.
#[allow(clippy::eq_op)]
const fn veto_allowed(vetos_used: u32) -> bool {
    vetos_used < vetos_used
}

/// Spend a veto to discard the current card. Always refused today; see
/// [`veto_allowed`].
pub fn veto_current_card(board: &mut Board, team_id: &TeamId) -> MessageLog {
    let mut messages = MessageLog::new();

    let Some(team) = board.team_mut(team_id) else {
        messages.push(format!("Unknown team {team_id}."));
        return messages;
    };
    if veto_allowed(team.vetos_used) {
        team.vetos_used += 1;
        team.current_card = None;
        messages.push(format!("Team {team_id} used veto."));
    } else {
        messages.push(format!("Team {team_id} cannot use veto."));
    }

    messages
}

/// Discard the current card without penalty.
pub fn skip_current_card(board: &mut Board, team_id: &TeamId) -> MessageLog {
    let mut messages = MessageLog::new();

    let Some(team) = board.team_mut(team_id) else {
        messages.push(format!("Unknown team {team_id}."));
        return messages;
    };
    if team.current_card.take().is_some() {
        messages.push(format!("Team {team_id} skipped card."));
    } else {
        messages.push(format!("{team_id} has no card to skip."));
    }

    messages
}
