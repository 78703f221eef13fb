//! Team travel: departure bookkeeping, movement cost, arrival report.

use log::warn;

use crate::state::{Board, ClaimStatus, DEFAULT_LOCATION_TYPE, Position, TeamId};
use crate::MessageLog;

/// Move a team to a new location, charging `cost` against its budget.
///
/// Departing a location abandons any pending claim the team holds there
/// (the location reverts to unclaimed) and clears an active challenge card
/// targeting it. The budget may go negative; travel makes no funds check.
/// Destinations missing from the claim list are reported as warnings and
/// the move still completes.
pub fn team_travel(
    board: &mut Board,
    team_id: &TeamId,
    destination: &str,
    cost: i64,
) -> MessageLog {
    let mut messages = MessageLog::new();

    let Some(team) = board.team(team_id) else {
        messages.push(format!("Unknown team {team_id}."));
        return messages;
    };
    let old_location = team.current_pos.as_ref().map(|pos| pos.name.clone());

    // Departure bookkeeping only applies when actually changing locations.
    if let Some(old_name) = old_location.as_deref() {
        if old_name != destination {
            depart(board, team_id, old_name, &mut messages);
        }
    }

    let arrival_kind = board
        .location(destination)
        .map_or(DEFAULT_LOCATION_TYPE, |claim| claim.kind.as_str())
        .to_string();
    if let Some(team) = board.team_mut(team_id) {
        team.current_pos = Some(Position::new(destination, &arrival_kind));
        team.budget -= cost;
    }
    messages.push(format!(
        "Team {team_id} moved to {destination} spending {cost}."
    ));

    if let Some(claim) = board.location_mut(destination) {
        claim.teams_at_location.insert(team_id.clone());
        messages.push(claim.status_line());
    } else {
        warn!("team {team_id} arrived at {destination}, which is not a claimable location");
        messages.push(format!(
            "Warning: {destination} is not on the claim list."
        ));
    }

    messages
}

/// Remove a departing team from a location's presence set and unwind any
/// in-progress claim it held there.
fn depart(board: &mut Board, team_id: &TeamId, old_name: &str, messages: &mut MessageLog) {
    let Some(old_claim) = board.location_mut(old_name) else {
        warn!("team {team_id} departed {old_name}, which is not a claimable location");
        messages.push(format!(
            "Warning: previous location {old_name} is not on the claim list."
        ));
        return;
    };

    old_claim.teams_at_location.remove(team_id);
    if old_claim.status == ClaimStatus::Pending
        && old_claim.pending_team.as_ref() == Some(team_id)
    {
        old_claim.status = ClaimStatus::Unclaimed;
        old_claim.pending_team = None;
        messages.push(format!(
            "{team_id} abandoned the pending claim on {old_name}; it is unclaimed again."
        ));
    }

    // A departing contester also forfeits: the card goes regardless of who
    // holds the pending marker.
    if let Some(team) = board.team_mut(team_id) {
        if team.challenge_target() == Some(old_name) {
            team.current_challenge_card = None;
            messages.push(format!("{team_id} gave up the challenge for {old_name}."));
        }
    }
}
