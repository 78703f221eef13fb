//! Location challenges: attempts, contests, and first-completion-wins
//! resolution.

use log::{debug, warn};

use crate::state::{Board, ClaimStatus, TeamId};
use crate::MessageLog;

/// Take on the challenge bound to a location. With no explicit location the
/// team's current position is used.
///
/// Guards are checked in order; the first failure reports and stops without
/// touching the board. On success the team receives a copy of the location's
/// challenge card and, if the location was unclaimed, a pending claim opens
/// in the team's name. Attempting an already-pending location joins the race
/// without disturbing the pending marker.
pub fn attempt_challenge(
    board: &mut Board,
    team_id: &TeamId,
    location: Option<&str>,
) -> MessageLog {
    let mut messages = MessageLog::new();

    let Some(team) = board.team(team_id) else {
        messages.push(format!("Unknown team {team_id}."));
        return messages;
    };

    let location_name = match location {
        Some(name) => name.to_string(),
        None => match team.current_pos.as_ref() {
            Some(pos) => pos.name.clone(),
            None => {
                messages.push(format!(
                    "{team_id} has no current position; travel somewhere first."
                ));
                return messages;
            }
        },
    };

    let Some(claim) = board.location(&location_name) else {
        messages.push(format!("{location_name} is not a claimable location."));
        return messages;
    };
    if !claim.has_team(team_id) {
        messages.push(format!(
            "{team_id} must be at {location_name} to attempt its challenge."
        ));
        return messages;
    }
    if claim.status == ClaimStatus::Claimed {
        messages.push(claim.status_line());
        return messages;
    }
    if let Some(target) = team.challenge_target() {
        if target != location_name {
            messages.push(format!(
                "{team_id} is already attempting the challenge for {target}; only one challenge at a time."
            ));
            return messages;
        }
    }
    if let Some(card) = &team.current_card {
        messages.push(format!(
            "{team_id} still holds the deck card '{}'; finish or skip it first.",
            card.name
        ));
        return messages;
    }

    let card = claim.challenge_card.clone();
    let prior_status = claim.status;
    let pending_holder = claim.pending_team.clone();

    if let Some(team) = board.team_mut(team_id) {
        team.current_challenge_card = Some(card);
    }

    if prior_status == ClaimStatus::Unclaimed {
        if let Some(claim) = board.location_mut(&location_name) {
            claim.status = ClaimStatus::Pending;
            claim.pending_team = Some(team_id.clone());
        }
        debug!("{team_id} opened a pending claim on {location_name}");
        messages.push(format!(
            "{team_id} is attempting the challenge for {location_name} (new pending claim)."
        ));
    } else if let Some(holder) = pending_holder.filter(|holder| holder != team_id) {
        debug!("{team_id} contests {location_name}; pending claim held by {holder}");
        messages.push(format!(
            "{team_id} is contesting the challenge for {location_name}; {holder} holds the pending claim. First to complete wins."
        ));
    } else {
        messages.push(format!(
            "{team_id} resumed the challenge for {location_name} (claim still pending)."
        ));
    }

    messages
}

/// Resolve a team's active challenge. The first completion to reach a
/// not-yet-claimed location wins it permanently; a completion that finds
/// the location already claimed discovers the lost race now and discards
/// the stale card.
pub fn complete_challenge(board: &mut Board, team_id: &TeamId) -> MessageLog {
    let mut messages = MessageLog::new();

    let Some(team) = board.team(team_id) else {
        messages.push(format!("Unknown team {team_id}."));
        return messages;
    };
    let Some(card) = team.current_challenge_card.clone() else {
        messages.push(format!("{team_id} has no active challenge to complete."));
        return messages;
    };

    let Some(target_name) = card.victory.claim.clone() else {
        warn!(
            "challenge card '{}' held by {team_id} names no target location",
            card.name
        );
        messages.push(format!(
            "Error: challenge card '{}' does not name a location; challenge cleared.",
            card.name
        ));
        clear_challenge(board, team_id);
        return messages;
    };

    let lost_to = match board.location(&target_name) {
        None => {
            warn!(
                "challenge card '{}' targets {target_name}, which is not on the board",
                card.name
            );
            messages.push(format!(
                "Error: location {target_name} for challenge '{}' is not on the board; challenge cleared.",
                card.name
            ));
            clear_challenge(board, team_id);
            return messages;
        }
        Some(claim) => claim
            .claimed_by
            .clone()
            .filter(|owner| claim.status == ClaimStatus::Claimed && owner != team_id),
    };

    if let Some(owner) = lost_to {
        debug!("{team_id} lost the race for {target_name} to {owner}");
        messages.push(format!(
            "Unfortunately, {target_name} was already claimed by {owner}."
        ));
        clear_challenge(board, team_id);
        return messages;
    }

    if let Some(claim) = board.location_mut(&target_name) {
        claim.status = ClaimStatus::Claimed;
        claim.claimed_by = Some(team_id.clone());
        claim.pending_team = None;
    }
    let new_budget = board.team_mut(team_id).map_or(0, |team| {
        team.budget += card.card_budget;
        team.current_challenge_card = None;
        team.budget
    });

    debug!("{team_id} claimed {target_name}");
    messages.push(format!(
        "{team_id} completed the challenge '{}' and claimed {target_name}!",
        card.name
    ));
    messages.push(format!("Team {team_id} budget is now {new_budget}."));

    messages
}

fn clear_challenge(board: &mut Board, team_id: &TeamId) {
    if let Some(team) = board.team_mut(team_id) {
        team.current_challenge_card = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RulesDoc;
    use crate::travel::team_travel;

    const RULES: &str = r#"{
        "rules": {
            "name": "Test",
            "teams": {
                "Adam and Ben": {
                    "players": ["Adam", "Ben"],
                    "budget": 6000,
                    "current_pos": { "name": "London", "type": "city" }
                },
                "Sam and Tom": {
                    "players": ["Sam", "Tom"],
                    "budget": 6000,
                    "current_pos": { "name": "London", "type": "city" }
                }
            },
            "decks": {
                "main_deck": {
                    "team": "any",
                    "deck": [
                        {
                            "name": "Marathon",
                            "challenge": "Walk 10 km.",
                            "victory": { "budget": 200 }
                        }
                    ]
                }
            },
            "possible_claims": [
                {
                    "name": "Austria",
                    "type": "country",
                    "challenge_card": {
                        "name": "Classical",
                        "challenge": "Play classical music.",
                        "victory": { "claim": "Austria", "type": "country" },
                        "card_budget": 0
                    }
                },
                {
                    "name": "Belgium",
                    "type": "country",
                    "challenge_card": {
                        "name": "Fry-Hard",
                        "challenge": "Eat fries.",
                        "victory": { "claim": "Belgium", "type": "country" },
                        "card_budget": 500
                    }
                }
            ]
        }
    }"#;

    fn board() -> Board {
        RulesDoc::from_json(RULES).unwrap().into_board().unwrap()
    }

    fn adam() -> TeamId {
        TeamId::new("Adam and Ben")
    }

    fn sam() -> TeamId {
        TeamId::new("Sam and Tom")
    }

    #[test]
    fn attempt_requires_presence() {
        let mut board = board();

        let messages = attempt_challenge(&mut board, &adam(), Some("Austria"));
        assert_eq!(messages.len(), 1);
        assert_eq!(
            messages[0],
            "Adam and Ben must be at Austria to attempt its challenge."
        );
        assert_eq!(
            board.location("Austria").unwrap().status,
            ClaimStatus::Unclaimed
        );
        assert!(board.team(&adam()).unwrap().current_challenge_card.is_none());
    }

    #[test]
    fn attempt_rejects_unknown_location() {
        let mut board = board();
        let messages = attempt_challenge(&mut board, &adam(), Some("Atlantis"));
        assert_eq!(messages[0], "Atlantis is not a claimable location.");
    }

    #[test]
    fn attempt_without_position_or_location_reports() {
        let mut board = board();
        board.team_mut(&adam()).unwrap().current_pos = None;

        let messages = attempt_challenge(&mut board, &adam(), None);
        assert_eq!(
            messages[0],
            "Adam and Ben has no current position; travel somewhere first."
        );
    }

    #[test]
    fn attempt_defaults_to_current_position() {
        let mut board = board();
        team_travel(&mut board, &adam(), "Austria", 0);

        let messages = attempt_challenge(&mut board, &adam(), None);
        assert!(messages
            .iter()
            .any(|m| m == "Adam and Ben is attempting the challenge for Austria (new pending claim)."));

        let claim = board.location("Austria").unwrap();
        assert_eq!(claim.status, ClaimStatus::Pending);
        assert_eq!(claim.pending_team.as_ref(), Some(&adam()));
    }

    #[test]
    fn second_attempt_contests_without_moving_pending_marker() {
        let mut board = board();
        team_travel(&mut board, &adam(), "Austria", 0);
        team_travel(&mut board, &sam(), "Austria", 0);

        attempt_challenge(&mut board, &adam(), None);
        let messages = attempt_challenge(&mut board, &sam(), None);

        assert!(messages.iter().any(|m| m
            == "Sam and Tom is contesting the challenge for Austria; Adam and Ben holds the pending claim. First to complete wins."));

        let claim = board.location("Austria").unwrap();
        assert_eq!(claim.status, ClaimStatus::Pending);
        assert_eq!(claim.pending_team.as_ref(), Some(&adam()));
        assert!(board.team(&sam()).unwrap().current_challenge_card.is_some());
    }

    #[test]
    fn reattempt_by_pending_holder_is_harmless() {
        let mut board = board();
        team_travel(&mut board, &adam(), "Austria", 0);
        attempt_challenge(&mut board, &adam(), None);

        let messages = attempt_challenge(&mut board, &adam(), None);
        assert!(messages
            .iter()
            .any(|m| m == "Adam and Ben resumed the challenge for Austria (claim still pending)."));
        assert_eq!(
            board.location("Austria").unwrap().pending_team.as_ref(),
            Some(&adam())
        );
    }

    #[test]
    fn attempt_refused_while_other_challenge_active() {
        let mut board = board();
        team_travel(&mut board, &adam(), "Austria", 0);
        attempt_challenge(&mut board, &adam(), None);

        team_travel(&mut board, &adam(), "Belgium", 0);
        // Travel away cleared the Austria card, so hand one back to hit the
        // one-challenge guard directly.
        let austria_card = board.location("Austria").unwrap().challenge_card.clone();
        board.team_mut(&adam()).unwrap().current_challenge_card = Some(austria_card);

        let messages = attempt_challenge(&mut board, &adam(), Some("Belgium"));
        assert_eq!(
            messages[0],
            "Adam and Ben is already attempting the challenge for Austria; only one challenge at a time."
        );
        assert_eq!(
            board.location("Belgium").unwrap().status,
            ClaimStatus::Unclaimed
        );
    }

    #[test]
    fn attempt_refused_while_deck_card_held() {
        let mut board = board();
        team_travel(&mut board, &adam(), "Austria", 0);
        let deck_card = board.decks["main_deck"].deck[0].clone();
        board.team_mut(&adam()).unwrap().current_card = Some(deck_card);

        let messages = attempt_challenge(&mut board, &adam(), None);
        assert_eq!(
            messages[0],
            "Adam and Ben still holds the deck card 'Marathon'; finish or skip it first."
        );
        assert_eq!(
            board.location("Austria").unwrap().status,
            ClaimStatus::Unclaimed
        );
    }

    #[test]
    fn completion_claims_and_pays_card_budget() {
        let mut board = board();
        team_travel(&mut board, &sam(), "Belgium", 100);
        attempt_challenge(&mut board, &sam(), None);

        let messages = complete_challenge(&mut board, &sam());
        assert!(messages
            .iter()
            .any(|m| m == "Sam and Tom completed the challenge 'Fry-Hard' and claimed Belgium!"));
        assert!(messages
            .iter()
            .any(|m| m == "Team Sam and Tom budget is now 6400."));

        let claim = board.location("Belgium").unwrap();
        assert_eq!(claim.status, ClaimStatus::Claimed);
        assert_eq!(claim.claimed_by.as_ref(), Some(&sam()));
        assert!(claim.pending_team.is_none());
        assert!(board.team(&sam()).unwrap().current_challenge_card.is_none());
    }

    #[test]
    fn losing_completion_discovers_race_lazily() {
        let mut board = board();
        team_travel(&mut board, &adam(), "Belgium", 0);
        team_travel(&mut board, &sam(), "Belgium", 0);
        attempt_challenge(&mut board, &adam(), None);
        attempt_challenge(&mut board, &sam(), None);

        complete_challenge(&mut board, &sam());
        let messages = complete_challenge(&mut board, &adam());

        assert_eq!(messages.len(), 1);
        assert_eq!(
            messages[0],
            "Unfortunately, Belgium was already claimed by Sam and Tom."
        );
        assert_eq!(
            board.location("Belgium").unwrap().claimed_by.as_ref(),
            Some(&sam())
        );
        let loser = board.team(&adam()).unwrap();
        assert!(loser.current_challenge_card.is_none());
        assert_eq!(loser.budget, 6000);
    }

    #[test]
    fn completion_without_challenge_never_mutates() {
        let mut board = board();
        let before = serde_json::to_value(&board).unwrap();

        let messages = complete_challenge(&mut board, &adam());
        assert_eq!(messages.len(), 1);
        assert_eq!(
            messages[0],
            "Adam and Ben has no active challenge to complete."
        );
        assert_eq!(serde_json::to_value(&board).unwrap(), before);
    }

    #[test]
    fn completion_with_dangling_target_clears_card() {
        let mut board = board();
        team_travel(&mut board, &adam(), "Austria", 0);
        attempt_challenge(&mut board, &adam(), None);
        if let Some(card) = board
            .team_mut(&adam())
            .unwrap()
            .current_challenge_card
            .as_mut()
        {
            card.victory.claim = Some("Atlantis".to_string());
        }

        let messages = complete_challenge(&mut board, &adam());
        assert!(messages.iter().any(|m| m.starts_with("Error: location Atlantis")));
        assert!(board.team(&adam()).unwrap().current_challenge_card.is_none());
        assert_eq!(board.team(&adam()).unwrap().budget, 6000);
    }

    #[test]
    fn attempt_after_permanent_claim_bounces() {
        let mut board = board();
        team_travel(&mut board, &adam(), "Austria", 0);
        attempt_challenge(&mut board, &adam(), None);
        complete_challenge(&mut board, &adam());

        team_travel(&mut board, &sam(), "Austria", 0);
        let messages = attempt_challenge(&mut board, &sam(), None);

        assert!(messages
            .iter()
            .any(|m| m == "Austria is already permanently claimed by Adam and Ben."));
        assert!(board.team(&sam()).unwrap().current_challenge_card.is_none());
    }
}
