use crate::model::character::Character;
use core::fmt;
use serde::{Deserialize, Serialize};

/// What the orchestrator is asking a bot for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionMode {
    Regular,
    /// Opening turns, or the acting seat's card is face up.
    SwapOnly,
    /// Another seat announced `character`; respond with challenge or pass.
    ChallengeTheAnnouncer {
        announcer: usize,
        character: Character,
    },
}

impl ActionMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            ActionMode::Regular => "regular",
            ActionMode::SwapOnly => "swap_only",
            ActionMode::ChallengeTheAnnouncer { .. } => "challenge_the_announcer",
        }
    }

    pub fn permits(self, action: &Action) -> bool {
        match self {
            ActionMode::Regular => true,
            ActionMode::SwapOnly => matches!(action, Action::SwapMyCard { .. }),
            ActionMode::ChallengeTheAnnouncer { .. } => false,
        }
    }

    pub const fn expects_response(self) -> bool {
        matches!(self, ActionMode::ChallengeTheAnnouncer { .. })
    }
}

impl fmt::Display for ActionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Exchange cards under the table; `genuine == false` hands the cards back unchanged.
    SwapMyCard { target: usize, genuine: bool },
    LookAtMyCard,
    AnnounceCharacter(Character),
}

impl Action {
    pub const fn label(&self) -> &'static str {
        match self {
            Action::SwapMyCard { .. } => "swap",
            Action::LookAtMyCard => "look",
            Action::AnnounceCharacter(_) => "announce",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Response {
    Challenge,
    Pass,
}

/// Output of a bot decision for any [`ActionMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Act(Action),
    Respond(Response),
}

impl Decision {
    pub const fn label(&self) -> &'static str {
        match self {
            Decision::Act(action) => action.label(),
            Decision::Respond(Response::Challenge) => "challenge",
            Decision::Respond(Response::Pass) => "pass",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_only_rejects_everything_but_swaps() {
        let swap = Action::SwapMyCard {
            target: 1,
            genuine: false,
        };
        assert!(ActionMode::SwapOnly.permits(&swap));
        assert!(!ActionMode::SwapOnly.permits(&Action::LookAtMyCard));
        assert!(!ActionMode::SwapOnly.permits(&Action::AnnounceCharacter(Character::King)));
        assert!(ActionMode::Regular.permits(&Action::LookAtMyCard));
    }

    #[test]
    fn challenge_mode_expects_a_response() {
        let mode = ActionMode::ChallengeTheAnnouncer {
            announcer: 0,
            character: Character::Queen,
        };
        assert!(mode.expects_response());
        assert!(!mode.permits(&Action::LookAtMyCard));
        assert_eq!(mode.to_string(), "challenge_the_announcer");
    }
}
