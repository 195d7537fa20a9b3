//! Local persistence for the client's vote memory.
//!
//! Two facts survive the session: whether this client has cast its one
//! permanent "burn" vote, and the kind of the last vote it cast (used only
//! for page theming). On the web build these live in `localStorage` under
//! two string keys; on native builds they round-trip through a small JSON
//! file in the platform data directory. Persistence is fire-and-forget: a
//! missing or broken storage backend degrades to an in-memory session, it
//! never surfaces as an error.

use serde::{Deserialize, Serialize};

use crate::vote::tally::VoteKind;

pub const BURN_FLAG_KEY: &str = "tollboard-voted-burn";
pub const MOOD_KEY: &str = "tollboard-vote-mood";

/// What this client remembers about its own voting history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientVoteState {
    pub has_voted_burn: bool,
    pub mood: Option<VoteKind>,
}

/// Seam between the vote controller and whatever holds client state.
///
/// Production uses [`LocalVoteMemory`]; tests substitute an in-memory
/// implementation so controller behavior can be asserted without a browser.
pub trait VoteMemory {
    fn load(&self) -> ClientVoteState;
    fn save(&self, state: &ClientVoteState);
}

/// Platform-backed [`VoteMemory`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalVoteMemory;

impl VoteMemory for LocalVoteMemory {
    fn load(&self) -> ClientVoteState {
        load_state()
    }

    fn save(&self, state: &ClientVoteState) {
        save_state(state);
    }
}

#[cfg(any(target_arch = "wasm32", test))]
fn mood_from_str(raw: &str) -> Option<VoteKind> {
    match raw {
        "support" => Some(VoteKind::Support),
        "burn" => Some(VoteKind::Burn),
        _ => None,
    }
}

#[cfg(target_arch = "wasm32")]
fn load_state() -> ClientVoteState {
    let Some(storage) = local_storage() else {
        return ClientVoteState::default();
    };

    let has_voted_burn = storage
        .get_item(BURN_FLAG_KEY)
        .ok()
        .flatten()
        .map(|raw| raw == "true")
        .unwrap_or(false);
    let mood = storage
        .get_item(MOOD_KEY)
        .ok()
        .flatten()
        .and_then(|raw| mood_from_str(&raw));

    ClientVoteState {
        has_voted_burn,
        mood,
    }
}

#[cfg(target_arch = "wasm32")]
fn save_state(state: &ClientVoteState) {
    let Some(storage) = local_storage() else {
        return;
    };

    if state.has_voted_burn {
        let _ = storage.set_item(BURN_FLAG_KEY, "true");
    }
    if let Some(mood) = state.mood {
        let _ = storage.set_item(MOOD_KEY, mood.as_str());
    }
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

#[cfg(not(target_arch = "wasm32"))]
fn load_state() -> ClientVoteState {
    let Some(path) = state_path() else {
        return ClientVoteState::default();
    };
    let Ok(raw) = std::fs::read_to_string(path) else {
        return ClientVoteState::default();
    };
    serde_json::from_str(&raw).unwrap_or_default()
}

#[cfg(not(target_arch = "wasm32"))]
fn save_state(state: &ClientVoteState) {
    let Some(path) = state_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    if let Ok(raw) = serde_json::to_string_pretty(state) {
        let _ = std::fs::write(path, raw);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn state_path() -> Option<std::path::PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "tollboard")?;
    Some(dirs.data_dir().join("vote_state.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mood_strings_round_trip() {
        assert_eq!(mood_from_str("support"), Some(VoteKind::Support));
        assert_eq!(mood_from_str("burn"), Some(VoteKind::Burn));
        assert_eq!(mood_from_str("neutral"), None);
    }

    #[test]
    fn state_serializes_for_the_native_backend() {
        let state = ClientVoteState {
            has_voted_burn: true,
            mood: Some(VoteKind::Burn),
        };
        let raw = serde_json::to_string(&state).unwrap();
        let back: ClientVoteState = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, state);
    }
}
