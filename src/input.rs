//! Keyboard input mapping
//!
//! Hosts forward raw key names (as in `KeyboardEvent.key`). Held keys feed the
//! per-tick [`TickInput`]; single presses map to discrete [`UiAction`]s.

use std::collections::HashSet;

use crate::sim::TickInput;

/// A movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Arrow keys and WASD (either case)
pub fn direction_for_key(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" | "w" | "W" => Some(Direction::Up),
        "ArrowDown" | "s" | "S" => Some(Direction::Down),
        "ArrowLeft" | "a" | "A" => Some(Direction::Left),
        "ArrowRight" | "d" | "D" => Some(Direction::Right),
        _ => None,
    }
}

/// Letter keys fold to lowercase so Shift changes between press and release
/// still match
fn normalise(key: &str) -> String {
    if key.chars().count() == 1 {
        key.to_lowercase()
    } else {
        key.to_string()
    }
}

/// Held movement keys; the most recent press/release of each key wins
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashSet<String>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key transition. Returns true if the key steers the player.
    pub fn set(&mut self, key: &str, pressed: bool) -> bool {
        if direction_for_key(key).is_none() {
            return false;
        }
        let key = normalise(key);
        if pressed {
            self.held.insert(key);
        } else {
            self.held.remove(&key);
        }
        true
    }

    pub fn is_held(&self, dir: Direction) -> bool {
        self.held
            .iter()
            .any(|k| direction_for_key(k) == Some(dir))
    }

    /// Release everything (window lost focus)
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn tick_input(&self) -> TickInput {
        TickInput {
            up: self.is_held(Direction::Up),
            down: self.is_held(Direction::Down),
            left: self.is_held(Direction::Left),
            right: self.is_held(Direction::Right),
        }
    }
}

/// Discrete commands from buttons or single key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    /// Start / continue / close the reward, whichever applies
    Confirm,
    /// Pick quiz choice `n`
    Answer(usize),
    ToggleCollection,
    /// Discard the session and return to the title screen
    Reset,
}

pub fn action_for_key(key: &str) -> Option<UiAction> {
    match key {
        " " | "Enter" => Some(UiAction::Confirm),
        "1" | "2" | "3" | "4" => key
            .parse::<usize>()
            .ok()
            .map(|n| UiAction::Answer(n - 1)),
        "c" | "C" => Some(UiAction::ToggleCollection),
        "Escape" => Some(UiAction::Reset),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrows_and_wasd_map_to_directions() {
        assert_eq!(direction_for_key("ArrowLeft"), Some(Direction::Left));
        assert_eq!(direction_for_key("d"), Some(Direction::Right));
        assert_eq!(direction_for_key("W"), Some(Direction::Up));
        assert_eq!(direction_for_key("x"), None);
    }

    #[test]
    fn test_latest_transition_wins() {
        let mut keys = KeyState::new();
        assert!(keys.set("ArrowUp", true));
        assert!(keys.set("w", true));
        assert!(keys.tick_input().up);

        keys.set("ArrowUp", false);
        // "w" still held
        assert!(keys.tick_input().up);
        keys.set("w", false);
        assert_eq!(keys.tick_input(), TickInput::default());
    }

    #[test]
    fn test_release_matches_press_across_shift() {
        let mut keys = KeyState::new();
        keys.set("W", true);
        assert!(keys.tick_input().up);
        keys.set("w", false);
        assert!(!keys.tick_input().up);

        keys.set("d", true);
        keys.set("D", false);
        assert_eq!(keys.tick_input(), TickInput::default());
    }

    #[test]
    fn test_opposing_keys_both_reported() {
        let mut keys = KeyState::new();
        keys.set("a", true);
        keys.set("ArrowRight", true);
        let input = keys.tick_input();
        assert!(input.left && input.right);
        keys.clear();
        assert_eq!(keys.tick_input(), TickInput::default());
    }

    #[test]
    fn test_non_movement_keys_ignored() {
        let mut keys = KeyState::new();
        assert!(!keys.set("Enter", true));
        assert_eq!(keys.tick_input(), TickInput::default());
    }

    #[test]
    fn test_ui_keys() {
        assert_eq!(action_for_key("Enter"), Some(UiAction::Confirm));
        assert_eq!(action_for_key("3"), Some(UiAction::Answer(2)));
        assert_eq!(action_for_key("c"), Some(UiAction::ToggleCollection));
        assert_eq!(action_for_key("Escape"), Some(UiAction::Reset));
        assert_eq!(action_for_key("9"), None);
    }
}
