//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! Only normal-mode keys go through the keymap. Text entry (search, form
//! fields) and modal navigation read raw key codes.

use std::collections::HashMap;
use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

use crate::error::Context;

/// Semantic keyboard actions that can be bound to key combinations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application (or leave the detail page).
    Quit,
    OpenHelp,
    StartSearch,
    NewUser,
    EditSelection,
    DeleteSelection,
    /// Open the detail page of the selected user.
    OpenDetail,
    /// Leave the detail page.
    Back,
    /// none -> name -> id.
    CycleSort,
    ToggleSortOrder,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    Ignore,
}

/// Config-file spelling of each action.
const ACTION_NAMES: [(KeyAction, &str); 15] = [
    (KeyAction::Quit, "Quit"),
    (KeyAction::OpenHelp, "OpenHelp"),
    (KeyAction::StartSearch, "StartSearch"),
    (KeyAction::NewUser, "NewUser"),
    (KeyAction::EditSelection, "EditSelection"),
    (KeyAction::DeleteSelection, "DeleteSelection"),
    (KeyAction::OpenDetail, "OpenDetail"),
    (KeyAction::Back, "Back"),
    (KeyAction::CycleSort, "CycleSort"),
    (KeyAction::ToggleSortOrder, "ToggleSortOrder"),
    (KeyAction::MoveUp, "MoveUp"),
    (KeyAction::MoveDown, "MoveDown"),
    (KeyAction::PageUp, "PageUp"),
    (KeyAction::PageDown, "PageDown"),
    (KeyAction::Ignore, "Ignore"),
];

/// Named keys accepted in a KeySpec besides single characters.
const NAMED_KEYS: [(&str, KeyCode); 12] = [
    ("Enter", KeyCode::Enter),
    ("Delete", KeyCode::Delete),
    ("Backspace", KeyCode::Backspace),
    ("Esc", KeyCode::Esc),
    ("Tab", KeyCode::Tab),
    ("BackTab", KeyCode::BackTab),
    ("Up", KeyCode::Up),
    ("Down", KeyCode::Down),
    ("Left", KeyCode::Left),
    ("Right", KeyCode::Right),
    ("PageUp", KeyCode::PageUp),
    ("PageDown", KeyCode::PageDown),
];

/// Maps `(KeyModifiers, KeyCode)` pairs to [`KeyAction`]s.
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Arrow keys plus vim-style hjkl, and single letters for the list actions.
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::CONTROL, Char('c')), KeyAction::Quit);
        bindings.insert((M::NONE, Char('?')), KeyAction::OpenHelp);
        bindings.insert((M::NONE, Char('/')), KeyAction::StartSearch);
        bindings.insert((M::NONE, Char('n')), KeyAction::NewUser);
        bindings.insert((M::NONE, Char('e')), KeyAction::EditSelection);
        bindings.insert((M::NONE, Char('d')), KeyAction::DeleteSelection);
        bindings.insert((M::NONE, Delete), KeyAction::DeleteSelection);
        bindings.insert((M::NONE, Enter), KeyAction::OpenDetail);
        bindings.insert((M::NONE, Esc), KeyAction::Back);
        bindings.insert((M::NONE, Backspace), KeyAction::Back);
        bindings.insert((M::NONE, Char('s')), KeyAction::CycleSort);
        bindings.insert((M::NONE, Char('o')), KeyAction::ToggleSortOrder);

        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, PageUp), KeyAction::PageUp);
        bindings.insert((M::NONE, PageDown), KeyAction::PageDown);
        bindings.insert((M::NONE, Left), KeyAction::PageUp);
        bindings.insert((M::NONE, Right), KeyAction::PageDown);
        bindings.insert((M::NONE, Char('h')), KeyAction::PageUp);
        bindings.insert((M::NONE, Char('l')), KeyAction::PageDown);
        // Some terminals report '?' with SHIFT.
        bindings.insert((M::SHIFT, Char('?')), KeyAction::OpenHelp);

        Self { bindings }
    }

    /// Read `path`, or write the defaults there if it does not exist yet.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(e) = km.write_file(path) {
            warn!(error = %e, "could not write default keybindings");
        }
        km
    }

    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    /// Apply `Action = KeySpec` lines on top of the defaults. Unparseable lines are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut map = Self::default();
        for line in contents.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else {
                continue;
            };
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                map.bindings.insert(key, action);
            }
        }
        map
    }

    pub fn write_file(&self, path: &Path) -> crate::error::Result<()> {
        std::fs::write(path, self.to_config_string())
            .with_ctx(|| format!("writing keybindings to {}", path.display()))
    }

    /// Current bindings in `Action = KeySpec` form, sorted for a stable file.
    pub fn to_config_string(&self) -> String {
        let mut buf = String::from("# userdir-tui keybindings\n# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec: a single character, Ctrl+<key>, or one of ");
        buf.push_str(&NAMED_KEYS.map(|(n, _)| n).join(", "));
        buf.push_str("\n\n");
        let mut lines: Vec<String> = self
            .bindings
            .iter()
            .map(|((mods, code), action)| {
                format!("{} = {}", format_action(*action), Self::format_key(*mods, *code))
            })
            .collect();
        lines.sort();
        for l in lines {
            buf.push_str(&l);
            buf.push('\n');
        }
        buf
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    pub fn all_bindings(&self) -> Vec<((KeyModifiers, KeyCode), KeyAction)> {
        self.bindings.iter().map(|(k, v)| (*k, *v)).collect()
    }

    /// Human-readable key spec like "Ctrl+c" or "PageUp".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        let base = match NAMED_KEYS.iter().find(|(_, c)| *c == code) {
            Some((name, _)) => (*name).to_string(),
            None => match code {
                KeyCode::Char(c) => c.to_string(),
                other => format!("{other:?}"),
            },
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{base}")
        } else {
            base
        }
    }

    /// Keys bound to `action`, formatted and sorted.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((m, c), _)| Self::format_key(*m, *c))
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    let s = spec.trim();
    let (mods, rest) = match s.strip_prefix("Ctrl+") {
        Some(after) => (KeyModifiers::CONTROL, after),
        None => (KeyModifiers::NONE, s),
    };
    if let Some((_, code)) = NAMED_KEYS.iter().find(|(n, _)| *n == rest) {
        return Some((mods, *code));
    }
    if rest == "Escape" {
        return Some((mods, KeyCode::Esc));
    }
    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some((mods, KeyCode::Char(c))),
        _ => None,
    }
}

fn parse_action(s: &str) -> Option<KeyAction> {
    let s = s.trim();
    ACTION_NAMES.iter().find(|(_, n)| *n == s).map(|(a, _)| *a)
}

pub fn format_action(a: KeyAction) -> &'static str {
    ACTION_NAMES
        .iter()
        .find(|(x, _)| *x == a)
        .map(|(_, n)| *n)
        .unwrap_or("Ignore")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn defaults_resolve() {
        let km = Keymap::default();
        assert_eq!(km.resolve(&press(KeyCode::Char('q'))), Some(KeyAction::Quit));
        assert_eq!(km.resolve(&press(KeyCode::Enter)), Some(KeyAction::OpenDetail));
        assert_eq!(km.resolve(&press(KeyCode::Char('j'))), Some(KeyAction::MoveDown));
        assert_eq!(km.resolve(&press(KeyCode::Char('z'))), None);
    }

    #[test]
    fn parse_overrides_and_skips_garbage() {
        let km = Keymap::parse("# comment\nQuit = x\nNewUser = Ctrl+n\nNope = y\nMoveUp = TooLong\n");
        assert_eq!(km.resolve(&press(KeyCode::Char('x'))), Some(KeyAction::Quit));
        assert_eq!(
            km.resolve(&KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL)),
            Some(KeyAction::NewUser)
        );
        assert_eq!(km.resolve(&press(KeyCode::Char('y'))), None);
    }

    #[test]
    fn config_string_round_trips() {
        let km = Keymap::default();
        let again = Keymap::parse(&km.to_config_string());
        let mut a = km.all_bindings();
        let mut b = again.all_bindings();
        a.sort_by_key(|(k, _)| format!("{k:?}"));
        b.sort_by_key(|(k, _)| format!("{k:?}"));
        assert_eq!(a, b);
    }

    #[test]
    fn format_key_names() {
        assert_eq!(Keymap::format_key(KeyModifiers::CONTROL, KeyCode::Char('c')), "Ctrl+c");
        assert_eq!(Keymap::format_key(KeyModifiers::NONE, KeyCode::PageDown), "PageDown");
        assert_eq!(Keymap::default().keys_for(KeyAction::DeleteSelection), vec!["Delete", "d"]);
    }
}
