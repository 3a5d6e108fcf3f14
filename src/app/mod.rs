//! Application state types and entry glue.
//!
//! Defines the enums and structs that model the TUI state, the colour theme,
//! and re-exports the event loop as `run`.
//!
pub mod keymap;
pub mod update;

use std::path::Path;

use ratatui::style::Color;
use tracing::warn;

use crate::error::Context;
use crate::model::{User, UserId};
use crate::search::{self, SortSpec};
use crate::store::UserStore;
use crate::validate::UserDraft;

use self::keymap::Keymap;

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Modal,
}

/// Which page is on screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    List,
    Detail { id: UserId, state: DetailState },
}

/// Progress of the single-user fetch behind the detail page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DetailState {
    Loading,
    Loaded(User),
    NotFound,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit(UserId),
}

/// Editable fields of the user form, in tab order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Company,
    Phone,
    Website,
}

impl FormField {
    pub const ALL: [FormField; 5] = [
        FormField::Name,
        FormField::Email,
        FormField::Company,
        FormField::Phone,
        FormField::Website,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name *",
            FormField::Email => "Email *",
            FormField::Company => "Company",
            FormField::Phone => "Phone",
            FormField::Website => "Website",
        }
    }

    pub fn value(self, draft: &UserDraft) -> &str {
        match self {
            FormField::Name => &draft.name,
            FormField::Email => &draft.email,
            FormField::Company => &draft.company,
            FormField::Phone => &draft.phone,
            FormField::Website => &draft.website,
        }
    }

    pub fn value_mut(self, draft: &mut UserDraft) -> &mut String {
        match self {
            FormField::Name => &mut draft.name,
            FormField::Email => &mut draft.email,
            FormField::Company => &mut draft.company,
            FormField::Phone => &mut draft.phone,
            FormField::Website => &mut draft.website,
        }
    }
}

/// Modal dialogs shown over the current page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    UserForm {
        mode: FormMode,
        /// Index into [`FormField::ALL`].
        focus: usize,
        draft: UserDraft,
        error: Option<String>,
    },
    DeleteConfirm {
        id: UserId,
        name: String,
        /// 0 = Yes, 1 = No.
        selected: usize,
    },
    Info {
        message: String,
    },
    Help,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub error: Color,
}

impl Theme {
    /// Plain terminal colours.
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            error: Color::Red,
        }
    }

    /// Catppuccin Mocha.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            error: Color::Rgb(0xf3, 0x8b, 0xa8),        // red
        }
    }

    fn slots(&self) -> [(&'static str, Color); 11] {
        [
            ("text", self.text),
            ("muted", self.muted),
            ("title", self.title),
            ("border", self.border),
            ("header_bg", self.header_bg),
            ("header_fg", self.header_fg),
            ("status_bg", self.status_bg),
            ("status_fg", self.status_fg),
            ("highlight_fg", self.highlight_fg),
            ("highlight_bg", self.highlight_bg),
            ("error", self.error),
        ]
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut Color> {
        Some(match key {
            "text" => &mut self.text,
            "muted" => &mut self.muted,
            "title" => &mut self.title,
            "border" => &mut self.border,
            "header_bg" => &mut self.header_bg,
            "header_fg" => &mut self.header_fg,
            "status_bg" => &mut self.status_bg,
            "status_fg" => &mut self.status_fg,
            "highlight_fg" => &mut self.highlight_fg,
            "highlight_bg" => &mut self.highlight_bg,
            "error" => &mut self.error,
            _ => return None,
        })
    }

    /// Parse `key = value` lines on top of `mocha`. Unknown keys and bad colours are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut theme = Self::mocha();
        for line in contents.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                continue;
            };
            if let (Some(slot), Some(color)) = (theme.slot_mut(key.trim()), parse_color(val)) {
                *slot = color;
            }
        }
        theme
    }

    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    pub fn to_config_string(&self) -> String {
        let mut buf = String::from(
            "# userdir-tui theme\n# Colors: #RRGGBB, RRGGBB or 'reset'\n\n",
        );
        for (key, color) in self.slots() {
            buf.push_str(&format!("{key} = {}\n", color_to_str(color)));
        }
        buf
    }

    pub fn write_file(&self, path: &Path) -> crate::error::Result<()> {
        std::fs::write(path, self.to_config_string())
            .with_ctx(|| format!("writing theme to {}", path.display()))
    }

    /// Read the theme file, or write the default one if it is missing.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let theme = Self::mocha();
        if let Err(e) = theme.write_file(path) {
            warn!(error = %e, "could not write default theme");
        }
        theme
    }
}

fn parse_color(s: &str) -> Option<Color> {
    let lower = s.trim().to_ascii_lowercase();
    if lower == "reset" {
        return Some(Color::Reset);
    }
    let hex = lower.strip_prefix('#').unwrap_or(&lower);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

fn color_to_str(c: Color) -> String {
    match c {
        Color::Rgb(r, g, b) => format!("#{r:02X}{g:02X}{b:02X}"),
        Color::Reset => "reset".to_string(),
        Color::Black => "#000000".to_string(),
        Color::Red => "#FF0000".to_string(),
        Color::Yellow => "#FFFF00".to_string(),
        Color::Cyan => "#00FFFF".to_string(),
        Color::Gray => "#B3B3B3".to_string(),
        Color::DarkGray => "#4D4D4D".to_string(),
        Color::White => "#FFFFFF".to_string(),
        // Other named colours are not produced by the built-in themes.
        _ => "reset".to_string(),
    }
}

pub struct AppState {
    pub store: UserStore,
    /// Display list derived from `store` by [`search::apply_search`].
    pub users: Vec<User>,
    pub search_query: String,
    pub sort: SortSpec,
    pub selected_user_index: usize,
    pub rows_per_page: usize,
    pub input_mode: InputMode,
    pub route: Route,
    pub modal: Option<ModalState>,
    /// One-line notice shown in the status bar.
    pub status: Option<String>,
    pub theme: Theme,
    pub keymap: Keymap,
}

impl AppState {
    pub fn new(theme: Theme, keymap: Keymap) -> Self {
        let mut app = Self {
            store: UserStore::new(),
            users: Vec::new(),
            search_query: String::new(),
            sort: SortSpec::default(),
            selected_user_index: 0,
            rows_per_page: 10,
            input_mode: InputMode::Normal,
            route: Route::List,
            modal: None,
            status: None,
            theme,
            keymap,
        };
        search::apply_search(&mut app);
        app
    }

    /// App over an existing store, with built-in theme and keys.
    pub fn with_store(store: UserStore) -> Self {
        let mut app = Self::new(Theme::mocha(), Keymap::default());
        app.store = store;
        search::apply_search(&mut app);
        app
    }

    pub fn selected_user(&self) -> Option<&User> {
        self.users.get(self.selected_user_index)
    }

    pub fn open_modal(&mut self, modal: ModalState) {
        self.modal = Some(modal);
        self.input_mode = InputMode::Modal;
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
        self.input_mode = InputMode::Normal;
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Theme::mocha(), Keymap::default())
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_parse_overrides_known_keys_only() {
        let t = Theme::parse("# c\ntitle = #010203\nbogus = #FFFFFF\nborder = nothex\nerror=reset\n");
        assert_eq!(t.title, Color::Rgb(1, 2, 3));
        assert_eq!(t.border, Theme::mocha().border);
        assert_eq!(t.error, Color::Reset);
    }

    #[test]
    fn theme_config_string_round_trips() {
        let t = Theme::mocha();
        assert_eq!(Theme::parse(&t.to_config_string()), t);
    }

    #[test]
    fn parse_color_rejects_short_and_non_ascii() {
        assert_eq!(parse_color("abc"), None);
        assert_eq!(parse_color("ééé"), None);
        assert_eq!(parse_color("FF0000"), Some(Color::Rgb(255, 0, 0)));
    }

    #[test]
    fn form_field_accessors_line_up() {
        let mut d = UserDraft::default();
        for (i, f) in FormField::ALL.iter().enumerate() {
            f.value_mut(&mut d).push_str(&i.to_string());
        }
        assert_eq!(d.name, "0");
        assert_eq!(d.website, "4");
        assert_eq!(FormField::Phone.value(&d), "3");
    }

    #[test]
    fn new_app_starts_loading_on_list() {
        let app = AppState::default();
        assert!(app.store.is_loading());
        assert_eq!(app.route, Route::List);
        assert!(app.users.is_empty());
    }
}
