//! Shared UI components (status bar, modal helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode, ModalState};

/// Render the bottom status bar with mode, sort and the latest notice.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Modal => "MODAL",
    };
    let mut msg = format!(
        "mode: {mode}  sort: {}  shown:{}/{}",
        app.sort.label(),
        app.users.len(),
        app.store.len()
    );
    if let Some(status) = &app.status {
        msg.push_str("  | ");
        msg.push_str(status);
    }
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render a generic informational modal dialog.
pub fn render_info_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::Info { message } = state {
        let max_w = area.width.saturating_sub(6).max(30);
        let width = 48u16.min(max_w);
        let approx_lines = (message.len() as u16 / width.saturating_sub(4).max(10)).max(1);
        let max_h = area.height.saturating_sub(6).max(5);
        let height = (approx_lines + 4).min(max_h).max(5);
        let rect = centered_rect(width, height, area);
        let p = Paragraph::new(format!("{message}\n\nEnter: close"))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("Info")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(app.theme.border)),
            );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}

/// Render the help modal; key names come from the active keymap.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 70u16.min(area.width.saturating_sub(4)).max(40);
    let height = 24u16.min(area.height.saturating_sub(2)).max(10);
    let rect = centered_rect(width, height, area);

    let entries = [
        ("Move", vec![KeyAction::MoveUp, KeyAction::MoveDown]),
        ("Page", vec![KeyAction::PageUp, KeyAction::PageDown]),
        ("Search by name or email", vec![KeyAction::StartSearch]),
        ("Cycle sort field (name, id, none)", vec![KeyAction::CycleSort]),
        ("Toggle sort order", vec![KeyAction::ToggleSortOrder]),
        ("Open user details", vec![KeyAction::OpenDetail]),
        ("Add user", vec![KeyAction::NewUser]),
        ("Edit user", vec![KeyAction::EditSelection]),
        ("Delete user", vec![KeyAction::DeleteSelection]),
        ("Back from details", vec![KeyAction::Back]),
        ("Help", vec![KeyAction::OpenHelp]),
        ("Quit", vec![KeyAction::Quit]),
    ];

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(
            "Keys",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
    ];
    for (label, actions) in entries {
        let keys: Vec<String> = actions.iter().flat_map(|a| app.keymap.keys_for(*a)).collect();
        lines.push(Line::from(vec![
            Span::raw(format!("{label:<36}")),
            Span::styled(keys.join(", "), Style::default().add_modifier(Modifier::ITALIC)),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Search: type to filter, Enter keeps the query, Esc clears it",
        Style::default().fg(app.theme.muted),
    )));
    lines.push(Line::from(Span::styled(
        "Form: Tab/↑↓ moves between fields, Enter submits, Esc cancels",
        Style::default().fg(app.theme.muted),
    )));
    lines.push(Line::from(Span::styled(
        "Changes are kept in memory only and are lost on exit",
        Style::default().fg(app.theme.muted),
    )));

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
