pub mod components;
pub mod detail;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode, ModalState, Route};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());

    render_header(f, root[0], app);

    match app.route.clone() {
        Route::List => {
            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(62), Constraint::Percentage(38)].as_ref())
                .split(root[1]);
            users::render_users_table(f, body[0], app);
            users::render_user_details(f, body[1], app);
        }
        Route::Detail { state, .. } => detail::render_detail_page(f, root[1], app, &state),
    }

    components::render_status_bar(f, root[2], app);

    if app.modal.is_some() {
        render_modal(f, f.area(), app);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let prompt = match app.input_mode {
        InputMode::Search => format!("  Search: {}_", app.search_query),
        _ if !app.search_query.is_empty() => format!("  Filter: {}", app.search_query),
        _ => String::new(),
    };
    let count = app.users.len();
    let noun = if count == 1 { "user" } else { "users" };
    let page = match app.route {
        Route::List => "User Management",
        Route::Detail { .. } => "User Details",
    };
    let p = Paragraph::new(format!("{page}  {count} {noun}{prompt}  | ?: help  q: quit"))
        .block(
            Block::default()
                .title("userdir-tui")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, area);
}

fn render_modal(f: &mut Frame, area: Rect, app: &mut AppState) {
    if let Some(state) = app.modal.clone() {
        match &state {
            ModalState::UserForm { .. } | ModalState::DeleteConfirm { .. } => {
                users::render_user_modal(f, area, app, &state);
            }
            ModalState::Info { .. } => components::render_info_modal(f, area, app, &state),
            ModalState::Help => components::render_help_modal(f, area, app),
        }
    }
}
