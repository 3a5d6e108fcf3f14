//! Per-user detail page: header card, contact block and address block.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::app::{AppState, DetailState};
use crate::model::User;

pub fn render_detail_page(f: &mut Frame, area: Rect, app: &AppState, state: &DetailState) {
    match state {
        DetailState::Loading => {
            let p = Paragraph::new("Loading user…")
                .alignment(Alignment::Center)
                .style(Style::default().fg(app.theme.muted))
                .block(card("User", app));
            f.render_widget(p, area);
        }
        DetailState::NotFound => {
            let rect = crate::ui::components::centered_rect(50, 7, area);
            let p = Paragraph::new(
                "User Not Found\n\nThe user you're looking for doesn't exist.\nEsc: Back to Users",
            )
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.text))
            .block(card("Not found", app));
            f.render_widget(Clear, rect);
            f.render_widget(p, rect);
        }
        DetailState::Loaded(user) => render_loaded(f, area, app, user),
    }
}

fn card<'a>(title: &'a str, app: &AppState) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border))
}

fn render_loaded(f: &mut Frame, area: Rect, app: &AppState, user: &User) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Length(5), Constraint::Min(4)].as_ref())
        .split(area);

    let label = Style::default().fg(app.theme.muted);
    let value = Style::default().fg(app.theme.text).add_modifier(Modifier::BOLD);

    let header = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(
                format!("({}) ", user.initial()),
                Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD),
            ),
            Span::styled(user.name.clone(), value),
        ]),
        Line::from(vec![
            Span::styled(format!("{}  ", user.company.name), label),
            Span::styled(format!("ID: {}", user.id), label),
        ]),
    ])
    .block(card("User  (Esc: back, e: edit)", app));
    f.render_widget(header, parts[0]);

    let contact = Paragraph::new(vec![
        Line::from(vec![Span::styled("Email    ", label), Span::styled(user.email.clone(), value)]),
        Line::from(vec![Span::styled("Phone    ", label), Span::styled(user.phone.clone(), value)]),
        Line::from(vec![
            Span::styled("Website  ", label),
            Span::styled(website_url(&user.website), value),
        ]),
    ])
    .block(card("Contact Information", app));
    f.render_widget(contact, parts[1]);

    let address = if user.address.is_empty() {
        Paragraph::new(Span::styled("No address on file", label))
    } else {
        Paragraph::new(vec![
            Line::from(Span::styled(user.address.street.clone(), value)),
            Line::from(Span::styled(user.address.locality(), label)),
        ])
    };
    f.render_widget(address.block(card("Address", app)), parts[2]);
}

/// Websites are stored bare ("example.com"); show them as a link.
fn website_url(site: &str) -> String {
    if site.is_empty() {
        String::new()
    } else {
        format!("https://{site}")
    }
}
