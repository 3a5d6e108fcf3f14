use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};

use crate::app::{AppState, FormField, FormMode, ModalState};

pub fn render_users_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let block = Block::default()
        .title("Users")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    if app.store.is_loading() {
        let p = Paragraph::new("Loading users…")
            .style(Style::default().fg(app.theme.muted))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(p, area);
        return;
    }
    if app.users.is_empty() {
        let p = Paragraph::new(
            "No users found\n\nTry adjusting your search or press n to add a new user.",
        )
        .style(Style::default().fg(app.theme.muted))
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(p, area);
        return;
    }

    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let start = (app.selected_user_index / app.rows_per_page) * app.rows_per_page;
    let end = (start + app.rows_per_page).min(app.users.len());
    let slice = app.users.get(start..end).unwrap_or_default();

    let rows = slice.iter().enumerate().map(|(i, u)| {
        let style = if start + i == app.selected_user_index {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from(u.id.to_string()),
            Cell::from(u.name.clone()),
            Cell::from(u.email.clone()),
            Cell::from(u.company.name.clone()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(14),
        Constraint::Percentage(30),
        Constraint::Percentage(40),
        Constraint::Percentage(30),
    ];
    let header = Row::new(vec!["ID", "NAME", "EMAIL", "COMPANY"])
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1);
    f.render_widget(table, area);
}

pub fn render_user_details(f: &mut Frame, area: Rect, app: &AppState) {
    let text = match app.selected_user() {
        Some(u) => format!(
            "Name: {}\nEmail: {}\nCompany: {}\nPhone: {}\nWebsite: {}\nID: {}\n\nEnter: open details  e: edit  d: delete",
            u.name, u.email, u.company.name, u.phone, u.website, u.id
        ),
        None => String::new(),
    };
    let p = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .style(Style::default().fg(app.theme.text))
        .block(
            Block::default()
                .title("Details")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(p, area);
}

pub fn render_user_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    match state {
        ModalState::UserForm {
            mode,
            focus,
            draft,
            error,
        } => {
            let height = FormField::ALL.len() as u16 + 7;
            let rect = crate::ui::components::centered_rect(60, height, area);
            let title = match mode {
                FormMode::Add => "Add New User",
                FormMode::Edit(_) => "Edit User",
            };
            let mut lines: Vec<Line> = Vec::new();
            for (idx, field) in FormField::ALL.iter().enumerate() {
                let marker = if idx == *focus { "▶" } else { " " };
                let cursor = if idx == *focus { "_" } else { "" };
                lines.push(Line::from(vec![
                    Span::raw(format!("{marker} {:<9} ", field.label())),
                    Span::styled(
                        format!("{}{cursor}", field.value(draft)),
                        Style::default().fg(app.theme.text),
                    ),
                ]));
            }
            lines.push(Line::raw(""));
            if let Some(err) = error {
                lines.push(Line::from(Span::styled(
                    err.clone(),
                    Style::default().fg(app.theme.error),
                )));
            } else {
                lines.push(Line::raw(""));
            }
            let submit = match mode {
                FormMode::Add => "Add User",
                FormMode::Edit(_) => "Save Changes",
            };
            lines.push(Line::from(Span::styled(
                format!("Enter: {submit}   Tab/↑↓: field   Esc: cancel"),
                Style::default().fg(app.theme.muted),
            )));
            let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(app.theme.border)),
            );
            f.render_widget(Clear, rect);
            f.render_widget(p, rect);
        }
        ModalState::DeleteConfirm { name, selected, .. } => {
            let rect = crate::ui::components::centered_rect(50, 7, area);
            let yes = if *selected == 0 { "[Yes]" } else { " Yes " };
            let no = if *selected == 1 { "[No]" } else { " No " };
            let body = format!("Delete {name}?\nThis action cannot be undone.\n\n  {yes}    {no}");
            let p = Paragraph::new(body).block(
                Block::default()
                    .title("Confirm delete")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(app.theme.border)),
            );
            f.render_widget(Clear, rect);
            f.render_widget(p, rect);
        }
        _ => {}
    }
}
