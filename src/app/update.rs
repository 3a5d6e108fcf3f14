use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::Backend;
use tracing::{debug, info, warn};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, DetailState, FormField, FormMode, InputMode, ModalState, Route};
use crate::fetch::{self, FetchEvent, UserSource};
use crate::model::UserId;
use crate::search::apply_search;
use crate::store::Mutation;
use crate::ui;
use crate::validate::{UserDraft, ValidationError};

/// What the event loop should do after a key press.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
    /// Start a background fetch for the detail page of this user.
    FetchUser(UserId),
}

pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: AppState,
    source: Arc<dyn UserSource>,
    start_detail: Option<UserId>,
) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    fetch::spawn_list_fetch(Arc::clone(&source), tx.clone());
    if let Some(id) = start_detail
        && let Flow::FetchUser(id) = open_detail(&mut app, id)
    {
        fetch::spawn_user_fetch(Arc::clone(&source), id, tx.clone());
    }

    loop {
        while let Ok(ev) = rx.try_recv() {
            apply_fetch_event(&mut app, ev);
        }

        terminal.draw(|f| {
            ui::render(f, &mut app);
        })?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match handle_key(&mut app, key) {
                Flow::Quit => break,
                Flow::FetchUser(id) => {
                    fetch::spawn_user_fetch(Arc::clone(&source), id, tx.clone());
                }
                Flow::Continue => {}
            }
        }
    }
    info!("exiting");
    Ok(())
}

/// Apply a finished fetch on the UI thread.
pub fn apply_fetch_event(app: &mut AppState, ev: FetchEvent) {
    match ev {
        FetchEvent::Users(Ok(users)) => {
            let count = users.len();
            app.store.set_all(users);
            app.status = Some(format!("Loaded {count} users"));
        }
        FetchEvent::Users(Err(e)) => {
            warn!(error = %e, "failed to fetch users");
            // Keep whatever is in the store; just stop showing the spinner.
            app.store.set_loading(false);
            app.status = Some(format!("Could not load users: {e}"));
        }
        FetchEvent::User { id, result } => {
            let Route::Detail { id: open_id, state } = &mut app.route else {
                debug!(id, "dropping detail result, detail page closed");
                return;
            };
            if *open_id != id {
                debug!(id, open_id = *open_id, "dropping stale detail result");
                return;
            }
            *state = match result {
                Ok(Some(user)) => DetailState::Loaded(user),
                Ok(None) => DetailState::NotFound,
                Err(e) => {
                    warn!(id, error = %e, "failed to fetch user");
                    DetailState::NotFound
                }
            };
        }
    }
    apply_search(app);
}

/// Switch to the detail page for `id`; the caller starts the fetch.
pub fn open_detail(app: &mut AppState, id: UserId) -> Flow {
    app.route = Route::Detail {
        id,
        state: DetailState::Loading,
    };
    app.close_modal();
    Flow::FetchUser(id)
}

pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Flow {
    match app.input_mode {
        InputMode::Modal => {
            handle_modal_key(app, key);
            Flow::Continue
        }
        InputMode::Search => {
            handle_search_key(app, key);
            Flow::Continue
        }
        InputMode::Normal => match app.route {
            Route::List => handle_list_key(app, key),
            Route::Detail { id, .. } => handle_detail_key(app, id, key),
        },
    }
}

fn handle_list_key(app: &mut AppState, key: KeyEvent) -> Flow {
    let Some(action) = app.keymap.resolve(&key) else {
        return Flow::Continue;
    };
    match action {
        KeyAction::Quit => return Flow::Quit,
        KeyAction::StartSearch => {
            app.search_query.clear();
            apply_search(app);
            app.input_mode = InputMode::Search;
        }
        KeyAction::OpenHelp => app.open_modal(ModalState::Help),
        KeyAction::NewUser => open_form(app, FormMode::Add, UserDraft::default()),
        KeyAction::EditSelection => {
            if let Some(u) = app.selected_user() {
                let (id, draft) = (u.id, UserDraft::from_user(u));
                open_form(app, FormMode::Edit(id), draft);
            }
        }
        KeyAction::DeleteSelection => {
            if let Some(u) = app.selected_user() {
                let modal = ModalState::DeleteConfirm {
                    id: u.id,
                    name: u.name.clone(),
                    selected: 1,
                };
                app.open_modal(modal);
            }
        }
        KeyAction::OpenDetail => {
            if let Some(id) = app.selected_user().map(|u| u.id) {
                return open_detail(app, id);
            }
        }
        KeyAction::CycleSort => {
            app.sort = app.sort.cycle_field();
            apply_search(app);
            app.status = Some(format!("Sort: {}", app.sort.label()));
        }
        KeyAction::ToggleSortOrder => {
            app.sort = app.sort.toggle_order();
            apply_search(app);
            app.status = Some(format!("Sort: {}", app.sort.label()));
        }
        KeyAction::MoveUp => {
            app.selected_user_index = app.selected_user_index.saturating_sub(1);
        }
        KeyAction::MoveDown => {
            if app.selected_user_index + 1 < app.users.len() {
                app.selected_user_index += 1;
            }
        }
        KeyAction::PageUp => {
            app.selected_user_index = app.selected_user_index.saturating_sub(app.rows_per_page.max(1));
        }
        KeyAction::PageDown => {
            let last = app.users.len().saturating_sub(1);
            app.selected_user_index = (app.selected_user_index + app.rows_per_page.max(1)).min(last);
        }
        KeyAction::Back | KeyAction::Ignore => {}
    }
    Flow::Continue
}

fn handle_detail_key(app: &mut AppState, id: UserId, key: KeyEvent) -> Flow {
    match app.keymap.resolve(&key) {
        // On the detail page the quit key only goes back.
        Some(KeyAction::Back | KeyAction::Quit) => {
            app.route = Route::List;
        }
        Some(KeyAction::EditSelection) => match app.store.get(id) {
            Some(u) => {
                let draft = UserDraft::from_user(u);
                open_form(app, FormMode::Edit(id), draft);
            }
            None => {
                app.status = Some("Only users in the local list can be edited".to_string());
            }
        },
        Some(KeyAction::OpenHelp) => app.open_modal(ModalState::Help),
        _ => {}
    }
    Flow::Continue
}

/// Plain typing. AltGr arrives as Ctrl+Alt on some terminals, so only a bare Ctrl is a shortcut.
fn is_text_input(key: &KeyEvent) -> bool {
    !key.modifiers.contains(KeyModifiers::CONTROL) || key.modifiers.contains(KeyModifiers::ALT)
}

fn handle_search_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.search_query.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => app.input_mode = InputMode::Normal,
        KeyCode::Backspace => {
            app.search_query.pop();
        }
        KeyCode::Char(c) if is_text_input(&key) => {
            app.search_query.push(c);
        }
        _ => return,
    }
    apply_search(app);
}

fn open_form(app: &mut AppState, mode: FormMode, draft: UserDraft) {
    app.open_modal(ModalState::UserForm {
        mode,
        focus: 0,
        draft,
        error: None,
    });
}

fn handle_modal_key(app: &mut AppState, key: KeyEvent) {
    let Some(modal) = app.modal.take() else {
        app.input_mode = InputMode::Normal;
        return;
    };
    match modal {
        ModalState::UserForm {
            mode,
            mut focus,
            mut draft,
            mut error,
        } => {
            let fields = FormField::ALL.len();
            match key.code {
                KeyCode::Esc => {
                    app.close_modal();
                    return;
                }
                KeyCode::Enter => match submit_form(app, mode, &draft) {
                    Ok(message) => {
                        app.close_modal();
                        app.open_modal(ModalState::Info { message });
                        return;
                    }
                    Err(e) => error = Some(e.to_string()),
                },
                KeyCode::Down | KeyCode::Tab => focus = (focus + 1) % fields,
                KeyCode::Up | KeyCode::BackTab => focus = (focus + fields - 1) % fields,
                KeyCode::Backspace => {
                    if let Some(f) = FormField::ALL.get(focus) {
                        f.value_mut(&mut draft).pop();
                    }
                }
                KeyCode::Char(c) if is_text_input(&key) => {
                    if let Some(f) = FormField::ALL.get(focus) {
                        f.value_mut(&mut draft).push(c);
                    }
                }
                _ => {}
            }
            app.modal = Some(ModalState::UserForm {
                mode,
                focus,
                draft,
                error,
            });
        }
        ModalState::DeleteConfirm { id, name, mut selected } => match key.code {
            KeyCode::Esc => {
                app.close_modal();
                app.status = Some("Delete cancelled".to_string());
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
                selected = 1 - selected.min(1);
                app.modal = Some(ModalState::DeleteConfirm { id, name, selected });
            }
            KeyCode::Char('y') => confirm_delete(app, id, &name),
            KeyCode::Char('n') => {
                app.close_modal();
                app.status = Some("Delete cancelled".to_string());
            }
            KeyCode::Enter => {
                if selected == 0 {
                    confirm_delete(app, id, &name);
                } else {
                    app.close_modal();
                    app.status = Some("Delete cancelled".to_string());
                }
            }
            _ => app.modal = Some(ModalState::DeleteConfirm { id, name, selected }),
        },
        ModalState::Info { message } => match key.code {
            KeyCode::Esc | KeyCode::Enter => app.close_modal(),
            _ => app.modal = Some(ModalState::Info { message }),
        },
        ModalState::Help => match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') | KeyCode::Char('q') => app.close_modal(),
            _ => app.modal = Some(ModalState::Help),
        },
    }
}

/// Validate the form and write it into the store. Returns the confirmation message.
fn submit_form(app: &mut AppState, mode: FormMode, draft: &UserDraft) -> Result<String, ValidationError> {
    draft.validate()?;
    match mode {
        FormMode::Add => {
            let id = app.store.next_id();
            let user = draft.into_new_user(id)?;
            let name = user.name.clone();
            if app.store.add(user) != Mutation::Applied {
                return Ok(format!("Could not add {name}: id {id} is taken"));
            }
            apply_search(app);
            if let Some(pos) = app.users.iter().position(|u| u.id == id) {
                app.selected_user_index = pos;
            }
            Ok(format!("{name} has been added successfully!"))
        }
        FormMode::Edit(id) => {
            let Some(existing) = app.store.get(id).cloned() else {
                return Ok("That user no longer exists".to_string());
            };
            let user = draft.apply_to(&existing)?;
            let name = user.name.clone();
            if let Route::Detail {
                id: open_id,
                state: DetailState::Loaded(shown),
            } = &mut app.route
                && *open_id == id
            {
                *shown = user.clone();
            }
            app.store.update(user);
            apply_search(app);
            Ok(format!("{name} has been updated successfully!"))
        }
    }
}

fn confirm_delete(app: &mut AppState, id: UserId, name: &str) {
    app.close_modal();
    match app.store.delete(id) {
        Mutation::Applied => {
            apply_search(app);
            app.open_modal(ModalState::Info {
                message: format!("{name} has been deleted successfully!"),
            });
        }
        _ => app.status = Some(format!("{name} was already removed")),
    }
}
