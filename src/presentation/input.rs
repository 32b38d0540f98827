use crate::application::{App, AppMode};
use crate::infrastructure::{copy_session_code, RosterExporter};
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key, modifiers),
            AppMode::Editing => Self::handle_editing_mode(app, key, modifiers),
            AppMode::Help => Self::handle_help_mode(app, key),
            AppMode::ExportRoster => Self::handle_filename_input_mode(app, key, modifiers),
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        // Nothing to act on until the session is in; q is handled by the main loop.
        if app.session().is_none() {
            return;
        }

        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('s') => app.submit(),
                KeyCode::Char('e') => app.start_roster_export(),
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Up | KeyCode::Char('k') => {
                app.status_message = None;
                app.select_previous_field();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.status_message = None;
                app.select_next_field();
            }
            KeyCode::Enter | KeyCode::Char('e') | KeyCode::F(2) => app.start_editing(),
            KeyCode::Char('p') => app.submit(),
            KeyCode::Char('r') => app.refresh_roster(),
            KeyCode::Char('t') => app.toggle_map_style(),
            KeyCode::PageDown => app.scroll_roster_down(),
            KeyCode::PageUp => app.scroll_roster_up(),
            KeyCode::Char('y') => {
                if let Some(code) = app.session_code().map(str::to_string) {
                    let result = copy_session_code(&code).map_err(|e| e.to_string());
                    app.set_clipboard_result(result);
                }
            }
            KeyCode::F(1) | KeyCode::Char('?') => app.start_help(),
            _ => {}
        }
    }

    fn handle_editing_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            if key == KeyCode::Char('s') {
                app.finish_editing();
                app.submit();
            }
            return;
        }

        match key {
            KeyCode::Enter => app.finish_editing(),
            KeyCode::Esc => app.cancel_editing(),
            _ => edit_text(&mut app.input, &mut app.cursor_position, key),
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.mode = AppMode::Normal;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if app.help_scroll > 0 {
                    app.help_scroll -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::PageUp => {
                app.help_scroll = app.help_scroll.saturating_sub(5);
            }
            KeyCode::PageDown => {
                app.help_scroll += 5;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }

    fn handle_filename_input_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            return;
        }

        match key {
            KeyCode::Enter => {
                let filename = app.get_export_filename();
                let field_names: Vec<String> = app
                    .session()
                    .map(|session| session.custom_fields.iter().map(|f| f.field_name.clone()).collect())
                    .unwrap_or_default();
                let result = RosterExporter::export_to_csv(app.roster.users(), &field_names, &filename)
                    .map_err(|e| e.to_string());
                app.set_export_result(result);
            }
            KeyCode::Esc => app.cancel_filename_input(),
            _ => edit_text(&mut app.filename_input, &mut app.cursor_position, key),
        }
    }
}

/// Applies a line-editing key to `buffer`; `cursor` counts characters.
fn edit_text(buffer: &mut String, cursor: &mut usize, key: KeyCode) {
    let len = buffer.chars().count();
    *cursor = (*cursor).min(len);
    match key {
        KeyCode::Backspace => {
            if *cursor > 0 {
                buffer.remove(byte_index(buffer, *cursor - 1));
                *cursor -= 1;
            }
        }
        KeyCode::Delete => {
            if *cursor < len {
                buffer.remove(byte_index(buffer, *cursor));
            }
        }
        KeyCode::Left => {
            *cursor = cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            if *cursor < len {
                *cursor += 1;
            }
        }
        KeyCode::Home => {
            *cursor = 0;
        }
        KeyCode::End => {
            *cursor = len;
        }
        KeyCode::Char(c) => {
            buffer.insert(byte_index(buffer, *cursor), c);
            *cursor += 1;
        }
        _ => {}
    }
}

fn byte_index(text: &str, char_index: usize) -> usize {
    text.char_indices().nth(char_index).map(|(i, _)| i).unwrap_or(text.len())
}
