use crate::application::{App, AppMode, FormField, MapStyle};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

/// Terminal width at which the form and roster sit side by side.
pub const WIDE_LAYOUT_MIN_COLS: u16 = 100;
const FORM_PANEL_WIDTH: u16 = 46;

pub fn render_ui(f: &mut Frame, app: &App) {
    if app.is_not_found() {
        render_not_found(f, app);
        return;
    }
    if app.is_loading() {
        render_loading(f);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);

    let body = if is_wide(chunks[1]) {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(FORM_PANEL_WIDTH), Constraint::Min(0)])
            .split(chunks[1])
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(form_height(app)), Constraint::Min(5)])
            .split(chunks[1])
    };
    render_form(f, app, body[0]);
    render_roster(f, app, body[1]);
    render_status_bar(f, app, chunks[2]);

    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f, app.help_scroll);
    }
}

/// Breakpoint query for the body area.
pub fn is_wide(area: Rect) -> bool {
    area.width >= WIDE_LAYOUT_MIN_COLS
}

fn form_height(app: &App) -> u16 {
    let error_lines = app.form_fields().iter().filter(|field| field_error(app, field).is_some()).count();
    (app.form_fields().len() + error_lines + 4) as u16
}

fn field_error<'a>(app: &'a App, field: &FormField) -> Option<&'a str> {
    field.error_key().and_then(|key| app.errors.get(key))
}

fn accent(style: MapStyle) -> Color {
    match style {
        MapStyle::DefaultLight => Color::Green,
        MapStyle::DefaultDark => Color::LightGreen,
    }
}

fn render_loading(f: &mut Frame) {
    let loading = Paragraph::new("loading session...")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL).title("pinmap"));
    f.render_widget(loading, f.area());
}

fn render_not_found(f: &mut Frame, app: &App) {
    let code = app.session_code().unwrap_or_default();
    let text = vec![
        Line::from(Span::styled("404", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))),
        Line::from(format!("no map found for session code \"{}\"", code)),
        Line::from(""),
        Line::from("q: quit"),
    ];
    let not_found = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("not found"));
    f.render_widget(not_found, f.area());
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let Some(session) = app.session() else {
        return;
    };
    let highlight = Style::default().fg(accent(app.map_style));
    let lines = vec![
        Line::from(vec![
            Span::raw("take me on the "),
            Span::styled(session.map_name.as_str(), highlight),
            Span::raw(" map for "),
            Span::styled(session.group_name.as_str(), highlight),
            Span::raw("!"),
        ]),
        Line::from(Span::styled(
            format!("session code: {}", session.session_no),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

fn render_form(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();
    for (index, field) in app.form_fields().iter().enumerate() {
        let selected = index == app.selected_field;
        let editing = selected && matches!(app.mode, AppMode::Editing);
        let value = if editing {
            with_cursor(&app.input, app.cursor_position)
        } else {
            app.field_value(field)
        };

        let label_style = if selected {
            Style::default().bg(Color::LightBlue).fg(Color::Black)
        } else {
            Style::default().fg(Color::Yellow)
        };
        let value_style = if editing {
            Style::default().fg(Color::Green)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{}:", field.label()), label_style),
            Span::raw(" "),
            Span::styled(value, value_style),
        ]));

        if let Some(message) = field_error(app, field) {
            lines.push(Line::from(Span::styled(format!("  {}", message), Style::default().fg(Color::Red))));
        }
    }

    lines.push(Line::from(""));
    let button = if app.is_saving() {
        Span::styled("[ saving... ]", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(
            "[ pin myself on the map! ]",
            Style::default().fg(accent(app.map_style)).add_modifier(Modifier::BOLD),
        )
    };
    lines.push(Line::from(button).alignment(Alignment::Center));

    let form = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title("your pin"));
    f.render_widget(form, area);
}

fn with_cursor(input: &str, cursor: usize) -> String {
    let mut shown: String = input.chars().take(cursor).collect();
    shown.push('|');
    shown.extend(input.chars().skip(cursor));
    shown
}

fn render_roster(f: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(["name", "role", "age", "contact", "location"])
        .style(Style::default().fg(Color::Yellow))
        .height(1);

    let rows: Vec<Row> = app
        .roster
        .users()
        .iter()
        .skip(app.roster_scroll)
        .map(|user| {
            Row::new(vec![
                Cell::from(user.name.clone()),
                Cell::from(user.role.clone()),
                Cell::from(user.age.clone()),
                Cell::from(user.contact.clone()),
                Cell::from(user.location.map(|l| l.to_string()).unwrap_or_default()),
            ])
        })
        .collect();

    let border_style = match app.map_style {
        MapStyle::DefaultLight => Style::default(),
        MapStyle::DefaultDark => Style::default().fg(Color::Gray).bg(Color::Black),
    };
    let widths = [
        Constraint::Percentage(24),
        Constraint::Percentage(16),
        Constraint::Length(5),
        Constraint::Percentage(26),
        Constraint::Min(20),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .style(border_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("on the map ({}) | r: refresh | t: {}", app.roster.len(), app.map_style.label())),
        );
    f.render_widget(table, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let input_text = match app.mode {
        AppMode::Normal => {
            if let Some(ref status) = app.status_message {
                status.clone()
            } else {
                "↑↓: select | Enter: edit | Ctrl+S/p: pin | r: refresh | Ctrl+E: export | y: copy code | ?: help | q: quit".to_string()
            }
        }
        AppMode::Editing => {
            let label = app.selected_form_field().map(|field| field.label().to_string()).unwrap_or_default();
            format!("Editing {}: {} (Enter to save, Esc to cancel)", label, app.input)
        }
        AppMode::Help => "↑↓/jk: scroll | PgUp/PgDn: fast scroll | Home: top | Esc/q: close help".to_string(),
        AppMode::ExportRoster => format!("Export roster as: {} (Enter to export, Esc to cancel)", app.filename_input),
    };

    let input = Paragraph::new(input_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Normal => Style::default(),
            AppMode::Editing => Style::default().fg(Color::Green),
            AppMode::Help => Style::default().fg(Color::Cyan),
            AppMode::ExportRoster => Style::default().fg(Color::Magenta),
        });
    f.render_widget(input, area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_lines: Vec<&str> = HELP_TEXT.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!("pinmap help (Line {}/{})", start_line + 1, help_lines.len()))
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

const HELP_TEXT: &str = r#"PINMAP

=== PINNING YOURSELF ===
Fill in your name and a location, then press Ctrl+S or p.
Name and location are required; everything else is optional.
Locations are typed as latitude, longitude:   51.5074, -0.1278
Extra questions below "location" come from the session's map.

=== FORM ===
↑↓ or j/k       Select a field
Enter/e/F2      Edit the selected field
Enter           Keep the edit
Esc             Discard the edit
Ctrl+S or p     Pin myself on the map

=== ROSTER ===
r               Re-read everyone on the map
PgUp/PgDn       Scroll the roster
Ctrl+E          Export the roster to CSV
t               Toggle light/dark map style

=== SESSION ===
y               Copy the session code to the clipboard
q               Quit

=== HELP NAVIGATION ===
↑↓ or j/k       Scroll help text up/down one line
Page Up/Down    Scroll help text up/down 5 lines
Home            Jump to top of help text
Esc/F1/?/q      Close this help window"#;
