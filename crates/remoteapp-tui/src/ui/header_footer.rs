use super::*;

pub(super) fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        app.base_url.clone(),
        Style::default().fg(Color::Gray),
    )];
    if let Some(user) = &app.username {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("user: {}", user),
            Style::default().fg(Color::Yellow),
        ));
    }
    if app.loading {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            "Loading...",
            Style::default().fg(Color::Yellow).bold(),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(" remoteapp - Remote Applications ")
            .title_style(Style::default().fg(Color::Cyan).bold())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(header, area);
}

pub(super) fn draw_communication_error(frame: &mut Frame, app: &App, area: Rect) {
    let message = app.communication_error.as_deref().unwrap_or_default();
    let banner = Paragraph::new(Line::from(vec![
        Span::styled(" Communication error: ", Style::default().fg(Color::Red).bold()),
        Span::raw(message.to_string()),
        Span::styled("  (r: retry)", Style::default().fg(Color::DarkGray)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    frame.render_widget(banner, area);
}

/// Context-sensitive key help for the main view
pub(super) fn main_footer(app: &App) -> String {
    if app.items.is_empty() {
        return "r: Reload  ?: Help  q: Quit".to_string();
    }
    let mut keys = vec!["j/k: Navigate", "Enter: Open"];
    match app.current.as_ref().map(|e| e.status()) {
        Some(AppStatus::Stopped) => keys.extend(["s: Start", "e: Configure"]),
        Some(AppStatus::Running) => keys.push("x: Stop"),
        Some(AppStatus::Error) => keys.extend(["s: Start", "x: Stop"]),
        Some(AppStatus::Starting) | None => {}
    }
    keys.extend(["r: Reload", "?: Help", "q: Quit"]);
    keys.join("  ")
}

pub(super) fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let help = match app.view {
        View::Main => main_footer(app),
        View::EditConfig => match app.editor.as_ref() {
            Some(editor) if editor.input.is_some() => "Enter: Apply  Esc: Cancel".to_string(),
            _ => "j/k: Field  h/l: Cycle  Enter: Edit  a: Add key  w: Save  Esc: Discard"
                .to_string(),
        },
        View::Help => "Press any key to close help".to_string(),
    };

    let mut lines = vec![Span::styled(help, Style::default().fg(Color::DarkGray))];
    if let Some(status) = &app.status_message {
        lines.insert(0, Span::styled(format!("{}  ", status), Style::default().fg(Color::Yellow)));
    }

    let footer = Paragraph::new(Line::from(lines))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

pub(super) fn draw_help(frame: &mut Frame, area: Rect) {
    let help = vec![
        Line::from(""),
        Line::from(Span::styled("Applications", Style::default().bold().underlined())),
        Line::from(""),
        Line::from("  j/Down      Select next application"),
        Line::from("  k/Up        Select previous application"),
        Line::from("  Enter       Select and focus the application frame"),
        Line::from("  Esc         Leave the application frame"),
        Line::from("  s           Start the selected application"),
        Line::from("  x           Stop the selected application"),
        Line::from("  e           Edit the start configuration"),
        Line::from("  r           Reload the application list"),
        Line::from("  ?/F1        Show this help"),
        Line::from("  q           Quit"),
        Line::from(""),
        Line::from(Span::styled("Configuration", Style::default().bold().underlined())),
        Line::from(""),
        Line::from("  j/k         Move between fields"),
        Line::from("  h/l         Cycle resolution"),
        Line::from("  Enter       Edit value"),
        Line::from("  a           Add key=value"),
        Line::from("  w           Save and close"),
    ];

    let paragraph = Paragraph::new(help).block(
        Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(paragraph, area);
}
