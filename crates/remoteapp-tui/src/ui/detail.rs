use super::*;
use crate::config_editor::ConfigField;
use remoteapp_core::view::NO_CONFIGURABLES;

pub(super) fn draw_detail(frame: &mut Frame, app: &App, area: Rect) {
    let Some(entry) = app.current.as_ref() else {
        let empty = Paragraph::new("Select an application to see its details.")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title(" Details ").borders(Borders::ALL))
            .wrap(Wrap { trim: true });
        frame.render_widget(empty, area);
        return;
    };

    let label = Style::default().fg(Color::Cyan);
    let heading = Style::default().bold().underlined();
    let (symbol, color) = status_style(entry.status());

    let mut lines = vec![Line::from(vec![
        Span::styled("Status: ", label),
        Span::styled(
            format!("{} {}", symbol, entry.status()),
            Style::default().fg(color),
        ),
    ])];

    if let Some(source) = &app.app_source {
        let focus = if app.frame_focused {
            Span::styled("  [focused]", Style::default().fg(Color::Green).bold())
        } else {
            Span::raw("")
        };
        lines.push(Line::from(vec![
            Span::styled("URL: ", label),
            Span::raw(source.clone()),
            focus,
        ]));
        lines.push(Line::from(vec![
            Span::styled("Frame: ", label),
            Span::raw(format!("{} minimum", app.frame_size)),
        ]));
        if let Some(container) = entry.container() {
            lines.push(Line::from(vec![
                Span::styled("Container: ", label),
                Span::raw(container.name.clone()),
            ]));
        }
    } else {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Description", heading)));
        lines.push(Line::from(
            entry
                .app_data()
                .image
                .description
                .clone()
                .unwrap_or_default(),
        ));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Policy", heading)));
        for policy in &app.policy_lines {
            lines.push(Line::from(format!("  • {}", policy)));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Configuration", heading)));
        if entry.configurables().is_empty() {
            lines.push(Line::from(NO_CONFIGURABLES));
        }
        for option in entry.configurables() {
            let values: Vec<String> = option
                .config_dict()
                .iter()
                .map(|(k, v)| format!("{}={}", k, crate::config_editor::value_to_string(v)))
                .collect();
            lines.push(Line::from(vec![
                Span::styled(format!("  {}: ", option.tag()), label),
                Span::raw(values.join(", ")),
            ]));
        }
        lines.push(Line::from(""));
        let button = if entry.is_starting() {
            Span::styled("[ Starting... ]", Style::default().fg(Color::Yellow))
        } else if entry.can_start() {
            Span::styled("[ Start (s) ]", Style::default().bg(Color::Blue).fg(Color::White).bold())
        } else {
            Span::styled("[ Start ]", Style::default().fg(Color::DarkGray))
        };
        lines.push(Line::from(button));
    }

    let detail = Paragraph::new(lines)
        .block(
            Block::default()
                .title(format!(" {} ", entry.display_name()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if app.frame_focused {
                    Color::Green
                } else {
                    Color::White
                })),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(detail, area);
}

pub(super) fn draw_config_editor(frame: &mut Frame, app: &App, area: Rect) {
    let Some(editor) = app.editor.as_ref() else {
        return;
    };

    let mut lines = Vec::new();
    if editor.disabled {
        lines.push(Line::from(Span::styled(
            "Locked while the application starts",
            Style::default().fg(Color::Yellow),
        )));
    }
    if editor.form.is_empty() {
        lines.push(Line::from(NO_CONFIGURABLES));
    }

    for (i, field) in editor.fields().iter().enumerate() {
        let focused = i == editor.selected;
        lines.push(field_line(field, focused, editor.input.as_ref().filter(|_| focused)));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Configuration ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(paragraph, area);
}

fn field_line<'a>(
    field: &ConfigField,
    focused: bool,
    input: Option<&(crate::config_editor::EditMode, crate::widgets::TextInputState)>,
) -> Line<'a> {
    let indicator = if focused { "\u{25B6} " } else { "  " };
    let name = if field.key.is_empty() {
        format!("{} (empty)", field.tag)
    } else {
        format!("{}.{}", field.tag, field.key)
    };
    let mut spans = vec![
        Span::raw(indicator),
        Span::styled(format!("{}: ", name), Style::default().fg(Color::Cyan)),
    ];
    match input {
        Some((_, input)) => {
            let (before, after) = input.split();
            spans.push(Span::raw(before));
            spans.push(Span::styled("|", Style::default().fg(Color::Yellow)));
            spans.push(Span::raw(after));
        }
        None => {
            let style = if focused {
                Style::default().bold()
            } else {
                Style::default()
            };
            spans.push(Span::styled(field.value.clone(), style));
        }
    }
    Line::from(spans)
}
