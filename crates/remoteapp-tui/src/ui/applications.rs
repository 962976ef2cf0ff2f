use super::*;

pub(super) fn draw_applications(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Applications ")
        .borders(Borders::ALL);

    if app.items.is_empty() {
        let text = if app.loading {
            "Loading applications..."
        } else {
            "No applications available."
        };
        let empty = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .items
        .iter()
        .map(|item| {
            let (symbol, color) = status_style(item.status);
            let name_style = if item.selected {
                Style::default().bold()
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{} ", symbol), Style::default().fg(color)),
                Span::styled(item.display_name.clone(), name_style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selected.min(app.items.len() - 1)));
    frame.render_stateful_widget(list, area, &mut state);
}
