use super::*;

/// Modal listing the errors surfaced since it was last dismissed.
/// A single start failure gets the detailed code/message layout.
pub(super) fn draw_errors(frame: &mut Frame, app: &App, area: Rect) {
    match app.errors.as_slice() {
        [] => {}
        [error] => {
            let code = if error.code.is_empty() {
                "-".to_string()
            } else {
                error.code.clone()
            };
            let width = (error.message.len() as u16 + 6).max(50).min(area.width);

            DialogBuilder::new(format!("Error when starting {}", error.app_name))
                .width(width)
                .border_color(Color::Red)
                .empty_line()
                .styled_message(Line::from(vec![
                    Span::styled(format!("Code: {} ", code), Style::default().fg(Color::Red).bold()),
                    Span::raw(error.message.clone()),
                ]))
                .empty_line()
                .ok_button()
                .empty_line()
                .help("Enter/Esc: Close")
                .render(frame, area);
        }
        errors => {
            let longest = errors
                .iter()
                .map(|e| e.to_string().len())
                .max()
                .unwrap_or(0) as u16;
            let width = (longest + 6).max(50).min(area.width);

            let mut dialog = DialogBuilder::new(format!("{} errors", errors.len()))
                .width(width)
                .border_color(Color::Red)
                .empty_line();
            for error in errors {
                dialog = dialog.message(error.to_string());
            }
            dialog
                .empty_line()
                .ok_button()
                .empty_line()
                .help("Enter/Esc: Close")
                .render(frame, area);
        }
    }
}
