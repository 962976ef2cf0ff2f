//! UI rendering for the TUI application

mod applications;
mod detail;
mod dialogs;
mod header_footer;

use crate::app::{App, View};
use crate::widgets::{centered_rect, DialogBuilder};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};
use remoteapp_core::AppStatus;

use applications::*;
use detail::*;
use dialogs::*;
use header_footer::*;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.size();
    let show_banner = app.communication_error.is_some();

    let chunks = if show_banner {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Communication error
                Constraint::Min(0),    // Content
                Constraint::Length(3), // Footer
            ])
            .split(area)
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(area)
    };

    draw_header(frame, app, chunks[0]);

    let (content_area, footer_area) = if show_banner {
        draw_communication_error(frame, app, chunks[1]);
        (chunks[2], chunks[3])
    } else {
        (chunks[1], chunks[2])
    };

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(content_area);

    draw_applications(frame, app, panes[0]);
    draw_detail(frame, app, panes[1]);

    match app.view {
        View::Main => {}
        View::EditConfig => {
            let popup = popup_rect(70, 70, 50, 14, content_area);
            frame.render_widget(Clear, popup);
            draw_config_editor(frame, app, popup);
        }
        View::Help => {
            let popup = popup_rect(70, 80, 56, 22, content_area);
            frame.render_widget(Clear, popup);
            draw_help(frame, popup);
        }
    }

    if !app.errors.is_empty() {
        draw_errors(frame, app, area);
    }

    draw_footer(frame, app, footer_area);
}

fn status_style(status: AppStatus) -> (&'static str, Color) {
    match status {
        AppStatus::Stopped => ("○", Color::DarkGray),
        AppStatus::Starting => ("◐", Color::Yellow),
        AppStatus::Running => ("●", Color::Green),
        AppStatus::Error => ("✗", Color::Red),
    }
}

/// Popup rectangle sized as a percentage of `area` with minimums
fn popup_rect(pct_w: u16, pct_h: u16, min_w: u16, min_h: u16, area: Rect) -> Rect {
    let w = ((area.width as u32 * pct_w as u32) / 100) as u16;
    let h = ((area.height as u32 * pct_h as u32) / 100) as u16;
    centered_rect(w.max(min_w), h.max(min_h), area)
}
