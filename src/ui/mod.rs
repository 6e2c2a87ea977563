mod processes;
mod status;

use crate::app::App;
use crate::config::Theme;
use crate::snapshot::SlotKey;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    if app.hidden {
        draw_hidden(f, app, size);
        return;
    }

    // Layout: title + bound fields + process list + status/help bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(SlotKey::ALL.len() as u16 + 2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(size);

    draw_title(f, app, chunks[0]);
    status::draw(f, app, chunks[1]);
    processes::draw(f, app, chunks[2]);
    draw_help_bar(f, app, chunks[3]);

    if app.show_help {
        draw_help_popup(f, app, size);
    }
}

fn draw_title(f: &mut Frame, app: &App, area: Rect) {
    let title = Paragraph::new(format!("steamwatch v{}", env!("CARGO_PKG_VERSION")))
        .style(Style::default().fg(app.theme.highlight()).bold())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border())),
        );
    f.render_widget(title, area);
}

fn draw_help_bar(f: &mut Frame, app: &App, area: Rect) {
    // Show status message if available, otherwise show help
    if let Some(ref msg) = app.status_message {
        let style = if app.status_is_error {
            Style::default().fg(app.theme.copy_failed()).bold()
        } else {
            Style::default().fg(app.theme.copied()).bold()
        };
        let status = Paragraph::new(msg.as_str())
            .style(style)
            .alignment(Alignment::Center);
        f.render_widget(status, area);
        return;
    }

    let s = &app.shortcuts;
    let help_text = format!(
        "j/k: select │ {}: copy launch entry │ {}: help │ {}: hide",
        s.copy, s.help, s.quit
    );
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(app.theme.text_muted()))
        .alignment(Alignment::Center);
    f.render_widget(help, area);
}

fn draw_hidden(f: &mut Frame, app: &App, area: Rect) {
    let text = format!(
        "steamwatch is running in the background\n\npress '{}' to show, '{}' to close",
        app.shortcuts.show, app.shortcuts.quit
    );
    let placeholder = Paragraph::new(text)
        .style(Style::default().fg(app.theme.text_muted()))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(4),
            Constraint::Min(0),
        ])
        .split(area);
    f.render_widget(placeholder, vertical[1]);
}

fn draw_help_popup(f: &mut Frame, app: &App, area: Rect) {
    let popup = centered_rect(50, 40, area);
    f.render_widget(Clear, popup);

    let s = &app.shortcuts;
    let lines = vec![
        Line::from("j / k      select process row"),
        Line::from(format!("{}          copy launch entry to clipboard", s.copy)),
        Line::from(format!("{}          hide to background", s.quit)),
        Line::from(format!("{}          show again while hidden", s.show)),
        Line::from("Ctrl+C     terminate"),
    ];

    let help = Paragraph::new(lines)
        .style(Style::default().fg(app.theme.text()))
        .block(styled_block("Keys", &app.theme));
    f.render_widget(help, popup);
}

/// Full-screen error surface for fatal startup failures.
pub fn draw_fatal(f: &mut Frame, message: &str) {
    let theme = Theme::default();
    let area = f.area();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.copy_failed()))
        .title(" Startup Error ")
        .title_style(Style::default().fg(theme.copy_failed()).bold());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let text = format!("{message}\n\npress any key to exit");
    let body = Paragraph::new(text)
        .style(Style::default().fg(theme.text()))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    f.render_widget(body, inner);
}

// Helper to create a styled block
pub fn styled_block(title: &str, theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border()))
        .title(format!(" {title} "))
        .title_style(Style::default().fg(theme.text()).bold())
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
