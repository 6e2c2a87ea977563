use crate::app::{App, CopyFeedback};
use ratatui::{
    prelude::*,
    widgets::{List, ListItem, Paragraph},
};

use super::styled_block;

/// The monitored subprocess rows: activity dot, executable, pid, and the
/// transient copy feedback tag.
pub fn draw(f: &mut Frame, app: &mut App, area: Rect) {
    let block = styled_block("Processes", &app.theme);

    if app.rows.is_empty() {
        let inner = block.inner(area);
        f.render_widget(block, area);
        let empty = Paragraph::new("No monitored processes")
            .style(Style::default().fg(app.theme.text_muted()))
            .alignment(Alignment::Center);
        f.render_widget(empty, inner);
        return;
    }

    let items: Vec<ListItem> = app
        .rows
        .iter()
        .map(|row| {
            let dot_color = if row.active {
                app.theme.status_active()
            } else {
                app.theme.status_inactive()
            };

            let mut spans = vec![
                Span::styled("● ", Style::default().fg(dot_color)),
                Span::styled(row.exe.clone(), Style::default().fg(app.theme.text())),
                Span::styled(
                    format!("  pid {}", row.pid),
                    Style::default().fg(app.theme.text_muted()),
                ),
            ];

            match row.feedback {
                CopyFeedback::Copied => spans.push(Span::styled(
                    "  copied",
                    Style::default().fg(app.theme.copied()).bold(),
                )),
                CopyFeedback::CopyFailed => spans.push(Span::styled(
                    "  copy failed",
                    Style::default().fg(app.theme.copy_failed()).bold(),
                )),
                CopyFeedback::Neutral => {}
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(app.theme.selected_bg()));

    f.render_stateful_widget(list, area, &mut app.process_list_state);
}
