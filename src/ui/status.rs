use crate::app::App;
use ratatui::{prelude::*, widgets::Paragraph};

use super::styled_block;

/// The bound scalar fields, one key/value line per display slot.
pub fn draw(f: &mut Frame, app: &App, area: Rect) {
    let block = styled_block("Status", &app.theme);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let label_width = app
        .slots
        .iter()
        .map(|slot| slot.key.label().len())
        .max()
        .unwrap_or(0);

    let lines: Vec<Line> = app
        .slots
        .iter()
        .map(|slot| {
            Line::from(vec![
                Span::styled(
                    format!("{:label_width$}  ", slot.key.label()),
                    Style::default().fg(app.theme.text_muted()),
                ),
                Span::styled(slot.text.clone(), Style::default().fg(app.theme.text())),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(ratatui::widgets::Block::default().padding(ratatui::widgets::Padding::horizontal(1)));
    f.render_widget(paragraph, inner);
}
