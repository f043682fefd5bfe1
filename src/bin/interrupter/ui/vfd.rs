//! Front panel widget - the 2x20 VFD

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use coil_interrupter::display::{TextDisplay, DISPLAY_ROWS};

pub fn render_vfd(frame: &mut Frame, area: Rect, panel: &TextDisplay) {
    let block = Block::default().title(" Panel ").borders(Borders::ALL);

    let lines: Vec<Line> = (0..DISPLAY_ROWS)
        .map(|row| Line::from(panel.line(row)))
        .collect();

    let paragraph = Paragraph::new(lines)
        .style(
            Style::default()
                .fg(Color::LightCyan)
                .bg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .block(block);
    frame.render_widget(paragraph, area);
}
