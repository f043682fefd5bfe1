//! Status bar - mode, setpoints, counters

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use coil_interrupter::engine::Snapshot;

pub fn render_status(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let block = Block::default()
        .title(" interrupter ")
        .borders(Borders::ALL);

    let (fire_symbol, fire_color) = if snapshot.firing {
        ("\u{26a1}", Color::Yellow)
    } else {
        ("\u{00b7}", Color::DarkGray)
    };

    let mut spans = vec![
        Span::styled(format!(" {}  ", fire_symbol), Style::default().fg(fire_color)),
        Span::styled(
            format!("{:<9}  ", snapshot.mode.label()),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Width: {}\u{b5}s  ", snapshot.pulse_width_us),
            Style::default().fg(Color::White),
        ),
    ];

    if snapshot.mode.is_frequency() {
        spans.push(Span::styled(
            format!(
                "Period: {}\u{b5}s (last {}\u{b5}s)  ",
                snapshot.pulse_period_us, snapshot.last_period_us
            ),
            Style::default().fg(Color::White),
        ));
        spans.push(Span::styled(
            if snapshot.bend_enabled { "Bend: on  " } else { "Bend: off  " },
            Style::default().fg(if snapshot.bend_enabled {
                Color::Magenta
            } else {
                Color::DarkGray
            }),
        ));
    }

    spans.push(Span::styled(
        format!("Pulses: {}  ", snapshot.pulses_fired),
        Style::default().fg(Color::DarkGray),
    ));
    spans.push(Span::styled(
        format!("Dropped: {}", snapshot.dropped_notes),
        Style::default().fg(if snapshot.dropped_notes > 0 {
            Color::Red
        } else {
            Color::DarkGray
        }),
    ));

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}
