//! Voice slot table

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Row, Table},
    Frame,
};

use coil_interrupter::{display::note_name, engine::Snapshot, synth::Voice};

pub fn render_voices(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let header = Row::new(vec!["Slot", "Note", "Ch", "Vel", "Period", "Phase", "Start"])
        .style(Style::default().fg(Color::DarkGray));

    let rows: Vec<Row> = snapshot
        .voices
        .iter()
        .enumerate()
        .map(|(slot, voice)| match voice {
            Voice::Empty => Row::new(vec![slot.to_string(), "--".to_string()])
                .style(Style::default().fg(Color::DarkGray)),
            Voice::Active(note) => Row::new(vec![
                slot.to_string(),
                format!("{}{}", note_name(note.pitch).trim_end(), note.pitch / 12),
                (note.channel + 1).to_string(),
                note.velocity.to_string(),
                format!("{}\u{b5}s", note.period_us),
                format!("{}\u{b5}s", note.phase_us),
                format!("{}ms", note.start_ms),
            ])
            .style(Style::default().fg(Color::Green)),
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(3),
        Constraint::Length(4),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Min(8),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(" Voices ").borders(Borders::ALL));
    frame.render_widget(table, area);
}
