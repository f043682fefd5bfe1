//! Pulse train oscilloscope

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

/// Render the last `samples.len()` output levels against time in ms
pub fn render_waveform(frame: &mut Frame, area: Rect, samples: &[f32], sample_rate: f64) {
    let window_ms = samples.len() as f64 * 1_000.0 / sample_rate.max(1.0);
    let block = Block::default()
        .title(format!(" Pulse train ({window_ms:.1} ms) "))
        .borders(Borders::ALL);

    let data: Vec<(f64, f64)> = samples
        .iter()
        .enumerate()
        .map(|(i, &level)| (i as f64 * 1_000.0 / sample_rate.max(1.0), level as f64))
        .collect();

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Yellow))
        .data(&data);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([0.0, window_ms.max(f64::EPSILON)])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, 1.0])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
