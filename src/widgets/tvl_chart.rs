/// Line chart widget for a single chart panel

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        block::{Position, Title},
        Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph,
    },
    Frame,
};

use crate::core::{ChartPanel, TvlPoint};
use crate::utils::{format_tvl, format_with_commas, truncate_label, GRID_COLOR, GRID_LINES, LINE_COLOR};

/// Renders a [`ChartPanel`] as a bordered, titled chart
pub struct TvlChart<'a> {
    panel: &'a ChartPanel,
    focused: bool,
}

impl<'a> TvlChart<'a> {
    pub fn new(panel: &'a ChartPanel) -> Self {
        Self { panel, focused: false }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let panel = self.panel;
        let series = panel.series();

        let border_color = if self.focused { Color::Cyan } else { Color::Gray };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(Title::from(Span::styled(
                format!(" {} ", panel.title()),
                Style::default().add_modifier(Modifier::BOLD),
            )))
            .title(
                Title::from(status_line(panel))
                    .position(Position::Bottom)
                    .alignment(Alignment::Right),
            );

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);

        let points = plot_points(series);
        let x = x_bounds(series.len());
        let y = y_bounds(series);
        let grid = grid_lines(x, y, GRID_LINES);
        let marker: Vec<(f64, f64)> = panel
            .cursor()
            .and_then(|i| points.get(i).copied())
            .into_iter()
            .collect();

        let mut datasets: Vec<Dataset> = grid
            .iter()
            .map(|line| {
                Dataset::default()
                    .marker(symbols::Marker::Dot)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(GRID_COLOR))
                    .data(line)
            })
            .collect();

        datasets.push(
            Dataset::default()
                .name("tvl")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(LINE_COLOR))
                .data(&points),
        );

        if !marker.is_empty() {
            datasets.push(
                Dataset::default()
                    .marker(symbols::Marker::Block)
                    .graph_type(GraphType::Scatter)
                    .style(Style::default().fg(Color::Yellow))
                    .data(&marker),
            );
        }

        let label_width = (chunks[0].width / 3).max(4) as usize;
        let chart = Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .title("timestamp")
                    .style(Style::default().fg(Color::Gray))
                    .bounds(x)
                    .labels(x_labels(series, label_width)),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(Color::Gray))
                    .bounds(y)
                    .labels(y_labels(y)),
            )
            .hidden_legend_constraints((Constraint::Ratio(1, 1), Constraint::Ratio(1, 1)));

        frame.render_widget(chart, chunks[0]);
        frame.render_widget(tooltip(panel, self.focused), chunks[1]);
    }
}

fn status_line(panel: &ChartPanel) -> Line<'static> {
    if panel.is_loading() {
        return Line::from(Span::styled(" loading… ", Style::default().fg(Color::Yellow)));
    }

    if let Some(err) = panel.last_error() {
        return Line::from(Span::styled(
            format!(" fetch failed: {} ", err),
            Style::default().fg(Color::Red),
        ));
    }

    match panel.updated_at() {
        Some(at) => Line::from(Span::styled(
            format!(" {} points · updated {} ", panel.series().len(), at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        )),
        None => Line::from(""),
    }
}

fn tooltip(panel: &ChartPanel, focused: bool) -> Paragraph<'static> {
    let line = match panel.selected_point() {
        Some(point) => Line::from(vec![
            Span::styled(point.timestamp.clone(), Style::default().fg(Color::White)),
            Span::raw("  "),
            Span::styled("tvl: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format_with_commas(point.tvl),
                Style::default().fg(LINE_COLOR).add_modifier(Modifier::BOLD),
            ),
        ]),
        None if focused && !panel.series().is_empty() => Line::from(Span::styled(
            "←/→ inspect points",
            Style::default().fg(Color::DarkGray),
        )),
        None => Line::from(""),
    };

    Paragraph::new(line).alignment(Alignment::Center)
}

/// X is the point index, so timestamps stay opaque labels
pub fn plot_points(series: &[TvlPoint]) -> Vec<(f64, f64)> {
    series
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.tvl))
        .collect()
}

pub fn x_bounds(len: usize) -> [f64; 2] {
    [0.0, len.saturating_sub(1).max(1) as f64]
}

/// Auto-scaled Y range anchored at zero, with headroom above the maximum
pub fn y_bounds(series: &[TvlPoint]) -> [f64; 2] {
    let values = series.iter().map(|p| p.tvl).filter(|v| v.is_finite());
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    if min > max {
        return [0.0, 1.0];
    }

    let lower = min.min(0.0);
    let upper = max.max(0.0);
    if upper == lower {
        return [lower, lower + 1.0];
    }

    // Halved so that extreme values cannot overflow the span
    let half_span = upper / 2.0 - lower / 2.0;
    [lower, (upper + half_span * 0.1).min(f64::MAX)]
}

/// Evenly spaced horizontal lines strictly inside the Y range
pub fn grid_lines(x: [f64; 2], y: [f64; 2], count: usize) -> Vec<Vec<(f64, f64)>> {
    let parts = (count + 1) as f64;
    let step = y[1] / parts - y[0] / parts;
    (1..=count)
        .map(|i| {
            let level = y[0] + step * i as f64;
            vec![(x[0], level), (x[1], level)]
        })
        .collect()
}

/// First, middle and last timestamps
pub fn x_labels(series: &[TvlPoint], max_width: usize) -> Vec<Span<'static>> {
    let picks: Vec<usize> = match series.len() {
        0 => Vec::new(),
        1 => vec![0],
        2 => vec![0, 1],
        n => vec![0, n / 2, n - 1],
    };

    picks
        .into_iter()
        .map(|i| Span::raw(truncate_label(&series[i].timestamp, max_width)))
        .collect()
}

pub fn y_labels(y: [f64; 2]) -> Vec<Span<'static>> {
    let mid = y[0] / 2.0 + y[1] / 2.0;
    [y[0], mid, y[1]]
        .into_iter()
        .map(|v| Span::raw(format_tvl(v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn series(values: &[(&str, f64)]) -> Vec<TvlPoint> {
        values
            .iter()
            .map(|(t, v)| TvlPoint { timestamp: t.to_string(), tvl: *v })
            .collect()
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        let mut text = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                text.push_str(buffer.get(x, y).symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_bounds() {
        assert_eq!(y_bounds(&[]), [0.0, 1.0]);
        assert_eq!(x_bounds(0), [0.0, 1.0]);
        assert_eq!(x_bounds(5), [0.0, 4.0]);

        let s = series(&[("a", 100.0), ("b", 200.0)]);
        assert_eq!(y_bounds(&s), [0.0, 210.0]);

        let flat = series(&[("a", 0.0), ("b", 0.0)]);
        assert_eq!(y_bounds(&flat), [0.0, 1.0]);
    }

    #[test]
    fn test_bounds_stay_finite_for_extreme_values() {
        let s = series(&[("a", -1.7e308), ("b", 1.7e308)]);
        let y = y_bounds(&s);
        assert!(y[0].is_finite() && y[1].is_finite());
        assert_eq!(y[0], -1.7e308);
        assert!(y[1] >= 1.7e308);

        let top = series(&[("a", f64::MAX)]);
        assert_eq!(y_bounds(&top), [0.0, f64::MAX]);

        for label in y_labels(y) {
            assert!(!label.content.contains("inf"));
        }
        for line in grid_lines(x_bounds(2), y, GRID_LINES) {
            assert!(line.iter().all(|(_, v)| v.is_finite()));
        }
    }

    #[test]
    fn test_x_labels_are_raw_timestamps() {
        let s = series(&[("2024-01-01", 1.0), ("2024-01-02", 2.0), ("2024-01-03", 3.0), ("2024-01-04", 4.0)]);
        let labels: Vec<String> = x_labels(&s, 20).into_iter().map(|l| l.content.to_string()).collect();
        assert_eq!(labels, vec!["2024-01-01", "2024-01-03", "2024-01-04"]);
        assert!(x_labels(&[], 20).is_empty());
    }

    #[test]
    fn test_grid_lines_inside_range() {
        let grid = grid_lines([0.0, 9.0], [0.0, 100.0], 4);
        assert_eq!(grid.len(), 4);
        assert_eq!(grid[0], vec![(0.0, 20.0), (9.0, 20.0)]);
        assert_eq!(grid[3], vec![(0.0, 80.0), (9.0, 80.0)]);
    }

    #[test]
    fn test_render_shows_title_and_tooltip() {
        let mut panel = ChartPanel::new("Minswap");
        let ticket = panel.begin_fetch();
        panel.apply(
            &ticket,
            Ok(series(&[("2024-01-01", 100.0), ("2024-01-02", 1500.0)])),
        );
        panel.cursor_right();
        panel.cursor_right();

        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|f| TvlChart::new(&panel).focused(true).render(f, f.size()))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Minswap TVL Over Time"));
        assert!(text.contains("2024-01-02  tvl: 1,500"));
    }

    #[test]
    fn test_render_shows_single_series_legend() {
        let mut panel = ChartPanel::new("Minswap");
        let ticket = panel.begin_fetch();
        panel.apply(
            &ticket,
            Ok(series(&[("2024-01-01", 100.0), ("2024-01-02", 1500.0)])),
        );

        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|f| TvlChart::new(&panel).render(f, f.size()))
            .unwrap();

        // Legend box holds only the named series; grid lines stay unnamed
        let text = buffer_text(&terminal);
        assert!(text.contains("│tvl│"));
        assert_eq!(text.matches("│tvl│").count(), 1);
    }

    #[test]
    fn test_render_empty_panel_without_error_text() {
        let panel = ChartPanel::new("Indigo");

        let mut terminal = Terminal::new(TestBackend::new(60, 15)).unwrap();
        terminal
            .draw(|f| TvlChart::new(&panel).render(f, f.size()))
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Indigo TVL Over Time"));
        assert!(!text.contains("fetch failed"));
    }
}
