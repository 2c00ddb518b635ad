/// Dashboard shell: page title, responsive grid of chart panels, footer

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::core::{ApplyOutcome, ChartPanel, FetchError, FetchTicket, ProtocolSeries};
use crate::utils::{DASHBOARD_TITLE, TWO_COLUMN_MIN_WIDTH};
use crate::widgets::TvlChart;

pub struct Dashboard {
    panels: Vec<ChartPanel>,
}

impl Dashboard {
    pub fn new(protocols: &[String]) -> Self {
        Self {
            panels: protocols.iter().map(ChartPanel::new).collect(),
        }
    }

    /// One fetch ticket per panel, keyed by panel index
    pub fn mount(&mut self) -> Vec<(usize, FetchTicket)> {
        self.panels
            .iter_mut()
            .enumerate()
            .map(|(i, panel)| (i, panel.begin_fetch()))
            .collect()
    }

    pub fn panels(&self) -> &[ChartPanel] {
        &self.panels
    }

    pub fn panel_mut(&mut self, index: usize) -> Option<&mut ChartPanel> {
        self.panels.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Route a finished request to its panel
    pub fn apply(
        &mut self,
        index: usize,
        ticket: &FetchTicket,
        result: Result<ProtocolSeries, FetchError>,
    ) -> Option<ApplyOutcome> {
        self.panels
            .get_mut(index)
            .map(|panel| panel.apply(ticket, result))
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        focused: usize,
        edit_buffer: Option<&str>,
        status_message: Option<&str>,
        show_help: bool,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Title
                Constraint::Min(0),    // Panels
                Constraint::Length(1), // Footer
            ])
            .split(frame.size());

        let title = Paragraph::new(DASHBOARD_TITLE)
            .style(Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        frame.render_widget(title, chunks[0]);

        if self.panels.is_empty() {
            let empty = Paragraph::new("No protocols configured. Add some with `dada-dash config init`.")
                .style(Style::default().fg(Color::Gray))
                .alignment(Alignment::Center);
            frame.render_widget(empty, chunks[1]);
        } else {
            for (i, (panel, area)) in self
                .panels
                .iter()
                .zip(grid_layout(chunks[1], self.panels.len()))
                .enumerate()
            {
                TvlChart::new(panel).focused(i == focused).render(frame, area);
            }
        }

        frame.render_widget(footer(edit_buffer, status_message), chunks[2]);

        if show_help {
            render_help(frame);
        }
    }
}

/// One column on narrow terminals, two once there is room
pub fn grid_layout(area: Rect, count: usize) -> Vec<Rect> {
    if count == 0 {
        return Vec::new();
    }

    let columns = if area.width >= TWO_COLUMN_MIN_WIDTH && count > 1 { 2 } else { 1 };
    let rows = (count + columns - 1) / columns;

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
        .split(area);

    row_areas
        .iter()
        .flat_map(|row| {
            Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
                .split(*row)
                .to_vec()
        })
        .take(count)
        .collect()
}

fn footer(edit_buffer: Option<&str>, status_message: Option<&str>) -> Paragraph<'static> {
    if let Some(buffer) = edit_buffer {
        return Paragraph::new(Line::from(vec![
            Span::styled("Protocol: ", Style::default().fg(Color::Yellow)),
            Span::styled(format!("{}_", buffer), Style::default().fg(Color::White)),
            Span::styled("  [Enter] apply  [Esc] cancel", Style::default().fg(Color::DarkGray)),
        ]));
    }

    if let Some(message) = status_message {
        return Paragraph::new(Span::styled(message.to_string(), Style::default().fg(Color::Yellow)))
            .alignment(Alignment::Center);
    }

    Paragraph::new("[q] Quit  [Tab] Next panel  [←→] Inspect  [r] Refresh  [R] Refresh all  [e] Edit protocol  [?] Help")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
}

fn render_help(frame: &mut Frame) {
    let area = frame.size();
    let popup_width = area.width.min(60);
    let popup_height = area.height.min(16);
    let popup_area = Rect {
        x: area.width.saturating_sub(popup_width) / 2,
        y: area.height.saturating_sub(popup_height) / 2,
        width: popup_width,
        height: popup_height,
    };

    let heading = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let help_text = vec![
        Line::from(Span::styled("Panels:", heading)),
        Line::from("  [Tab] / [Shift+Tab]  Focus next/previous panel"),
        Line::from("  [← →]                Move the tooltip cursor"),
        Line::from("  [Esc]                Hide the tooltip"),
        Line::from("  [e]                  Change the focused panel's protocol"),
        Line::from(""),
        Line::from(Span::styled("Data:", heading)),
        Line::from("  [r]                  Re-fetch focused panel"),
        Line::from("  [R]                  Re-fetch all panels"),
        Line::from(""),
        Line::from("  [?]                  Toggle this help"),
        Line::from("  [q] / [Ctrl+C]       Quit"),
    ];

    frame.render_widget(Clear, popup_area);
    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(Span::styled(" Help ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(help, popup_area);
}
