/// Chart panel state: one protocol, one series, one request generation
///
/// Every fetch is issued through [`ChartPanel::begin_fetch`], which bumps the
/// panel's generation and hands back a [`FetchTicket`]. Results are fed back
/// through [`ChartPanel::apply`]; a result whose generation is no longer the
/// latest is dropped, so the series always belongs to the most recently
/// requested protocol no matter in which order responses arrive.

use chrono::{DateTime, Local};

use super::error::FetchError;
use super::tvl::{request_path, ProtocolSeries, TvlPoint, TvlSource};

/// Identity of one outbound request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub protocol: String,
}

impl FetchTicket {
    pub fn path(&self) -> String {
        request_path(&self.protocol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Series replaced, carrying the new point count
    Replaced(usize),
    /// Fetch failed, previous series kept
    Failed,
    /// Superseded by a newer request, ignored
    Stale,
}

#[derive(Debug, Clone)]
pub struct ChartPanel {
    protocol: String,
    series: ProtocolSeries,
    generation: u64,
    loading: bool,
    last_error: Option<String>,
    updated_at: Option<DateTime<Local>>,
    cursor: Option<usize>,
}

impl ChartPanel {
    pub fn new(protocol: impl Into<String>) -> Self {
        Self {
            protocol: protocol.into(),
            series: Vec::new(),
            generation: 0,
            loading: false,
            last_error: None,
            updated_at: None,
            cursor: None,
        }
    }

    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    pub fn series(&self) -> &[TvlPoint] {
        &self.series
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn updated_at(&self) -> Option<DateTime<Local>> {
        self.updated_at
    }

    pub fn title(&self) -> String {
        format!("{} TVL Over Time", self.protocol)
    }

    /// Start a new request for the current protocol
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.loading = true;

        FetchTicket {
            generation: self.generation,
            protocol: self.protocol.clone(),
        }
    }

    /// Switch protocol; only an actual change triggers a new request
    pub fn set_protocol(&mut self, protocol: &str) -> Option<FetchTicket> {
        if self.protocol == protocol {
            return None;
        }

        self.protocol = protocol.to_string();
        Some(self.begin_fetch())
    }

    /// Feed a finished request back into the panel
    pub fn apply(
        &mut self,
        ticket: &FetchTicket,
        result: Result<ProtocolSeries, FetchError>,
    ) -> ApplyOutcome {
        if let Err(ref e) = result {
            tracing::error!(
                protocol = %ticket.protocol,
                generation = ticket.generation,
                error = %e,
                "failed to fetch TVL series"
            );
        }

        if ticket.generation != self.generation {
            tracing::debug!(
                protocol = %ticket.protocol,
                stale = ticket.generation,
                latest = self.generation,
                "discarding stale TVL response"
            );
            return ApplyOutcome::Stale;
        }

        self.loading = false;

        match result {
            Ok(series) => {
                let len = series.len();
                self.series = series;
                self.last_error = None;
                self.updated_at = Some(Local::now());
                self.cursor = match self.cursor {
                    Some(_) if len == 0 => None,
                    Some(i) => Some(i.min(len - 1)),
                    None => None,
                };
                ApplyOutcome::Replaced(len)
            }
            Err(e) => {
                self.last_error = Some(format!("{}: {}", e.kind(), e));
                ApplyOutcome::Failed
            }
        }
    }

    /// Fetch and apply in one go, never returning an error
    pub async fn refresh(&mut self, source: &dyn TvlSource) -> ApplyOutcome {
        let ticket = self.begin_fetch();
        let result = source.fetch_series(&ticket.protocol).await;
        self.apply(&ticket, result)
    }

    // Tooltip cursor

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn selected_point(&self) -> Option<&TvlPoint> {
        self.cursor.and_then(|i| self.series.get(i))
    }

    pub fn cursor_left(&mut self) {
        if self.series.is_empty() {
            return;
        }
        self.cursor = Some(match self.cursor {
            Some(i) => i.saturating_sub(1),
            None => self.series.len() - 1,
        });
    }

    pub fn cursor_right(&mut self) {
        if self.series.is_empty() {
            return;
        }
        let last = self.series.len() - 1;
        self.cursor = Some(match self.cursor {
            Some(i) => (i + 1).min(last),
            None => 0,
        });
    }

    pub fn clear_cursor(&mut self) {
        self.cursor = None;
    }
}
