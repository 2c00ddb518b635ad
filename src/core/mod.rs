pub mod error;
pub mod panel;
pub mod tvl;

pub use error::FetchError;
pub use panel::{ApplyOutcome, ChartPanel, FetchTicket};
pub use tvl::{series_report, HttpTvlSource, ProtocolSeries, TvlPoint, TvlSource};
