// Custom widgets built from ratatui primitives
//
// - TvlChart: bordered line chart for one protocol, with grid, legend,
//   point cursor tooltip and fetch status in the bottom border

pub mod tvl_chart;

pub use tvl_chart::TvlChart;
