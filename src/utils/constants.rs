/// Constants used throughout the application

use ratatui::style::Color;

pub const APP_NAME: &str = "dada-dash";

pub const DASHBOARD_TITLE: &str = "DADA – Cardano Risk Dashboard";

/// TVL API base URL
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";

/// Protocols mounted when nothing is configured.
/// Liqwid is supported by the backend but not shown by default.
pub const DEFAULT_PROTOCOLS: &[&str] = &["Minswap", "Indigo"];

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Environment variable overriding the configured endpoint
pub const ENDPOINT_ENV: &str = "DADA_ENDPOINT";

pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const LOG_FILE_NAME: &str = "dada-dash.log";

/// Series line colour (#3b82f6)
pub const LINE_COLOR: Color = Color::Rgb(0x3b, 0x82, 0xf6);
pub const GRID_COLOR: Color = Color::DarkGray;

/// Horizontal grid lines drawn inside each chart
pub const GRID_LINES: usize = 4;

/// Terminal width at which the panel grid switches to two columns
pub const TWO_COLUMN_MIN_WIDTH: u16 = 100;

/// UI refresh tick
pub const UI_TICK_MS: u64 = 100;
