//! Terminal dashboard charting total value locked (TVL) per protocol.
//!
//! Each configured protocol gets a chart panel that fetches
//! `GET {endpoint}/tvl/{protocol}` once on mount and whenever its protocol
//! changes, and plots the returned `[{timestamp, tvl}]` series.

pub mod app;
pub mod cli;
pub mod core;
pub mod screens;
pub mod server;
pub mod utils;
pub mod widgets;
