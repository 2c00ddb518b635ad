pub mod dashboard;

// The dashboard is a single screen:
// - Title line
// - Grid of chart panels, one per configured protocol (1 or 2 columns)
// - Footer with key hints, the protocol editor, or a transient status
// - Help overlay (press '?')

pub use dashboard::Dashboard;
