//! Dashboard UI components
//!
//! Theme, the control strip that emits [`bb_core::ControlEvent`]s, and small
//! widget helpers shared by the app.

pub mod controls;
pub mod theme;
pub mod widget_utils;

pub use controls::{ControlPanel, StationFilter};
pub use theme::{apply_theme, Theme};
pub use widget_utils::{widget_id, WidgetId};
