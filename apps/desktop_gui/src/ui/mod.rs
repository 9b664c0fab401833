//! UI layer for desktop GUI: app shell, module view, reward overlay, and palette.

pub mod app;
pub mod module_view;
pub mod reward_overlay;
pub mod theme;

pub use app::FocusFlowApp;
