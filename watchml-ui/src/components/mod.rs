//! UI Components
//!
//! Reusable Leptos components.

pub mod list;
pub mod loading;
pub mod nav;

pub use list::List;
pub use loading::Loading;
pub use nav::Nav;
