//! Pages
//!
//! Top-level page components for each route.

pub mod ecg;
pub mod home;

pub use ecg::EcgPage;
pub use home::Home;
