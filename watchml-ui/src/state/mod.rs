//! State Management
//!
//! Backend data types and the user-key bootstrap.

pub mod ecg;
pub mod identity;

pub use ecg::EcgRecord;
pub use identity::{use_user_key, KeyState};
