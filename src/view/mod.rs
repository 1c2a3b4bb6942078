//! Views
//!
//! Text renderings of the reusable UI pieces.

mod list;

pub use list::{ListItem, ListRow, ListView};
