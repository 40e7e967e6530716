//! Data models for Wren

mod footer;
mod item;
mod tweet;

pub use footer::FooterState;
pub use item::{EditorItem, Item, PreviousStatusItem};
pub use tweet::{Tweet, relative_time};
