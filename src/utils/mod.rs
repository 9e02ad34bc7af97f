//! Small text helpers shared by the adapter and the cache.

pub mod text;

pub use text::{remove_bookmarks, slugify};
