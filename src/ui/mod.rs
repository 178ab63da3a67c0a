pub mod common;
pub mod dashboard;
pub mod labels;
pub mod theme;

pub use labels::{Labels, Language};
pub use theme::{Theme, ThemeChoice};
