pub mod types;
pub mod builder;
pub mod selection;
pub mod render;
pub mod error;

pub use types::*;
pub use builder::{build_tree, TreeBuilder};
pub use selection::{ExpansionState, SelectionState, TreeController};
pub use render::{render_rows, render_text, RenderedRow, RowControl};
pub use error::TreeError;
