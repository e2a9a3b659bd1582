//! Poetry Types
//!
//! Data structures for the public forest of poetry trees and for the
//! private drafts each nickname keeps on the side.

pub mod node;
pub mod poem;
pub mod requests;

pub use node::{HslPalette, NewNode, NodeId, NodeUpdate, PoetryNode, TreeNode};
pub use poem::{verse_lines, NewPoem, PoemId, PoemUpdate, PrivatePoem, DEFAULT_TITLE};
pub use requests::*;
