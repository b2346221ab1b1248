pub mod archive;
pub mod batch;
pub mod book;
pub mod config;
pub mod container;
pub mod cover;
pub mod epub;
pub mod error;
pub mod isbn;
pub mod package;
pub mod template;
pub mod toc;
pub mod vault;
pub mod xml;

#[cfg(test)]
mod testutil;

pub mod prelude {
    pub use crate::book::*;
    pub use crate::epub::{parse_epub, parse_epub_bytes};
    pub use crate::error::*;
}
