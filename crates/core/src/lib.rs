pub mod book;
pub mod config;
pub mod error;
pub mod host;
pub mod list;
pub mod parser;
pub mod pipeline;
pub mod query;
pub mod slots;
pub mod thumbnail;

pub mod prelude {
    pub use crate::book::*;
    pub use crate::error::*;
    pub use crate::host::*;
    pub use crate::list::{Applied, BookList, ListState};
}
