pub mod annotator;
pub mod builder;
pub mod error;
pub mod filters;
pub mod index;
pub mod mutation;
pub mod parser;
pub mod rank;
pub mod recovery;
pub mod types;
pub mod writer;

pub use annotator::*;
pub use builder::*;
pub use error::*;
pub use filters::*;
pub use index::*;
pub use mutation::*;
pub use parser::*;
pub use rank::*;
pub use recovery::*;
pub use types::*;
pub use writer::*;
