//! Parser: tokens to a compilation unit

mod cursor;
mod expr;
mod parser;

pub use cursor::{Cursor, TokenStream};
pub use parser::{Parser, parse};
