//! Grammars built from the combinators in this crate.
//!
//! These are small, illustrative consumers of the parser and transducer layers;
//! each is gated behind its own feature, or enable them all with `grammar-all`.

#[cfg(feature = "grammar-c")]
pub mod c_comment;

#[cfg(feature = "grammar-jsdoc")]
pub mod jsdoc;
