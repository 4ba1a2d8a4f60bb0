//! Extensions to standard library types used throughout the crate.

pub(crate) mod iter;
pub(crate) mod vec;
