//! Core types for Osskit

mod bucket;
mod object;
mod policy;
mod presigned;

pub use bucket::*;
pub use object::*;
pub use policy::*;
pub use presigned::*;
