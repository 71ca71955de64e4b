//! Chart documents written to disk.

pub mod html;
