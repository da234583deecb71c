//! Database query modules.

pub mod albums;
pub mod artists;
pub mod genres;
pub mod songs;
