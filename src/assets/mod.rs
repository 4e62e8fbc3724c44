//! Frame files on disk: naming, listing, decode and encode.

pub(crate) mod frames;
