//! Reading zip containers.
//!
//! [`Archive::open`] validates the end of central directory record, walks
//! the central directory and loads every part's stored bytes without
//! decoding them. Order is never changed: some container profiles give
//! meaning to the first entry (an uncompressed `mimetype` marker, for
//! instance), so the reader neither sorts nor deduplicates.

mod archive;
mod part;

pub use archive::Archive;
pub use part::ArchivePart;
