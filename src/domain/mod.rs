pub mod assembler;
pub mod extract;
pub mod listing;

pub use assembler::assemble_listing;
pub use extract::UnmatchedDetails;
pub use listing::{Field, ListingRecord, ListingRef};
