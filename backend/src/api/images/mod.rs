//! External image lookups.

mod lookup_wikimedia_image;
pub use lookup_wikimedia_image::{WikimediaImageLookup, extract_thumbnail};
