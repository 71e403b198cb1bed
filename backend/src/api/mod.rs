pub mod images;
pub mod kb;
pub mod search;
