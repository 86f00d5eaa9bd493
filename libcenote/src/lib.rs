//! This is a library that turns geocoded biodiversity survey tables (species, cenotes and fish
//! records) into a map overlay: one colored marker per surveyed coordinate plus a fixed reference
//! grid over the Yucatán peninsula.
//!
//! The pipeline is load -> join -> score -> render. [map::MapHost] drives all of it for a single
//! map view.

pub mod error;
pub mod grid;
pub mod join;
pub mod loader;
pub mod map;
pub mod marker;
pub mod observation;
pub mod record;
pub mod survey;
pub mod table;

pub use error::Error;
pub use error::Result;
