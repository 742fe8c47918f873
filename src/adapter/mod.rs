//! Bridges from a host test runner to the profiler lifecycle.
//!
//! Host runners differ in how they report progress; an adapter turns
//! whatever they emit into the four `Lifecycle` calls. The reporter here
//! suits runners that only announce "test about to run" and "test done",
//! and works out group boundaries itself.

pub mod locator;
pub mod reporter;

pub use locator::{relative_location, Locator, MapLocator};
pub use reporter::SequentialReporter;
