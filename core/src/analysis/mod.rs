pub use matches::*;
pub use snapshot::*;

mod matches;
mod snapshot;
