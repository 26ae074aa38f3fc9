pub mod book;
pub mod error;
pub mod events;
pub mod fixed_point;
pub mod matching;
pub mod pending;
pub mod snapshot;
pub mod stops;
pub mod types;

pub mod prelude {
    pub use super::book::*;
    pub use super::error::*;
    pub use super::events::*;
    pub use super::fixed_point::*;
    pub use super::matching::*;
    pub use super::pending::*;
    pub use super::snapshot::*;
    pub use super::stops::*;
    pub use super::types::*;
}
