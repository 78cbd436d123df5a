//! osk-domain
//!
//! Pure domain models for the driving school (courses, reservations, instructors,
//! schedule, pricing, application state). No I/O, no CLI, no storage.

pub mod common;
pub mod course;
pub mod error;
pub mod instructor;
pub mod reservation;
pub mod schedule;
pub mod settings;
pub mod state;

pub use common::*;
pub use course::*;
pub use error::DomainError;
pub use instructor::*;
pub use reservation::*;
pub use schedule::*;
pub use settings::*;
pub use state::*;
