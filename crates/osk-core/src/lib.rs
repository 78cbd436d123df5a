//! osk-core
//!
//! Scheduling, reservation and reporting services for the driving school.
//! Depends on osk-domain. No CLI, no terminal I/O, no direct storage interactions.

pub mod availability;
pub mod calendar;
pub mod course_service;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod extract;
pub mod finance;
pub mod format;
pub mod reconcile;
pub mod reservation_service;
pub mod schedule_service;
pub mod settings;
pub mod storage;
pub mod time;

pub use availability::*;
pub use calendar::*;
pub use course_service::*;
pub use dashboard::*;
pub use error::{CoreError, CoreResult};
pub use export::*;
pub use extract::*;
pub use finance::*;
pub use format::*;
pub use reconcile::*;
pub use reservation_service::*;
pub use schedule_service::*;
pub use settings::*;
pub use storage::*;
pub use time::*;
