//! Core contracts shared by the fakeflow combinators.
//!
//! This crate defines the faking capability, the options and task types that
//! flow between combinator steps, the ordered concurrency-bounded scheduler,
//! and the settings layer.

pub mod config;
pub mod entity;
pub mod error;
pub mod options;
pub mod schedule;
pub mod task;

pub use config::{CONCURRENCY_ENV, Settings};
pub use entity::Fakeable;
pub use error::{BoxError, Error, Result};
pub use options::{MapOptions, Options, OptionsFn};
pub use schedule::{join_ordered, map_concurrent};
pub use task::{Deferred, Task, TaskRef};
