//! Declarative, nested fake data for tests.
//!
//! Entities implement [`Fakeable`]; the combinators compose their faking
//! operations into trees of deferred work:
//!
//! ```ignore
//! use fakeflow::{create, for_each, in_parallel, DeferredExt, TaskRef};
//!
//! // One thingy, three entities and two foos per entity.
//! let counts = in_parallel(vec![
//!     TaskRef::from(create(1, thingy).entry().then_with(|thingies| thingies.len())),
//!     create(3, entity)
//!         .entries()
//!         .chain(for_each(create(2, foo).task()))
//!         .then_with(|foos| foos.len())
//!         .into(),
//! ])
//! .await?;
//! ```

pub mod create;
pub mod faker;
pub mod logging;
pub mod parallel;
pub mod project;
pub mod registry;
pub mod remember;
pub mod step;

pub use create::{Create, create};
pub use faker::{FakerEntity, FakerOptions};
pub use parallel::{InParallel, in_parallel};
pub use project::{ForEach, ForTheFirst, for_each, for_the_first};
pub use registry::{DynEntity, EntityRegistry, JsonEntity};
pub use remember::{Context, RememberAs, remember_as};
pub use step::{DeferredExt, Step};

pub use fakeflow_core::{
    BoxError, Deferred, Error, Fakeable, MapOptions, Options, Result, Settings, Task, TaskRef,
    join_ordered, map_concurrent,
};
