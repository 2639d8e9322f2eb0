//! Data-access boundary for event-sourced aggregates.
//!
//! A [`UnitOfWork`] is a reference-counted session over a [`Mapper`]: handles
//! created by [`UnitOfWork::attach`] share one session, and the mapper is
//! disposed exactly once, when the last handle is released. The
//! [`DomainUnitOfWork`] adds the optimistic-concurrency discipline: within one
//! session, the stored version of a given aggregate is asserted at most once,
//! and every later read of the same aggregate is an unconditional load.
//!
//! [`InMemoryDataMapper`] is the mapper used by tests and examples; real
//! stores implement the same [`Mapper`] / [`AggregateMapper`] pair.

pub mod domain_unit_of_work;
pub mod error;
pub mod mapper;
pub mod memory;
pub mod unit_of_work;

pub use domain_unit_of_work::DomainUnitOfWork;
pub use error::{MapperError, Result};
pub use mapper::{AggregateMapper, Mapper};
pub use memory::InMemoryDataMapper;
pub use unit_of_work::UnitOfWork;

#[cfg(test)]
pub(crate) mod testing;
