//! Mockall mocks for the backend traits.

pub use backend::MockLedger;

mod backend;
