//! Backends for exercising the hawser runtime without a node: mockall
//! mocks for expectation-style tests and a scripted backend replaying
//! canned replies for end-to-end dispatch tests.

#![forbid(unsafe_code)]

pub use scripted::{ScriptedBackend, StaticAuthorizer, SubscriptionFeed};

pub mod mocks;
mod scripted;
