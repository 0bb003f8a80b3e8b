//! Unit tests for the compute module.
//!
//! Domain tests cover identifier and state parsing; service tests drive the
//! services against the in-memory provider and a mocked client; adapter tests
//! drive the signed REST client against a scripted local server.

mod domain_tests;
