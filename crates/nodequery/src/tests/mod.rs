//! Unit tests for the query language.

mod driver_tests;
mod support;
