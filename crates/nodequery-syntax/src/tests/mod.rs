//! Unit tests for nodequery-syntax.

mod tree_tests;
