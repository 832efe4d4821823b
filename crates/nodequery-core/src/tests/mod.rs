//! Unit tests for `nodequery_core` types.
