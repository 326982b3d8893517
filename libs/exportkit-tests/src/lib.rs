//! End-to-end tests for exportkit live under `tests/`; this crate has no
//! library code of its own.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
