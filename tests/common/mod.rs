//! Consolidated test utilities for branch-tabs
//!
//! This module provides in-memory collaborators for driving the transition
//! engine deterministically, plus real git repository helpers for the
//! end-to-end and CLI tests.

pub mod assertions;
pub mod fixtures;
pub mod repository;
