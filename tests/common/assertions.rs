//! Common assertion helpers for test output validation

#![allow(dead_code)]

use predicates::prelude::*;

/// Creates a predicate that checks for git repository error messages
pub fn not_in_git_repo() -> impl Predicate<str> {
    predicates::str::contains("Not in a git repository")
}

/// Creates a predicate that checks a branch is listed as current
pub fn current_branch(name: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("[*] {name}"))
}

/// Creates a predicate that checks a branch is listed as not current
pub fn other_branch(name: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("[ ] {name}"))
}

/// Creates a predicate that checks for a numbered saved file
pub fn has_saved_file(index: usize, path: &str) -> impl Predicate<str> {
    predicates::str::contains(format!("[{index}] {path}"))
}
