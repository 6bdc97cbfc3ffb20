//! Tests for the handle queries: freezing, identity comparison and change
//! tracking.

mod has_changed_tests;
