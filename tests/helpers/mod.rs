//! Shared fixtures for integration tests.

#![allow(dead_code)]

pub mod class_builder;
pub mod jar;

pub use class_builder::ClassBuilder;
pub use jar::{read_jar, write_jar};
