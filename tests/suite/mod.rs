//! Integration test suite modules

mod cli;
