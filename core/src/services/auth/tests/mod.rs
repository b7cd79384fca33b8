//! Tests for the authentication and authorization gates

#[cfg(test)]
mod gate_tests;
