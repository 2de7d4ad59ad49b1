//! Request handlers for the health HTTP surface

pub mod health;
