//! Shared utility modules used across cafescout components.

pub mod sort;
