//! JSON effect configuration.

pub(crate) mod effect;
