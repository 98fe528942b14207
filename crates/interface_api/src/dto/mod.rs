//! Request and response bodies

pub mod normalizations;
