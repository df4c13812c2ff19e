//! Dependency injection

pub mod service_container;
