//! Concrete [`MetricsSource`](crate::source::MetricsSource) implementations.

pub mod procfs;

pub use procfs::ProcfsSource;
