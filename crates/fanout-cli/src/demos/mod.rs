//! Built-in demonstration workloads.

pub mod contract;
pub mod refinery;

#[cfg(test)]
pub(crate) mod testing;
