//! Cross-crate tests for the scan pipeline.
//!
//! Every test runs against stub probe layers, no packets leave the machine.

#[cfg(test)]
mod scan;
#[cfg(test)]
mod util;
