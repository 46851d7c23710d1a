//! Integration flows across the validation and state crates.

pub mod fixtures;

#[cfg(test)]
mod state_flows;
#[cfg(test)]
mod validation_flows;
