//! Correctness checks for solver output

pub mod correctness;

pub use self::correctness::{verify_optimality, verify_solution, VerificationError};
