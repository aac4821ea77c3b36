//! Verification of matching results and recorded runs

pub mod correctness;

pub use self::correctness::{
    validate_matching, verify_history, verify_vertex_cover, CorrectnessReport, VerificationError,
};
