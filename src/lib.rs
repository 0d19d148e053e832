//! NRPPA ASN.1 Codec Library
//!
//! This crate provides ASN.1 PER encoding/decoding for the NRPPA
//! positioning protocol (3GPP TS 38.455).
//!
//! # Modules
//!
//! - `per` - Packed Encoding Rules (APER) encoder/decoder
//! - `nrppa` - NRPPA protocol types and codec

pub mod per;    // Packed Encoding Rules
pub mod nrppa;  // NRPPA codec (directory module)


// Re-export commonly used types
pub use per::{AperDecode, AperDecoder, AperEncode, AperEncoder, Constraint, PerError, PerResult};
