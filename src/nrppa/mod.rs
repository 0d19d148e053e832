//! NRPPA protocol types and codec (3GPP TS 38.455)

pub mod types;
pub mod cause;
pub mod ies;
pub mod pdu;

pub use types::{Criticality, NrppaTransactionId, Presence, ProcedureCode, ProtocolIeId, TriggeringMessage};
pub use cause::Cause;
pub use pdu::NrppaPdu;
