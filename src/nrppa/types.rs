//! NRPPA Basic Types
//!
//! Basic types from NRPPA-CommonDataTypes (3GPP TS 38.455)

use crate::per::{AperDecode, AperDecoder, AperEncode, AperEncoder, Constraint, PerResult};

/// Criticality - indicates how to handle unrecognized IEs
/// ASN.1: Criticality ::= ENUMERATED { reject, ignore, notify }
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Criticality {
    Reject = 0,
    Ignore = 1,
    Notify = 2,
}

impl Criticality {
    pub const CONSTRAINT: Constraint = Constraint::new(0, 2);

    pub fn as_str(&self) -> &'static str {
        match self {
            Criticality::Reject => "reject",
            Criticality::Ignore => "ignore",
            Criticality::Notify => "notify",
        }
    }
}

impl AperEncode for Criticality {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_enumerated(*self as i64, &Self::CONSTRAINT)
    }
}

impl AperDecode for Criticality {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let value = decoder.decode_enumerated(&Self::CONSTRAINT)?;
        match value {
            0 => Ok(Criticality::Reject),
            1 => Ok(Criticality::Ignore),
            2 => Ok(Criticality::Notify),
            _ => Err(crate::per::PerError::DecodeError(
                format!("Invalid Criticality value: {value}"),
            )),
        }
    }
}

/// ProcedureCode - identifies the NRPPA elementary procedure
/// ASN.1: ProcedureCode ::= INTEGER (0..255)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcedureCode(pub u8);

impl ProcedureCode {
    pub const CONSTRAINT: Constraint = Constraint::new(0, 255);

    // Procedure code constants from 3GPP TS 38.455
    pub const ERROR_INDICATION: Self = Self(0);
    pub const PRIVATE_MESSAGE: Self = Self(1);
    pub const E_CID_MEASUREMENT_INITIATION: Self = Self(2);
    pub const E_CID_MEASUREMENT_FAILURE_INDICATION: Self = Self(3);
    pub const E_CID_MEASUREMENT_REPORT: Self = Self(4);
    pub const E_CID_MEASUREMENT_TERMINATION: Self = Self(5);
    pub const OTDOA_INFORMATION_EXCHANGE: Self = Self(6);
    pub const ASSISTANCE_INFORMATION_CONTROL: Self = Self(7);
    pub const ASSISTANCE_INFORMATION_FEEDBACK: Self = Self(8);
    pub const POSITIONING_INFORMATION_EXCHANGE: Self = Self(9);
    pub const POSITIONING_INFORMATION_UPDATE: Self = Self(10);
    pub const MEASUREMENT: Self = Self(11);
    pub const MEASUREMENT_REPORT: Self = Self(12);
    pub const MEASUREMENT_UPDATE: Self = Self(13);
    pub const MEASUREMENT_ABORT: Self = Self(14);
    pub const MEASUREMENT_FAILURE_INDICATION: Self = Self(15);
    pub const TRP_INFORMATION_EXCHANGE: Self = Self(16);
    pub const POSITIONING_ACTIVATION: Self = Self(17);
    pub const POSITIONING_DEACTIVATION: Self = Self(18);
    pub const PRS_CONFIGURATION_EXCHANGE: Self = Self(19);
    pub const MEASUREMENT_PRECONFIGURATION: Self = Self(20);
    pub const MEASUREMENT_ACTIVATION: Self = Self(21);
    pub const SRS_INFORMATION_RESERVATION_NOTIFICATION: Self = Self(22);
}

impl AperEncode for ProcedureCode {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_constrained_whole_number(self.0 as i64, &Self::CONSTRAINT)
    }
}

impl AperDecode for ProcedureCode {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let value = decoder.decode_constrained_whole_number(&Self::CONSTRAINT)?;
        Ok(ProcedureCode(value as u8))
    }
}

/// ProtocolIE-ID - identifies the Information Element
/// ASN.1: ProtocolIE-ID ::= INTEGER (0..65535)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProtocolIeId(pub u16);

impl ProtocolIeId {
    pub const CONSTRAINT: Constraint = Constraint::new(0, 65535);

    // IE IDs from 3GPP TS 38.455 used by the typed containers in this crate
    pub const CAUSE: Self = Self(0);
    pub const CRITICALITY_DIAGNOSTICS: Self = Self(1);
    pub const LMF_UE_MEASUREMENT_ID: Self = Self(2);
    pub const RAN_UE_MEASUREMENT_ID: Self = Self(6);
    pub const SRS_CONFIGURATION: Self = Self(26);
    pub const MEASUREMENT_RESULT: Self = Self(27);
    pub const TRP_ID: Self = Self(28);
    pub const ABORT_TRANSMISSION: Self = Self(44);
    pub const SYSTEM_FRAME_NUMBER: Self = Self(59);
    pub const SLOT_NUMBER: Self = Self(60);
    pub const POINT_A: Self = Self(154);
    pub const SCS_SPECIFIC_CARRIER: Self = Self(156);
}

impl AperEncode for ProtocolIeId {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_constrained_whole_number(self.0 as i64, &Self::CONSTRAINT)
    }
}

impl AperDecode for ProtocolIeId {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let value = decoder.decode_constrained_whole_number(&Self::CONSTRAINT)?;
        Ok(ProtocolIeId(value as u16))
    }
}

/// NRPPATransactionID - correlates request/response pairs
/// ASN.1: NRPPATransactionID ::= INTEGER (0..32767)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NrppaTransactionId(pub u16);

impl NrppaTransactionId {
    pub const CONSTRAINT: Constraint = Constraint::new(0, 32767);
}

impl AperEncode for NrppaTransactionId {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_constrained_whole_number(self.0 as i64, &Self::CONSTRAINT)
    }
}

impl AperDecode for NrppaTransactionId {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let value = decoder.decode_constrained_whole_number(&Self::CONSTRAINT)?;
        Ok(NrppaTransactionId(value as u16))
    }
}

/// TriggeringMessage - indicates which message triggered the error
/// ASN.1: TriggeringMessage ::= ENUMERATED { initiating-message, successful-outcome, unsuccessful-outcome }
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TriggeringMessage {
    InitiatingMessage = 0,
    SuccessfulOutcome = 1,
    UnsuccessfulOutcome = 2,
}

impl TriggeringMessage {
    pub const CONSTRAINT: Constraint = Constraint::new(0, 2);
}

impl AperEncode for TriggeringMessage {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_enumerated(*self as i64, &Self::CONSTRAINT)
    }
}

impl AperDecode for TriggeringMessage {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let value = decoder.decode_enumerated(&Self::CONSTRAINT)?;
        match value {
            0 => Ok(TriggeringMessage::InitiatingMessage),
            1 => Ok(TriggeringMessage::SuccessfulOutcome),
            2 => Ok(TriggeringMessage::UnsuccessfulOutcome),
            _ => Err(crate::per::PerError::DecodeError(
                format!("Invalid TriggeringMessage value: {value}"),
            )),
        }
    }
}

/// Presence - indicates whether an IE is optional, conditional, or mandatory
/// ASN.1: Presence ::= ENUMERATED { optional, conditional, mandatory }
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Presence {
    Optional = 0,
    Conditional = 1,
    Mandatory = 2,
}

impl Presence {
    pub const CONSTRAINT: Constraint = Constraint::new(0, 2);
}

impl AperEncode for Presence {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_enumerated(*self as i64, &Self::CONSTRAINT)
    }
}

impl AperDecode for Presence {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let value = decoder.decode_enumerated(&Self::CONSTRAINT)?;
        match value {
            0 => Ok(Presence::Optional),
            1 => Ok(Presence::Conditional),
            2 => Ok(Presence::Mandatory),
            _ => Err(crate::per::PerError::DecodeError(
                format!("Invalid Presence value: {value}"),
            )),
        }
    }
}
