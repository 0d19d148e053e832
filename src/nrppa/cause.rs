//! NRPPA Cause Types
//!
//! Cause types from NRPPA-IEs (3GPP TS 38.455)

use crate::per::{AperDecode, AperDecoder, AperEncode, AperEncoder, Constraint, PerError, PerResult};

/// CauseRadioNetwork - Radio network layer cause values
/// ASN.1: CauseRadioNetwork ::= ENUMERATED { unspecified, requested-item-not-supported, requested-item-temporarily-not-available, ... }
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CauseRadioNetwork {
    Unspecified = 0,
    RequestedItemNotSupported = 1,
    RequestedItemTemporarilyNotAvailable = 2,
    // Extension values (3+)
    ServingNgRanNodeChanged = 3,
    RequestedItemNotAvailableInAggregatedSrs = 4,
}

impl CauseRadioNetwork {
    // Root enumeration has 3 values (0-2), extensible
    pub const CONSTRAINT: Constraint = Constraint::extensible(0, 2);

    pub fn as_str(&self) -> &'static str {
        match self {
            CauseRadioNetwork::Unspecified => "unspecified",
            CauseRadioNetwork::RequestedItemNotSupported => "requested-item-not-supported",
            CauseRadioNetwork::RequestedItemTemporarilyNotAvailable => {
                "requested-item-temporarily-not-available"
            }
            CauseRadioNetwork::ServingNgRanNodeChanged => "serving-NG-RAN-node-changed",
            CauseRadioNetwork::RequestedItemNotAvailableInAggregatedSrs => {
                "requested-item-not-available-in-aggregated-SRS"
            }
        }
    }
}

impl AperEncode for CauseRadioNetwork {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_enumerated(*self as i64, &Self::CONSTRAINT)
    }
}

impl AperDecode for CauseRadioNetwork {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let value = decoder.decode_enumerated(&Self::CONSTRAINT)?;
        match value {
            0 => Ok(CauseRadioNetwork::Unspecified),
            1 => Ok(CauseRadioNetwork::RequestedItemNotSupported),
            2 => Ok(CauseRadioNetwork::RequestedItemTemporarilyNotAvailable),
            3 => Ok(CauseRadioNetwork::ServingNgRanNodeChanged),
            4 => Ok(CauseRadioNetwork::RequestedItemNotAvailableInAggregatedSrs),
            _ => Err(PerError::DecodeError(format!(
                "Unknown CauseRadioNetwork value: {value}"
            ))),
        }
    }
}

/// CauseProtocol - Protocol layer cause values
/// ASN.1: CauseProtocol ::= ENUMERATED { transfer-syntax-error, abstract-syntax-error-reject, ... }
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CauseProtocol {
    TransferSyntaxError = 0,
    AbstractSyntaxErrorReject = 1,
    AbstractSyntaxErrorIgnoreAndNotify = 2,
    MessageNotCompatibleWithReceiverState = 3,
    SemanticError = 4,
    Unspecified = 5,
    AbstractSyntaxErrorFalselyConstructedMessage = 6,
}

impl CauseProtocol {
    pub const CONSTRAINT: Constraint = Constraint::extensible(0, 6);

    pub fn as_str(&self) -> &'static str {
        match self {
            CauseProtocol::TransferSyntaxError => "transfer-syntax-error",
            CauseProtocol::AbstractSyntaxErrorReject => "abstract-syntax-error-reject",
            CauseProtocol::AbstractSyntaxErrorIgnoreAndNotify => {
                "abstract-syntax-error-ignore-and-notify"
            }
            CauseProtocol::MessageNotCompatibleWithReceiverState => {
                "message-not-compatible-with-receiver-state"
            }
            CauseProtocol::SemanticError => "semantic-error",
            CauseProtocol::Unspecified => "unspecified",
            CauseProtocol::AbstractSyntaxErrorFalselyConstructedMessage => {
                "abstract-syntax-error-falsely-constructed-message"
            }
        }
    }
}

impl AperEncode for CauseProtocol {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_enumerated(*self as i64, &Self::CONSTRAINT)
    }
}

impl AperDecode for CauseProtocol {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let value = decoder.decode_enumerated(&Self::CONSTRAINT)?;
        match value {
            0 => Ok(CauseProtocol::TransferSyntaxError),
            1 => Ok(CauseProtocol::AbstractSyntaxErrorReject),
            2 => Ok(CauseProtocol::AbstractSyntaxErrorIgnoreAndNotify),
            3 => Ok(CauseProtocol::MessageNotCompatibleWithReceiverState),
            4 => Ok(CauseProtocol::SemanticError),
            5 => Ok(CauseProtocol::Unspecified),
            6 => Ok(CauseProtocol::AbstractSyntaxErrorFalselyConstructedMessage),
            _ => Err(PerError::DecodeError(format!(
                "Unknown CauseProtocol value: {value}"
            ))),
        }
    }
}

/// CauseMisc - Miscellaneous cause values
/// ASN.1: CauseMisc ::= ENUMERATED { non-specific, hardware-failure, o-and-m-intervention, unspecified, ... }
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CauseMisc {
    NonSpecific = 0,
    HardwareFailure = 1,
    OAndMIntervention = 2,
    Unspecified = 3,
}

impl CauseMisc {
    pub const CONSTRAINT: Constraint = Constraint::extensible(0, 3);

    pub fn as_str(&self) -> &'static str {
        match self {
            CauseMisc::NonSpecific => "non-specific",
            CauseMisc::HardwareFailure => "hardware-failure",
            CauseMisc::OAndMIntervention => "o-and-m-intervention",
            CauseMisc::Unspecified => "unspecified",
        }
    }
}

impl AperEncode for CauseMisc {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_enumerated(*self as i64, &Self::CONSTRAINT)
    }
}

impl AperDecode for CauseMisc {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let value = decoder.decode_enumerated(&Self::CONSTRAINT)?;
        match value {
            0 => Ok(CauseMisc::NonSpecific),
            1 => Ok(CauseMisc::HardwareFailure),
            2 => Ok(CauseMisc::OAndMIntervention),
            3 => Ok(CauseMisc::Unspecified),
            _ => Err(PerError::DecodeError(format!(
                "Unknown CauseMisc value: {value}"
            ))),
        }
    }
}

/// Cause - reason for a procedure failure
/// ASN.1: Cause ::= CHOICE { radioNetwork, protocol, misc, ... }
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cause {
    RadioNetwork(CauseRadioNetwork),
    Protocol(CauseProtocol),
    Misc(CauseMisc),
}

impl Cause {
    pub const NUM_ALTERNATIVES: usize = 3;
    pub const EXTENSIBLE: bool = true;

    pub fn as_str(&self) -> &'static str {
        match self {
            Cause::RadioNetwork(c) => c.as_str(),
            Cause::Protocol(c) => c.as_str(),
            Cause::Misc(c) => c.as_str(),
        }
    }
}

impl AperEncode for Cause {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        match self {
            Cause::RadioNetwork(c) => {
                encoder.encode_choice_index(0, Self::NUM_ALTERNATIVES, Self::EXTENSIBLE)?;
                c.encode_aper(encoder)
            }
            Cause::Protocol(c) => {
                encoder.encode_choice_index(1, Self::NUM_ALTERNATIVES, Self::EXTENSIBLE)?;
                c.encode_aper(encoder)
            }
            Cause::Misc(c) => {
                encoder.encode_choice_index(2, Self::NUM_ALTERNATIVES, Self::EXTENSIBLE)?;
                c.encode_aper(encoder)
            }
        }
    }
}

impl AperDecode for Cause {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let index = decoder.decode_choice_index(Self::NUM_ALTERNATIVES, Self::EXTENSIBLE)?;
        match index {
            0 => Ok(Cause::RadioNetwork(CauseRadioNetwork::decode_aper(decoder)?)),
            1 => Ok(Cause::Protocol(CauseProtocol::decode_aper(decoder)?)),
            2 => Ok(Cause::Misc(CauseMisc::decode_aper(decoder)?)),
            _ => Err(PerError::InvalidChoiceIndex {
                index,
                max: Self::NUM_ALTERNATIVES - 1,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::per::{AperDecoder, AperEncoder};

    #[test]
    fn test_cause_roundtrip() {
        let causes = [
            Cause::RadioNetwork(CauseRadioNetwork::RequestedItemNotSupported),
            Cause::Protocol(CauseProtocol::AbstractSyntaxErrorReject),
            Cause::Misc(CauseMisc::HardwareFailure),
        ];
        for cause in causes {
            let mut encoder = AperEncoder::new();
            cause.encode_aper(&mut encoder).unwrap();
            encoder.align();

            let bytes = encoder.into_bytes();
            let mut decoder = AperDecoder::new(&bytes);
            let decoded = Cause::decode_aper(&mut decoder).unwrap();

            assert_eq!(cause, decoded);
        }
    }

    #[test]
    fn test_cause_radio_network_extension_value() {
        // ServingNgRanNodeChanged sits past the extension marker
        let cause = CauseRadioNetwork::ServingNgRanNodeChanged;
        let mut encoder = AperEncoder::new();
        cause.encode_aper(&mut encoder).unwrap();
        encoder.align();

        let bytes = encoder.into_bytes();
        let mut decoder = AperDecoder::new(&bytes);
        let decoded = CauseRadioNetwork::decode_aper(&mut decoder).unwrap();

        assert_eq!(cause, decoded);
    }
}
