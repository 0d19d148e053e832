//! NRPPA PDU Types
//!
//! Top-level PDU structures from NRPPA-PDU-Descriptions (3GPP TS 38.455)

use crate::per::{AperDecode, AperDecoder, AperEncode, AperEncoder, PerError, PerResult};
use super::ies::{PositioningActivationResponseIes, PositioningDeactivationIes, ProtocolIeContainer};
use super::types::{Criticality, NrppaTransactionId, ProcedureCode};
use serde_json::{json, Value};

/// NRPPA-ELEMENTARY-PROCEDURES object set: procedure-code lookups.
pub mod elementary_procedures {
    use super::{Criticality, ProcedureCode};

    pub const PROCEDURE_CODES: [ProcedureCode; 23] = [
        ProcedureCode::ERROR_INDICATION,
        ProcedureCode::PRIVATE_MESSAGE,
        ProcedureCode::E_CID_MEASUREMENT_INITIATION,
        ProcedureCode::E_CID_MEASUREMENT_FAILURE_INDICATION,
        ProcedureCode::E_CID_MEASUREMENT_REPORT,
        ProcedureCode::E_CID_MEASUREMENT_TERMINATION,
        ProcedureCode::OTDOA_INFORMATION_EXCHANGE,
        ProcedureCode::ASSISTANCE_INFORMATION_CONTROL,
        ProcedureCode::ASSISTANCE_INFORMATION_FEEDBACK,
        ProcedureCode::POSITIONING_INFORMATION_EXCHANGE,
        ProcedureCode::POSITIONING_INFORMATION_UPDATE,
        ProcedureCode::MEASUREMENT,
        ProcedureCode::MEASUREMENT_REPORT,
        ProcedureCode::MEASUREMENT_UPDATE,
        ProcedureCode::MEASUREMENT_ABORT,
        ProcedureCode::MEASUREMENT_FAILURE_INDICATION,
        ProcedureCode::TRP_INFORMATION_EXCHANGE,
        ProcedureCode::POSITIONING_ACTIVATION,
        ProcedureCode::POSITIONING_DEACTIVATION,
        ProcedureCode::PRS_CONFIGURATION_EXCHANGE,
        ProcedureCode::MEASUREMENT_PRECONFIGURATION,
        ProcedureCode::MEASUREMENT_ACTIVATION,
        ProcedureCode::SRS_INFORMATION_RESERVATION_NOTIFICATION,
    ];

    pub fn is_procedure_code_valid(code: ProcedureCode) -> bool {
        PROCEDURE_CODES.contains(&code)
    }

    /// Declared criticality per procedure (TS 38.455 section 8)
    pub fn criticality(code: ProcedureCode) -> Option<Criticality> {
        match code {
            ProcedureCode::E_CID_MEASUREMENT_INITIATION
            | ProcedureCode::E_CID_MEASUREMENT_TERMINATION
            | ProcedureCode::OTDOA_INFORMATION_EXCHANGE
            | ProcedureCode::ASSISTANCE_INFORMATION_CONTROL
            | ProcedureCode::ASSISTANCE_INFORMATION_FEEDBACK
            | ProcedureCode::POSITIONING_INFORMATION_EXCHANGE
            | ProcedureCode::MEASUREMENT
            | ProcedureCode::TRP_INFORMATION_EXCHANGE
            | ProcedureCode::POSITIONING_ACTIVATION
            | ProcedureCode::PRS_CONFIGURATION_EXCHANGE
            | ProcedureCode::MEASUREMENT_PRECONFIGURATION
            | ProcedureCode::SRS_INFORMATION_RESERVATION_NOTIFICATION => {
                Some(Criticality::Reject)
            }
            ProcedureCode::ERROR_INDICATION
            | ProcedureCode::PRIVATE_MESSAGE
            | ProcedureCode::E_CID_MEASUREMENT_FAILURE_INDICATION
            | ProcedureCode::E_CID_MEASUREMENT_REPORT
            | ProcedureCode::POSITIONING_INFORMATION_UPDATE
            | ProcedureCode::MEASUREMENT_REPORT
            | ProcedureCode::MEASUREMENT_UPDATE
            | ProcedureCode::MEASUREMENT_ABORT
            | ProcedureCode::MEASUREMENT_FAILURE_INDICATION
            | ProcedureCode::POSITIONING_DEACTIVATION
            | ProcedureCode::MEASUREMENT_ACTIVATION => Some(Criticality::Ignore),
            _ => None,
        }
    }
}

/// NRPPA-PDU - Top-level PDU for all NRPPA messages
/// ASN.1: NRPPA-PDU ::= CHOICE { initiatingMessage, successfulOutcome, unsuccessfulOutcome, ... }
#[derive(Debug, Clone, PartialEq)]
pub enum NrppaPdu {
    InitiatingMessage(InitiatingMessage),
    SuccessfulOutcome(SuccessfulOutcome),
    UnsuccessfulOutcome(UnsuccessfulOutcome),
}

impl NrppaPdu {
    pub const NUM_ALTERNATIVES: usize = 3;
    pub const EXTENSIBLE: bool = true;

    pub fn to_json(&self) -> Value {
        match self {
            NrppaPdu::InitiatingMessage(msg) => json!({ "initiatingMessage": msg.to_json() }),
            NrppaPdu::SuccessfulOutcome(msg) => json!({ "successfulOutcome": msg.to_json() }),
            NrppaPdu::UnsuccessfulOutcome(msg) => json!({ "unsuccessfulOutcome": msg.to_json() }),
        }
    }
}

impl AperEncode for NrppaPdu {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        match self {
            NrppaPdu::InitiatingMessage(msg) => {
                encoder.encode_choice_index(0, Self::NUM_ALTERNATIVES, Self::EXTENSIBLE)?;
                msg.encode_aper(encoder)
            }
            NrppaPdu::SuccessfulOutcome(msg) => {
                encoder.encode_choice_index(1, Self::NUM_ALTERNATIVES, Self::EXTENSIBLE)?;
                msg.encode_aper(encoder)
            }
            NrppaPdu::UnsuccessfulOutcome(msg) => {
                encoder.encode_choice_index(2, Self::NUM_ALTERNATIVES, Self::EXTENSIBLE)?;
                msg.encode_aper(encoder)
            }
        }
    }
}

impl AperDecode for NrppaPdu {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let index = decoder.decode_choice_index(Self::NUM_ALTERNATIVES, Self::EXTENSIBLE)?;
        match index {
            0 => Ok(NrppaPdu::InitiatingMessage(InitiatingMessage::decode_aper(decoder)?)),
            1 => Ok(NrppaPdu::SuccessfulOutcome(SuccessfulOutcome::decode_aper(decoder)?)),
            2 => Ok(NrppaPdu::UnsuccessfulOutcome(UnsuccessfulOutcome::decode_aper(decoder)?)),
            _ => Err(PerError::InvalidChoiceIndex {
                index,
                max: Self::NUM_ALTERNATIVES - 1,
            }),
        }
    }
}

/// InitiatingMessage - Request/indication messages
/// ASN.1: InitiatingMessage ::= SEQUENCE { procedureCode, criticality, nrppatransactionID, value }
#[derive(Debug, Clone, PartialEq)]
pub struct InitiatingMessage {
    pub procedure_code: ProcedureCode,
    pub criticality: Criticality,
    pub transaction_id: NrppaTransactionId,
    pub value: InitiatingMessageValue,
}

/// Value types for InitiatingMessage
#[derive(Debug, Clone, PartialEq)]
pub enum InitiatingMessageValue {
    PositioningDeactivation(PositioningDeactivationIes),
    // Generic container for the procedures this crate does not model typed
    Other(ProtocolIeContainer),
}

impl InitiatingMessage {
    pub fn to_json(&self) -> Value {
        json!({
            "procedureCode": self.procedure_code.0,
            "criticality": self.criticality.as_str(),
            "nrppatransactionID": self.transaction_id.0,
            "value": self.value.to_json(),
        })
    }
}

impl InitiatingMessageValue {
    fn to_json(&self) -> Value {
        match self {
            InitiatingMessageValue::PositioningDeactivation(ies) => json!({
                "PositioningDeactivation": {
                    "abortTransmission": match ies.abort_transmission {
                        super::ies::AbortTransmission::DeactivateSrsResourceSetId(id) => {
                            json!({ "deactivateSRSResourceSetID": id.0 })
                        }
                        super::ies::AbortTransmission::ReleaseAll => json!("releaseALL"),
                    }
                }
            }),
            InitiatingMessageValue::Other(container) => container_to_json(container),
        }
    }
}

impl AperEncode for InitiatingMessage {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        self.procedure_code.encode_aper(encoder)?;
        self.criticality.encode_aper(encoder)?;
        self.transaction_id.encode_aper(encoder)?;

        // Value is encoded as OPEN TYPE (length + aligned content)
        encoder.encode_open_type(|enc| match &self.value {
            InitiatingMessageValue::PositioningDeactivation(ies) => ies.encode_aper(enc),
            InitiatingMessageValue::Other(container) => container.encode_aper(enc),
        })
    }
}

impl AperDecode for InitiatingMessage {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let procedure_code = ProcedureCode::decode_aper(decoder)?;
        let criticality = Criticality::decode_aper(decoder)?;
        let transaction_id = NrppaTransactionId::decode_aper(decoder)?;

        let payload = decoder.decode_open_type_bytes()?;
        let mut value_decoder = AperDecoder::new(&payload);

        let value = match procedure_code {
            ProcedureCode::POSITIONING_DEACTIVATION => {
                InitiatingMessageValue::PositioningDeactivation(
                    PositioningDeactivationIes::decode_aper(&mut value_decoder)?,
                )
            }
            _ => InitiatingMessageValue::Other(ProtocolIeContainer::decode_aper(
                &mut value_decoder,
            )?),
        };

        Ok(InitiatingMessage {
            procedure_code,
            criticality,
            transaction_id,
            value,
        })
    }
}

/// SuccessfulOutcome - Response messages for successful procedures
/// ASN.1: SuccessfulOutcome ::= SEQUENCE { procedureCode, criticality, nrppatransactionID, value }
#[derive(Debug, Clone, PartialEq)]
pub struct SuccessfulOutcome {
    pub procedure_code: ProcedureCode,
    pub criticality: Criticality,
    pub transaction_id: NrppaTransactionId,
    pub value: SuccessfulOutcomeValue,
}

/// Value types for SuccessfulOutcome
#[derive(Debug, Clone, PartialEq)]
pub enum SuccessfulOutcomeValue {
    PositioningActivationResponse(PositioningActivationResponseIes),
    Other(ProtocolIeContainer),
}

impl SuccessfulOutcome {
    pub fn to_json(&self) -> Value {
        json!({
            "procedureCode": self.procedure_code.0,
            "criticality": self.criticality.as_str(),
            "nrppatransactionID": self.transaction_id.0,
            "value": self.value.to_json(),
        })
    }
}

impl SuccessfulOutcomeValue {
    fn to_json(&self) -> Value {
        match self {
            SuccessfulOutcomeValue::PositioningActivationResponse(ies) => {
                let mut fields = serde_json::Map::new();
                if let Some(sfn) = &ies.system_frame_number {
                    fields.insert("systemFrameNumber".into(), json!(sfn.0));
                }
                if let Some(slot) = &ies.slot_number {
                    fields.insert("slotNumber".into(), json!(slot.0));
                }
                if ies.criticality_diagnostics.is_some() {
                    fields.insert("criticalityDiagnostics".into(), json!("present"));
                }
                json!({ "PositioningActivationResponse": Value::Object(fields) })
            }
            SuccessfulOutcomeValue::Other(container) => container_to_json(container),
        }
    }
}

impl AperEncode for SuccessfulOutcome {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        self.procedure_code.encode_aper(encoder)?;
        self.criticality.encode_aper(encoder)?;
        self.transaction_id.encode_aper(encoder)?;

        encoder.encode_open_type(|enc| match &self.value {
            SuccessfulOutcomeValue::PositioningActivationResponse(ies) => ies.encode_aper(enc),
            SuccessfulOutcomeValue::Other(container) => container.encode_aper(enc),
        })
    }
}

impl AperDecode for SuccessfulOutcome {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let procedure_code = ProcedureCode::decode_aper(decoder)?;
        let criticality = Criticality::decode_aper(decoder)?;
        let transaction_id = NrppaTransactionId::decode_aper(decoder)?;

        let payload = decoder.decode_open_type_bytes()?;
        let mut value_decoder = AperDecoder::new(&payload);

        let value = match procedure_code {
            ProcedureCode::POSITIONING_ACTIVATION => {
                SuccessfulOutcomeValue::PositioningActivationResponse(
                    PositioningActivationResponseIes::decode_aper(&mut value_decoder)?,
                )
            }
            _ => SuccessfulOutcomeValue::Other(ProtocolIeContainer::decode_aper(
                &mut value_decoder,
            )?),
        };

        Ok(SuccessfulOutcome {
            procedure_code,
            criticality,
            transaction_id,
            value,
        })
    }
}

/// UnsuccessfulOutcome - Response messages for failed procedures
/// ASN.1: UnsuccessfulOutcome ::= SEQUENCE { procedureCode, criticality, nrppatransactionID, value }
#[derive(Debug, Clone, PartialEq)]
pub struct UnsuccessfulOutcome {
    pub procedure_code: ProcedureCode,
    pub criticality: Criticality,
    pub transaction_id: NrppaTransactionId,
    pub value: UnsuccessfulOutcomeValue,
}

/// Value types for UnsuccessfulOutcome
#[derive(Debug, Clone, PartialEq)]
pub enum UnsuccessfulOutcomeValue {
    Other(ProtocolIeContainer),
}

impl UnsuccessfulOutcome {
    pub fn to_json(&self) -> Value {
        json!({
            "procedureCode": self.procedure_code.0,
            "criticality": self.criticality.as_str(),
            "nrppatransactionID": self.transaction_id.0,
            "value": match &self.value {
                UnsuccessfulOutcomeValue::Other(container) => container_to_json(container),
            },
        })
    }
}

impl AperEncode for UnsuccessfulOutcome {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        self.procedure_code.encode_aper(encoder)?;
        self.criticality.encode_aper(encoder)?;
        self.transaction_id.encode_aper(encoder)?;

        encoder.encode_open_type(|enc| match &self.value {
            UnsuccessfulOutcomeValue::Other(container) => container.encode_aper(enc),
        })
    }
}

impl AperDecode for UnsuccessfulOutcome {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let procedure_code = ProcedureCode::decode_aper(decoder)?;
        let criticality = Criticality::decode_aper(decoder)?;
        let transaction_id = NrppaTransactionId::decode_aper(decoder)?;

        let payload = decoder.decode_open_type_bytes()?;
        let mut value_decoder = AperDecoder::new(&payload);
        let value =
            UnsuccessfulOutcomeValue::Other(ProtocolIeContainer::decode_aper(&mut value_decoder)?);

        Ok(UnsuccessfulOutcome {
            procedure_code,
            criticality,
            transaction_id,
            value,
        })
    }
}

fn container_to_json(container: &ProtocolIeContainer) -> Value {
    Value::Array(
        container
            .ies
            .iter()
            .map(|ie| {
                json!({
                    "id": ie.id.0,
                    "criticality": ie.criticality.as_str(),
                    "valueLength": ie.value.len(),
                })
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nrppa::ies::{AbortTransmission, ProtocolIeField};
    use crate::nrppa::types::ProtocolIeId;

    fn roundtrip(pdu: &NrppaPdu) -> NrppaPdu {
        let mut encoder = AperEncoder::new();
        pdu.encode_aper(&mut encoder).unwrap();
        encoder.align();
        let bytes = encoder.into_bytes();
        let mut decoder = AperDecoder::new(&bytes);
        NrppaPdu::decode_aper(&mut decoder).unwrap()
    }

    #[test]
    fn test_positioning_deactivation_pdu_roundtrip() {
        let pdu = NrppaPdu::InitiatingMessage(InitiatingMessage {
            procedure_code: ProcedureCode::POSITIONING_DEACTIVATION,
            criticality: elementary_procedures::criticality(
                ProcedureCode::POSITIONING_DEACTIVATION,
            )
            .unwrap(),
            transaction_id: NrppaTransactionId(321),
            value: InitiatingMessageValue::PositioningDeactivation(PositioningDeactivationIes {
                abort_transmission: AbortTransmission::ReleaseAll,
            }),
        });

        assert_eq!(pdu, roundtrip(&pdu));
    }

    #[test]
    fn test_positioning_activation_response_pdu_roundtrip() {
        let pdu = NrppaPdu::SuccessfulOutcome(SuccessfulOutcome {
            procedure_code: ProcedureCode::POSITIONING_ACTIVATION,
            criticality: Criticality::Reject,
            transaction_id: NrppaTransactionId(7),
            value: SuccessfulOutcomeValue::PositioningActivationResponse(
                PositioningActivationResponseIes {
                    criticality_diagnostics: None,
                    system_frame_number: Some(crate::nrppa::ies::SystemFrameNumber(512)),
                    slot_number: Some(crate::nrppa::ies::SlotNumber(3)),
                },
            ),
        });

        assert_eq!(pdu, roundtrip(&pdu));
    }

    #[test]
    fn test_unknown_procedure_decodes_raw_container() {
        let mut container = ProtocolIeContainer::new();
        container.push(ProtocolIeField {
            id: ProtocolIeId::CAUSE,
            criticality: Criticality::Ignore,
            value: vec![0x40],
        });
        let pdu = NrppaPdu::InitiatingMessage(InitiatingMessage {
            procedure_code: ProcedureCode::OTDOA_INFORMATION_EXCHANGE,
            criticality: Criticality::Reject,
            transaction_id: NrppaTransactionId(1),
            value: InitiatingMessageValue::Other(container),
        });

        assert_eq!(pdu, roundtrip(&pdu));
    }

    #[test]
    fn test_procedure_code_table() {
        assert!(elementary_procedures::is_procedure_code_valid(
            ProcedureCode::MEASUREMENT
        ));
        assert!(!elementary_procedures::is_procedure_code_valid(ProcedureCode(99)));
        assert_eq!(
            elementary_procedures::criticality(ProcedureCode::MEASUREMENT),
            Some(Criticality::Reject)
        );
        assert_eq!(
            elementary_procedures::criticality(ProcedureCode::POSITIONING_DEACTIVATION),
            Some(Criticality::Ignore)
        );
        assert_eq!(elementary_procedures::criticality(ProcedureCode(99)), None);
    }

    #[test]
    fn test_to_json_field_names() {
        let pdu = NrppaPdu::InitiatingMessage(InitiatingMessage {
            procedure_code: ProcedureCode::POSITIONING_DEACTIVATION,
            criticality: Criticality::Ignore,
            transaction_id: NrppaTransactionId(12),
            value: InitiatingMessageValue::PositioningDeactivation(PositioningDeactivationIes {
                abort_transmission: AbortTransmission::ReleaseAll,
            }),
        });

        let j = pdu.to_json();
        let msg = &j["initiatingMessage"];
        assert_eq!(msg["procedureCode"], 18);
        assert_eq!(msg["criticality"], "ignore");
        assert_eq!(msg["nrppatransactionID"], 12);
        assert_eq!(
            msg["value"]["PositioningDeactivation"]["abortTransmission"],
            "releaseALL"
        );
    }
}
