//! NRPPA Information Elements
//!
//! Protocol IE containers, extension containers, and the IEs used by the
//! positioning procedures modeled in this crate (3GPP TS 38.455).

use crate::per::{
    AperDecode, AperDecoder, AperEncode, AperEncoder, Constraint, PerError, PerResult,
};
use super::types::{Criticality, Presence, ProtocolIeId};

/// ProtocolIE-Field - Single IE with ID, criticality, and open-type value
/// ASN.1: ProtocolIE-Field ::= SEQUENCE { id, criticality, value }
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolIeField {
    pub id: ProtocolIeId,
    pub criticality: Criticality,
    pub value: Vec<u8>, // Raw APER-encoded value
}

impl AperEncode for ProtocolIeField {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        self.id.encode_aper(encoder)?;
        self.criticality.encode_aper(encoder)?;

        // Value is encoded as OPEN TYPE
        encoder.encode_length_determinant(self.value.len())?;
        encoder.write_bytes(&self.value);

        Ok(())
    }
}

impl AperDecode for ProtocolIeField {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let id = ProtocolIeId::decode_aper(decoder)?;
        let criticality = Criticality::decode_aper(decoder)?;
        let value = decoder.decode_open_type_bytes()?;

        Ok(ProtocolIeField { id, criticality, value })
    }
}

/// ProtocolIE-Container - Sequence of IEs
/// ASN.1: ProtocolIE-Container ::= SEQUENCE (SIZE (0..maxProtocolIEs)) OF ProtocolIE-Field
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProtocolIeContainer {
    pub ies: Vec<ProtocolIeField>,
}

impl ProtocolIeContainer {
    // maxProtocolIEs = 65535
    pub const MAX_PROTOCOL_IES: usize = 65535;

    pub fn new() -> Self {
        Self { ies: Vec::new() }
    }

    pub fn push(&mut self, ie: ProtocolIeField) {
        self.ies.push(ie);
    }

    pub fn len(&self) -> usize {
        self.ies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ies.is_empty()
    }

    /// Find an IE by ID
    pub fn find(&self, id: ProtocolIeId) -> Option<&ProtocolIeField> {
        self.ies.iter().find(|ie| ie.id == id)
    }

    /// Find an IE by ID (mutable)
    pub fn find_mut(&mut self, id: ProtocolIeId) -> Option<&mut ProtocolIeField> {
        self.ies.iter_mut().find(|ie| ie.id == id)
    }
}

impl AperEncode for ProtocolIeContainer {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_seq_of(&self.ies, 0, Self::MAX_PROTOCOL_IES, |enc, ie| {
            ie.encode_aper(enc)
        })
    }
}

impl AperDecode for ProtocolIeContainer {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let ies = decoder.decode_seq_of(0, Self::MAX_PROTOCOL_IES, ProtocolIeField::decode_aper)?;
        Ok(ProtocolIeContainer { ies })
    }
}

/// ProtocolExtensionField - Single extension with ID, criticality, and value
/// ASN.1: ProtocolExtensionField ::= SEQUENCE { id, criticality, extensionValue }
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolExtensionField {
    pub id: ProtocolIeId,
    pub criticality: Criticality,
    pub value: Vec<u8>, // Raw APER-encoded extension value
}

impl AperEncode for ProtocolExtensionField {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        self.id.encode_aper(encoder)?;
        self.criticality.encode_aper(encoder)?;
        encoder.encode_length_determinant(self.value.len())?;
        encoder.write_bytes(&self.value);
        Ok(())
    }
}

impl AperDecode for ProtocolExtensionField {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let id = ProtocolIeId::decode_aper(decoder)?;
        let criticality = Criticality::decode_aper(decoder)?;
        let value = decoder.decode_open_type_bytes()?;
        Ok(ProtocolExtensionField { id, criticality, value })
    }
}

/// ProtocolExtensionContainer - Sequence of extensions
/// ASN.1: ProtocolExtensionContainer ::= SEQUENCE (SIZE (1..maxProtocolExtensions)) OF ProtocolExtensionField
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProtocolExtensionContainer {
    pub extensions: Vec<ProtocolExtensionField>,
}

impl ProtocolExtensionContainer {
    // maxProtocolExtensions = 65535
    pub const MAX_PROTOCOL_EXTENSIONS: usize = 65535;

    pub fn new() -> Self {
        Self { extensions: Vec::new() }
    }

    pub fn push(&mut self, ext: ProtocolExtensionField) {
        self.extensions.push(ext);
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn find(&self, id: ProtocolIeId) -> Option<&ProtocolExtensionField> {
        self.extensions.iter().find(|ext| ext.id == id)
    }
}

impl AperEncode for ProtocolExtensionContainer {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_seq_of(&self.extensions, 1, Self::MAX_PROTOCOL_EXTENSIONS, |enc, ext| {
            ext.encode_aper(enc)
        })
    }
}

impl AperDecode for ProtocolExtensionContainer {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let extensions = decoder.decode_seq_of(
            1,
            Self::MAX_PROTOCOL_EXTENSIONS,
            ProtocolExtensionField::decode_aper,
        )?;
        Ok(ProtocolExtensionContainer { extensions })
    }
}

/// Measurement-ID - identifies a measurement session
/// ASN.1: Measurement-ID ::= INTEGER (1..65536, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeasurementId(pub u32);

impl MeasurementId {
    pub const CONSTRAINT: Constraint = Constraint::extensible(1, 65536);
}

impl AperEncode for MeasurementId {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_constrained_integer(self.0 as i64, &Self::CONSTRAINT)
    }
}

impl AperDecode for MeasurementId {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let value = decoder.decode_constrained_integer(&Self::CONSTRAINT)?;
        Ok(MeasurementId(value as u32))
    }
}

/// TRP-ID - identifies a transmission-reception point
/// ASN.1: TRP-ID ::= INTEGER (1..maxnoTRPs, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrpId(pub u16);

impl TrpId {
    // maxnoTRPs = 65535
    pub const CONSTRAINT: Constraint = Constraint::extensible(1, 65535);
}

impl AperEncode for TrpId {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_constrained_integer(self.0 as i64, &Self::CONSTRAINT)
    }
}

impl AperDecode for TrpId {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let value = decoder.decode_constrained_integer(&Self::CONSTRAINT)?;
        Ok(TrpId(value as u16))
    }
}

/// SRSResourceSetID
/// ASN.1: SRSResourceSetID ::= INTEGER (0..15, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SrsResourceSetId(pub u8);

impl SrsResourceSetId {
    pub const CONSTRAINT: Constraint = Constraint::extensible(0, 15);
}

impl AperEncode for SrsResourceSetId {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_constrained_integer(self.0 as i64, &Self::CONSTRAINT)
    }
}

impl AperDecode for SrsResourceSetId {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let value = decoder.decode_constrained_integer(&Self::CONSTRAINT)?;
        Ok(SrsResourceSetId(value as u8))
    }
}

/// SRSPosResourceID
/// ASN.1: SRSPosResourceID ::= INTEGER (0..63)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SrsPosResourceId(pub u8);

impl SrsPosResourceId {
    pub const CONSTRAINT: Constraint = Constraint::new(0, 63);
}

impl AperEncode for SrsPosResourceId {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_constrained_whole_number(self.0 as i64, &Self::CONSTRAINT)
    }
}

impl AperDecode for SrsPosResourceId {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let value = decoder.decode_constrained_whole_number(&Self::CONSTRAINT)?;
        Ok(SrsPosResourceId(value as u8))
    }
}

/// AbortTransmission - stops an ongoing SRS transmission
/// ASN.1: AbortTransmission ::= CHOICE { deactivateSRSResourceSetID, releaseALL, choice-extension }
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbortTransmission {
    DeactivateSrsResourceSetId(SrsResourceSetId),
    ReleaseAll,
}

impl AbortTransmission {
    // deactivateSRSResourceSetID, releaseALL, choice-extension
    pub const NUM_ALTERNATIVES: usize = 3;
}

impl AperEncode for AbortTransmission {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        match self {
            AbortTransmission::DeactivateSrsResourceSetId(id) => {
                encoder.encode_choice_index(0, Self::NUM_ALTERNATIVES, false)?;
                id.encode_aper(encoder)
            }
            AbortTransmission::ReleaseAll => {
                // releaseALL carries a NULL body: no bits beyond the index
                encoder.encode_choice_index(1, Self::NUM_ALTERNATIVES, false)
            }
        }
    }
}

impl AperDecode for AbortTransmission {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let index = decoder.decode_choice_index(Self::NUM_ALTERNATIVES, false)?;
        match index {
            0 => Ok(AbortTransmission::DeactivateSrsResourceSetId(
                SrsResourceSetId::decode_aper(decoder)?,
            )),
            1 => Ok(AbortTransmission::ReleaseAll),
            2 => Err(PerError::DecodeError(
                "AbortTransmission choice-extension is not supported".into(),
            )),
            _ => Err(PerError::InvalidChoiceIndex {
                index,
                max: Self::NUM_ALTERNATIVES - 1,
            }),
        }
    }
}

/// Subcarrier spacing of an SCS-specific carrier
/// ASN.1: ENUMERATED { kHz15, kHz30, kHz60, kHz120, ..., kHz480, kHz960 }
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SubcarrierSpacing {
    KHz15 = 0,
    KHz30 = 1,
    KHz60 = 2,
    KHz120 = 3,
    // Extension values
    KHz480 = 4,
    KHz960 = 5,
}

impl SubcarrierSpacing {
    // Root enumeration has 4 values (0-3), kHz480/kHz960 are extensions
    pub const CONSTRAINT: Constraint = Constraint::extensible(0, 3);

    pub fn khz(&self) -> u32 {
        match self {
            SubcarrierSpacing::KHz15 => 15,
            SubcarrierSpacing::KHz30 => 30,
            SubcarrierSpacing::KHz60 => 60,
            SubcarrierSpacing::KHz120 => 120,
            SubcarrierSpacing::KHz480 => 480,
            SubcarrierSpacing::KHz960 => 960,
        }
    }
}

impl AperEncode for SubcarrierSpacing {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_enumerated(*self as i64, &Self::CONSTRAINT)
    }
}

impl AperDecode for SubcarrierSpacing {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let value = decoder.decode_enumerated(&Self::CONSTRAINT)?;
        match value {
            0 => Ok(SubcarrierSpacing::KHz15),
            1 => Ok(SubcarrierSpacing::KHz30),
            2 => Ok(SubcarrierSpacing::KHz60),
            3 => Ok(SubcarrierSpacing::KHz120),
            4 => Ok(SubcarrierSpacing::KHz480),
            5 => Ok(SubcarrierSpacing::KHz960),
            _ => Err(PerError::DecodeError(format!(
                "Unknown SubcarrierSpacing value: {value}"
            ))),
        }
    }
}

/// SCS-SpecificCarrier - carrier described at one subcarrier spacing
/// ASN.1: SCS-SpecificCarrier ::= SEQUENCE { offsetToCarrier, subcarrierSpacing, carrierBandwidth, ... }
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScsSpecificCarrier {
    pub offset_to_carrier: u16,
    pub subcarrier_spacing: SubcarrierSpacing,
    pub carrier_bandwidth: u16,
}

impl ScsSpecificCarrier {
    pub const OFFSET_TO_CARRIER_CONSTRAINT: Constraint = Constraint::new(0, 2199);
    // maxNrofPhysicalResourceBlocks = 275
    pub const CARRIER_BANDWIDTH_CONSTRAINT: Constraint = Constraint::new(1, 275);
}

impl AperEncode for ScsSpecificCarrier {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_sequence_preamble(false, &[]);
        encoder.encode_constrained_whole_number(
            self.offset_to_carrier as i64,
            &Self::OFFSET_TO_CARRIER_CONSTRAINT,
        )?;
        self.subcarrier_spacing.encode_aper(encoder)?;
        encoder.encode_constrained_whole_number(
            self.carrier_bandwidth as i64,
            &Self::CARRIER_BANDWIDTH_CONSTRAINT,
        )?;
        Ok(())
    }
}

impl AperDecode for ScsSpecificCarrier {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let (_ext, _) = decoder.decode_sequence_preamble(0)?;
        let offset_to_carrier =
            decoder.decode_constrained_whole_number(&Self::OFFSET_TO_CARRIER_CONSTRAINT)? as u16;
        let subcarrier_spacing = SubcarrierSpacing::decode_aper(decoder)?;
        let carrier_bandwidth =
            decoder.decode_constrained_whole_number(&Self::CARRIER_BANDWIDTH_CONSTRAINT)? as u16;
        Ok(ScsSpecificCarrier {
            offset_to_carrier,
            subcarrier_spacing,
            carrier_bandwidth,
        })
    }
}

/// PointA - absolute frequency reference (ARFCN)
/// ASN.1: PointA ::= INTEGER (0..3279165)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointA(pub u32);

impl PointA {
    pub const CONSTRAINT: Constraint = Constraint::new(0, 3279165);
}

impl AperEncode for PointA {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_constrained_whole_number(self.0 as i64, &Self::CONSTRAINT)
    }
}

impl AperDecode for PointA {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let value = decoder.decode_constrained_whole_number(&Self::CONSTRAINT)?;
        Ok(PointA(value as u32))
    }
}

/// SystemFrameNumber
/// ASN.1: SystemFrameNumber ::= INTEGER (0..1023)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SystemFrameNumber(pub u16);

impl SystemFrameNumber {
    pub const CONSTRAINT: Constraint = Constraint::new(0, 1023);
}

impl AperEncode for SystemFrameNumber {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_constrained_whole_number(self.0 as i64, &Self::CONSTRAINT)
    }
}

impl AperDecode for SystemFrameNumber {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let value = decoder.decode_constrained_whole_number(&Self::CONSTRAINT)?;
        Ok(SystemFrameNumber(value as u16))
    }
}

/// SlotNumber
/// ASN.1: SlotNumber ::= INTEGER (0..79)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotNumber(pub u8);

impl SlotNumber {
    pub const CONSTRAINT: Constraint = Constraint::new(0, 79);
}

impl AperEncode for SlotNumber {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_constrained_whole_number(self.0 as i64, &Self::CONSTRAINT)
    }
}

impl AperDecode for SlotNumber {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let value = decoder.decode_constrained_whole_number(&Self::CONSTRAINT)?;
        Ok(SlotNumber(value as u8))
    }
}

/// TypeOfError - why an IE was reported in criticality diagnostics
/// ASN.1: TypeOfError ::= ENUMERATED { not-understood, missing, ... }
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeOfError {
    NotUnderstood = 0,
    Missing = 1,
}

impl TypeOfError {
    pub const CONSTRAINT: Constraint = Constraint::extensible(0, 1);
}

impl AperEncode for TypeOfError {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_enumerated(*self as i64, &Self::CONSTRAINT)
    }
}

impl AperDecode for TypeOfError {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let value = decoder.decode_enumerated(&Self::CONSTRAINT)?;
        match value {
            0 => Ok(TypeOfError::NotUnderstood),
            1 => Ok(TypeOfError::Missing),
            _ => Err(PerError::DecodeError(format!(
                "Unknown TypeOfError value: {value}"
            ))),
        }
    }
}

/// One entry of CriticalityDiagnostics-IE-List
/// ASN.1: SEQUENCE { iECriticality, iE-ID, typeOfError, ... }
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CriticalityDiagnosticsIeItem {
    pub ie_criticality: Criticality,
    pub ie_id: ProtocolIeId,
    pub type_of_error: TypeOfError,
}

impl AperEncode for CriticalityDiagnosticsIeItem {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_sequence_preamble(false, &[]);
        self.ie_criticality.encode_aper(encoder)?;
        self.ie_id.encode_aper(encoder)?;
        self.type_of_error.encode_aper(encoder)
    }
}

impl AperDecode for CriticalityDiagnosticsIeItem {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let (_ext, _) = decoder.decode_sequence_preamble(0)?;
        let ie_criticality = Criticality::decode_aper(decoder)?;
        let ie_id = ProtocolIeId::decode_aper(decoder)?;
        let type_of_error = TypeOfError::decode_aper(decoder)?;
        Ok(CriticalityDiagnosticsIeItem {
            ie_criticality,
            ie_id,
            type_of_error,
        })
    }
}

/// CriticalityDiagnostics - reported back on procedure errors
/// ASN.1: CriticalityDiagnostics ::= SEQUENCE { procedureCode OPTIONAL, triggeringMessage OPTIONAL,
/// procedureCriticality OPTIONAL, nrppatransactionID OPTIONAL, iEsCriticalityDiagnostics OPTIONAL,
/// iE-Extensions OPTIONAL, ... }
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CriticalityDiagnostics {
    pub procedure_code: Option<super::types::ProcedureCode>,
    pub triggering_message: Option<super::types::TriggeringMessage>,
    pub procedure_criticality: Option<Criticality>,
    pub transaction_id: Option<super::types::NrppaTransactionId>,
    pub ies_criticality_diagnostics: Vec<CriticalityDiagnosticsIeItem>,
    pub ie_exts: Option<ProtocolExtensionContainer>,
}

impl CriticalityDiagnostics {
    // CriticalityDiagnostics-IE-List ::= SEQUENCE (SIZE (1..maxNrOfErrors)) OF ...
    pub const MAX_NR_OF_ERRORS: usize = 256;
}

impl AperEncode for CriticalityDiagnostics {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_sequence_preamble(
            false,
            &[
                self.procedure_code.is_some(),
                self.triggering_message.is_some(),
                self.procedure_criticality.is_some(),
                self.transaction_id.is_some(),
                !self.ies_criticality_diagnostics.is_empty(),
                self.ie_exts.is_some(),
            ],
        );
        if let Some(code) = &self.procedure_code {
            code.encode_aper(encoder)?;
        }
        if let Some(msg) = &self.triggering_message {
            msg.encode_aper(encoder)?;
        }
        if let Some(crit) = &self.procedure_criticality {
            crit.encode_aper(encoder)?;
        }
        if let Some(id) = &self.transaction_id {
            id.encode_aper(encoder)?;
        }
        if !self.ies_criticality_diagnostics.is_empty() {
            encoder.encode_seq_of(
                &self.ies_criticality_diagnostics,
                1,
                Self::MAX_NR_OF_ERRORS,
                |enc, item| item.encode_aper(enc),
            )?;
        }
        if let Some(exts) = &self.ie_exts {
            exts.encode_aper(encoder)?;
        }
        Ok(())
    }
}

impl AperDecode for CriticalityDiagnostics {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let (_ext, present) = decoder.decode_sequence_preamble(6)?;
        let procedure_code = if present[0] {
            Some(super::types::ProcedureCode::decode_aper(decoder)?)
        } else {
            None
        };
        let triggering_message = if present[1] {
            Some(super::types::TriggeringMessage::decode_aper(decoder)?)
        } else {
            None
        };
        let procedure_criticality = if present[2] {
            Some(Criticality::decode_aper(decoder)?)
        } else {
            None
        };
        let transaction_id = if present[3] {
            Some(super::types::NrppaTransactionId::decode_aper(decoder)?)
        } else {
            None
        };
        let ies_criticality_diagnostics = if present[4] {
            decoder.decode_seq_of(
                1,
                Self::MAX_NR_OF_ERRORS,
                CriticalityDiagnosticsIeItem::decode_aper,
            )?
        } else {
            Vec::new()
        };
        let ie_exts = if present[5] {
            Some(ProtocolExtensionContainer::decode_aper(decoder)?)
        } else {
            None
        };
        Ok(CriticalityDiagnostics {
            procedure_code,
            triggering_message,
            procedure_criticality,
            transaction_id,
            ies_criticality_diagnostics,
            ie_exts,
        })
    }
}

/// Object set for AggregatedPosSRSResourceID-Item extensions.
///
/// Both extensions are mandatory: a decoded container missing either id
/// fails with `MissingMandatoryIe`.
pub mod aggregated_pos_srs_resource_id_item_ext_ies {
    use super::{Criticality, Presence, ProtocolIeId};

    pub const IDS: [ProtocolIeId; 2] = [ProtocolIeId::POINT_A, ProtocolIeId::SCS_SPECIFIC_CARRIER];

    pub fn is_id_valid(id: ProtocolIeId) -> bool {
        IDS.contains(&id)
    }

    pub fn criticality(id: ProtocolIeId) -> Option<Criticality> {
        match id {
            ProtocolIeId::POINT_A => Some(Criticality::Reject),
            ProtocolIeId::SCS_SPECIFIC_CARRIER => Some(Criticality::Reject),
            _ => None,
        }
    }

    pub fn presence(id: ProtocolIeId) -> Option<Presence> {
        match id {
            ProtocolIeId::POINT_A => Some(Presence::Mandatory),
            ProtocolIeId::SCS_SPECIFIC_CARRIER => Some(Presence::Mandatory),
            _ => None,
        }
    }
}

/// Decoded extensions of AggregatedPosSRSResourceID-Item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AggregatedPosSrsResourceIdItemExtensions {
    pub point_a: PointA,
    pub scs_specific_carrier: ScsSpecificCarrier,
}

impl AperEncode for AggregatedPosSrsResourceIdItemExtensions {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        let ids = aggregated_pos_srs_resource_id_item_ext_ies::IDS;
        encoder.encode_constrained_length(ids.len(), 1, ProtocolExtensionContainer::MAX_PROTOCOL_EXTENSIONS)?;

        ProtocolIeId::POINT_A.encode_aper(encoder)?;
        Criticality::Reject.encode_aper(encoder)?;
        encoder.encode_open_type(|enc| self.point_a.encode_aper(enc))?;

        ProtocolIeId::SCS_SPECIFIC_CARRIER.encode_aper(encoder)?;
        Criticality::Reject.encode_aper(encoder)?;
        encoder.encode_open_type(|enc| self.scs_specific_carrier.encode_aper(enc))?;

        Ok(())
    }
}

impl AperDecode for AggregatedPosSrsResourceIdItemExtensions {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let count = decoder.decode_constrained_length(
            1,
            ProtocolExtensionContainer::MAX_PROTOCOL_EXTENSIONS,
        )?;

        let mut point_a = None;
        let mut scs_specific_carrier = None;
        let mut nof_mandatory = aggregated_pos_srs_resource_id_item_ext_ies::IDS.len();

        for _ in 0..count {
            let id = ProtocolIeId::decode_aper(decoder)?;
            let _criticality = Criticality::decode_aper(decoder)?;
            let payload = decoder.decode_open_type_bytes()?;
            let mut inner = AperDecoder::new(&payload);
            match id {
                ProtocolIeId::POINT_A => {
                    if point_a.is_none() {
                        nof_mandatory -= 1;
                    }
                    point_a = Some(PointA::decode_aper(&mut inner)?);
                }
                ProtocolIeId::SCS_SPECIFIC_CARRIER => {
                    if scs_specific_carrier.is_none() {
                        nof_mandatory -= 1;
                    }
                    scs_specific_carrier = Some(ScsSpecificCarrier::decode_aper(&mut inner)?);
                }
                _ => {
                    log::error!("The id={} is not recognized", id.0);
                    return Err(PerError::UnknownIeId { id: id.0 as u32 });
                }
            }
        }

        if nof_mandatory != 0 {
            log::error!("Mandatory fields are missing");
            let missing = if point_a.is_none() {
                ProtocolIeId::POINT_A
            } else {
                ProtocolIeId::SCS_SPECIFIC_CARRIER
            };
            return Err(PerError::MissingMandatoryIe { id: missing.0 as u32 });
        }

        Ok(AggregatedPosSrsResourceIdItemExtensions {
            point_a: point_a.unwrap(),
            scs_specific_carrier: scs_specific_carrier.unwrap(),
        })
    }
}

/// AggregatedPosSRSResourceID-Item - member of an SRS aggregation list
/// ASN.1: SEQUENCE { sRSPosResource-ID, iE-Extensions, ... }
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AggregatedPosSrsResourceIdItem {
    pub srs_pos_resource_id: SrsPosResourceId,
    pub ie_exts: AggregatedPosSrsResourceIdItemExtensions,
}

impl AperEncode for AggregatedPosSrsResourceIdItem {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        // iE-Extensions is OPTIONAL in the syntax but carries mandatory
        // entries, so it is always present on the wire.
        encoder.encode_sequence_preamble(false, &[true]);
        self.srs_pos_resource_id.encode_aper(encoder)?;
        self.ie_exts.encode_aper(encoder)
    }
}

impl AperDecode for AggregatedPosSrsResourceIdItem {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let (_ext, present) = decoder.decode_sequence_preamble(1)?;
        let srs_pos_resource_id = SrsPosResourceId::decode_aper(decoder)?;
        if !present[0] {
            log::error!("Mandatory fields are missing");
            return Err(PerError::MissingMandatoryIe {
                id: ProtocolIeId::POINT_A.0 as u32,
            });
        }
        let ie_exts = AggregatedPosSrsResourceIdItemExtensions::decode_aper(decoder)?;
        Ok(AggregatedPosSrsResourceIdItem {
            srs_pos_resource_id,
            ie_exts,
        })
    }
}

/// Object set for PositioningDeactivation IEs
pub mod positioning_deactivation_ies {
    use super::{Criticality, Presence, ProtocolIeId};

    pub const IDS: [ProtocolIeId; 1] = [ProtocolIeId::ABORT_TRANSMISSION];

    pub fn is_id_valid(id: ProtocolIeId) -> bool {
        IDS.contains(&id)
    }

    pub fn criticality(id: ProtocolIeId) -> Option<Criticality> {
        match id {
            ProtocolIeId::ABORT_TRANSMISSION => Some(Criticality::Ignore),
            _ => None,
        }
    }

    pub fn presence(id: ProtocolIeId) -> Option<Presence> {
        match id {
            ProtocolIeId::ABORT_TRANSMISSION => Some(Presence::Mandatory),
            _ => None,
        }
    }
}

/// Decoded IEs of a PositioningDeactivation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositioningDeactivationIes {
    pub abort_transmission: AbortTransmission,
}

impl AperEncode for PositioningDeactivationIes {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        encoder.encode_constrained_length(1, 0, ProtocolIeContainer::MAX_PROTOCOL_IES)?;
        ProtocolIeId::ABORT_TRANSMISSION.encode_aper(encoder)?;
        Criticality::Ignore.encode_aper(encoder)?;
        encoder.encode_open_type(|enc| self.abort_transmission.encode_aper(enc))
    }
}

impl AperDecode for PositioningDeactivationIes {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let count = decoder.decode_constrained_length(0, ProtocolIeContainer::MAX_PROTOCOL_IES)?;

        let mut abort_transmission = None;
        let mut nof_mandatory = positioning_deactivation_ies::IDS.len();

        for _ in 0..count {
            let id = ProtocolIeId::decode_aper(decoder)?;
            let _criticality = Criticality::decode_aper(decoder)?;
            let payload = decoder.decode_open_type_bytes()?;
            let mut inner = AperDecoder::new(&payload);
            match id {
                ProtocolIeId::ABORT_TRANSMISSION => {
                    if abort_transmission.is_none() {
                        nof_mandatory -= 1;
                    }
                    abort_transmission = Some(AbortTransmission::decode_aper(&mut inner)?);
                }
                _ => {
                    log::error!("The id={} is not recognized", id.0);
                    return Err(PerError::UnknownIeId { id: id.0 as u32 });
                }
            }
        }

        if nof_mandatory != 0 {
            log::error!("Mandatory fields are missing");
            return Err(PerError::MissingMandatoryIe {
                id: ProtocolIeId::ABORT_TRANSMISSION.0 as u32,
            });
        }

        Ok(PositioningDeactivationIes {
            abort_transmission: abort_transmission.unwrap(),
        })
    }
}

/// Object set for PositioningActivationResponse IEs
pub mod positioning_activation_response_ies {
    use super::{Criticality, Presence, ProtocolIeId};

    pub const IDS: [ProtocolIeId; 3] = [
        ProtocolIeId::CRITICALITY_DIAGNOSTICS,
        ProtocolIeId::SYSTEM_FRAME_NUMBER,
        ProtocolIeId::SLOT_NUMBER,
    ];

    pub fn is_id_valid(id: ProtocolIeId) -> bool {
        IDS.contains(&id)
    }

    pub fn criticality(id: ProtocolIeId) -> Option<Criticality> {
        match id {
            ProtocolIeId::CRITICALITY_DIAGNOSTICS => Some(Criticality::Ignore),
            ProtocolIeId::SYSTEM_FRAME_NUMBER => Some(Criticality::Ignore),
            ProtocolIeId::SLOT_NUMBER => Some(Criticality::Ignore),
            _ => None,
        }
    }

    pub fn presence(id: ProtocolIeId) -> Option<Presence> {
        match id {
            ProtocolIeId::CRITICALITY_DIAGNOSTICS => Some(Presence::Optional),
            ProtocolIeId::SYSTEM_FRAME_NUMBER => Some(Presence::Optional),
            ProtocolIeId::SLOT_NUMBER => Some(Presence::Optional),
            _ => None,
        }
    }
}

/// Decoded IEs of a PositioningActivationResponse message
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PositioningActivationResponseIes {
    pub criticality_diagnostics: Option<CriticalityDiagnostics>,
    pub system_frame_number: Option<SystemFrameNumber>,
    pub slot_number: Option<SlotNumber>,
}

impl AperEncode for PositioningActivationResponseIes {
    fn encode_aper(&self, encoder: &mut AperEncoder) -> PerResult<()> {
        let count = usize::from(self.criticality_diagnostics.is_some())
            + usize::from(self.system_frame_number.is_some())
            + usize::from(self.slot_number.is_some());
        encoder.encode_constrained_length(count, 0, ProtocolIeContainer::MAX_PROTOCOL_IES)?;

        if let Some(diag) = &self.criticality_diagnostics {
            ProtocolIeId::CRITICALITY_DIAGNOSTICS.encode_aper(encoder)?;
            Criticality::Ignore.encode_aper(encoder)?;
            encoder.encode_open_type(|enc| diag.encode_aper(enc))?;
        }
        if let Some(sfn) = &self.system_frame_number {
            ProtocolIeId::SYSTEM_FRAME_NUMBER.encode_aper(encoder)?;
            Criticality::Ignore.encode_aper(encoder)?;
            encoder.encode_open_type(|enc| sfn.encode_aper(enc))?;
        }
        if let Some(slot) = &self.slot_number {
            ProtocolIeId::SLOT_NUMBER.encode_aper(encoder)?;
            Criticality::Ignore.encode_aper(encoder)?;
            encoder.encode_open_type(|enc| slot.encode_aper(enc))?;
        }
        Ok(())
    }
}

impl AperDecode for PositioningActivationResponseIes {
    fn decode_aper(decoder: &mut AperDecoder) -> PerResult<Self> {
        let count = decoder.decode_constrained_length(0, ProtocolIeContainer::MAX_PROTOCOL_IES)?;

        let mut ies = PositioningActivationResponseIes::default();
        for _ in 0..count {
            let id = ProtocolIeId::decode_aper(decoder)?;
            let _criticality = Criticality::decode_aper(decoder)?;
            let payload = decoder.decode_open_type_bytes()?;
            let mut inner = AperDecoder::new(&payload);
            match id {
                ProtocolIeId::CRITICALITY_DIAGNOSTICS => {
                    ies.criticality_diagnostics =
                        Some(CriticalityDiagnostics::decode_aper(&mut inner)?);
                }
                ProtocolIeId::SYSTEM_FRAME_NUMBER => {
                    ies.system_frame_number = Some(SystemFrameNumber::decode_aper(&mut inner)?);
                }
                ProtocolIeId::SLOT_NUMBER => {
                    ies.slot_number = Some(SlotNumber::decode_aper(&mut inner)?);
                }
                _ => {
                    log::error!("The id={} is not recognized", id.0);
                    return Err(PerError::UnknownIeId { id: id.0 as u32 });
                }
            }
        }
        Ok(ies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::per::{AperDecoder, AperEncoder};

    fn roundtrip<T: AperEncode + AperDecode + PartialEq + std::fmt::Debug>(value: &T) -> T {
        let mut encoder = AperEncoder::new();
        value.encode_aper(&mut encoder).unwrap();
        encoder.align();
        let bytes = encoder.into_bytes();
        let mut decoder = AperDecoder::new(&bytes);
        T::decode_aper(&mut decoder).unwrap()
    }

    #[test]
    fn test_protocol_ie_container_roundtrip() {
        let mut container = ProtocolIeContainer::new();
        container.push(ProtocolIeField {
            id: ProtocolIeId::CAUSE,
            criticality: Criticality::Reject,
            value: vec![0x00, 0x01, 0x02, 0x03],
        });
        container.push(ProtocolIeField {
            id: ProtocolIeId::CRITICALITY_DIAGNOSTICS,
            criticality: Criticality::Ignore,
            value: vec![0xDE, 0xAD, 0xBE, 0xEF],
        });

        let decoded = roundtrip(&container);
        assert_eq!(container, decoded);
        assert_eq!(decoded.find(ProtocolIeId::CAUSE).unwrap().value, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_scs_specific_carrier_max_values_roundtrip() {
        let carrier = ScsSpecificCarrier {
            offset_to_carrier: 2199,
            subcarrier_spacing: SubcarrierSpacing::KHz960,
            carrier_bandwidth: 275,
        };
        assert_eq!(carrier, roundtrip(&carrier));
    }

    #[test]
    fn test_scs_specific_carrier_offset_out_of_range() {
        let carrier = ScsSpecificCarrier {
            offset_to_carrier: 2200,
            subcarrier_spacing: SubcarrierSpacing::KHz15,
            carrier_bandwidth: 1,
        };
        let mut encoder = AperEncoder::new();
        let err = carrier.encode_aper(&mut encoder).unwrap_err();
        assert!(matches!(err, PerError::ConstraintViolation { value: 2200, .. }));

        // 2200 on the wire: the offset field is an aligned 16-bit field
        // (range 2200), followed by a valid remainder
        let mut encoder = AperEncoder::new();
        encoder.encode_sequence_preamble(false, &[]);
        encoder.align();
        encoder.write_bits(2200, 16);
        SubcarrierSpacing::KHz15.encode_aper(&mut encoder).unwrap();
        encoder
            .encode_constrained_whole_number(1, &ScsSpecificCarrier::CARRIER_BANDWIDTH_CONSTRAINT)
            .unwrap();
        encoder.align();
        let bytes = encoder.into_bytes();
        let mut decoder = AperDecoder::new(&bytes);
        let err = ScsSpecificCarrier::decode_aper(&mut decoder).unwrap_err();
        assert!(matches!(err, PerError::ConstraintViolation { value: 2200, .. }));
    }

    #[test]
    fn test_abort_transmission_release_all_roundtrip() {
        let abort = AbortTransmission::ReleaseAll;
        let decoded = roundtrip(&abort);
        assert_eq!(abort, decoded);
        // The decoded value carries no SRS resource set storage
        assert!(!matches!(
            decoded,
            AbortTransmission::DeactivateSrsResourceSetId(_)
        ));
    }

    #[test]
    fn test_abort_transmission_deactivate_roundtrip() {
        let abort = AbortTransmission::DeactivateSrsResourceSetId(SrsResourceSetId(15));
        assert_eq!(abort, roundtrip(&abort));
    }

    #[test]
    fn test_aggregated_item_extensions_roundtrip() {
        let item = AggregatedPosSrsResourceIdItem {
            srs_pos_resource_id: SrsPosResourceId(63),
            ie_exts: AggregatedPosSrsResourceIdItemExtensions {
                point_a: PointA(3279165),
                scs_specific_carrier: ScsSpecificCarrier {
                    offset_to_carrier: 0,
                    subcarrier_spacing: SubcarrierSpacing::KHz30,
                    carrier_bandwidth: 106,
                },
            },
        };
        assert_eq!(item, roundtrip(&item));
    }

    #[test]
    fn test_aggregated_item_missing_mandatory_extension() {
        // A container with only PointA (id 154): SCS-SpecificCarrier missing
        let mut encoder = AperEncoder::new();
        encoder
            .encode_constrained_length(1, 1, ProtocolExtensionContainer::MAX_PROTOCOL_EXTENSIONS)
            .unwrap();
        ProtocolIeId::POINT_A.encode_aper(&mut encoder).unwrap();
        Criticality::Reject.encode_aper(&mut encoder).unwrap();
        encoder
            .encode_open_type(|enc| PointA(12).encode_aper(enc))
            .unwrap();
        encoder.align();
        let bytes = encoder.into_bytes();
        let mut decoder = AperDecoder::new(&bytes);
        let err = AggregatedPosSrsResourceIdItemExtensions::decode_aper(&mut decoder).unwrap_err();
        assert!(matches!(err, PerError::MissingMandatoryIe { id: 156 }));
    }

    #[test]
    fn test_aggregated_item_unknown_extension_id() {
        let mut encoder = AperEncoder::new();
        encoder
            .encode_constrained_length(1, 1, ProtocolExtensionContainer::MAX_PROTOCOL_EXTENSIONS)
            .unwrap();
        ProtocolIeId(9999).encode_aper(&mut encoder).unwrap();
        Criticality::Reject.encode_aper(&mut encoder).unwrap();
        encoder.encode_open_type(|enc| {
            enc.write_bytes(&[0u8]);
            Ok(())
        }).unwrap();
        encoder.align();
        let bytes = encoder.into_bytes();
        let mut decoder = AperDecoder::new(&bytes);
        let err = AggregatedPosSrsResourceIdItemExtensions::decode_aper(&mut decoder).unwrap_err();
        assert!(matches!(err, PerError::UnknownIeId { id: 9999 }));
    }

    #[test]
    fn test_positioning_deactivation_ies_roundtrip() {
        let ies = PositioningDeactivationIes {
            abort_transmission: AbortTransmission::ReleaseAll,
        };
        assert_eq!(ies, roundtrip(&ies));
    }

    #[test]
    fn test_positioning_deactivation_missing_mandatory() {
        // Empty container: AbortTransmission missing
        let mut encoder = AperEncoder::new();
        encoder
            .encode_constrained_length(0, 0, ProtocolIeContainer::MAX_PROTOCOL_IES)
            .unwrap();
        encoder.align();
        let bytes = encoder.into_bytes();
        let mut decoder = AperDecoder::new(&bytes);
        let err = PositioningDeactivationIes::decode_aper(&mut decoder).unwrap_err();
        assert!(matches!(err, PerError::MissingMandatoryIe { id: 44 }));
    }

    #[test]
    fn test_positioning_activation_response_all_optional() {
        let empty = PositioningActivationResponseIes::default();
        assert_eq!(empty, roundtrip(&empty));

        let full = PositioningActivationResponseIes {
            criticality_diagnostics: Some(CriticalityDiagnostics {
                procedure_code: Some(super::super::types::ProcedureCode::POSITIONING_ACTIVATION),
                triggering_message: Some(super::super::types::TriggeringMessage::InitiatingMessage),
                procedure_criticality: Some(Criticality::Reject),
                transaction_id: Some(super::super::types::NrppaTransactionId(99)),
                ies_criticality_diagnostics: vec![CriticalityDiagnosticsIeItem {
                    ie_criticality: Criticality::Reject,
                    ie_id: ProtocolIeId::ABORT_TRANSMISSION,
                    type_of_error: TypeOfError::Missing,
                }],
                ie_exts: None,
            }),
            system_frame_number: Some(SystemFrameNumber(1023)),
            slot_number: Some(SlotNumber(79)),
        };
        assert_eq!(full, roundtrip(&full));
    }

    #[test]
    fn test_extension_container_preserves_order_and_criticality() {
        let mut container = ProtocolExtensionContainer::new();
        container.push(ProtocolExtensionField {
            id: ProtocolIeId(200),
            criticality: Criticality::Reject,
            value: vec![1, 2],
        });
        container.push(ProtocolExtensionField {
            id: ProtocolIeId(201),
            criticality: Criticality::Ignore,
            value: vec![3],
        });
        container.push(ProtocolExtensionField {
            id: ProtocolIeId(202),
            criticality: Criticality::Notify,
            value: vec![],
        });

        let decoded = roundtrip(&container);
        assert_eq!(container, decoded);
        assert_eq!(decoded.extensions[0].criticality, Criticality::Reject);
        assert_eq!(decoded.extensions[1].criticality, Criticality::Ignore);
        assert_eq!(decoded.extensions[2].criticality, Criticality::Notify);
    }

    #[test]
    fn test_object_set_lookups() {
        use super::aggregated_pos_srs_resource_id_item_ext_ies as object_set;

        assert!(object_set::is_id_valid(ProtocolIeId::POINT_A));
        assert!(!object_set::is_id_valid(ProtocolIeId::CAUSE));
        assert_eq!(
            object_set::criticality(ProtocolIeId::SCS_SPECIFIC_CARRIER),
            Some(Criticality::Reject)
        );
        assert_eq!(
            object_set::presence(ProtocolIeId::POINT_A),
            Some(Presence::Mandatory)
        );
        assert_eq!(object_set::criticality(ProtocolIeId(9999)), None);
    }
}
