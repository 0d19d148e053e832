//! NRPPA PDU Fuzzer
//!
//! Fuzzes the NRPPA APER decoder to find potential crashes or panics.
//! Decoding arbitrary bytes must only ever return Ok or a PerError.
//!
//! Run with: cargo +nightly fuzz run fuzz_nrppa_pdu

#![no_main]

use libfuzzer_sys::fuzz_target;
use nrppa_asn1c::nrppa::cause::Cause;
use nrppa_asn1c::nrppa::ies::{
    AggregatedPosSrsResourceIdItem, CriticalityDiagnostics, ScsSpecificCarrier,
};
use nrppa_asn1c::nrppa::pdu::NrppaPdu;
use nrppa_asn1c::{AperDecode, AperDecoder};

fuzz_target!(|data: &[u8]| {
    let mut decoder = AperDecoder::new(data);
    let _ = NrppaPdu::decode_aper(&mut decoder);

    let mut decoder = AperDecoder::new(data);
    let _ = Cause::decode_aper(&mut decoder);

    let mut decoder = AperDecoder::new(data);
    let _ = ScsSpecificCarrier::decode_aper(&mut decoder);

    let mut decoder = AperDecoder::new(data);
    let _ = AggregatedPosSrsResourceIdItem::decode_aper(&mut decoder);

    let mut decoder = AperDecoder::new(data);
    let _ = CriticalityDiagnostics::decode_aper(&mut decoder);
});
