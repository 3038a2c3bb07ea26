mod common;
use common::*;

use goodwe_bridge::goodwe::decoder::{self, Filter};
use goodwe_bridge::goodwe::dt::DT_SCHEMA;
use goodwe_bridge::goodwe::packet::{Parser, PAYLOAD_OFFSET};
use goodwe_bridge::prelude::*;

#[test]
fn fixtures_are_valid_replies() {
    for (name, command) in [
        ("GW6000-DT_running_data", Fixture::runtime_data()),
        ("GW8K-DT_running_data", Fixture::runtime_data()),
        ("GW8K-DT_device_info", Fixture::device_info()),
        ("GW3600D-NS_device_info", Fixture::device_info()),
    ] {
        let frame = Fixture::frame(name);
        assert!(Parser::is_valid_response(&frame), "{}", name);
        assert!(command.check(&frame).is_ok(), "{}", name);
    }
}

#[test]
fn replies_only_satisfy_their_own_command() {
    let runtime = Fixture::frame("GW6000-DT_running_data");
    let info = Fixture::frame("GW8K-DT_device_info");

    assert!(!Fixture::device_info().validator(&runtime));
    assert!(!Fixture::runtime_data().validator(&info));
}

#[test]
fn any_single_byte_change_is_rejected() {
    let frame = Fixture::frame("GW8K-DT_running_data");

    for i in 0..frame.len() {
        let mut mutated = frame.clone();
        mutated[i] = mutated[i].wrapping_add(1);
        assert!(!Parser::is_valid_response(&mutated), "byte {} went unnoticed", i);
    }
}

#[test]
fn truncated_and_extended_frames_are_rejected() {
    let frame = Fixture::frame("GW6000-DT_running_data");

    for len in 0..frame.len() {
        assert!(!Parser::is_valid_response(&frame[..len]));
    }

    let mut extended = frame.clone();
    extended.push(0);
    assert!(!Parser::is_valid_response(&extended));
}

#[test]
fn payload_starts_after_header() {
    let frame = Fixture::frame("GW6000-DT_running_data");
    let response = Parser::parse(&frame).unwrap();

    assert_eq!(response.comm_addr, DEFAULT_COMM_ADDR);
    assert_eq!(response.payload.len(), 146);
    assert_eq!(response.payload, &frame[PAYLOAD_OFFSET..frame.len() - 2]);
    // timestamp leads the payload: 2021-08-31 12:03:02
    assert_eq!(&response.payload[..6], &[21, 8, 31, 12, 3, 2]);
}

#[test]
fn wrong_schema_is_out_of_range() {
    // device info payload is 80 bytes, the runtime schema needs 146
    let frame = Fixture::frame("GW8K-DT_device_info");
    let payload = Parser::parse(&frame).unwrap().payload;

    match decoder::decode(&DT_SCHEMA, payload, Filter::ALL) {
        Err(Error::DecodeOutOfRange {
            schema,
            required,
            actual,
        }) => {
            assert_eq!(schema, "DT");
            assert_eq!(required, 146);
            assert_eq!(actual, 80);
        }
        other => panic!("expected DecodeOutOfRange, got {:?}", other),
    }
}

#[test]
fn every_work_mode_code_gets_a_label() {
    let frame = Fixture::frame("GW6000-DT_running_data");
    let mut payload = Parser::parse(&frame).unwrap().payload.to_vec();

    for code in [0u16, 1, 2, 3, 4, 5, 0x7fff, 0xffff] {
        payload[58..60].copy_from_slice(&code.to_be_bytes());
        let readings = decoder::decode(&DT_SCHEMA, &payload, Filter::ALL).unwrap();
        assert!(!text(&readings, "work_mode_label").is_empty());
        assert_eq!(integer(&readings, "work_mode"), i64::from(code));
    }
}
