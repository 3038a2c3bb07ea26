#![allow(dead_code)]

use goodwe_bridge::goodwe::dt::{Family, DT_SCHEMA};
use goodwe_bridge::prelude::*;

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub use goodwe_bridge::goodwe::packet::DEFAULT_COMM_ADDR;

/// What an unmocked command gets back: too short to be any valid frame.
pub const UNMOCKED_REPLY: [u8; 9] = [1, 2, 3, 4, 5, 6, 7, 8, 9];

pub struct Fixture;
impl Fixture {
    pub fn path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/sample/dt")
            .join(format!("{}.hex", name))
    }

    pub fn frame(name: &str) -> Vec<u8> {
        let content = std::fs::read_to_string(Self::path(name)).unwrap();
        Utils::from_hex(&content).unwrap()
    }

    pub fn runtime_data() -> ProtocolCommand {
        Family::Dt.runtime_data(DEFAULT_COMM_ADDR).unwrap()
    }

    pub fn device_info() -> ProtocolCommand {
        Family::Dt.device_info(DEFAULT_COMM_ADDR).unwrap()
    }
}

#[derive(Clone, Debug)]
enum Reply {
    Frame(Vec<u8>),
    Timeout,
}

/// Replays canned replies keyed by request bytes.
///
/// Replies queued for one command are handed out in order; the last one
/// repeats once the queue is down to it.
#[derive(Clone, Default)]
pub struct ReplayTransport {
    replies: HashMap<ProtocolCommand, VecDeque<Reply>>,
    requests: Arc<Mutex<Vec<ProtocolCommand>>>,
}

impl ReplayTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fixture(self, command: ProtocolCommand, name: &str) -> Self {
        self.with_frame(command, Fixture::frame(name))
    }

    pub fn with_frame(mut self, command: ProtocolCommand, frame: Vec<u8>) -> Self {
        self.replies
            .entry(command)
            .or_default()
            .push_back(Reply::Frame(frame));
        self
    }

    pub fn with_timeout(mut self, command: ProtocolCommand) -> Self {
        self.replies
            .entry(command)
            .or_default()
            .push_back(Reply::Timeout);
        self
    }

    /// Shared log of every command sent, in order.
    pub fn requests(&self) -> Arc<Mutex<Vec<ProtocolCommand>>> {
        self.requests.clone()
    }
}

#[async_trait]
impl Transport for ReplayTransport {
    async fn exchange(&mut self, command: &ProtocolCommand) -> Result<Vec<u8>> {
        self.requests.lock().unwrap().push(command.clone());

        let reply = match self.replies.get_mut(command) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        match reply {
            Some(Reply::Frame(frame)) => Ok(frame),
            Some(Reply::Timeout) => Err(Error::Timeout { attempts: 1 }),
            None => Ok(UNMOCKED_REPLY.to_vec()),
        }
    }
}

pub fn float(readings: &ReadingSet, id: &str) -> f64 {
    readings
        .get(id)
        .and_then(Value::as_f64)
        .unwrap_or_else(|| panic!("{} is not numeric", id))
}

pub fn integer(readings: &ReadingSet, id: &str) -> i64 {
    readings
        .get(id)
        .and_then(Value::as_i64)
        .unwrap_or_else(|| panic!("{} is not an integer", id))
}

pub fn text<'a>(readings: &'a ReadingSet, id: &str) -> &'a str {
    readings
        .get(id)
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("{} is not text", id))
}

/// Checks a reading and the unit the DT schema declares for it.
pub fn assert_sensor(readings: &ReadingSet, id: &str, expected: Value, unit: &str) {
    assert_eq!(readings.get(id), Some(&expected), "value of {}", id);
    assert_eq!(DT_SCHEMA.unit(id), Some(unit), "unit of {}", id);
}
