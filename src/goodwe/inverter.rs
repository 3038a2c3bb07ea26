use crate::prelude::*;

use crate::goodwe::{
    command::ProtocolCommand,
    decoder::{self, Filter, ReadingSet, Value},
    device_info::DeviceInfo,
    dt::Family,
    packet::Parser,
    sensor::Phases,
    tables::UNKNOWN_LABEL,
    transport::{Transport, UdpTransport},
};

use std::sync::RwLock;
use tokio::sync::Mutex;

/// Which schema variant a session decodes with.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Resolution {
    /// Waiting on a successful device-info exchange.
    Unresolved,
    Resolved(Phases),
}

/// One inverter session: a transport plus the family resolution state.
///
/// Exchanges are serialised on the transport lock; the resolution is a
/// separate lock so readers never wait on the network.
pub struct Inverter<T: Transport> {
    family: Family,
    comm_addr: u8,
    transport: Mutex<T>,
    resolution: RwLock<Resolution>,
}

impl Inverter<UdpTransport> {
    pub async fn connect(inverter: &config::Inverter) -> Result<Self> {
        let transport = UdpTransport::connect(
            inverter.host(),
            inverter.port(),
            inverter.timeout(),
            inverter.retries(),
        )
        .await?;

        Ok(Self::new(inverter.family(), inverter.comm_addr(), transport))
    }
}

impl<T: Transport> Inverter<T> {
    pub fn new(family: Family, comm_addr: u8, transport: T) -> Self {
        let resolution = if family.needs_device_info() {
            Resolution::Unresolved
        } else {
            Resolution::Resolved(Phases::Three)
        };

        Self {
            family,
            comm_addr,
            transport: Mutex::new(transport),
            resolution: RwLock::new(resolution),
        }
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn resolution(&self) -> Resolution {
        *self.resolution.read().unwrap_or_else(|e| e.into_inner())
    }

    fn resolve(&self, phases: Phases) {
        let mut resolution = self.resolution.write().unwrap_or_else(|e| e.into_inner());
        if *resolution != Resolution::Resolved(phases) {
            info!("{} inverter resolved as {:?}-phase", self.family, phases);
        }
        *resolution = Resolution::Resolved(phases);
    }

    /// Sends `command` and returns the reply once it passes the command's validator.
    async fn exchange(&self, command: &ProtocolCommand) -> Result<Vec<u8>> {
        let response = {
            let mut transport = self.transport.lock().await;
            transport.exchange(command).await?
        };

        debug!("{} -> {}", command, Utils::hex(&response));

        if !command.validator(&response) {
            return Err(Error::RequestFailed {
                request: command.to_string(),
            });
        }

        Ok(response)
    }

    pub async fn read_device_info(&self) -> Result<DeviceInfo> {
        let command = self.family.device_info(self.comm_addr)?;
        let response = self.exchange(&command).await?;
        let info = DeviceInfo::from_payload(Parser::parse(&response)?.payload)?;

        debug!(
            "device info: model={} serial={} firmware={}",
            info.model_name,
            info.serial_number,
            info.firmware()
        );

        if self.family.needs_device_info() {
            self.resolve(Self::phases_of(&info));
        }

        Ok(info)
    }

    fn phases_of(info: &DeviceInfo) -> Phases {
        if info.is_single_phase() {
            Phases::Single
        } else {
            Phases::Three
        }
    }

    async fn phases(&self) -> Result<Phases> {
        match self.resolution() {
            Resolution::Resolved(phases) => Ok(phases),
            Resolution::Unresolved => {
                let info = self.read_device_info().await?;
                Ok(Self::phases_of(&info))
            }
        }
    }

    pub async fn read_runtime_data(&self, include_unknown: bool) -> Result<ReadingSet> {
        let phases = self.phases().await?;

        let command = self.family.runtime_data(self.comm_addr)?;
        let response = self.exchange(&command).await?;
        let payload = Parser::parse(&response)?.payload;

        let schema = self.family.schema();
        let readings = decoder::decode(
            schema,
            payload,
            Filter {
                phases,
                include_unknown,
            },
        )?;

        for sensor in schema.sensors {
            if let Some(label) = sensor.label_id() {
                if readings.get(label).and_then(Value::as_str) == Some(UNKNOWN_LABEL) {
                    warn!(
                        "{}: unknown code {} for {}",
                        self.family,
                        readings.get(sensor.id).map(Value::to_string).unwrap_or_default(),
                        sensor.id
                    );
                }
            }
        }

        Ok(readings)
    }
}
