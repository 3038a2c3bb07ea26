pub use anyhow::{anyhow, bail};
pub use log::{debug, error, info, trace, warn};

pub use crate::{
    config::{self, Config, ConfigWrapper},
    error::{Error, Result},
    goodwe::{
        command::ProtocolCommand,
        decoder::{ReadingSet, Value},
        device_info::DeviceInfo,
        dt::Family,
        inverter::{Inverter, Resolution},
        sensor::Phases,
        transport::{Transport, UdpTransport},
    },
    options::Options,
    utils::Utils,
};
