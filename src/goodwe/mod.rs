pub mod command;
pub mod decoder;
pub mod device_info;
pub mod dt;
pub mod inverter;
pub mod packet;
pub mod sensor;
pub mod tables;
pub mod transport;
