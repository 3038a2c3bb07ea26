use clap::Parser;

/// GoodWe Bridge - reads runtime data from GoodWe inverters over UDP
#[derive(Debug, Parser)]
#[clap(author, version)]
pub struct Options {
    /// Config file to read
    #[clap(short = 'c', long = "config", default_value = "config.yaml")]
    pub config_file: String,

    /// Also read and print each inverter's device info
    #[clap(short = 'i', long = "device-info")]
    pub device_info: bool,
}

impl Options {
    pub fn new() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let options = Options::parse_from(["goodwe-bridge", "-c", "/etc/goodwe.yaml", "-i"]);
        assert_eq!(options.config_file, "/etc/goodwe.yaml");
        assert!(options.device_info);

        let options = Options::parse_from(["goodwe-bridge"]);
        assert_eq!(options.config_file, "config.yaml");
        assert!(!options.device_info);
    }
}
