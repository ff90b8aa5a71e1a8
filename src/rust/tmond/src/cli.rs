use clap::Parser;
use std::path::PathBuf;
use tmon_config::DEFAULT_CONFIG_PATH;

/// Passive per-address traffic monitor.
#[derive(Parser, Debug)]
#[command(version, about)]
pub(crate) struct Args {
    /// Network interface to capture on (e.g. eth0)
    pub(crate) interface: String,

    /// BPF capture filter. Overrides capture.filter from the config file.
    pub(crate) filter: Option<String>,

    /// Collector base URL (e.g. http://10.0.0.5:5000/api). Overrides
    /// reporting.base_url from the config file.
    pub(crate) report_url: Option<String>,

    /// Configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub(crate) config: PathBuf,
}

/// Parse the command line. Help and version requests exit with 0, any
/// other argument error (including a missing interface) exits with 1.
pub(crate) fn parse() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interface_only() {
        let args = Args::try_parse_from(["tmond", "eth0"]).unwrap();
        assert_eq!(args.interface, "eth0");
        assert!(args.filter.is_none());
        assert!(args.report_url.is_none());
        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG_PATH));
    }

    #[test]
    fn all_positionals() {
        let args = Args::try_parse_from([
            "tmond",
            "eth1",
            "tcp port 443",
            "http://127.0.0.1:5000/api",
            "--config",
            "/tmp/tmon.conf",
        ])
        .unwrap();
        assert_eq!(args.interface, "eth1");
        assert_eq!(args.filter.as_deref(), Some("tcp port 443"));
        assert_eq!(args.report_url.as_deref(), Some("http://127.0.0.1:5000/api"));
        assert_eq!(args.config, PathBuf::from("/tmp/tmon.conf"));
    }

    #[test]
    fn missing_interface_is_an_error() {
        let err = Args::try_parse_from(["tmond"]).unwrap_err();
        assert!(err.use_stderr());
    }
}
