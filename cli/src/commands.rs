pub mod notify;
pub mod probe;
pub mod run;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use pnet::util::MacAddr;
use vcpe_common::config::Config;
use vcpe_common::network::location::HostLocation;
use vcpe_common::network::mac::parse_mac;

#[derive(Parser)]
#[command(name = "vcpe-bridge")]
#[command(about = "Forwards host attachments to a vCPE manager.")]
#[command(version)]
pub struct CommandLine {
    /// Base URL of the vCPE manager, e.g. http://10.0.0.5:8000
    #[arg(long = "api-url", value_name = "URL")]
    pub api_url: String,

    /// Deadline for each HTTP request, in seconds
    #[arg(long, value_name = "SECS", default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Skip the GET /test reachability check on startup
    #[arg(long)]
    pub no_probe: bool,

    /// Only print warnings and errors
    #[arg(short, long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Forward host events read as JSON lines from a file or stdin
    #[command(alias = "r")]
    Run {
        /// File of host events, one JSON object per line (default: stdin)
        #[arg(short, long, value_name = "FILE")]
        events: Option<PathBuf>,
    },
    /// Check that the vCPE manager is reachable
    #[command(alias = "p")]
    Probe,
    /// Send a single host attachment notification
    #[command(alias = "n")]
    Notify {
        /// Host MAC address, e.g. 00:11:22:33:44:55
        #[arg(value_parser = parse_mac)]
        mac: MacAddr,
        /// Attachment point as <device-id>/<port>, e.g. of:0000000000000001/3
        location: HostLocation,
    },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn config(&self) -> Config {
        Config {
            vcpe_api_url: self.api_url.clone(),
            request_timeout: Duration::from_secs(self.timeout),
            probe_on_start: !self.no_probe,
        }
    }
}
