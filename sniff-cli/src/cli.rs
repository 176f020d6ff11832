//! Command-line definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sniff_proto::{ChannelMask, TieBreak};
use sniff_scan::ScanSettings;

/// TracerFi sniffer
#[derive(Parser, Debug)]
#[command(name = "sniffer")]
#[command(author, version, about = "Announce, sweep WiFi channels and scan BLE")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Settings file (defaults to $XDG_CONFIG_HOME/tracerfi/settings.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the scan sequence against the virtual radio
    Scan(ScanArgs),

    /// Write default settings
    Init {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective settings
    Show,
}

#[derive(Args, Debug, Default)]
pub struct ScanArgs {
    /// Channels to sweep: a preset (all, us, uk, eu) or a list like 1,6,11
    #[arg(long)]
    pub mask: Option<ChannelMask>,

    /// Dwell time per channel in milliseconds
    #[arg(long)]
    pub ap_period_ms: Option<u64>,

    /// BLE scan length in milliseconds
    #[arg(long)]
    pub ble_period_ms: Option<u64>,

    /// Wait after each TracerFi transmission in milliseconds
    #[arg(long)]
    pub tfi_period_ms: Option<u64>,

    /// Number of TracerFi transmissions
    #[arg(long)]
    pub tfi_transmits: Option<u8>,

    /// Channel for TracerFi transmissions
    #[arg(long)]
    pub tfi_channel: Option<u8>,

    /// Transmit power in 0.25 dBm units
    #[arg(long, allow_negative_numbers = true)]
    pub tfi_power: Option<i8>,

    /// Prefer the TracerFi interpretation when a long frame carries the magic
    #[arg(long)]
    pub magic_first: bool,

    /// Number of scan sequences to run
    #[arg(long, default_value_t = 1)]
    pub count: u32,

    /// Print results as JSON lines
    #[arg(long)]
    pub json: bool,
}

impl ScanArgs {
    /// Apply command-line overrides on top of stored settings
    pub fn apply(&self, settings: &mut ScanSettings) {
        if let Some(mask) = self.mask {
            settings.mask = mask;
        }
        if let Some(ms) = self.ap_period_ms {
            settings.ap_period_ms = ms;
        }
        if let Some(ms) = self.ble_period_ms {
            settings.ble_period_ms = ms;
        }
        if let Some(ms) = self.tfi_period_ms {
            settings.tfi_period_ms = ms;
        }
        if let Some(n) = self.tfi_transmits {
            settings.tfi_transmits = n;
        }
        if let Some(channel) = self.tfi_channel {
            settings.tfi_channel = channel;
        }
        if let Some(power) = self.tfi_power {
            settings.tfi_power = power;
        }
        if self.magic_first {
            settings.tie_break = TieBreak::MagicFirst;
        }
    }
}
