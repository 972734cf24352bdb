// nicfw-rs command-line entry point

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt::format::FmtSpan, prelude::*, EnvFilter};

use nicfw_rs::core::validation::{
    check_channel_number, check_frequency, check_groups, check_name, check_power, check_subtone,
};
use nicfw_rs::core::{Bandwidth, Channel, Modulation};
use nicfw_rs::formats::{import_csv, CsvWriter};
use nicfw_rs::radio::{parse_key_sequence, ChannelStore, RadioLink};
use nicfw_rs::serial::{SerialConfig, SerialPort, Transport};

#[derive(Parser)]
#[command(name = "nicfw-rs", version, about = "Program nicFW handheld radio channel memory over a serial link")]
struct Cli {
    /// Serial device to communicate with the radio
    #[arg(short, long, global = true, default_value = "/dev/ttyUSB0")]
    device: String,

    /// Enable debug messages
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

/// Channel field modifiers shared by the write and update actions
#[derive(clap::Args)]
struct Modifiers {
    /// Channel name
    #[arg(short, long)]
    name: Option<String>,

    /// RX frequency in Hz
    #[arg(long)]
    rx: Option<u32>,

    /// TX frequency in Hz
    #[arg(long)]
    tx: Option<u32>,

    /// RX CTCSS tone in tenths of Hz (0 to disable)
    #[arg(long)]
    rx_ctcss: Option<u32>,

    /// TX CTCSS tone in tenths of Hz (0 to disable)
    #[arg(long)]
    tx_ctcss: Option<u32>,

    /// TX power (0-255, raw firmware units)
    #[arg(short, long)]
    power: Option<u32>,

    /// Groups to add the channel to (e.g. ABCD, A00F)
    #[arg(short, long)]
    groups: Option<String>,

    /// Modulation: Auto, FM, AM or USB
    #[arg(short, long)]
    modulation: Option<Modulation>,

    /// Bandwidth: Wide or Narrow
    #[arg(short, long)]
    bandwidth: Option<Bandwidth>,
}

impl Modifiers {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.rx.is_none()
            && self.tx.is_none()
            && self.rx_ctcss.is_none()
            && self.tx_ctcss.is_none()
            && self.power.is_none()
            && self.groups.is_none()
            && self.modulation.is_none()
            && self.bandwidth.is_none()
    }

    /// Validate the supplied fields and fold them into the channel;
    /// fields not supplied keep their current values.
    fn apply(&self, channel: &mut Channel) -> anyhow::Result<()> {
        if let Some(name) = &self.name {
            channel.name = check_name(name);
        }
        if let Some(rx) = self.rx {
            channel.rx_freq = check_frequency(rx)?;
        }
        if let Some(tx) = self.tx {
            channel.tx_freq = check_frequency(tx)?;
        }
        if let Some(rx_ctcss) = self.rx_ctcss {
            channel.rx_subtone = check_subtone(rx_ctcss)?;
        }
        if let Some(tx_ctcss) = self.tx_ctcss {
            channel.tx_subtone = check_subtone(tx_ctcss)?;
        }
        if let Some(power) = self.power {
            channel.tx_power = check_power(power)?;
        }
        if let Some(groups) = &self.groups {
            channel.groups = check_groups(groups)?;
        }
        if let Some(modulation) = self.modulation {
            channel.modulation = modulation;
        }
        if let Some(bandwidth) = self.bandwidth {
            channel.bandwidth = bandwidth;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Switch {
    On,
    Off,
}

#[derive(Subcommand)]
enum Command {
    /// Read and print one channel
    Show {
        /// Channel number (1-198)
        #[arg(short, long)]
        channel: u32,
    },

    /// Create a new channel or overwrite an existing one
    Write {
        /// Channel number (1-198)
        #[arg(short, long)]
        channel: u32,

        #[command(flatten)]
        modifiers: Modifiers,

        /// Reset the radio after writing
        #[arg(short, long)]
        reset: bool,
    },

    /// Update fields of an existing channel
    Update {
        /// Channel number (1-198)
        #[arg(short, long)]
        channel: u32,

        #[command(flatten)]
        modifiers: Modifiers,
    },

    /// Remove a channel
    Remove {
        /// Channel number (1-198)
        #[arg(short, long)]
        channel: u32,
    },

    /// Export all channels to a CSV file
    Export {
        /// Output file
        file: String,

        /// Use fixed-width columns
        #[arg(short, long)]
        fixed_width: bool,
    },

    /// Import channels from a CSV file, erasing channels absent from it
    Import {
        /// Input file
        file: String,
    },

    /// Send a comma-separated key sequence to the radio
    Key {
        /// Keys, e.g. "menu,145500,ptt"
        sequence: String,
    },

    /// Turn the flashlight on or off
    Flashlight {
        #[arg(value_enum)]
        state: Switch,
    },

    /// Reset the radio
    Reset,

    /// Read the raw battery ADC value
    Battery,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.debug { "debug" } else { "info" };
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap();

    let format_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(format_layer)
        .init();

    tracing::debug!("Using '{}' device", cli.device);

    let port = SerialPort::open(&cli.device, SerialConfig::default())
        .with_context(|| format!("Problem occurred when trying to open '{}'", cli.device))?;
    let mut link = RadioLink::new(port);

    run(cli.command, &mut link).await
}

async fn run<T: Transport>(command: Command, link: &mut RadioLink<T>) -> anyhow::Result<()> {
    match command {
        Command::Show { channel } => {
            let number = check_channel_number(channel)?;
            let mut store = ChannelStore::new(link);
            match store.get(number).await? {
                Some(record) => println!("{}", record),
                None => println!("Channel {} is empty.", number),
            }
        }

        Command::Write {
            channel,
            modifiers,
            reset,
        } => {
            let number = check_channel_number(channel)?;
            let mut record = Channel::new(number);
            modifiers.apply(&mut record)?;
            println!("{}", record);

            let mut store = ChannelStore::new(link);
            store.put(&record).await?;

            if reset {
                link.reset().await?;
            }
        }

        Command::Update { channel, modifiers } => {
            anyhow::ensure!(
                !modifiers.is_empty(),
                "Update channel action needs at least one channel modifier"
            );
            let number = check_channel_number(channel)?;

            let mut store = ChannelStore::new(link);
            let mut record = store.get(number).await?.with_context(|| {
                format!("Channel {} is empty - cannot perform an update action", number)
            })?;
            modifiers.apply(&mut record)?;
            println!("{}", record);

            let mut store = ChannelStore::new(link);
            store.put(&record).await?;
        }

        Command::Remove { channel } => {
            let number = check_channel_number(channel)?;
            println!("Removing channel CH-{:03}", number);

            let mut store = ChannelStore::new(link);
            store.erase(number).await?;
            println!("Done.");
        }

        Command::Export { file, fixed_width } => {
            let mut writer = CsvWriter::create(&file, fixed_width)
                .with_context(|| format!("Could not open/write file '{}'", file))?;

            let mut store = ChannelStore::new(link);
            let mut export = store.export();
            while let Some(channel) = export.next_channel().await? {
                writer.write_channel(&channel)?;
            }
            println!("done.");
        }

        Command::Import { file } => {
            let set = import_csv(&file)
                .with_context(|| format!("Could not import file '{}'", file))?;

            let mut store = ChannelStore::new(link);
            store.import_all(&set).await?;
        }

        Command::Key { sequence } => {
            let codes = parse_key_sequence(&sequence)?;
            link.send_keys(&codes).await?;
            println!("done.");
        }

        Command::Flashlight { state } => {
            link.flashlight(matches!(state, Switch::On)).await?;
        }

        Command::Reset => {
            link.reset().await?;
        }

        Command::Battery => {
            let value = link.read_battery_adc().await?;
            println!("battery ADC: {}", value);
        }
    }

    Ok(())
}
