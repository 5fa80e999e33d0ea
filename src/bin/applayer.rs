//! applayer CLI
//!
//! Decode and encode firmware management / fragmentation frame payloads.

use std::error::Error;
use std::fs;
use std::io::{self, Read};

use clap::{Parser, Subcommand};
use lorawan_applayer::{
    decode_commands, encode_commands, firmware, fragmentation, Command, CommandSet, Config,
    Direction, Protocol,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

/// applayer CLI
#[derive(Parser, Debug)]
#[command(name = "applayer")]
#[command(about = "Codec for LoRaWAN firmware management and fragmentation commands")]
#[command(version)]
struct Args {
    /// Application-layer package (firmware | fragmentation)
    #[arg(short, long, default_value = "fragmentation")]
    protocol: Protocol,

    /// Largest accepted frame payload in bytes
    #[arg(short, long, default_value_t = lorawan_applayer::config::MAX_FRM_PAYLOAD)]
    max_frame_len: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a hex frame payload and print its commands as YAML
    Decode {
        /// Direction of the frame (uplink | downlink)
        #[arg(short, long, default_value = "downlink")]
        direction: Direction,

        /// Frame payload as hex
        hex: String,
    },

    /// Encode a YAML command list and print the frame payload as hex
    Encode {
        /// YAML file, or "-" for stdin
        #[arg(default_value = "-")]
        input: String,
    },
}

fn main() {
    let args = Args::parse();

    let mut builder = Config::builder()
        .protocol(args.protocol)
        .max_frame_len(args.max_frame_len);
    if let Commands::Decode { direction, .. } = &args.command {
        builder = builder.direction(*direction);
    }
    let config = builder.build();

    // Initialize tracing/logging (stderr, so stdout stays machine-readable)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    tracing::debug!("applayer v{}", lorawan_applayer::VERSION);

    let result = match &args.command {
        Commands::Decode { hex, .. } => decode(&config, hex),
        Commands::Encode { input } => encode(&config, input),
    };

    match result {
        Ok(output) => println!("{}", output),
        Err(e) => {
            tracing::error!("{} failed: {}", config.protocol, e);
            std::process::exit(1);
        }
    }
}

fn decode(config: &Config, input: &str) -> Result<String, Box<dyn Error>> {
    let bytes = hex::decode(input.trim())?;
    config.check_frame_len(bytes.len())?;

    tracing::info!(
        protocol = %config.protocol,
        direction = %config.direction,
        len = bytes.len(),
        "decoding frame"
    );

    match config.protocol {
        Protocol::FirmwareManagement => to_yaml::<firmware::Payload>(config.direction, &bytes),
        Protocol::Fragmentation => to_yaml::<fragmentation::Payload>(config.direction, &bytes),
    }
}

fn to_yaml<P: CommandSet + Serialize>(
    direction: Direction,
    bytes: &[u8],
) -> Result<String, Box<dyn Error>> {
    let commands = decode_commands::<P>(direction, bytes)?;
    Ok(serde_yaml::to_string(&commands)?)
}

fn encode(config: &Config, input: &str) -> Result<String, Box<dyn Error>> {
    let yaml = if input == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(input)?
    };

    let bytes = match config.protocol {
        Protocol::FirmwareManagement => from_yaml::<firmware::Payload>(&yaml)?,
        Protocol::Fragmentation => from_yaml::<fragmentation::Payload>(&yaml)?,
    };
    config.check_frame_len(bytes.len())?;

    tracing::info!(protocol = %config.protocol, len = bytes.len(), "encoded frame");
    Ok(hex::encode(bytes))
}

fn from_yaml<P: CommandSet + DeserializeOwned>(yaml: &str) -> Result<Vec<u8>, Box<dyn Error>> {
    let commands: Vec<Command<P>> = serde_yaml::from_str(yaml)?;
    Ok(encode_commands(&commands)?)
}
