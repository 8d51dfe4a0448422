use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use mcubridge_dispatch::PortSnapshot;
use mcubridge_frame::{address_name, CommandFrame, GPIO_REGISTER};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    address: u8,
    address_name: &'a str,
    command: u8,
    data: u16,
    wire: [u8; 4],
    #[serde(skip_serializing_if = "Option::is_none")]
    port: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pin: Option<u8>,
}

/// Print one decoded command frame. The pin/port columns only apply
/// to GPIO frames; other addresses carry opaque payloads.
pub fn print_frame(frame: &CommandFrame, format: OutputFormat) {
    let gpio = frame.address == GPIO_REGISTER;
    let port = gpio.then(|| frame.port_index());
    let pin = gpio.then(|| frame.pin_index());

    match format {
        OutputFormat::Json => {
            let out = FrameOutput {
                address: frame.address,
                address_name: address_name(frame.address),
                command: frame.command,
                data: frame.data,
                wire: mcubridge_frame::encode_request(frame),
                port,
                pin,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ADDRESS", "COMMAND", "DATA", "PORT", "PIN"])
                .add_row(vec![
                    format!("{:#04x} ({})", frame.address, address_name(frame.address)),
                    format!("{:#04x}", frame.command),
                    format!("{:#06x}", frame.data),
                    port.map_or_else(|| "-".to_string(), |p| p.to_string()),
                    pin.map_or_else(|| "-".to_string(), |p| p.to_string()),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            print!(
                "address={:#04x} ({}) command={:#04x} data={:#06x}",
                frame.address,
                address_name(frame.address),
                frame.command,
                frame.data
            );
            if let (Some(port), Some(pin)) = (port, pin) {
                print!(" port={port} pin={pin}");
            }
            println!();
        }
        OutputFormat::Raw => {
            let wire = mcubridge_frame::encode_request(frame);
            println!("{:02x}:{:02x}:{:02x}:{:02x}", wire[0], wire[1], wire[2], wire[3]);
        }
    }
}

#[derive(Serialize)]
struct ResponseOutput {
    value: u32,
    bytes: [u8; 4],
}

/// Print a 4-byte response, least significant byte first on the wire.
pub fn print_response(bytes: [u8; 4], format: OutputFormat) {
    let value = mcubridge_frame::decode_response(bytes);
    match format {
        OutputFormat::Json => {
            let out = ResponseOutput { value, bytes };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["VALUE", "BYTES"])
                .add_row(vec![
                    format!("{value:#010x}"),
                    format!(
                        "{:02x}:{:02x}:{:02x}:{:02x}",
                        bytes[0], bytes[1], bytes[2], bytes[3]
                    ),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "value={value:#010x} bytes={:02x}:{:02x}:{:02x}:{:02x}",
                bytes[0], bytes[1], bytes[2], bytes[3]
            );
        }
        OutputFormat::Raw => {
            println!(
                "{:02x}:{:02x}:{:02x}:{:02x}",
                bytes[0], bytes[1], bytes[2], bytes[3]
            );
        }
    }
}

#[derive(Serialize)]
struct PortRow<'a> {
    name: &'a str,
    port: u8,
    pin: u8,
    state: u8,
    data: u8,
    interrupt: bool,
}

/// Print a board's logical ports.
pub fn print_ports(snapshots: &[PortSnapshot], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let rows: Vec<_> = snapshots
                .iter()
                .map(|snap| PortRow {
                    name: &snap.name,
                    port: snap.port,
                    pin: snap.pin,
                    state: snap.state,
                    data: snap.data,
                    interrupt: snap.interrupt_capable,
                })
                .collect();
            println!(
                "{}",
                serde_json::to_string(&rows).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["NAME", "PORT", "PIN", "STATE", "DATA", "IRQ"]);
            for snap in snapshots {
                table.add_row(vec![
                    snap.name.clone(),
                    snap.port.to_string(),
                    snap.pin.to_string(),
                    snap.state.to_string(),
                    snap.data.to_string(),
                    if snap.interrupt_capable { "yes" } else { "no" }.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            for snap in snapshots {
                println!(
                    "{} P{}[{}] state={} data={} irq={}",
                    snap.name,
                    snap.port,
                    snap.pin,
                    snap.state,
                    snap.data,
                    snap.interrupt_capable
                );
            }
        }
    }
}
