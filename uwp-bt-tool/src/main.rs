use std::convert::Infallible;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use rand_core::OsRng;
use uwp_bt::fs::{StdFs, DEFAULT_MOUNT_POINT};
use uwp_bt::transport::H4Transport;
use uwp_bt::{BringUp, BringUpConfig, BringUpReport, HciTransport, Opcode};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding the vendor `.ini` files
    dir: PathBuf,

    /// Pskey file name inside DIR
    #[arg(long, default_value = "BT_CON~1.INI")]
    pskey: String,

    /// RF calibration file name inside DIR
    #[arg(long, default_value = "BT_CON~2.INI")]
    rf: String,

    /// Start from the vendor reference tables instead of zeros
    #[arg(long)]
    seed_defaults: bool,

    /// Keep the address from the pskey file
    #[arg(long)]
    no_randomize: bool,

    /// Write `opcode(LE) len payload` records to FILE
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Send the commands to an H4 controller on this serial device
    #[arg(short, long, value_name = "TTY")]
    device: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// One command as handed to the transport.
struct Record {
    opcode: Opcode,
    payload: Vec<u8>,
    status: Option<u8>,
}

/// Keeps a copy of every command before passing it on.
struct Recorder<T> {
    inner: T,
    records: Vec<Record>,
}

impl<T: HciTransport> HciTransport for Recorder<T> {
    type Error = T::Error;

    fn send_sync(&mut self, opcode: Opcode, params: &[u8]) -> Result<u8, T::Error> {
        let result = self.inner.send_sync(opcode, params);
        self.records.push(Record {
            opcode,
            payload: params.to_vec(),
            status: result.as_ref().ok().copied(),
        });
        result
    }
}

/// No controller attached; every command succeeds.
struct Offline;

impl HciTransport for Offline {
    type Error = Infallible;

    fn send_sync(&mut self, _opcode: Opcode, _params: &[u8]) -> Result<u8, Infallible> {
        Ok(0x00)
    }
}

/// Serial device opened read/write.
struct Serial(File);

impl embedded_io::ErrorType for Serial {
    type Error = io::Error;
}

impl embedded_io::Read for Serial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, io::Error> {
        io::Read::read(&mut self.0, buf)
    }
}

impl embedded_io::Write for Serial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, io::Error> {
        io::Write::write(&mut self.0, buf)
    }

    fn flush(&mut self) -> Result<(), io::Error> {
        io::Write::flush(&mut self.0)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let (records, report) = match &args.device {
        Some(path) => {
            let tty = OpenOptions::new()
                .read(true)
                .write(true)
                .open(path)
                .with_context(|| format!("Failed to open device {}", path.display()))?;
            info!("Sending to {}", path.display());
            bring_up(&args, H4Transport::new(Serial(tty)))?
        }
        None => bring_up(&args, Offline)?,
    };

    print_report(&records, &report);

    if let Some(path) = &args.output {
        let out = encode_records(&records)?;
        std::fs::write(path, &out)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote {} bytes to {}", out.len(), path.display());
    }

    Ok(())
}

fn bring_up<T: HciTransport>(args: &Args, transport: T) -> Result<(Vec<Record>, BringUpReport)> {
    if !args.dir.is_dir() {
        anyhow::bail!("{} is not a directory", args.dir.display());
    }

    let pskey_path = format!("{}/{}", DEFAULT_MOUNT_POINT, args.pskey);
    let rf_path = format!("{}/{}", DEFAULT_MOUNT_POINT, args.rf);
    let config = BringUpConfig::new()
        .pskey_path(&pskey_path)
        .rf_path(&rf_path)
        .seed_vendor_defaults(args.seed_defaults)
        .randomize_address(!args.no_randomize);

    let mut fs = StdFs::new(&args.dir);
    let mut recorder = Recorder {
        inner: transport,
        records: Vec::new(),
    };

    let (_, _, report) = BringUp::new(config)
        .run_owned(&mut fs, &mut OsRng, &mut recorder)
        .context("Bring-up failed")?;

    for (name, load) in [("pskey", &report.pskey), ("rf", &report.rf)] {
        if !load.found {
            warn!("{} file not found, defaults were sent", name);
        }
    }

    Ok((recorder.records, report))
}

/// `opcode(LE) len payload` per record.
fn encode_records(records: &[Record]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    for record in records {
        let len = u8::try_from(record.payload.len())
            .context("Command payload longer than 255 bytes")?;
        out.extend_from_slice(&record.opcode.to_le_bytes());
        out.push(len);
        out.extend_from_slice(&record.payload);
    }
    Ok(out)
}

fn print_report(records: &[Record], report: &BringUpReport) {
    for (name, load) in [("pskey", &report.pskey), ("rf", &report.rf)] {
        println!(
            "{:<5} found={} lines={} applied={} unknown={} missing={} malformed={}",
            name,
            load.found,
            load.lines,
            load.applied,
            load.unknown_keys,
            load.missing_value,
            load.malformed
        );
    }
    println!("bd_addr {}", report.bd_addr);
    if report.send_failures > 0 {
        println!("send failures: {}", report.send_failures);
    }

    for record in records {
        let status = match record.status {
            Some(status) => format!("0x{:02X}", status),
            None => "error".to_owned(),
        };
        println!(
            "\n{} len={} status={}",
            record.opcode,
            record.payload.len(),
            status
        );
        for chunk in record.payload.chunks(16) {
            let line: Vec<String> = chunk.iter().map(|b| format!("{:02X}", b)).collect();
            println!("  {}", line.join(" "));
        }
    }
}
