//! mcp3001 - Read one sample from an MCP3001 ADC
//!
//! Configures a Linux spidev bus for the converter, clocks a single frame
//! out of it and prints the verified 10-bit result as `HHH (decimal)`.
//!
//! The converter sends its result twice, MSB first and then LSB first. A
//! read is only reported when both copies agree; otherwise the tool exits
//! with status 1 and prints both values.

mod cli;

use clap::Parser;
use cli::Cli;
use mcp3001_core::{HexDump, Mcp3001, Sample, SpiController, TransferConfig};
use mcp3001_linux_spi::LinuxSpi;
use std::error::Error;
use std::process::ExitCode;

/// Bytes per line in the verbose frame dump
const DUMP_LINE_SIZE: usize = 24;

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version go to stdout and are not failures
            let code = if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
            let _ = e.print();
            return code;
        }
    };

    // Initialize logger, verbosity beyond -v raises the log level
    let level = match cli.verbose {
        0 | 1 => "warn",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&cli) {
        Ok(sample) => {
            println!("{}", sample);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("mcp3001: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Open the bus named on the command line and take one reading
fn run(cli: &Cli) -> Result<Sample, Box<dyn Error>> {
    let mut config = cli.transfer_config();

    #[cfg(feature = "dummy")]
    if let Some(options) = mcp3001_dummy::split_device(&cli.device) {
        let dummy = mcp3001_dummy::DummyAdc::new(mcp3001_dummy::parse_options(&options)?);
        log::info!("Using emulated MCP3001");
        return acquire(dummy, &mut config, cli.verbose);
    }

    let spi = LinuxSpi::open(&cli.device)?;
    acquire(spi, &mut config, cli.verbose)
}

/// Configure, capture and decode; the bus is released on every path
fn acquire<C>(ctrl: C, config: &mut TransferConfig, verbose: u8) -> Result<Sample, Box<dyn Error>>
where
    C: SpiController,
    C::Error: Error + 'static,
{
    let mut adc = Mcp3001::new(ctrl);

    adc.configure(config)?;
    if verbose > 0 {
        println!("{}", config);
    }

    let frame = adc.capture()?;
    if verbose > 0 {
        print!("{}", HexDump::new(frame.as_bytes(), DUMP_LINE_SIZE, "RX"));
    }

    Ok(frame.decode()?)
}
