/*++

Licensed under the Apache-2.0 license.

File Name:

    main.rs

Abstract:

    File contains main entrypoint for the Caravel SRAM test emulator.

--*/

use caravel_hw_model::{
    DefaultHwModel, ExitStatus, HwModel, InitParams, LogFile, SramFault, DEFAULT_TIMEOUT_CYCLES,
};
use caravel_hw_model_types::{parse_u32, AddrValue};
use caravel_test_fw::sram;
use caravel_test_harness_types::{STATUS_CONFIGURED, STATUS_SRAM_PASSED};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::io;
use std::panic;
use std::path::PathBuf;
use std::process::exit;

fn parse_addr_value(s: &str) -> Result<AddrValue, String> {
    s.parse().map_err(|e| format!("{e}, expected ADDR=VALUE"))
}

fn parse_addr(s: &str) -> Result<u32, String> {
    parse_u32(s).map_err(|e| e.to_string())
}

fn cli() -> Command<'static> {
    Command::new("caravel-emu")
        .about("Runs the Caravel SRAM test on an emulated SoC")
        .arg(
            Arg::new("stuck-at")
                .long("stuck-at")
                .value_name("ADDR=VALUE")
                .help("Every read of the SRAM word at ADDR returns VALUE")
                .takes_value(true)
                .action(ArgAction::Append)
                .value_parser(parse_addr_value),
        )
        .arg(
            Arg::new("flip")
                .long("flip")
                .value_name("ADDR=MASK")
                .help("Reads of the SRAM word at ADDR have the bits in MASK inverted")
                .takes_value(true)
                .action(ArgAction::Append)
                .value_parser(parse_addr_value),
        )
        .arg(
            Arg::new("drop-writes")
                .long("drop-writes")
                .value_name("ADDR")
                .help("Writes to the SRAM word at ADDR are ignored")
                .takes_value(true)
                .action(ArgAction::Append)
                .value_parser(parse_addr),
        )
        .arg(
            Arg::new("bus-log")
                .long("bus-log")
                .value_name("FILE")
                .help("Log every wishbone access to FILE")
                .takes_value(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("timeout-cycles")
                .long("timeout-cycles")
                .value_name("N")
                .help("Cycles to wait for each expected status value")
                .takes_value(true)
                .default_value("40000")
                .value_parser(clap::value_parser!(u64)),
        )
}

fn sram_faults(args: &ArgMatches) -> Vec<SramFault> {
    let mut faults = vec![];
    if let Some(values) = args.get_many::<AddrValue>("stuck-at") {
        faults.extend(values.map(|av| SramFault::stuck_at(av.addr, av.value)));
    }
    if let Some(values) = args.get_many::<AddrValue>("flip") {
        faults.extend(values.map(|av| SramFault::flip_bits(av.addr, av.value)));
    }
    if let Some(addrs) = args.get_many::<u32>("drop-writes") {
        faults.extend(addrs.map(|addr| SramFault::drop_writes(*addr)));
    }
    faults
}

/// Run `f` with the default panic hook silenced. Firmware panics are caught
/// by the model and reported with a single line instead.
fn with_quiet_panics<R>(f: impl FnOnce() -> R) -> R {
    let prev_hook = panic::take_hook();
    panic::set_hook(Box::new(|_| {}));
    let result = f();
    panic::set_hook(prev_hook);
    result
}

/// Returns true if the test reported a pass within the timeout.
fn run_sram_test(model: &mut DefaultHwModel, timeout_cycles: u64) -> bool {
    let ran = with_quiet_panics(|| {
        model.run_firmware(|mmio| {
            let _ = sram::run(mmio);
        })
    });
    if let Err(e) = ran {
        println!("{e}");
    }

    let waited = model
        .wait_mgmt_gpio(STATUS_CONFIGURED, timeout_cycles)
        .and_then(|_| model.wait_mgmt_gpio(STATUS_SRAM_PASSED, timeout_cycles));
    match waited {
        Ok(_) => true,
        Err(e) => {
            // Failure codes were already reported by the model's log
            if !matches!(model.exit_status(), Ok(ExitStatus::Failed(_))) {
                println!("{e}");
            }
            false
        }
    }
}

fn main() -> io::Result<()> {
    let args = cli().get_matches();

    let faults = sram_faults(&args);
    for fault in faults.iter() {
        println!("SRAM fault: {fault}");
    }

    let bus_log: Option<Box<dyn io::Write>> = match args.get_one::<PathBuf>("bus-log") {
        Some(path) => Some(Box::new(LogFile::open(path)?)),
        None => None,
    };
    let timeout_cycles = args
        .get_one::<u64>("timeout-cycles")
        .copied()
        .unwrap_or(DEFAULT_TIMEOUT_CYCLES);

    let mut model = match DefaultHwModel::init(InitParams {
        sram_faults: &faults,
        bus_log,
        ..Default::default()
    }) {
        Ok(model) => model,
        Err(e) => {
            println!("{e}");
            exit(-1);
        }
    };

    let passed = run_sram_test(&mut model, timeout_cycles);
    println!("Finished after {} cycles", model.cycle_count());
    exit(if passed { 0 } else { 1 });
}
