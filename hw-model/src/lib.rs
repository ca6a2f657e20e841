// Licensed under the Apache-2.0 license

use std::error::Error;
use std::fmt::Display;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};

use caravel_emu_bus::Bus;
use caravel_test_harness_types::STATUS_FIRMWARE_PANIC;

mod bus_logger;
pub mod mmio;
mod model_emulated;
mod output;

use mmio::BusMmio;

pub use bus_logger::{BusLogger, LogFile};
pub use caravel_emu_periph::AccessCounts;
pub use caravel_hw_model_types::{SramFault, SramFaultMode};
pub use model_emulated::{EmulatedWbBus, ModelEmulated};
pub use output::{ExitStatus, Output, OutputSink, StatusChange};

pub type DefaultHwModel = ModelEmulated;

/// How long the harness waits for each expected status value.
pub const DEFAULT_TIMEOUT_CYCLES: u64 = 40_000;

/// Firmware still running after this many cycles is stopped.
pub const DEFAULT_MAX_CYCLES: u64 = 10_000_000;

pub struct InitParams<'a> {
    /// Faults attached to user-project SRAM words before anything runs.
    pub sram_faults: &'a [SramFault],

    /// Receives the status timeline and other model messages.
    pub log_writer: Box<dyn std::io::Write>,

    /// Receives a line per wishbone access, if set.
    pub bus_log: Option<Box<dyn std::io::Write>>,

    pub max_cycles: u64,
}
impl<'a> Default for InitParams<'a> {
    fn default() -> Self {
        Self {
            sram_faults: &[],
            log_writer: Box::new(std::io::stdout()),
            bus_log: None,
            max_cycles: DEFAULT_MAX_CYCLES,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ModelError {
    StatusTimeout {
        expected: u8,
        timeout_cycles: u64,
        last: Option<u8>,
    },
    CycleLimitExceeded(u64),
    FirmwarePanic(String),
    NoExitStatus,
}
impl Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::StatusTimeout {
                expected,
                timeout_cycles,
                last: Some(last),
            } => write!(
                f,
                "Timed out after {timeout_cycles} cycles waiting for status 0x{expected:02x}; last status was 0x{last:02x}"
            ),
            ModelError::StatusTimeout {
                expected,
                timeout_cycles,
                last: None,
            } => write!(
                f,
                "Timed out after {timeout_cycles} cycles waiting for status 0x{expected:02x}; no status was driven"
            ),
            ModelError::CycleLimitExceeded(limit) => {
                write!(f, "Firmware still running after {limit} cycles")
            }
            ModelError::FirmwarePanic(msg) => write!(f, "Firmware panicked: {msg}"),
            ModelError::NoExitStatus => write!(f, "Firmware finished without a final status"),
        }
    }
}
impl Error for ModelError {}

/// Panic payload raised by a model's bus when the firmware runs out of
/// cycles.
pub struct CycleLimitExceeded(pub u64);

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".into()
    }
}

// Represents an emulator or simulation of the Caravel SoC, to be called from
// tests.
pub trait HwModel {
    type TBus: Bus;

    fn init(params: InitParams) -> Result<Self, Box<dyn Error>>
    where
        Self: Sized;

    /// The wishbone bus as seen by the management core.
    ///
    /// Every access through this bus takes one cycle.
    fn wb_bus(&mut self) -> Self::TBus;

    fn cycle_count(&self) -> u64;

    /// Every value driven onto the management GPIO is recorded here.
    fn output(&mut self) -> &mut Output;

    /// Stop enforcing `InitParams::max_cycles`. Called before the model
    /// itself drives the bus after the firmware has stopped.
    fn disable_cycle_limit(&mut self);

    /// Read and write counts of the user-project SRAM word at `addr`.
    fn sram_access_counts(&self, addr: u32) -> Option<AccessCounts>;

    /// Run a firmware entry point on the wishbone bus until it returns.
    ///
    /// A panic in the firmware is reported the same way the firmware panic
    /// handler does it: `STATUS_FIRMWARE_PANIC` on the management GPIO.
    fn run_firmware(&mut self, fw: impl FnOnce(&BusMmio<Self::TBus>)) -> Result<(), Box<dyn Error>>
    where
        Self: Sized,
    {
        let mmio = BusMmio::new(self.wb_bus());
        let result = panic::catch_unwind(AssertUnwindSafe(|| fw(&mmio)));
        drop(mmio);
        let payload = match result {
            Ok(()) => return Ok(()),
            Err(payload) => payload,
        };
        if let Some(CycleLimitExceeded(limit)) = payload.downcast_ref::<CycleLimitExceeded>() {
            return Err(ModelError::CycleLimitExceeded(*limit).into());
        }

        let msg = panic_message(&*payload);
        writeln!(self.output().logger(), "Firmware panic: {msg}")?;
        self.disable_cycle_limit();
        let gpio = self.mgmt_gpio();
        gpio.oe().write(|w| w.en(true));
        gpio.out().write(|_| STATUS_FIRMWARE_PANIC.into());
        Err(ModelError::FirmwarePanic(msg).into())
    }

    /// Wait for `value` on the management GPIO, at most `timeout_cycles`
    /// after the previous successful wait. Returns the cycle it was driven.
    fn wait_mgmt_gpio(&mut self, value: u8, timeout_cycles: u64) -> Result<u64, Box<dyn Error>> {
        Ok(self.output().wait_for(value, timeout_cycles)?)
    }

    /// The final status of the run.
    fn exit_status(&mut self) -> Result<ExitStatus, Box<dyn Error>> {
        Ok(self
            .output()
            .exit_status()
            .ok_or(ModelError::NoExitStatus)?)
    }

    /// A register block that can be used to manipulate the management GPIO
    /// over the wishbone bus.
    fn mgmt_gpio(&mut self) -> caravel_registers::mgmt_gpio::RegisterBlock<BusMmio<Self::TBus>> {
        unsafe {
            caravel_registers::mgmt_gpio::RegisterBlock::new_with_mmio(
                caravel_registers::mgmt_gpio::MGMT_GPIO_ADDR as *mut u32,
                BusMmio::new(self.wb_bus()),
            )
        }
    }
}
