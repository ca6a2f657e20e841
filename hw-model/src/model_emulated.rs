// Licensed under the Apache-2.0 license

use std::cell::RefCell;
use std::error::Error;
use std::rc::Rc;

use caravel_emu_bus::{Bus, BusError};
use caravel_emu_periph::{AccessCounts, CaravelRootBus, CaravelRootBusArgs, MgmtGpioCb};
use caravel_emu_types::{RvAddr, RvData, RvSize};

use crate::bus_logger::BusLogger;
use crate::output::OutputSink;
use crate::{CycleLimitExceeded, HwModel, InitParams, Output};

struct CaravelEmulator {
    bus: BusLogger<CaravelRootBus>,
    cycles: u64,
    max_cycles: u64,
    limit_reported: bool,
    output_sink: OutputSink,
}

impl CaravelEmulator {
    /// Advance the clock by the cycle a bus access takes.
    fn tick(&mut self) {
        self.cycles += 1;
        self.output_sink.set_now(self.cycles);
        self.bus.poll();
        if self.cycles > self.max_cycles && !self.limit_reported {
            self.limit_reported = true;
            std::panic::panic_any(CycleLimitExceeded(self.max_cycles));
        }
    }
}

#[derive(Clone)]
pub struct EmulatedWbBus {
    emu: Rc<RefCell<CaravelEmulator>>,
}

impl Bus for EmulatedWbBus {
    fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        let mut emu = self.emu.borrow_mut();
        emu.tick();
        emu.bus.read(size, addr)
    }

    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        let mut emu = self.emu.borrow_mut();
        emu.tick();
        emu.bus.write(size, addr, val)
    }
}

pub struct ModelEmulated {
    emu: Rc<RefCell<CaravelEmulator>>,
    output: Output,
}

impl HwModel for ModelEmulated {
    type TBus = EmulatedWbBus;

    fn init(params: InitParams) -> Result<Self, Box<dyn Error>>
    where
        Self: Sized,
    {
        let output = Output::new_internal(params.log_writer);
        let output_sink = output.sink().clone();
        let gpio_sink = output_sink.clone();

        let root_bus = CaravelRootBus::new(CaravelRootBusArgs {
            mgmt_gpio_cb: MgmtGpioCb::new(move |val| gpio_sink.push_mgmt_gpio(val)),
            sram_faults: params.sram_faults.to_vec(),
        })
        .map_err(|_| "SRAM fault address is not a word in the user-project SRAMs")?;
        let mut bus = BusLogger::new(root_bus);
        bus.log = params.bus_log;

        Ok(Self {
            emu: Rc::new(RefCell::new(CaravelEmulator {
                bus,
                cycles: 0,
                max_cycles: params.max_cycles,
                limit_reported: false,
                output_sink,
            })),
            output,
        })
    }

    fn wb_bus(&mut self) -> Self::TBus {
        EmulatedWbBus {
            emu: self.emu.clone(),
        }
    }

    fn cycle_count(&self) -> u64 {
        self.emu.borrow().cycles
    }

    fn output(&mut self) -> &mut Output {
        &mut self.output
    }

    fn disable_cycle_limit(&mut self) {
        self.emu.borrow_mut().limit_reported = true;
    }

    fn sram_access_counts(&self, addr: u32) -> Option<AccessCounts> {
        self.emu.borrow().bus.bus.sram_access_counts(addr)
    }
}

#[cfg(test)]
mod tests {
    use caravel_emu_bus::testing::Log;
    use caravel_emu_bus::Bus;
    use caravel_emu_types::RvSize;
    use caravel_registers::USER_SPACE_ADDR;

    use crate::{ExitStatus, HwModel, InitParams, ModelEmulated, SramFault, StatusChange};

    const WISHBONE_ADDR: u32 = 0xf000_9800;

    fn model() -> ModelEmulated {
        ModelEmulated::init(InitParams {
            log_writer: Box::new(std::io::sink()),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_wb_bus() {
        let mut model = model();

        assert!(model.wb_bus().read(RvSize::Word, USER_SPACE_ADDR).is_err());
        model.wb_bus().write(RvSize::Word, WISHBONE_ADDR, 1).unwrap();
        model
            .wb_bus()
            .write(RvSize::Word, USER_SPACE_ADDR + 0x1_fffc, 0xabcd_ef00)
            .unwrap();
        assert_eq!(
            model.wb_bus().read(RvSize::Word, USER_SPACE_ADDR + 0x1_fffc),
            Ok(0xabcd_ef00)
        );
        assert_eq!(model.cycle_count(), 4);

        let counts = model.sram_access_counts(USER_SPACE_ADDR + 0x1_fffc).unwrap();
        assert_eq!((counts.reads, counts.writes), (1, 1));
        assert_eq!(model.sram_access_counts(WISHBONE_ADDR), None);
    }

    #[test]
    fn test_mgmt_gpio() {
        let mut model = model();

        // Not driven until the output is enabled
        model.mgmt_gpio().out().write(|_| 0x01);
        assert_eq!(model.output().current(), None);

        model.mgmt_gpio().oe().write(|w| w.en(true));
        model.mgmt_gpio().out().write(|_| 0xab);
        assert_eq!(
            model.output().history(),
            &[StatusChange {
                cycle: 3,
                value: 0xab
            }]
        );
        assert_eq!(model.exit_status().unwrap(), ExitStatus::Passed);
    }

    #[test]
    fn test_status_log_and_bus_log() {
        let log = Log::new();
        let bus_log = Log::new();
        let mut model = ModelEmulated::init(InitParams {
            log_writer: Box::new(log.clone()),
            bus_log: Some(Box::new(bus_log.clone())),
            ..Default::default()
        })
        .unwrap();

        model.mgmt_gpio().oe().write(|w| w.en(true));
        model.mgmt_gpio().out().write(|_| 0xcc);
        assert_eq!(
            log.take(),
            "          2 MGMT_GPIO: 0xcc\n* TESTCASE FAILED: SRAM 1 begin read mismatch\n"
        );
        assert_eq!(
            bus_log.take(),
            "WB write4 *0xf000380c <- 0x1\nWB write4 *0xf0003814 <- 0xcc\n"
        );
    }

    #[test]
    fn test_run_firmware() {
        let mut model = model();
        model
            .run_firmware(|mmio| {
                let gpio = unsafe {
                    caravel_registers::mgmt_gpio::RegisterBlock::new_with_mmio(
                        caravel_registers::mgmt_gpio::MGMT_GPIO_ADDR as *mut u32,
                        mmio,
                    )
                };
                gpio.oe().write(|w| w.en(true));
                gpio.out().write(|_| 0x01);
            })
            .unwrap();
        assert_eq!(model.wait_mgmt_gpio(0x01, 10).unwrap(), 2);
        assert_eq!(
            model.exit_status().err().unwrap().to_string(),
            "Firmware finished without a final status"
        );
    }

    #[test]
    fn test_firmware_panic() {
        let mut model = model();
        let err = model
            .run_firmware(|_| panic!("out of cheese"))
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "Firmware panicked: out of cheese");
        assert_eq!(model.output().current(), Some(0xfe));
        assert_eq!(model.exit_status().unwrap(), ExitStatus::Failed(0xfe));
    }

    #[test]
    fn test_bus_fault_is_a_firmware_panic() {
        let mut model = model();
        // The wishbone bridge is still disabled
        let err = model
            .run_firmware(|mmio| unsafe {
                ureg::Mmio::read_volatile(mmio, USER_SPACE_ADDR as *const u32);
            })
            .err()
            .unwrap();
        assert_eq!(
            err.to_string(),
            "Firmware panicked: Bus fault reading 0x30000000: load access fault"
        );
        assert_eq!(model.exit_status().unwrap(), ExitStatus::Failed(0xfe));
    }

    #[test]
    fn test_cycle_limit() {
        let mut model = ModelEmulated::init(InitParams {
            log_writer: Box::new(std::io::sink()),
            max_cycles: 100,
            ..Default::default()
        })
        .unwrap();
        let err = model
            .run_firmware(|mmio| loop {
                unsafe { ureg::Mmio::read_volatile(mmio, WISHBONE_ADDR as *const u32) };
            })
            .err()
            .unwrap();
        assert_eq!(err.to_string(), "Firmware still running after 100 cycles");
        assert_eq!(model.cycle_count(), 101);
        assert_eq!(model.output().current(), None);
    }

    #[test]
    fn test_firmware_panic_at_cycle_limit() {
        let mut model = ModelEmulated::init(InitParams {
            log_writer: Box::new(std::io::sink()),
            max_cycles: 2,
            ..Default::default()
        })
        .unwrap();
        // Faults on the first cycle; reporting it takes two more
        let err = model
            .run_firmware(|mmio| unsafe {
                ureg::Mmio::read_volatile(mmio, USER_SPACE_ADDR as *const u32);
            })
            .err()
            .unwrap();
        assert_eq!(
            err.to_string(),
            "Firmware panicked: Bus fault reading 0x30000000: load access fault"
        );
        assert_eq!(model.cycle_count(), 3);
        assert_eq!(model.exit_status().unwrap(), ExitStatus::Failed(0xfe));
    }

    #[test]
    fn test_fault_outside_sram() {
        let result = ModelEmulated::init(InitParams {
            sram_faults: &[SramFault::stuck_at(0x3003_0000, 0)],
            log_writer: Box::new(std::io::sink()),
            ..Default::default()
        });
        assert!(result.is_err());
    }
}
