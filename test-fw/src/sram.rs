/*++

Licensed under the Apache-2.0 license.

File Name:

    sram.rs

Abstract:

    File contains the SRAM acceptance test: bring-up, pattern writes to the
    first and last word of each user-project SRAM, read-back and status
    reporting on the management GPIO.

--*/

use caravel_drivers::{GpioMode, Gpios, HousekeepingSpi, ManagementGpio, UserInterface, UserSpace};
use caravel_error::{CaravelError, CaravelResult};
use caravel_test_harness_types::{
    STATUS_CONFIGURED, STATUS_FIRMWARE_PANIC, STATUS_RESET, STATUS_SRAM0_BEGIN_MISMATCH,
    STATUS_SRAM0_END_MISMATCH, STATUS_SRAM1_BEGIN_MISMATCH, STATUS_SRAM1_END_MISMATCH,
    STATUS_SRAM2_BEGIN_MISMATCH, STATUS_SRAM2_END_MISMATCH, STATUS_SRAM_PASSED,
};
use ureg::Mmio;

/// Offsets of the SRAM instances within user space.
pub const SRAM0_BASE: u32 = 0x0000_0000;
pub const SRAM1_BASE: u32 = 0x0001_0000;
pub const SRAM2_BASE: u32 = 0x0002_0000;

/// Size of one SRAM instance in bytes (16384 words).
pub const SRAM_SIZE: u32 = 0x0001_0000;

/// Offset of the last word of an instance.
pub const SRAM_LAST_WORD: u32 = SRAM_SIZE - 4;

pub const TEST_PATTERN_1: u32 = 0xDEAD_BEEF;
pub const TEST_PATTERN_2: u32 = 0xCAFE_BABE;
pub const TEST_PATTERN_3: u32 = 0x1234_5678;
pub const TEST_PATTERN_4: u32 = 0xABCD_EF00;

/// One word written, then read back and compared.
#[derive(Clone, Copy, Debug)]
pub struct SramCheck {
    /// Byte offset from the start of user space.
    pub offset: u32,
    pub pattern: u32,

    /// Status value reported when the read-back differs.
    pub fail_code: u8,
    pub error: CaravelError,
}

/// Writes happen in this order, then reads in this order. Regions 0 and 2
/// use the same two patterns with the positions swapped.
pub const SRAM_CHECKS: [SramCheck; 6] = [
    SramCheck {
        offset: SRAM0_BASE,
        pattern: TEST_PATTERN_1,
        fail_code: STATUS_SRAM0_BEGIN_MISMATCH,
        error: CaravelError::SRAM_TEST_SRAM0_BEGIN_MISMATCH,
    },
    SramCheck {
        offset: SRAM0_BASE + SRAM_LAST_WORD,
        pattern: TEST_PATTERN_2,
        fail_code: STATUS_SRAM0_END_MISMATCH,
        error: CaravelError::SRAM_TEST_SRAM0_END_MISMATCH,
    },
    SramCheck {
        offset: SRAM1_BASE,
        pattern: TEST_PATTERN_3,
        fail_code: STATUS_SRAM1_BEGIN_MISMATCH,
        error: CaravelError::SRAM_TEST_SRAM1_BEGIN_MISMATCH,
    },
    SramCheck {
        offset: SRAM1_BASE + SRAM_LAST_WORD,
        pattern: TEST_PATTERN_4,
        fail_code: STATUS_SRAM1_END_MISMATCH,
        error: CaravelError::SRAM_TEST_SRAM1_END_MISMATCH,
    },
    SramCheck {
        offset: SRAM2_BASE,
        pattern: TEST_PATTERN_4,
        fail_code: STATUS_SRAM2_BEGIN_MISMATCH,
        error: CaravelError::SRAM_TEST_SRAM2_BEGIN_MISMATCH,
    },
    SramCheck {
        offset: SRAM2_BASE + SRAM_LAST_WORD,
        pattern: TEST_PATTERN_1,
        fail_code: STATUS_SRAM2_END_MISMATCH,
        error: CaravelError::SRAM_TEST_SRAM2_END_MISMATCH,
    },
];

/// Configure the chip for the test and drive `STATUS_CONFIGURED`.
///
/// The status pin reads `STATUS_RESET` from the moment its output is enabled
/// until the wishbone bridge is up.
pub fn bring_up<TMmio: Mmio + Copy>(mmio: TMmio) {
    let mut status = ManagementGpio::new_with_mmio(mmio);
    status.output_enable();
    status.write(STATUS_RESET);

    HousekeepingSpi::new_with_mmio(mmio).enable(false);

    let mut gpios = Gpios::new_with_mmio(mmio);
    gpios.configure_all(GpioMode::UserStdOutMonitored);
    gpios.load_configs();

    UserInterface::new_with_mmio(mmio).enable();

    status.write(STATUS_CONFIGURED);
}

/// Write every pattern. Must complete before `verify_patterns`.
pub fn write_patterns<TMmio: Mmio>(user_space: &mut UserSpace<TMmio>) {
    for check in SRAM_CHECKS.iter() {
        user_space.write_word(check.offset, check.pattern);
    }
}

/// Read back every pattern, stopping at the first mismatch.
pub fn verify_patterns<TMmio: Mmio>(user_space: &UserSpace<TMmio>) -> CaravelResult<()> {
    for check in SRAM_CHECKS.iter() {
        if user_space.read_word(check.offset) != check.pattern {
            return Err(check.error);
        }
    }
    Ok(())
}

/// Status value for the outcome of `verify_patterns`.
pub fn status_code(result: CaravelResult<()>) -> u8 {
    match result {
        Ok(()) => STATUS_SRAM_PASSED,
        Err(err) => SRAM_CHECKS
            .iter()
            .find(|check| check.error == err)
            .map_or(STATUS_FIRMWARE_PANIC, |check| check.fail_code),
    }
}

pub fn report<TMmio: Mmio>(status: &mut ManagementGpio<TMmio>, result: CaravelResult<()>) {
    status.write(status_code(result));
}

/// The whole test. Returns the verification outcome after it has been
/// driven onto the status pin.
pub fn run<TMmio: Mmio + Copy>(mmio: TMmio) -> CaravelResult<()> {
    bring_up(mmio);

    let mut user_space = UserSpace::new_with_mmio(mmio);
    write_patterns(&mut user_space);
    let result = verify_patterns(&user_space);

    report(&mut ManagementGpio::new_with_mmio(mmio), result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use caravel_registers::{
        housekeeping::HOUSEKEEPING_ADDR, mgmt_gpio::MGMT_GPIO_ADDR, wishbone::WISHBONE_ADDR,
        USER_SPACE_ADDR,
    };
    use std::cell::RefCell;
    use std::collections::HashMap;
    use ureg::Uint;

    const MGMT_GPIO_OUT: u32 = MGMT_GPIO_ADDR + 0x14;

    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    enum Access {
        Read(u32),
        Write(u32, u32),
    }

    /// Flat memory that records every access and can corrupt reads.
    #[derive(Default)]
    struct FakeSoc {
        mem: RefCell<HashMap<u32, u32>>,
        corrupt: HashMap<u32, u32>,
        log: RefCell<Vec<Access>>,
    }
    impl FakeSoc {
        fn user_accesses(&self) -> Vec<Access> {
            let user = USER_SPACE_ADDR..USER_SPACE_ADDR + 3 * SRAM_SIZE;
            self.log
                .borrow()
                .iter()
                .copied()
                .filter(|a| match a {
                    Access::Read(addr) | Access::Write(addr, _) => user.contains(addr),
                })
                .collect()
        }

        fn status_writes(&self) -> Vec<u32> {
            self.log
                .borrow()
                .iter()
                .filter_map(|a| match a {
                    Access::Write(MGMT_GPIO_OUT, val) => Some(*val),
                    _ => None,
                })
                .collect()
        }

        fn index_of(&self, access: Access) -> Option<usize> {
            self.log.borrow().iter().position(|a| *a == access)
        }
    }
    impl Mmio for FakeSoc {
        unsafe fn read_volatile<T: Uint>(&self, src: *const T) -> T {
            let addr = src as usize as u32;
            self.log.borrow_mut().push(Access::Read(addr));
            let val = self.mem.borrow().get(&addr).copied().unwrap_or(0);
            T::from_u32(self.corrupt.get(&addr).map_or(val, |mask| val ^ mask))
        }
        unsafe fn write_volatile<T: Uint>(&self, dst: *mut T, src: T) {
            let addr = dst as usize as u32;
            self.log.borrow_mut().push(Access::Write(addr, src.to_u32()));
            // Pad configuration transfers finish instantly.
            if addr != HOUSEKEEPING_ADDR {
                self.mem.borrow_mut().insert(addr, src.to_u32());
            }
        }
    }

    #[test]
    fn test_table() {
        let codes: Vec<u8> = SRAM_CHECKS.iter().map(|c| c.fail_code).collect();
        assert_eq!(codes, vec![0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
        let offsets: Vec<u32> = SRAM_CHECKS.iter().map(|c| c.offset).collect();
        assert_eq!(
            offsets,
            vec![0x0_0000, 0x0_fffc, 0x1_0000, 0x1_fffc, 0x2_0000, 0x2_fffc]
        );
        assert_eq!(SRAM_CHECKS[0].pattern, SRAM_CHECKS[5].pattern);
        assert_eq!(SRAM_CHECKS[3].pattern, SRAM_CHECKS[4].pattern);
    }

    #[test]
    fn test_all_pass() {
        let soc = FakeSoc::default();
        assert_eq!(run(&soc), Ok(()));
        assert_eq!(soc.status_writes(), vec![0x00, 0x01, 0xAB]);

        let accesses = soc.user_accesses();
        let writes: Vec<Access> = SRAM_CHECKS
            .iter()
            .map(|c| Access::Write(USER_SPACE_ADDR + c.offset, c.pattern))
            .collect();
        let reads: Vec<Access> = SRAM_CHECKS
            .iter()
            .map(|c| Access::Read(USER_SPACE_ADDR + c.offset))
            .collect();
        assert_eq!(accesses[..6], writes[..]);
        assert_eq!(accesses[6..], reads[..]);
    }

    #[test]
    fn test_bring_up_order() {
        let soc = FakeSoc::default();
        bring_up(&soc);

        let oe = soc.index_of(Access::Write(MGMT_GPIO_ADDR + 0x0c, 1)).unwrap();
        let reset = soc.index_of(Access::Write(MGMT_GPIO_OUT, 0)).unwrap();
        let hkspi = soc.index_of(Access::Write(0x2620_0010, 1)).unwrap();
        let last_pad = soc
            .index_of(Access::Write(HOUSEKEEPING_ADDR + 0x24 + 37 * 4, 0x1802))
            .unwrap();
        let xfer = soc.index_of(Access::Write(HOUSEKEEPING_ADDR, 1)).unwrap();
        let wb = soc.index_of(Access::Write(WISHBONE_ADDR, 1)).unwrap();
        let configured = soc.index_of(Access::Write(MGMT_GPIO_OUT, 1)).unwrap();
        assert!(oe < reset);
        assert!(reset < hkspi);
        assert!(hkspi < last_pad);
        assert!(last_pad < xfer);
        assert!(xfer < wb);
        assert!(wb < configured);
        assert!(soc.user_accesses().is_empty());
    }

    #[test]
    fn test_each_check_fails_with_its_code() {
        for (i, check) in SRAM_CHECKS.iter().enumerate() {
            let soc = FakeSoc {
                corrupt: HashMap::from([(USER_SPACE_ADDR + check.offset, 1)]),
                ..Default::default()
            };
            assert_eq!(run(&soc), Err(check.error));
            assert_eq!(
                soc.status_writes(),
                vec![0x00, 0x01, u32::from(check.fail_code)]
            );

            // All six writes, then reads up to and including the failing one.
            let accesses = soc.user_accesses();
            assert_eq!(accesses.len(), 6 + i + 1);
            assert_eq!(
                accesses.last(),
                Some(&Access::Read(USER_SPACE_ADDR + check.offset))
            );
        }
    }

    #[test]
    fn test_sram1_end_stuck_skips_sram2_reads() {
        let soc = FakeSoc {
            corrupt: HashMap::from([(USER_SPACE_ADDR + 0x1_fffc, TEST_PATTERN_4)]),
            ..Default::default()
        };
        assert_eq!(run(&soc), Err(CaravelError::SRAM_TEST_SRAM1_END_MISMATCH));
        assert_eq!(soc.status_writes().last(), Some(&0xDD));
        assert!(!soc
            .user_accesses()
            .iter()
            .any(|a| matches!(a, Access::Read(addr) if *addr >= USER_SPACE_ADDR + SRAM2_BASE)));
    }

    #[test]
    fn test_status_code() {
        assert_eq!(status_code(Ok(())), 0xAB);
        assert_eq!(
            status_code(Err(CaravelError::SRAM_TEST_SRAM2_BEGIN_MISMATCH)),
            0xEE
        );
        assert_eq!(
            status_code(Err(CaravelError::DRIVER_GPIO_INVALID_PIN)),
            STATUS_FIRMWARE_PANIC
        );
    }

    #[test]
    fn test_verify_without_writes() {
        let soc = FakeSoc::default();
        let user_space = UserSpace::new_with_mmio(&soc);
        assert_eq!(
            verify_patterns(&user_space),
            Err(CaravelError::SRAM_TEST_SRAM0_BEGIN_MISMATCH)
        );
        assert_eq!(soc.user_accesses().len(), 1);
    }
}
