// Licensed under the Apache-2.0 license

use caravel_emu_bus::testing::Log;
use caravel_error::{CaravelError, CaravelResult};
use caravel_hw_model::{
    AccessCounts, DefaultHwModel, ExitStatus, HwModel, InitParams, SramFault,
    DEFAULT_TIMEOUT_CYCLES,
};
use caravel_registers::USER_SPACE_ADDR;
use caravel_test_fw::sram::{self, SRAM0_BASE, SRAM1_BASE, SRAM2_BASE, SRAM_CHECKS, SRAM_LAST_WORD};
use rand::Rng;

fn addr(offset: u32) -> u32 {
    USER_SPACE_ADDR + offset
}

fn run_sram_test_with(params: InitParams) -> (DefaultHwModel, CaravelResult<()>) {
    let mut model = DefaultHwModel::init(params).unwrap();
    let mut result = None;
    model
        .run_firmware(|mmio| result = Some(sram::run(mmio)))
        .unwrap();
    (model, result.unwrap())
}

fn run_sram_test(sram_faults: &[SramFault]) -> (DefaultHwModel, CaravelResult<()>) {
    run_sram_test_with(InitParams {
        sram_faults,
        log_writer: Box::new(std::io::sink()),
        ..Default::default()
    })
}

fn counts(model: &DefaultHwModel, offset: u32) -> AccessCounts {
    model.sram_access_counts(addr(offset)).unwrap()
}

#[test]
fn test_ideal_storage_passes() {
    let (mut model, result) = run_sram_test(&[]);
    assert_eq!(result, Ok(()));

    model.wait_mgmt_gpio(0x01, DEFAULT_TIMEOUT_CYCLES).unwrap();
    model.wait_mgmt_gpio(0xab, DEFAULT_TIMEOUT_CYCLES).unwrap();
    assert_eq!(model.exit_status().unwrap(), ExitStatus::Passed);

    let values: Vec<u8> = model.output().history().iter().map(|c| c.value).collect();
    assert_eq!(values, vec![0x00, 0x01, 0xab]);

    for check in SRAM_CHECKS.iter() {
        assert_eq!(
            counts(&model, check.offset),
            AccessCounts {
                reads: 1,
                writes: 1
            }
        );
    }
    // Nothing between the first and last words is touched
    assert_eq!(counts(&model, SRAM1_BASE + 4).total(), 0);
}

#[test]
fn test_configured_before_any_sram_access() {
    let log = Log::new();
    let bus_log = Log::new();
    let (mut model, result) = run_sram_test_with(InitParams {
        log_writer: Box::new(log.clone()),
        bus_log: Some(Box::new(bus_log.clone())),
        ..Default::default()
    });
    assert_eq!(result, Ok(()));

    let bus_log = bus_log.take();
    let configured = bus_log.find("WB write4 *0xf0003814 <- 0x1\n").unwrap();
    let first_sram = bus_log.find(" *0x300").unwrap();
    assert!(configured < first_sram);
    assert!(bus_log.contains("WB write4 *0x26200010 <- 0x1\n"));
    assert!(bus_log.contains("WB write4 *0xf0009800 <- 0x1\n"));

    // Six writes, six reads, then the final status.
    let history = model.output().history().to_vec();
    assert_eq!(history[0].value, 0x00);
    assert_eq!(history[1].value, 0x01);
    assert_eq!(history[2].cycle - history[1].cycle, 13);
    assert_eq!(model.cycle_count(), history[2].cycle);

    let log = log.take();
    assert!(log.starts_with("          5 MGMT_GPIO: 0x00\n"));
    assert!(log.ends_with(" MGMT_GPIO: 0xab\n* TESTCASE PASSED\n"));
}

#[test]
fn test_sram1_end_stuck_at_zero() {
    let (mut model, result) = run_sram_test(&[SramFault::stuck_at(
        addr(SRAM1_BASE + SRAM_LAST_WORD),
        0,
    )]);
    assert_eq!(result, Err(CaravelError::SRAM_TEST_SRAM1_END_MISMATCH));
    assert_eq!(model.exit_status().unwrap(), ExitStatus::Failed(0xdd));
    model.wait_mgmt_gpio(0x01, DEFAULT_TIMEOUT_CYCLES).unwrap();
    assert!(model.wait_mgmt_gpio(0xab, DEFAULT_TIMEOUT_CYCLES).is_err());

    // Region 2 is written but never read
    for offset in [SRAM2_BASE, SRAM2_BASE + SRAM_LAST_WORD] {
        assert_eq!(
            counts(&model, offset),
            AccessCounts {
                reads: 0,
                writes: 1
            }
        );
    }
}

#[test]
fn test_sram0_begin_corrupted() {
    let (mut model, result) =
        run_sram_test(&[SramFault::flip_bits(addr(SRAM0_BASE), 0x8000_0000)]);
    assert_eq!(result, Err(CaravelError::SRAM_TEST_SRAM0_BEGIN_MISMATCH));
    assert_eq!(model.exit_status().unwrap(), ExitStatus::Failed(0xaa));

    assert_eq!(counts(&model, SRAM0_BASE).reads, 1);
    for check in SRAM_CHECKS.iter().skip(1) {
        assert_eq!(counts(&model, check.offset).reads, 0);
    }
}

#[test]
fn test_dropped_write_reads_zero() {
    let (mut model, result) = run_sram_test(&[SramFault::drop_writes(addr(SRAM2_BASE))]);
    assert_eq!(result, Err(CaravelError::SRAM_TEST_SRAM2_BEGIN_MISMATCH));
    assert_eq!(model.exit_status().unwrap(), ExitStatus::Failed(0xee));
}

#[test]
fn test_first_failing_check_is_reported() {
    let mut rng = rand::thread_rng();
    for (i, check) in SRAM_CHECKS.iter().enumerate() {
        let fault = if rng.gen::<bool>() {
            let mut value = rng.gen::<u32>();
            if value == check.pattern {
                value = !value;
            }
            SramFault::stuck_at(addr(check.offset), value)
        } else {
            SramFault::flip_bits(addr(check.offset), rng.gen_range(1..=u32::MAX))
        };
        let (mut model, result) = run_sram_test(&[fault]);
        assert_eq!(result, Err(check.error), "{fault}");
        assert_eq!(
            model.exit_status().unwrap(),
            ExitStatus::Failed(check.fail_code)
        );

        for (j, other) in SRAM_CHECKS.iter().enumerate() {
            let other_counts = counts(&model, other.offset);
            assert_eq!(other_counts.reads, u32::from(j <= i), "{fault}");
            assert_eq!(other_counts.writes, 1);
        }
    }
}

#[test]
fn test_faults_off_the_checked_words_pass() {
    let mut rng = rand::thread_rng();
    let faults: Vec<SramFault> = [SRAM0_BASE, SRAM1_BASE, SRAM2_BASE]
        .iter()
        .map(|base| {
            let word = rng.gen_range(1..SRAM_LAST_WORD / 4);
            SramFault::stuck_at(addr(base + word * 4), rng.gen())
        })
        .collect();
    let (mut model, result) = run_sram_test(&faults);
    assert_eq!(result, Ok(()));
    assert_eq!(model.exit_status().unwrap(), ExitStatus::Passed);
}

#[test]
fn test_final_status_timeout() {
    let (mut model, _) = run_sram_test(&[]);
    model.wait_mgmt_gpio(0x01, DEFAULT_TIMEOUT_CYCLES).unwrap();
    assert_eq!(
        model.wait_mgmt_gpio(0xab, 5).err().unwrap().to_string(),
        "Timed out after 5 cycles waiting for status 0xab; last status was 0xab"
    );
}
