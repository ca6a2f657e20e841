// Licensed under the Apache-2.0 license

use std::fmt::Display;
use std::io::LineWriter;
use std::{
    cell::{Cell, RefCell},
    io::Write,
    rc::Rc,
};

use caravel_test_harness_types::{describe, StatusCode};

use crate::ModelError;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExitStatus {
    Passed,
    Failed(u8),
}

/// A value driven onto the management GPIO, and when.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StatusChange {
    pub cycle: u64,
    pub value: u8,
}

struct OutputSinkImpl {
    exit_status: Cell<Option<ExitStatus>>,
    new_status: Cell<Vec<StatusChange>>,
    log_writer: RefCell<LineWriter<Box<dyn std::io::Write>>>,
    now: Cell<u64>,
    next_write_needs_time_prefix: Cell<bool>,
}

/// A cycle count right-aligned to 11 columns, with thousands separators.
pub(crate) struct PrettyU64(pub u64);
impl Display for PrettyU64 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let digits = self.0.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        write!(f, "{grouped:>11}")
    }
}

#[cfg(test)]
#[test]
fn test_pretty_u64() {
    assert_eq!(PrettyU64(0).to_string(), "          0");
    assert_eq!(PrettyU64(1).to_string(), "          1");
    assert_eq!(PrettyU64(999).to_string(), "        999");
    assert_eq!(PrettyU64(1_000).to_string(), "      1,000");
    assert_eq!(PrettyU64(1_234).to_string(), "      1,234");
    assert_eq!(PrettyU64(999_999).to_string(), "    999,999");
    assert_eq!(PrettyU64(1_000_000).to_string(), "  1,000,000");
    assert_eq!(PrettyU64(999_999_999).to_string(), "999,999,999");
    assert_eq!(PrettyU64(1_999_999_999).to_string(), "1,999,999,999");
}

#[derive(Clone)]
pub struct OutputSink(Rc<OutputSinkImpl>);
impl OutputSink {
    pub fn set_now(&self, now: u64) {
        self.0.now.set(now);
    }
    pub fn now(&self) -> u64 {
        self.0.now.get()
    }

    /// Record a value driven onto the management GPIO at the current time.
    pub fn push_mgmt_gpio(&self, value: u8) {
        let now = self.now();
        let mut pending = self.0.new_status.take();
        pending.push(StatusChange { cycle: now, value });
        self.0.new_status.set(pending);

        let log_writer = &mut self.0.log_writer.borrow_mut();
        writeln!(log_writer, "{} MGMT_GPIO: 0x{value:02x}", PrettyU64(now)).unwrap();

        if self.0.exit_status.get().is_some() {
            return;
        }
        match StatusCode::from(value) {
            StatusCode::Passed => {
                log_writer.write_all(b"* TESTCASE PASSED\n").unwrap();
                self.0.exit_status.set(Some(ExitStatus::Passed));
            }
            StatusCode::Failed(code) => {
                writeln!(log_writer, "* TESTCASE FAILED: {}", describe(code)).unwrap();
                self.0.exit_status.set(Some(ExitStatus::Failed(code)));
            }
            _ => {}
        }
    }
}
impl std::io::Write for &OutputSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let log_writer = &mut self.0.log_writer.borrow_mut();
        // Write a time prefix in front of every line
        for line in buf.split_inclusive(|ch| *ch == b'\n') {
            if self.0.next_write_needs_time_prefix.get() {
                write!(log_writer, "{} ", PrettyU64(self.0.now.get()))?;
                self.0.next_write_needs_time_prefix.set(false);
            }
            log_writer.write_all(line)?;
            if line.ends_with(b"\n") {
                self.0.next_write_needs_time_prefix.set(true);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.log_writer.borrow_mut().flush()
    }
}

/// The status timeline of a test run.
pub struct Output {
    history: Vec<StatusChange>,
    sink: OutputSink,

    wait_pos: usize, // Position in `history` to continue waiting from
    wait_start: u64,
}
impl Output {
    pub fn new(log_writer: impl std::io::Write + 'static) -> Self {
        Self::new_internal(Box::new(log_writer))
    }
    pub(crate) fn new_internal(log_writer: Box<dyn std::io::Write>) -> Self {
        Self {
            history: vec![],
            sink: OutputSink(Rc::new(OutputSinkImpl {
                exit_status: Cell::new(None),
                new_status: Default::default(),
                log_writer: RefCell::new(LineWriter::new(log_writer)),
                now: Cell::new(0),
                next_write_needs_time_prefix: Cell::new(true),
            })),
            wait_pos: 0,
            wait_start: 0,
        }
    }
    pub fn sink(&self) -> &OutputSink {
        &self.sink
    }
    pub fn logger(&self) -> impl std::io::Write + '_ {
        &self.sink
    }

    fn process_new_data(&mut self) {
        let new_data = self.sink.0.new_status.take();
        self.history.extend(new_data);
    }

    /// Every status change so far, oldest first.
    pub fn history(&mut self) -> &[StatusChange] {
        self.process_new_data();
        &self.history
    }

    /// The value on the pin, if anything has been driven yet.
    pub fn current(&mut self) -> Option<u8> {
        self.history().last().map(|change| change.value)
    }

    /// Find the next time `value` was driven, at most `timeout_cycles` after
    /// the previous successful wait. Returns the cycle it was driven at.
    pub fn wait_for(&mut self, value: u8, timeout_cycles: u64) -> Result<u64, ModelError> {
        self.process_new_data();
        let found = self.history[self.wait_pos..]
            .iter()
            .position(|change| change.value == value)
            .map(|i| (self.wait_pos + i, self.history[self.wait_pos + i]));
        match found {
            Some((pos, change)) if change.cycle - self.wait_start <= timeout_cycles => {
                self.wait_pos = pos + 1;
                self.wait_start = change.cycle;
                Ok(change.cycle)
            }
            _ => Err(ModelError::StatusTimeout {
                expected: value,
                timeout_cycles,
                last: self.history.last().map(|change| change.value),
            }),
        }
    }

    pub fn exit_status(&self) -> Option<ExitStatus> {
        self.sink.0.exit_status.get()
    }
}

#[cfg(test)]
mod tests {
    use caravel_emu_bus::testing::Log;

    use super::*;

    fn push_at(out: &Output, cycle: u64, value: u8) {
        out.sink().set_now(cycle);
        out.sink().push_mgmt_gpio(value);
    }

    #[test]
    fn test_status_log() {
        let log = Log::new();
        let mut out = Output::new(log.clone());

        push_at(&out, 10, 0x00);
        push_at(&out, 1_234, 0x01);
        assert_eq!(out.current(), Some(0x01));
        assert_eq!(out.exit_status(), None);
        assert_eq!(
            out.history(),
            &[
                StatusChange {
                    cycle: 10,
                    value: 0x00
                },
                StatusChange {
                    cycle: 1_234,
                    value: 0x01
                },
            ]
        );
        assert_eq!(
            log.take(),
            "         10 MGMT_GPIO: 0x00\n      1,234 MGMT_GPIO: 0x01\n"
        );
    }

    #[test]
    fn test_passed() {
        let log = Log::new();
        let out = Output::new(log.clone());

        push_at(&out, 2_000, 0xab);
        assert_eq!(out.exit_status(), Some(ExitStatus::Passed));
        assert_eq!(
            log.take(),
            "      2,000 MGMT_GPIO: 0xab\n* TESTCASE PASSED\n"
        );
    }

    #[test]
    fn test_failed() {
        let log = Log::new();
        let out = Output::new(log.clone());

        push_at(&out, 0, 0xdd);
        assert_eq!(out.exit_status(), Some(ExitStatus::Failed(0xdd)));
        assert_eq!(
            log.take(),
            "          0 MGMT_GPIO: 0xdd\n* TESTCASE FAILED: SRAM 1 end read mismatch\n"
        );
    }

    #[test]
    fn test_first_final_status_wins() {
        let out = Output::new(std::io::sink());
        push_at(&out, 1, 0xaa);
        push_at(&out, 2, 0xab);
        assert_eq!(out.exit_status(), Some(ExitStatus::Failed(0xaa)));
    }

    #[test]
    fn test_logger_prefixes_lines() {
        let log = Log::new();
        let out = Output::new(log.clone());

        out.sink().set_now(5);
        write!(out.logger(), "hello\nwor").unwrap();
        out.sink().set_now(6);
        writeln!(out.logger(), "ld").unwrap();
        writeln!(out.logger(), "again").unwrap();
        assert_eq!(
            log.take(),
            "          5 hello\n          5 world\n          6 again\n"
        );
    }

    #[test]
    fn test_wait_for() {
        let mut out = Output::new(std::io::sink());
        push_at(&out, 10, 0x00);
        push_at(&out, 20, 0x01);
        push_at(&out, 500, 0xab);

        assert_eq!(out.wait_for(0x01, 100), Ok(20));
        assert_eq!(
            out.wait_for(0xab, 100),
            Err(ModelError::StatusTimeout {
                expected: 0xab,
                timeout_cycles: 100,
                last: Some(0xab),
            })
        );
        assert_eq!(out.wait_for(0xab, 480), Ok(500));

        // Already consumed
        assert!(out.wait_for(0x01, 1_000).is_err());
    }
}
