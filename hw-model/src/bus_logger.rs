// Licensed under the Apache-2.0 license

use std::{
    cell::RefCell,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    rc::Rc,
};

use caravel_emu_bus::{Bus, BusError};
use caravel_emu_types::{RvAddr, RvData, RvSize};

#[derive(Clone)]
pub struct LogFile(Rc<RefCell<BufWriter<File>>>);
impl LogFile {
    pub fn open(path: &Path) -> std::io::Result<Self> {
        Ok(Self(Rc::new(RefCell::new(BufWriter::new(File::create(
            path,
        )?)))))
    }
}
impl Write for LogFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.borrow_mut().flush()
    }
}

/// Passes every access through to `bus`, and writes a line per access to
/// `log` when one is attached.
pub struct BusLogger<TBus: Bus> {
    pub bus: TBus,
    pub log: Option<Box<dyn Write>>,
}
impl<TBus: Bus> BusLogger<TBus> {
    pub fn new(bus: TBus) -> Self {
        Self { bus, log: None }
    }
    pub fn log_read(
        &mut self,
        bus_name: &str,
        size: RvSize,
        addr: RvAddr,
        result: Result<RvData, BusError>,
    ) {
        if let Some(log) = &mut self.log {
            let size = usize::from(size);
            // The log is best effort; a full disk must not stop the model.
            let _ = match result {
                Ok(val) => writeln!(log, "{bus_name}  read{size} *0x{addr:08x} -> 0x{val:x}"),
                Err(e) => writeln!(log, "{bus_name}  read{size} *0x{addr:08x} ***FAULT {e:?}"),
            };
        }
    }
    pub fn log_write(
        &mut self,
        bus_name: &str,
        size: RvSize,
        addr: RvAddr,
        val: RvData,
        result: Result<(), BusError>,
    ) {
        if let Some(log) = &mut self.log {
            let size = usize::from(size);
            let _ = match result {
                Ok(()) => writeln!(log, "{bus_name} write{size} *0x{addr:08x} <- 0x{val:x}"),
                Err(e) => writeln!(
                    log,
                    "{bus_name} write{size} *0x{addr:08x} <- 0x{val:x} ***FAULT {e:?}"
                ),
            };
        }
    }
}
impl<TBus: Bus> Bus for BusLogger<TBus> {
    fn read(&mut self, size: RvSize, addr: RvAddr) -> Result<RvData, BusError> {
        let result = self.bus.read(size, addr);
        self.log_read("WB", size, addr, result);
        result
    }

    fn write(&mut self, size: RvSize, addr: RvAddr, val: RvData) -> Result<(), BusError> {
        let result = self.bus.write(size, addr, val);
        self.log_write("WB", size, addr, val, result);
        result
    }
    fn poll(&mut self) {
        self.bus.poll();
    }
    fn warm_reset(&mut self) {
        self.bus.warm_reset();
    }
}

#[cfg(test)]
mod tests {
    use caravel_emu_bus::{testing::Log, Ram};

    use super::*;

    #[test]
    fn test_log_accesses() {
        let log = Log::new();
        let mut bus = BusLogger::new(Ram::new(vec![0u8; 8]));
        bus.write(RvSize::Word, 4, 0xcafe_babe).unwrap();
        bus.log = Some(Box::new(log.clone()));
        assert_eq!(bus.read(RvSize::Word, 4), Ok(0xcafe_babe));
        bus.write(RvSize::HalfWord, 0, 0x1234).unwrap();
        assert!(bus.read(RvSize::Word, 8).is_err());
        assert_eq!(
            log.take(),
            "WB  read4 *0x00000004 -> 0xcafebabe\n\
             WB write2 *0x00000000 <- 0x1234\n\
             WB  read4 *0x00000008 ***FAULT LoadAccessFault\n"
        );
    }
}
