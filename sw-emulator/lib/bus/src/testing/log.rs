// Licensed under the Apache-2.0 license

use std::{cell::RefCell, rc::Rc};

/// Shared text buffer that stands in for a log file.
///
/// Clones write to the same buffer: hand one to the code under test and
/// inspect the other.
#[derive(Clone, Default)]
pub struct Log {
    text: Rc<RefCell<String>>,
}
impl Log {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written since the last `take`.
    pub fn take(&self) -> String {
        self.text.take()
    }
}

impl std::io::Write for Log {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.text
            .borrow_mut()
            .push_str(&String::from_utf8_lossy(buf));
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_clones_share_text() {
        let log = Log::new();
        let mut writer = log.clone();
        writer.write_all(b"MGMT_GPIO: 0x01\n").unwrap();
        writeln!(writer, "MGMT_GPIO: 0x{:02x}", 0xab).unwrap();
        assert_eq!(log.take(), "MGMT_GPIO: 0x01\nMGMT_GPIO: 0xab\n");
        assert_eq!(log.take(), "");
    }
}
