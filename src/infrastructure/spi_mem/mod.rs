//! Infrastructure - SPI-mem op executor (component A)
//!
//! Generalizes the byte-oriented `Programmer` trait into a phase-aware
//! `Controller` trait that understands command/address/dummy/data phases
//! with independent bus widths. Controllers that only ever speak
//! single-IO SPI (CH341A, CH347, the byte-level simulator) get `Controller`
//! for free via `ProgrammerController`, a blanket adapter over any
//! `Programmer`. Controllers that need true multi-IO framing (FT4222H,
//! MPSSE) implement `Controller` directly.

use crate::domain::spi_mem::{DataPhase, Direction, IoType, SpiMemOp};
use crate::error::{Error, Result};
use crate::infrastructure::programmer::Programmer;

/// What I/O widths and features a controller actually supports. Parts
/// advertise what they *want*; controllers advertise what they *can do*;
/// the SPI-NAND core picks the best mode present in both.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerCaps {
    pub max_data_buswidth: u8,
    pub max_addr_buswidth: u8,
    pub max_cmd_buswidth: u8,
    pub supports_dtr: bool,
    /// Largest contiguous data phase this controller can shift in one
    /// `exec` call. Longer requests must be pre-split with
    /// `SpiMemOp::adjust_op_size`.
    pub max_data_len: u32,
}

/// Abstraction over a SPI controller capable of phase-aware transfers.
pub trait Controller {
    fn name(&self) -> &str;

    /// Capabilities this controller actually has.
    fn caps(&self) -> ControllerCaps;

    /// True if `op`'s bus widths are all within this controller's caps.
    fn supports(&self, op: &SpiMemOp) -> bool {
        let caps = self.caps();
        op.cmd.buswidth.max(1) <= caps.max_cmd_buswidth.max(1)
            && op.addr.buswidth.max(1) <= caps.max_addr_buswidth.max(1)
            && op.data.buswidth.max(1) <= caps.max_data_buswidth.max(1)
            && (!op.data.dtr || caps.supports_dtr)
    }

    /// Splits `op` so every chunk's data phase fits this controller's
    /// `max_data_len`.
    fn adjust_op_size(&self, op: &SpiMemOp) -> Result<Vec<SpiMemOp>> {
        let max = self.caps().max_data_len.max(1);
        op.adjust_op_size(max)
    }

    /// Executes one op. For `Direction::In`, `buf` is filled with the
    /// bytes read; for `Direction::Out`, `buf` holds the bytes to write.
    /// Ignored (may be empty) when `op.data.nbytes == 0`.
    fn exec(&mut self, op: &SpiMemOp, buf: &mut [u8]) -> Result<()>;

    /// Human-readable name for an `IoType`, as this controller would log
    /// it (mostly `IoType::name()`, but hardware-specific controllers may
    /// override for framing-specific nomenclature).
    fn io_name(&self, io_type: IoType) -> &'static str {
        io_type.name()
    }

    fn name_to_type(&self, name: &str) -> Option<IoType> {
        IoType::from_name(name)
    }

    /// Maximum number of bytes that can be read in a single cache-read
    /// burst before the controller needs to re-issue the command phase
    /// (distinct from `max_data_len`, which is a USB/transfer-buffer
    /// limit: this is a protocol-level cache-read limit).
    fn max_read_granularity(&self) -> u32 {
        self.caps().max_data_len
    }

    /// Acquire exclusive access to the underlying bus. The default
    /// single-threaded cooperative model needs no real locking.
    fn bus_lock(&mut self) -> Result<()> {
        Ok(())
    }

    fn bus_unlock(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Adapts any single-IO `Programmer` into a `Controller` that only ever
/// uses `IoType::Io111` framing: command, address and data are all
/// shifted out MSB-first over a single data line.
pub struct ProgrammerController<P: Programmer> {
    inner: P,
}

impl<P: Programmer> ProgrammerController<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: Programmer> Controller for ProgrammerController<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn caps(&self) -> ControllerCaps {
        ControllerCaps {
            max_data_buswidth: 1,
            max_addr_buswidth: 1,
            max_cmd_buswidth: 1,
            supports_dtr: false,
            max_data_len: self.inner.max_bulk_transfer_size() as u32,
        }
    }

    fn exec(&mut self, op: &SpiMemOp, buf: &mut [u8]) -> Result<()> {
        if op.cmd.buswidth > 1 || op.addr.buswidth > 1 || op.data.buswidth > 1 {
            return Err(Error::NotSupported(
                "ProgrammerController only supports single-IO (1-1-1) ops".into(),
            ));
        }

        let mut header = Vec::with_capacity(op.header_len() as usize);
        if op.cmd.is_present() {
            header.push(op.cmd.value as u8);
        }
        for i in (0..op.addr.nbytes).rev() {
            header.push(((op.addr.value >> (i * 8)) & 0xFF) as u8);
        }
        for _ in 0..op.dummy.nbytes {
            header.push(0x00);
        }

        if op.data.nbytes == 0 {
            return self.inner.spi_transaction_write(&header);
        }

        match op.data.direction.unwrap_or(Direction::Out) {
            Direction::Out => {
                let mut full = header;
                full.extend_from_slice(&buf[..op.data.nbytes as usize]);
                self.inner.spi_transaction_write(&full)
            }
            Direction::In => {
                let rx = self
                    .inner
                    .spi_transaction(&header, op.data.nbytes as usize)?;
                buf[..rx.len()].copy_from_slice(&rx);
                Ok(())
            }
        }
    }
}

/// Convenience constructors for common op shapes, built on top of the
/// domain-level phase types.
pub fn read_op(opcode: u8, addr_bytes: u8, addr: u64, dummy_bytes: u8, data_len: u32, buswidth: u8) -> SpiMemOp {
    use crate::domain::spi_mem::OpPhase;
    SpiMemOp {
        cmd: OpPhase::cmd(opcode, 1),
        addr: OpPhase::addr(addr_bytes, addr, 1),
        dummy: OpPhase::dummy(dummy_bytes, buswidth),
        data: DataPhase {
            buswidth,
            dtr: false,
            nbytes: data_len,
            direction: Some(Direction::In),
        },
    }
}

pub fn write_op(opcode: u8, addr_bytes: u8, addr: u64, data_len: u32, buswidth: u8) -> SpiMemOp {
    use crate::domain::spi_mem::OpPhase;
    SpiMemOp {
        cmd: OpPhase::cmd(opcode, 1),
        addr: OpPhase::addr(addr_bytes, addr, 1),
        dummy: OpPhase::none(),
        data: DataPhase {
            buswidth,
            dtr: false,
            nbytes: data_len,
            direction: Some(Direction::Out),
        },
    }
}

pub fn cmd_only_op(opcode: u8) -> SpiMemOp {
    use crate::domain::spi_mem::OpPhase;
    SpiMemOp {
        cmd: OpPhase::cmd(opcode, 1),
        addr: OpPhase::none(),
        dummy: OpPhase::none(),
        data: DataPhase::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::programmer::simulator::SimulatedProgrammer;

    #[test]
    fn programmer_controller_rejects_multi_io() {
        let mut ctrl = ProgrammerController::new(SimulatedProgrammer::new(
            128 * 1024 * 1024,
            2048,
            128 * 1024,
        ));
        let mut op = read_op(0x03, 3, 0, 0, 16, 1);
        op.data.buswidth = 4;
        let mut buf = vec![0u8; 16];
        assert!(ctrl.exec(&op, &mut buf).is_err());
    }
}
