//! Domain Model - SPI-mem operation description (component A data model)
//!
//! An `IoOp` (here `SpiMemOp`) is a bus-agnostic description of one SPI
//! transaction: an optional command byte, an optional address, an optional
//! dummy (turnaround) phase, and an optional data phase, each carrying its
//! own bus width and data-transfer-rate (DTR) flag. Controllers (component
//! B) translate this description into the wire framing their hardware
//! actually speaks; this module only describes the shape of the request.

use crate::error::{Error, Result};

/// Direction of the data phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Host to chip (program/write).
    Out,
    /// Chip to host (read).
    In,
}

/// Named SPI I/O protocol combinations of (command, address, data) bus
/// widths, plus their double-data-rate variants. The naming mirrors the
/// "C-A-D" shorthand widely used by flash datasheets and Linux's spi-mem
/// subsystem: `Io144` means a single-bit command, a quad-bit address, and
/// quad-bit data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IoType {
    Io111,
    Io112,
    Io122,
    Io222,
    Io114,
    Io144,
    Io444,
    Io118,
    Io188,
    Io888,
    Io111Dtr,
    Io222Dtr,
    Io444Dtr,
    Io888Dtr,
    Io122Dtr,
    Io144Dtr,
}

/// (cmd_buswidth, addr_buswidth, data_buswidth, dtr)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoTypeInfo {
    pub cmd_buswidth: u8,
    pub addr_buswidth: u8,
    pub data_buswidth: u8,
    pub dtr: bool,
}

impl IoType {
    pub fn info(self) -> IoTypeInfo {
        let (c, a, d, dtr) = match self {
            IoType::Io111 => (1, 1, 1, false),
            IoType::Io112 => (1, 1, 2, false),
            IoType::Io122 => (1, 2, 2, false),
            IoType::Io222 => (2, 2, 2, false),
            IoType::Io114 => (1, 1, 4, false),
            IoType::Io144 => (1, 4, 4, false),
            IoType::Io444 => (4, 4, 4, false),
            IoType::Io118 => (1, 1, 8, false),
            IoType::Io188 => (1, 8, 8, false),
            IoType::Io888 => (8, 8, 8, false),
            IoType::Io111Dtr => (1, 1, 1, true),
            IoType::Io222Dtr => (2, 2, 2, true),
            IoType::Io444Dtr => (4, 4, 4, true),
            IoType::Io888Dtr => (8, 8, 8, true),
            IoType::Io122Dtr => (1, 2, 2, true),
            IoType::Io144Dtr => (1, 4, 4, true),
        };
        IoTypeInfo {
            cmd_buswidth: c,
            addr_buswidth: a,
            data_buswidth: d,
            dtr,
        }
    }

    /// Canonical lowercase name, e.g. "1-4-4" or "8-8-8-dtr".
    pub fn name(self) -> &'static str {
        match self {
            IoType::Io111 => "1-1-1",
            IoType::Io112 => "1-1-2",
            IoType::Io122 => "1-2-2",
            IoType::Io222 => "2-2-2",
            IoType::Io114 => "1-1-4",
            IoType::Io144 => "1-4-4",
            IoType::Io444 => "4-4-4",
            IoType::Io118 => "1-1-8",
            IoType::Io188 => "1-8-8",
            IoType::Io888 => "8-8-8",
            IoType::Io111Dtr => "1s-1d-1d",
            IoType::Io222Dtr => "2s-2d-2d",
            IoType::Io444Dtr => "4s-4d-4d",
            IoType::Io888Dtr => "8s-8d-8d",
            IoType::Io122Dtr => "1s-2d-2d",
            IoType::Io144Dtr => "1s-4d-4d",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "1-1-1" => IoType::Io111,
            "1-1-2" => IoType::Io112,
            "1-2-2" => IoType::Io122,
            "2-2-2" => IoType::Io222,
            "1-1-4" => IoType::Io114,
            "1-4-4" => IoType::Io144,
            "4-4-4" => IoType::Io444,
            "1-1-8" => IoType::Io118,
            "1-8-8" => IoType::Io188,
            "8-8-8" => IoType::Io888,
            "1s-1d-1d" => IoType::Io111Dtr,
            "2s-2d-2d" => IoType::Io222Dtr,
            "4s-4d-4d" => IoType::Io444Dtr,
            "8s-8d-8d" => IoType::Io888Dtr,
            "1s-2d-2d" => IoType::Io122Dtr,
            "1s-4d-4d" => IoType::Io144Dtr,
            _ => return None,
        })
    }
}

/// A single phase of a SPI transaction (command, address or dummy).
#[derive(Debug, Clone, Copy, Default)]
pub struct OpPhase {
    pub nbytes: u8,
    pub buswidth: u8,
    pub dtr: bool,
    /// For the command phase: the opcode. For the address phase: the
    /// address value. Unused for the dummy phase.
    pub value: u64,
}

impl OpPhase {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn cmd(opcode: u8, buswidth: u8) -> Self {
        Self {
            nbytes: 1,
            buswidth,
            dtr: false,
            value: opcode as u64,
        }
    }

    pub fn addr(nbytes: u8, value: u64, buswidth: u8) -> Self {
        Self {
            nbytes,
            buswidth,
            dtr: false,
            value,
        }
    }

    pub fn dummy(nbytes: u8, buswidth: u8) -> Self {
        Self {
            nbytes,
            buswidth,
            dtr: false,
            value: 0,
        }
    }

    pub fn is_present(&self) -> bool {
        self.nbytes > 0
    }
}

/// The data phase: direction, width and length; the buffer itself is
/// passed separately to `Controller::exec` so this stays `Copy`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataPhase {
    pub buswidth: u8,
    pub dtr: bool,
    pub nbytes: u32,
    pub direction: Option<Direction>,
}

/// A complete description of one SPI-mem transaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpiMemOp {
    pub cmd: OpPhase,
    pub addr: OpPhase,
    pub dummy: OpPhase,
    pub data: DataPhase,
}

impl SpiMemOp {
    pub fn new(cmd: OpPhase, addr: OpPhase, dummy: OpPhase, data: DataPhase) -> Self {
        Self {
            cmd,
            addr,
            dummy,
            data,
        }
    }

    /// Total byte count of everything but the data phase.
    pub fn header_len(&self) -> u32 {
        self.cmd.nbytes as u32 + self.addr.nbytes as u32 + self.dummy.nbytes as u32
    }

    /// The `IoType` this op's bus widths correspond to, if any of the
    /// sixteen named combinations match exactly.
    pub fn io_type(&self) -> Option<IoType> {
        let candidates = [
            IoType::Io111,
            IoType::Io112,
            IoType::Io122,
            IoType::Io222,
            IoType::Io114,
            IoType::Io144,
            IoType::Io444,
            IoType::Io118,
            IoType::Io188,
            IoType::Io888,
            IoType::Io111Dtr,
            IoType::Io222Dtr,
            IoType::Io444Dtr,
            IoType::Io888Dtr,
            IoType::Io122Dtr,
            IoType::Io144Dtr,
        ];
        candidates.into_iter().find(|&t| {
            let info = t.info();
            info.cmd_buswidth == self.cmd.buswidth.max(1)
                && info.addr_buswidth == self.addr.buswidth.max(info.cmd_buswidth)
                && info.data_buswidth == self.data.buswidth.max(info.cmd_buswidth)
                && info.dtr == self.data.dtr
        })
    }

    /// Splits this op's data phase into a sequence of ops whose data length
    /// does not exceed `max_size`, preserving the header on every chunk.
    /// This is how component B controllers honor a finite scratch-buffer
    /// size (FT4222H's `MULTIIO_MIO_WR_MAX_LEN`, MPSSE's USB packet size).
    pub fn adjust_op_size(&self, max_size: u32) -> Result<Vec<SpiMemOp>> {
        if max_size == 0 {
            return Err(Error::InvalidParameter(
                "adjust_op_size: max_size must be non-zero".into(),
            ));
        }
        if self.data.nbytes <= max_size {
            return Ok(vec![*self]);
        }
        let mut chunks = Vec::new();
        let mut remaining = self.data.nbytes;
        let mut addr_val = self.addr.value;
        let data_unit = (self.data.buswidth.max(1) as u32).max(1);
        // Keep chunk sizes a multiple of the data bus width so DTR/quad
        // transfers never split mid-beat.
        let step = (max_size / data_unit).max(1) * data_unit;
        while remaining > 0 {
            let this_len = remaining.min(step);
            let mut op = *self;
            op.addr.value = addr_val;
            op.data.nbytes = this_len;
            chunks.push(op);
            remaining -= this_len;
            addr_val += this_len as u64;
        }
        Ok(chunks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_type_round_trips_through_name() {
        for t in [IoType::Io111, IoType::Io144, IoType::Io888, IoType::Io888Dtr] {
            assert_eq!(IoType::from_name(t.name()), Some(t));
        }
    }

    #[test]
    fn adjust_op_size_splits_respecting_bus_width() {
        let op = SpiMemOp {
            cmd: OpPhase::cmd(0x03, 1),
            addr: OpPhase::addr(3, 0x1000, 1),
            dummy: OpPhase::none(),
            data: DataPhase {
                buswidth: 4,
                dtr: false,
                nbytes: 1000,
                direction: Some(Direction::In),
            },
        };
        let chunks = op.adjust_op_size(256).unwrap();
        let total: u32 = chunks.iter().map(|c| c.data.nbytes).sum();
        assert_eq!(total, 1000);
        assert!(chunks.iter().all(|c| c.data.nbytes % 4 == 0 || c.data.nbytes == 1000 % 4));
        // addresses increase monotonically by previous chunk length
        assert_eq!(chunks[0].addr.value, 0x1000);
        assert_eq!(chunks[1].addr.value, 0x1000 + chunks[0].data.nbytes as u64);
    }

    #[test]
    fn adjust_op_size_noop_when_already_small() {
        let op = SpiMemOp {
            cmd: OpPhase::cmd(0x0B, 1),
            addr: OpPhase::addr(3, 0, 1),
            dummy: OpPhase::dummy(1, 1),
            data: DataPhase {
                buswidth: 1,
                dtr: false,
                nbytes: 16,
                direction: Some(Direction::In),
            },
        };
        let chunks = op.adjust_op_size(4096).unwrap();
        assert_eq!(chunks.len(), 1);
    }
}
