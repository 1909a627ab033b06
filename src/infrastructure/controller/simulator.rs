//! A phase-aware simulated SPI-NAND controller (component B test double).
//!
//! Unlike `programmer::simulator::SimulatedProgrammer`, which only speaks
//! byte-oriented single-IO transfers, this controller implements
//! `Controller` directly and interprets the command/address/data phases
//! of a `SpiMemOp` against an in-memory NAND model. It understands enough
//! of the SPI-NAND opcode set (READ_ID, GET/SET_FEATURE, READ_TO_CACHE,
//! READ_FROM_CACHE in any width, PROGRAM_LOAD, PROGRAM_EXECUTE,
//! BLOCK_ERASE) to exercise the SPI-NAND core, NAND generic layer, BBT
//! and FTL end-to-end without hardware. Bus width is accepted but
//! ignored: a simulated bus has no physical lines to narrow.

use std::cell::RefCell;

use crate::domain::spi_mem::{Direction, IoType, SpiMemOp};
use crate::error::Result;
use crate::infrastructure::spi_mem::{Controller, ControllerCaps};

const OP_RESET: u8 = 0xFF;
const OP_GET_FEATURE: u8 = 0x0F;
const OP_SET_FEATURE: u8 = 0x1F;
const OP_READ_ID: u8 = 0x9F;
const OP_SELECT_DIE: u8 = 0xC2;
const OP_READ_TO_CACHE: u8 = 0x13;
const OP_WRITE_ENABLE: u8 = 0x06;
const OP_WRITE_DISABLE: u8 = 0x04;
const OP_PROGRAM_LOAD: u8 = 0x02;
const OP_PROGRAM_LOAD_QUAD: u8 = 0x32;
const OP_RND_PROGRAM_LOAD: u8 = 0x84;
const OP_RND_PROGRAM_LOAD_QUAD: u8 = 0x34;
const OP_PROGRAM_EXECUTE: u8 = 0x10;
const OP_BLOCK_ERASE: u8 = 0xD8;

const FEATURE_PROTECT: u64 = 0xA0;
const FEATURE_CONFIG: u64 = 0xB0;
const FEATURE_STATUS: u64 = 0xC0;

const STATUS_WEL: u8 = 0x02;
const STATUS_ERASE_FAIL: u8 = 0x04;
const STATUS_PROGRAM_FAIL: u8 = 0x08;

fn is_read_from_cache(opcode: u8) -> bool {
    matches!(opcode, 0x03 | 0x0B | 0x3B | 0xBB | 0x6B | 0xEB | 0x31 | 0x3F)
}

struct State {
    memory: Vec<u8>,
    page_buffer: Vec<u8>,
    status: u8,
    config: u8,
    protect: u8,
    write_enabled: bool,
    /// Force the next PROGRAM_EXECUTE or BLOCK_ERASE to report failure,
    /// for exercising the core's fail-status handling in tests.
    fail_next_program: bool,
    fail_next_erase: bool,
}

/// An in-memory SPI-NAND model behind the `Controller` trait.
pub struct SimulatedController {
    id_bytes: Vec<u8>,
    page_size: u32,
    oob_size: u32,
    pages_per_block: u32,
    state: RefCell<State>,
}

impl SimulatedController {
    pub fn new(id_bytes: Vec<u8>, page_size: u32, oob_size: u32, pages_per_block: u32, blocks: u32) -> Self {
        let raw_len = (page_size + oob_size) as usize;
        Self {
            id_bytes,
            page_size,
            oob_size,
            pages_per_block,
            state: RefCell::new(State {
                memory: vec![0xFFu8; raw_len * pages_per_block as usize * blocks as usize],
                page_buffer: vec![0xFFu8; raw_len],
                status: 0,
                config: 0,
                protect: 0,
                write_enabled: false,
                fail_next_program: false,
                fail_next_erase: false,
            }),
        }
    }

    fn raw_page_len(&self) -> usize {
        (self.page_size + self.oob_size) as usize
    }

    /// Directly seeds the whole flash image, e.g. to preload known page
    /// data for a test.
    pub fn set_memory(&self, offset: usize, data: &[u8]) {
        let mut state = self.state.borrow_mut();
        state.memory[offset..offset + data.len()].copy_from_slice(data);
    }

    pub fn memory_snapshot(&self) -> Vec<u8> {
        self.state.borrow().memory.clone()
    }

    pub fn force_next_program_fail(&self) {
        self.state.borrow_mut().fail_next_program = true;
    }

    pub fn force_next_erase_fail(&self) {
        self.state.borrow_mut().fail_next_erase = true;
    }
}

impl Controller for SimulatedController {
    fn name(&self) -> &str {
        "SimulatedController"
    }

    fn caps(&self) -> ControllerCaps {
        ControllerCaps {
            max_data_buswidth: 4,
            max_addr_buswidth: 4,
            max_cmd_buswidth: 1,
            supports_dtr: false,
            max_data_len: 64 * 1024,
        }
    }

    fn io_name(&self, io_type: IoType) -> &'static str {
        io_type.name()
    }

    fn exec(&mut self, op: &SpiMemOp, buf: &mut [u8]) -> Result<()> {
        let opcode = op.cmd.value as u8;
        let mut state = self.state.borrow_mut();

        match opcode {
            OP_RESET => {
                state.status = 0;
                state.write_enabled = false;
            }
            OP_READ_ID => {
                for (i, b) in buf.iter_mut().enumerate() {
                    *b = *self.id_bytes.get(i).unwrap_or(&0);
                }
            }
            OP_GET_FEATURE => {
                let value = match op.addr.value {
                    FEATURE_STATUS => state.status,
                    FEATURE_CONFIG => state.config,
                    FEATURE_PROTECT => state.protect,
                    _ => 0,
                };
                if let Some(first) = buf.first_mut() {
                    *first = value;
                }
            }
            OP_SET_FEATURE => {
                let value = buf.first().copied().unwrap_or(0);
                match op.addr.value {
                    FEATURE_STATUS => state.status = value,
                    FEATURE_CONFIG => state.config = value,
                    FEATURE_PROTECT => state.protect = value,
                    _ => {}
                }
            }
            OP_WRITE_ENABLE => {
                state.write_enabled = true;
                state.status |= STATUS_WEL;
            }
            OP_WRITE_DISABLE => {
                state.write_enabled = false;
                state.status &= !STATUS_WEL;
            }
            OP_SELECT_DIE => {
                // Single-die model: nothing to do.
            }
            OP_READ_TO_CACHE => {
                let row = op.addr.value as u32;
                let raw_len = self.raw_page_len();
                let start = row as usize * raw_len;
                if start + raw_len <= state.memory.len() {
                    let data = state.memory[start..start + raw_len].to_vec();
                    state.page_buffer.copy_from_slice(&data);
                }
            }
            op if is_read_from_cache(op) => {
                let col = op.addr.value as usize;
                let raw_len = self.raw_page_len();
                for (i, b) in buf.iter_mut().enumerate() {
                    *b = *state.page_buffer.get((col + i).min(raw_len.saturating_sub(1))).unwrap_or(&0xFF);
                }
            }
            OP_PROGRAM_LOAD | OP_PROGRAM_LOAD_QUAD | OP_RND_PROGRAM_LOAD | OP_RND_PROGRAM_LOAD_QUAD => {
                let col = op.addr.value as usize;
                let raw_len = self.raw_page_len();
                if opcode == OP_PROGRAM_LOAD || opcode == OP_PROGRAM_LOAD_QUAD {
                    state.page_buffer.fill(0xFF);
                }
                for (i, &b) in buf.iter().enumerate() {
                    if col + i < raw_len {
                        state.page_buffer[col + i] = b;
                    }
                }
            }
            OP_PROGRAM_EXECUTE => {
                let row = op.addr.value as u32;
                let raw_len = self.raw_page_len();
                let start = row as usize * raw_len;
                if state.fail_next_program {
                    state.status |= STATUS_PROGRAM_FAIL;
                    state.fail_next_program = false;
                } else if state.write_enabled && start + raw_len <= state.memory.len() {
                    let page_buffer = state.page_buffer.clone();
                    state.memory[start..start + raw_len].copy_from_slice(&page_buffer);
                    state.status &= !STATUS_PROGRAM_FAIL;
                }
                state.write_enabled = false;
                state.status &= !STATUS_WEL;
            }
            OP_BLOCK_ERASE => {
                let row = op.addr.value as u32;
                let raw_len = self.raw_page_len();
                let block = row / self.pages_per_block;
                let start = block as usize * self.pages_per_block as usize * raw_len;
                let len = self.pages_per_block as usize * raw_len;
                if state.fail_next_erase {
                    state.status |= STATUS_ERASE_FAIL;
                    state.fail_next_erase = false;
                } else if state.write_enabled && start + len <= state.memory.len() {
                    state.memory[start..start + len].fill(0xFF);
                    state.status &= !STATUS_ERASE_FAIL;
                }
                state.write_enabled = false;
                state.status &= !STATUS_WEL;
            }
            _ => {}
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::spi_mem::{DataPhase, OpPhase};

    fn giga_id_sim() -> SimulatedController {
        SimulatedController::new(vec![0xC8, 0xB1], 2048, 64, 64, 16)
    }

    #[test]
    fn read_id_returns_seeded_bytes() {
        let mut ctrl = giga_id_sim();
        let op = SpiMemOp {
            cmd: OpPhase::cmd(OP_READ_ID, 1),
            addr: OpPhase::none(),
            dummy: OpPhase::dummy(1, 1),
            data: DataPhase {
                buswidth: 1,
                dtr: false,
                nbytes: 2,
                direction: Some(Direction::In),
            },
        };
        let mut buf = [0u8; 2];
        ctrl.exec(&op, &mut buf).unwrap();
        assert_eq!(buf, [0xC8, 0xB1]);
    }

    #[test]
    fn program_requires_write_enable() {
        let mut ctrl = giga_id_sim();
        let exec_op = SpiMemOp {
            cmd: OpPhase::cmd(OP_PROGRAM_EXECUTE, 1),
            addr: OpPhase::addr(3, 0, 1),
            dummy: OpPhase::none(),
            data: DataPhase::default(),
        };
        ctrl.exec(&exec_op, &mut []).unwrap();
        // Without WRITE_ENABLE, memory stays untouched (still erased 0xFF).
        assert!(ctrl.memory_snapshot().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn write_enable_program_erase_round_trip() {
        let mut ctrl = giga_id_sim();
        let we = SpiMemOp {
            cmd: OpPhase::cmd(OP_WRITE_ENABLE, 1),
            addr: OpPhase::none(),
            dummy: OpPhase::none(),
            data: DataPhase::default(),
        };
        ctrl.exec(&we, &mut []).unwrap();

        let load = SpiMemOp {
            cmd: OpPhase::cmd(OP_PROGRAM_LOAD, 1),
            addr: OpPhase::addr(2, 0, 1),
            dummy: OpPhase::none(),
            data: DataPhase {
                buswidth: 1,
                dtr: false,
                nbytes: 4,
                direction: Some(Direction::Out),
            },
        };
        let mut payload = [0xAAu8; 4];
        ctrl.exec(&load, &mut payload).unwrap();

        let exec = SpiMemOp {
            cmd: OpPhase::cmd(OP_PROGRAM_EXECUTE, 1),
            addr: OpPhase::addr(3, 0, 1),
            dummy: OpPhase::none(),
            data: DataPhase::default(),
        };
        ctrl.exec(&exec, &mut []).unwrap();

        assert_eq!(&ctrl.memory_snapshot()[0..4], &[0xAA; 4]);
    }
}
