//! SPI-NAND operational core (component D): identification, opcode
//! selection, the read/program/erase state machine, ECC status retrieval,
//! die selection, and OTP/UID access. Everything here is driven through
//! the `Controller` trait (component A/B) — no direct USB or byte-level
//! `Programmer` calls.

use std::time::{Duration, Instant};

use log::{debug, trace, warn};

use crate::domain::ecc::EccStatus;
use crate::domain::nand::{part_flags, FlashId, IdFraming, Part, PROBE_FRAMINGS, PROBE_RETRIES_PER_FRAMING};
use crate::domain::spi_mem::{DataPhase, Direction, IoType, OpPhase, SpiMemOp};
use crate::error::{Error, Result};
use crate::infrastructure::bbt::MarkerReader;
use crate::infrastructure::ecc::{self, EccDriver};
use crate::infrastructure::nand::generic::NandAccess;
use crate::infrastructure::spi_mem::Controller;

use super::opcodes::*;
use super::param_page;

/// ECC verdict from the most recent read, including per-step detail when
/// the decoder supports it (Macronix-style secondary opcode).
#[derive(Debug, Clone, Default)]
pub struct EccReadStatus {
    pub overall: Option<EccStatus>,
    /// Per-step bitflip counts; `-1` means uncorrectable for that step.
    /// Empty when the decoder only reports a worst-case summary.
    pub step_bitflips: Vec<i32>,
}

/// Runtime state of a bound SPI-NAND part.
struct State {
    speed_low: u32,
    speed_high: u32,
    current_die: u32,
    /// Cached CONFIG feature register, one per die (max 4).
    config_cache: [u8; 4],
    read_io: IoType,
    read_opcode: u8,
    pl_io: IoType,
    pl_opcode: u8,
    ecc_enabled: bool,
    last_ecc: EccReadStatus,
}

/// The bound SPI-NAND core: a controller plus the part it's talking to.
pub struct SpiNandCore<C: Controller> {
    controller: C,
    part: Part,
    die_count: u32,
    state: State,
    ecc_driver: Option<Box<dyn EccDriver>>,
}

/// Priority order for opcode selection: highest bandwidth first. 8-8-8 and
/// DTR variants are omitted — no catalog part in this crate advertises
/// them, and the selection algorithm degrades gracefully to narrower modes
/// when a wider one isn't in a part's opcode table.
const READ_IO_PRIORITY: [IoType; 6] = [
    IoType::Io144,
    IoType::Io114,
    IoType::Io122,
    IoType::Io112,
    IoType::Io222,
    IoType::Io111,
];

const PL_IO_PRIORITY: [IoType; 3] = [IoType::Io144, IoType::Io114, IoType::Io111];

fn read_cache_opcode(io: IoType) -> u8 {
    match io {
        IoType::Io144 => READ_FROM_CACHE_1_4_4,
        IoType::Io114 => READ_FROM_CACHE_1_1_4,
        IoType::Io122 => READ_FROM_CACHE_1_2_2,
        IoType::Io112 => READ_FROM_CACHE_1_1_2,
        _ => READ_FROM_CACHE_1_1_1_FAST,
    }
}

fn program_load_opcode(io: IoType) -> u8 {
    match io {
        IoType::Io144 | IoType::Io114 => PROGRAM_LOAD_QUAD,
        _ => PROGRAM_LOAD,
    }
}

fn synthetic_op_for_width(io: IoType, direction: Direction) -> SpiMemOp {
    let info = io.info();
    SpiMemOp {
        cmd: OpPhase::cmd(0, info.cmd_buswidth),
        addr: OpPhase::addr(1, 0, info.addr_buswidth),
        dummy: OpPhase::none(),
        data: DataPhase {
            buswidth: info.data_buswidth,
            dtr: info.dtr,
            nbytes: 1,
            direction: Some(direction),
        },
    }
}

impl<C: Controller> SpiNandCore<C> {
    /// Selects the read/program-load IO width (highest bandwidth both
    /// `part` and the controller support) and the clock ceiling implied
    /// by that choice.
    fn select_io(part: &Part, controller: &C) -> (IoType, IoType, u32) {
        let read_io = *READ_IO_PRIORITY
            .iter()
            .find(|&&io| part.supports_read(io) && controller.supports(&synthetic_op_for_width(io, Direction::In)))
            .unwrap_or(&IoType::Io111);
        let pl_io = *PL_IO_PRIORITY
            .iter()
            .find(|&&io| part.supports_program_load(io) && controller.supports(&synthetic_op_for_width(io, Direction::Out)))
            .unwrap_or(&IoType::Io111);

        let speed_high = part
            .max_clock
            .max_hz_for(read_io)
            .unwrap_or(50_000_000)
            .min(part.max_clock.max_hz_for(pl_io).unwrap_or(50_000_000));

        (read_io, pl_io, speed_high)
    }

    /// Reapplies IO/clock selection against the current `part`, used
    /// after a vendor `pp_post_init` hook has rewritten its opcode
    /// tables or clock ceiling.
    fn refresh_io_selection(&mut self) {
        let (read_io, pl_io, speed_high) = Self::select_io(&self.part, &self.controller);
        self.state.read_io = read_io;
        self.state.read_opcode = read_cache_opcode(read_io);
        self.state.pl_io = pl_io;
        self.state.pl_opcode = program_load_opcode(pl_io);
        self.state.speed_high = speed_high;
    }

    /// Attaches to `part` over `controller`, running the full init
    /// sequence (reset, ONFI-like parameter-page probe, opcode
    /// selection, per-die setup, switch to high speed). Identification
    /// (matching `part` against the bus) is assumed to have already
    /// happened via [`probe_id`]/[`super::catalog::Catalog::identify`];
    /// this only performs the post-identification setup. `pp_post_init`
    /// is the matched vendor's hook (if any), applied once the
    /// parameter page validates (spec.md §4.4 step 4).
    pub fn attach(controller: C, part: Part, die_count: u32) -> Result<Self> {
        Self::attach_with_pp_post_init(controller, part, die_count, None)
    }

    pub fn attach_with_pp_post_init(mut controller: C, part: Part, die_count: u32, pp_post_init: Option<fn(&mut Part)>) -> Result<Self> {
        let ecc_driver = ecc::lookup(part.ecc_decoder);
        if ecc_driver.is_none() {
            warn!(
                "spi-nand: part {} names unknown ECC decoder {:?}; ECC status will be unavailable",
                part.model, part.ecc_decoder
            );
        }

        let (read_io, pl_io, speed_high) = Self::select_io(&part, &controller);

        let mut core = Self {
            controller,
            part,
            die_count: die_count.max(1),
            state: State {
                speed_low: 10_000_000,
                speed_high,
                current_die: 0,
                config_cache: [0u8; 4],
                read_io,
                read_opcode: read_cache_opcode(read_io),
                pl_io,
                pl_opcode: program_load_opcode(pl_io),
                ecc_enabled: false,
                last_ecc: EccReadStatus::default(),
            },
            ecc_driver,
        };

        core.reset()?;

        if !core.part.has_flag(part_flags::NO_PP) && !core.part.has_flag(part_flags::NO_OP) {
            match core.probe_param_page() {
                Ok(Some(_copy)) => {
                    debug!("spi-nand: ONFI-like parameter page confirmed for {}", core.part.model);
                    if let Some(post_init) = pp_post_init {
                        post_init(&mut core.part);
                        core.ecc_driver = ecc::lookup(core.part.ecc_decoder);
                        core.refresh_io_selection();
                        debug!(
                            "spi-nand: {}: applied vendor pp_post_init (read {:?}, program-load {:?}, {} Hz)",
                            core.part.model, core.state.read_io, core.state.pl_io, core.state.speed_high
                        );
                    }
                }
                Ok(None) => {
                    debug!("spi-nand: {}: no copy of the parameter page validated (signature/CRC-16 mismatch)", core.part.model);
                }
                Err(e) => {
                    debug!("spi-nand: {}: parameter page probe failed: {e}", core.part.model);
                }
            }
        }

        for die in (0..core.die_count).rev() {
            core.select_die(die)?;
            let config = core.get_feature(FEATURE_CONFIG)?;
            core.state.config_cache[die as usize] = config;
            core.set_feature(FEATURE_PROTECT, 0x00)?; // clear block protect
            if core.state.read_io.info().data_buswidth >= 4 || core.state.pl_io.info().data_buswidth >= 4 {
                core.set_quad_enable(true)?;
            }
            core.ondie_ecc_control(false)?;
        }
        core.select_die(0)?;

        debug!(
            "spi-nand: attached {} (read {:?}/{:#04x}, program-load {:?}/{:#04x}, {} Hz)",
            core.part.model, core.state.read_io, core.state.read_opcode, core.state.pl_io, core.state.pl_opcode, core.state.speed_high
        );

        Ok(core)
    }

    pub fn part(&self) -> &Part {
        &self.part
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    pub fn last_ecc_status(&self) -> &EccReadStatus {
        &self.state.last_ecc
    }

    /// Explicitly sets the on-die ECC engine's enabled state. `read_page`
    /// already does this per call; programs don't, since the engine
    /// applies to both directions once configured, so callers that write
    /// with ECC on call this first.
    pub fn set_ecc_enabled(&mut self, enable: bool) -> Result<()> {
        self.ondie_ecc_control(enable)
    }

    fn cs_config_bit(&self) -> u8 {
        self.state.config_cache[self.state.current_die as usize]
    }

    // --- Low-level op helpers -------------------------------------------------

    fn exec_simple(&mut self, op: &SpiMemOp) -> Result<()> {
        let mut empty = [];
        self.controller.exec(op, &mut empty)
    }

    pub fn reset(&mut self) -> Result<()> {
        let op = SpiMemOp {
            cmd: OpPhase::cmd(RESET, 1),
            addr: OpPhase::none(),
            dummy: OpPhase::none(),
            data: DataPhase::default(),
        };
        self.exec_simple(&op)?;
        self.wait_oip(Duration::from_micros(RESET_TIMEOUT_US))
    }

    pub fn get_feature(&mut self, addr: u8) -> Result<u8> {
        let op = SpiMemOp {
            cmd: OpPhase::cmd(GET_FEATURE, 1),
            addr: OpPhase::addr(1, addr as u64, 1),
            dummy: OpPhase::none(),
            data: DataPhase {
                buswidth: 1,
                dtr: false,
                nbytes: 1,
                direction: Some(Direction::In),
            },
        };
        let mut buf = [0u8; 1];
        self.controller.exec(&op, &mut buf)?;
        Ok(buf[0])
    }

    pub fn set_feature(&mut self, addr: u8, value: u8) -> Result<()> {
        let op = SpiMemOp {
            cmd: OpPhase::cmd(SET_FEATURE, 1),
            addr: OpPhase::addr(1, addr as u64, 1),
            dummy: OpPhase::none(),
            data: DataPhase {
                buswidth: 1,
                dtr: false,
                nbytes: 1,
                direction: Some(Direction::Out),
            },
        };
        let mut buf = [value];
        self.controller.exec(&op, &mut buf)
    }

    fn wait_oip(&mut self, timeout: Duration) -> Result<()> {
        let start = Instant::now();
        loop {
            let status = self.get_feature(FEATURE_STATUS)?;
            if status & STATUS_OIP == 0 {
                return Ok(());
            }
            if start.elapsed() > timeout {
                return Err(Error::Timeout);
            }
        }
    }

    pub fn write_enable(&mut self) -> Result<()> {
        self.exec_simple(&SpiMemOp {
            cmd: OpPhase::cmd(WRITE_ENABLE, 1),
            addr: OpPhase::none(),
            dummy: OpPhase::none(),
            data: DataPhase::default(),
        })?;
        let status = self.get_feature(FEATURE_STATUS)?;
        if status & STATUS_WEL == 0 {
            return Err(Error::DeviceIoError("WRITE_ENABLE did not set WEL".into()));
        }
        Ok(())
    }

    pub fn write_disable(&mut self) -> Result<()> {
        self.exec_simple(&SpiMemOp {
            cmd: OpPhase::cmd(WRITE_DISABLE, 1),
            addr: OpPhase::none(),
            dummy: OpPhase::none(),
            data: DataPhase::default(),
        })
    }

    pub fn select_die(&mut self, die: u32) -> Result<()> {
        if die == self.state.current_die && die != 0 {
            // Always allowed to reselect die 0 to reset pipeline state.
            return Ok(());
        }
        self.exec_simple(&SpiMemOp {
            cmd: OpPhase::cmd(SELECT_DIE, 1),
            addr: OpPhase::addr(1, die as u64, 1),
            dummy: OpPhase::none(),
            data: DataPhase::default(),
        })?;
        self.state.current_die = die;
        Ok(())
    }

    fn set_quad_enable(&mut self, enable: bool) -> Result<()> {
        use crate::domain::nand::part::QeType;
        if let QeType::ConfigBit(bit) = self.part.qe {
            let config = self.get_feature(FEATURE_CONFIG)?;
            let new = if enable { config | (1 << bit) } else { config & !(1 << bit) };
            self.set_feature(FEATURE_CONFIG, new)?;
            self.state.config_cache[self.state.current_die as usize] = new;
        }
        Ok(())
    }

    fn ondie_ecc_control(&mut self, enable: bool) -> Result<()> {
        let config = self.cs_config_bit();
        let new = if enable { config | CONFIG_ECC_EN } else { config & !CONFIG_ECC_EN };
        if new != config {
            self.set_feature(FEATURE_CONFIG, new)?;
            self.state.config_cache[self.state.current_die as usize] = new;
        }
        self.state.ecc_enabled = enable;
        Ok(())
    }

    /// Computes the (possibly plane-adjusted) column address and the
    /// die-relative page number for a die-relative page index, per the
    /// plane-address rule in §4.4.
    fn plane_adjusted(&self, page_within_die: u32, column: u32) -> (u32, u32) {
        let plane_bit = self.part.memory_org.plane_bit(page_within_die);
        let col = column | (plane_bit << (self.part.memory_org.page_shift() + 1));
        (page_within_die, col)
    }

    fn check_ecc_after_read(&mut self) -> Result<()> {
        if !self.state.ecc_enabled {
            self.state.last_ecc = EccReadStatus::default();
            return Ok(());
        }
        let status_reg = self.get_feature(FEATURE_STATUS)?;
        let Some(driver) = self.ecc_driver.as_ref() else {
            self.state.last_ecc = EccReadStatus::default();
            return Ok(());
        };
        let overall = driver.decode_status_register(status_reg);
        let mut step_bitflips = Vec::new();
        if let Some(opcode) = driver.per_step_opcode() {
            let steps = self.part.ecc.map(|e| e.ecc_steps(self.part.memory_org.page_size)).unwrap_or(0);
            if steps > 0 {
                let op = SpiMemOp {
                    cmd: OpPhase::cmd(opcode, 1),
                    addr: OpPhase::none(),
                    dummy: OpPhase::dummy(1, 1),
                    data: DataPhase {
                        buswidth: 1,
                        dtr: false,
                        nbytes: steps,
                        direction: Some(Direction::In),
                    },
                };
                let mut raw = vec![0u8; steps as usize];
                self.controller.exec(&op, &mut raw)?;
                let per_step = driver.decode_per_step(&raw);
                step_bitflips = per_step
                    .iter()
                    .map(|s| match s {
                        EccStatus::NoError => 0,
                        EccStatus::Corrected { bit_flips } => *bit_flips as i32,
                        _ => -1,
                    })
                    .collect();
            }
        }
        match overall {
            EccStatus::Corrected { bit_flips } => {
                warn!("spi-nand: ECC corrected {bit_flips} bit error(s)");
            }
            EccStatus::Uncorrectable => {
                warn!("spi-nand: ECC uncorrectable error");
            }
            _ => {}
        }
        self.state.last_ecc = EccReadStatus {
            overall: Some(overall),
            step_bitflips,
        };
        Ok(())
    }

    /// Reads one page: `READ_TO_CACHE` → poll → `READ_FROM_CACHE`,
    /// honoring the controller's `adjust_op_size` splitting.
    pub fn read_page(&mut self, page: u32, column: u32, buf: &mut [u8], enable_ecc: bool) -> Result<()> {
        let (die, within_die) = self.part.memory_org.select_die_page(page);
        self.select_die(die)?;
        self.ondie_ecc_control(enable_ecc)?;
        let (row, col) = self.plane_adjusted(within_die, column);

        self.exec_simple(&SpiMemOp {
            cmd: OpPhase::cmd(READ_TO_CACHE, 1),
            addr: OpPhase::addr(3, row as u64, 1),
            dummy: OpPhase::none(),
            data: DataPhase::default(),
        })?;
        self.wait_oip(Duration::from_micros(DEFAULT_R_TIMEOUT_US))?;

        if enable_ecc {
            self.check_ecc_after_read()?;
        }

        let io = self.state.read_io;
        let opcode = self.state.read_opcode;
        let dummy_bytes = if io == IoType::Io111 && opcode == READ_FROM_CACHE_1_1_1 { 0 } else { 1 };
        let mut offset = 0usize;
        while offset < buf.len() {
            let op = SpiMemOp {
                cmd: OpPhase::cmd(opcode, 1),
                addr: OpPhase::addr(2, col as u64 + offset as u64, 1),
                dummy: OpPhase::dummy(dummy_bytes, io.info().addr_buswidth),
                data: DataPhase {
                    buswidth: io.info().data_buswidth,
                    dtr: io.info().dtr,
                    nbytes: (buf.len() - offset) as u32,
                    direction: Some(Direction::In),
                },
            };
            for chunk in self.controller.adjust_op_size(&op)? {
                let n = chunk.data.nbytes as usize;
                self.controller.exec(&chunk, &mut buf[offset..offset + n])?;
                offset += n;
            }
        }
        Ok(())
    }

    /// Programs one page: WRITE_ENABLE → PROGRAM_LOAD (split as needed) →
    /// PROGRAM_EXECUTE → poll → fail check.
    pub fn write_page(&mut self, page: u32, column: u32, data: &[u8]) -> Result<()> {
        let (die, within_die) = self.part.memory_org.select_die_page(page);
        self.select_die(die)?;
        let (row, col) = self.plane_adjusted(within_die, column);

        let result = (|| -> Result<()> {
            self.write_enable()?;
            let io = self.state.pl_io;
            let opcode = self.state.pl_opcode;
            let mut offset = 0usize;
            while offset < data.len() {
                let op = SpiMemOp {
                    cmd: OpPhase::cmd(opcode, 1),
                    addr: OpPhase::addr(2, col as u64 + offset as u64, 1),
                    dummy: OpPhase::none(),
                    data: DataPhase {
                        buswidth: io.info().data_buswidth,
                        dtr: io.info().dtr,
                        nbytes: (data.len() - offset) as u32,
                        direction: Some(Direction::Out),
                    },
                };
                let chunks = op.adjust_op_size(self.controller.caps().max_data_len.max(1))?;
                for chunk in chunks {
                    let n = chunk.data.nbytes as usize;
                    let mut tmp = data[offset..offset + n].to_vec();
                    self.controller.exec(&chunk, &mut tmp)?;
                    offset += n;
                }
            }

            self.exec_simple(&SpiMemOp {
                cmd: OpPhase::cmd(PROGRAM_EXECUTE, 1),
                addr: OpPhase::addr(3, row as u64, 1),
                dummy: OpPhase::none(),
                data: DataPhase::default(),
            })?;
            self.wait_oip(Duration::from_micros(DEFAULT_PP_TIMEOUT_US))?;

            let status = self.get_feature(FEATURE_STATUS)?;
            if status & STATUS_PROGRAM_FAIL != 0 {
                return Err(Error::FlashProgramFailed {
                    address: (page as u64 * self.part.memory_org.page_size as u64) as u32,
                });
            }
            Ok(())
        })();

        if result.is_err() {
            let _ = self.write_disable();
        }
        result
    }

    pub fn erase_block(&mut self, block: u32) -> Result<()> {
        let pages_per_block = self.part.memory_org.pages_per_block;
        let page = block * pages_per_block;
        let (die, within_die) = self.part.memory_org.select_die_page(page);
        self.select_die(die)?;

        let result = (|| -> Result<()> {
            self.write_enable()?;
            self.exec_simple(&SpiMemOp {
                cmd: OpPhase::cmd(BLOCK_ERASE, 1),
                addr: OpPhase::addr(3, within_die as u64, 1),
                dummy: OpPhase::none(),
                data: DataPhase::default(),
            })?;
            self.wait_oip(Duration::from_micros(DEFAULT_BE_TIMEOUT_US))?;
            let status = self.get_feature(FEATURE_STATUS)?;
            if status & STATUS_ERASE_FAIL != 0 {
                return Err(Error::FlashEraseFailed { block });
            }
            Ok(())
        })();

        if result.is_err() {
            let _ = self.write_disable();
        }
        result
    }

    // --- OTP / UID -------------------------------------------------------

    fn otp_enter(&mut self) -> Result<()> {
        let config = self.get_feature(FEATURE_CONFIG)?;
        self.set_feature(FEATURE_CONFIG, config | CONFIG_OTP_EN)
    }

    fn otp_leave(&mut self) -> Result<()> {
        let config = self.get_feature(FEATURE_CONFIG)?;
        self.set_feature(FEATURE_CONFIG, config & !CONFIG_OTP_EN)
    }

    /// Reads and validates the ONFI-like parameter page (spec §4.4 init
    /// step 3): disables ECC, enters OTP mode, `READ_TO_CACHE` on
    /// [`OTP_PAGE_PARAM_PAGE`], polls OIP, then `READ_FROM_CACHE(0x0B)`
    /// for `param_page::READ_LEN` bytes (three redundant copies). Each
    /// copy is checked by CRC-16 (poly `0x8005`, init `0x4F4E`) and the
    /// `'O''N''F''I'` signature; the first valid copy is returned. Always
    /// leaves OTP mode afterward, even on error, mirroring
    /// [`Self::otp_read`].
    pub fn probe_param_page(&mut self) -> Result<Option<[u8; param_page::COPY_LEN]>> {
        let run = |core: &mut Self| -> Result<Option<[u8; param_page::COPY_LEN]>> {
            core.set_feature(FEATURE_CONFIG, 0)?;
            core.otp_enter()?;
            core.exec_simple(&SpiMemOp {
                cmd: OpPhase::cmd(READ_TO_CACHE, 1),
                addr: OpPhase::addr(3, OTP_PAGE_PARAM_PAGE as u64, 1),
                dummy: OpPhase::none(),
                data: DataPhase::default(),
            })?;
            core.wait_oip(Duration::from_micros(DEFAULT_R_TIMEOUT_US))?;
            let mut raw = vec![0u8; param_page::READ_LEN];
            let op = SpiMemOp {
                cmd: OpPhase::cmd(READ_FROM_CACHE_1_1_1_FAST, 1),
                addr: OpPhase::addr(2, 0, 1),
                dummy: OpPhase::dummy(1, 1),
                data: DataPhase {
                    buswidth: 1,
                    dtr: false,
                    nbytes: raw.len() as u32,
                    direction: Some(Direction::In),
                },
            };
            core.controller.exec(&op, &mut raw)?;
            Ok(param_page::first_valid_copy(&raw))
        };
        let result = run(self);
        let _ = self.otp_leave();
        result
    }

    /// Reads one OTP page. Always leaves OTP mode afterward, even on
    /// error (`original_source/flash/nand/spi-nand/otp.c`'s pattern).
    pub fn otp_read(&mut self, otp_start: u32, index: u32, buf: &mut [u8]) -> Result<()> {
        let run = |core: &mut Self| -> Result<()> {
            core.otp_enter()?;
            core.exec_simple(&SpiMemOp {
                cmd: OpPhase::cmd(READ_TO_CACHE, 1),
                addr: OpPhase::addr(3, (otp_start + index) as u64, 1),
                dummy: OpPhase::none(),
                data: DataPhase::default(),
            })?;
            core.wait_oip(Duration::from_micros(DEFAULT_R_TIMEOUT_US))?;
            let op = SpiMemOp {
                cmd: OpPhase::cmd(READ_FROM_CACHE_1_1_1_FAST, 1),
                addr: OpPhase::addr(2, 0, 1),
                dummy: OpPhase::dummy(1, 1),
                data: DataPhase {
                    buswidth: 1,
                    dtr: false,
                    nbytes: buf.len() as u32,
                    direction: Some(Direction::In),
                },
            };
            core.controller.exec(&op, buf)
        };
        let result = run(self);
        let _ = self.otp_leave();
        result
    }

    pub fn otp_write(&mut self, otp_start: u32, index: u32, data: &[u8]) -> Result<()> {
        let run = |core: &mut Self| -> Result<()> {
            core.otp_enter()?;
            core.write_enable()?;
            let op = SpiMemOp {
                cmd: OpPhase::cmd(PROGRAM_LOAD, 1),
                addr: OpPhase::addr(2, 0, 1),
                dummy: OpPhase::none(),
                data: DataPhase {
                    buswidth: 1,
                    dtr: false,
                    nbytes: data.len() as u32,
                    direction: Some(Direction::Out),
                },
            };
            let mut tmp = data.to_vec();
            core.controller.exec(&op, &mut tmp)?;
            core.exec_simple(&SpiMemOp {
                cmd: OpPhase::cmd(PROGRAM_EXECUTE, 1),
                addr: OpPhase::addr(3, (otp_start + index) as u64, 1),
                dummy: OpPhase::none(),
                data: DataPhase::default(),
            })?;
            core.wait_oip(Duration::from_micros(DEFAULT_PP_TIMEOUT_US))?;
            core.write_disable()
        };
        let result = run(self);
        let _ = self.otp_leave();
        result
    }

    pub fn otp_lock(&mut self) -> Result<()> {
        let run = |core: &mut Self| -> Result<()> {
            core.otp_enter()?;
            let config = core.get_feature(FEATURE_CONFIG)?;
            core.set_feature(FEATURE_CONFIG, config | CONFIG_OTP_LOCK)?;
            core.write_enable()?;
            core.exec_simple(&SpiMemOp {
                cmd: OpPhase::cmd(PROGRAM_EXECUTE, 1),
                addr: OpPhase::addr(3, 0, 1),
                dummy: OpPhase::none(),
                data: DataPhase::default(),
            })?;
            core.wait_oip(Duration::from_micros(DEFAULT_PP_TIMEOUT_US))?;
            let confirm = core.get_feature(FEATURE_CONFIG)?;
            if confirm & CONFIG_OTP_LOCK == 0 {
                return Err(Error::DeviceIoError("OTP lock bit did not stick".into()));
            }
            Ok(())
        };
        let result = run(self);
        let _ = self.otp_leave();
        result
    }

    pub fn otp_locked(&mut self) -> Result<bool> {
        let config = self.get_feature(FEATURE_CONFIG)?;
        Ok(config & CONFIG_OTP_LOCK != 0)
    }

    /// Reads the part's unique ID out of OTP page 0: a 16-byte value
    /// repeated with its bitwise complement eight times. Returns the
    /// first 16-byte block whose XOR with the following block is all
    /// `0xFF`.
    pub fn read_uid(&mut self) -> Result<[u8; 16]> {
        let mut raw = vec![0u8; 256];
        self.otp_read(0, 0, &mut raw)?;
        for chunk in raw.chunks_exact(32) {
            let (a, b) = chunk.split_at(16);
            if a.iter().zip(b).all(|(x, y)| x ^ y == 0xFF) {
                let mut uid = [0u8; 16];
                uid.copy_from_slice(a);
                return Ok(uid);
            }
        }
        Err(Error::NotExist("UID pattern not found in OTP page 0".into()))
    }
}

// --- NandAccess / MarkerReader bridges for the generic NAND layer/BBT ----

impl<C: Controller> MarkerReader for SpiNandCore<C> {
    fn read_oob_marker(&mut self, page: u32, oob_offset: u32, len: u32) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len as usize];
        self.read_page(page, self.part.memory_org.page_size + oob_offset, &mut buf, false)?;
        Ok(buf)
    }
}

impl<C: Controller> NandAccess for SpiNandCore<C> {
    fn page_size(&self) -> u32 {
        self.part.memory_org.page_size
    }

    fn oob_size(&self) -> u32 {
        self.part.memory_org.oob_size
    }

    fn pages_per_block(&self) -> u32 {
        self.part.memory_org.pages_per_block
    }

    fn read_page_raw(&mut self, page: u32, buf: &mut [u8]) -> Result<()> {
        self.read_page(page, 0, buf, false)
    }

    fn program_page_raw(&mut self, page: u32, buf: &[u8]) -> Result<()> {
        self.write_page(page, 0, buf)
    }

    fn erase_block(&mut self, block: u32) -> Result<()> {
        SpiNandCore::erase_block(self, block)
    }
}

/// Identifies a part on the bus: tries each of the three READ_ID framings
/// (`{Dummy, Addr0, Direct}`), retrying up to
/// [`PROBE_RETRIES_PER_FRAMING`] times per framing before moving to the
/// next, per the catalog's vendor resolution order.
pub fn probe_id<C: Controller>(controller: &mut C, id_len: usize) -> Result<FlashId> {
    let mut last_err = None;
    for framing in PROBE_FRAMINGS {
        for _ in 0..PROBE_RETRIES_PER_FRAMING {
            match read_id_once(controller, framing, id_len) {
                Ok(bytes) => {
                    trace!("spi-nand: READ_ID {framing:?} -> {bytes:02X?}");
                    return Ok(FlashId::from_probe(framing, &bytes));
                }
                Err(e) => last_err = Some(e),
            }
        }
    }
    Err(last_err.unwrap_or(Error::DeviceIoError("READ_ID produced no response".into())))
}

pub(crate) fn read_id_once<C: Controller>(controller: &mut C, framing: IdFraming, id_len: usize) -> Result<Vec<u8>> {
    let (addr, dummy) = match framing {
        IdFraming::Dummy => (OpPhase::none(), OpPhase::dummy(1, 1)),
        IdFraming::Addr0 => (OpPhase::addr(1, 0, 1), OpPhase::none()),
        IdFraming::Direct => (OpPhase::none(), OpPhase::none()),
    };
    let op = SpiMemOp {
        cmd: OpPhase::cmd(READ_ID, 1),
        addr,
        dummy,
        data: DataPhase {
            buswidth: 1,
            dtr: false,
            nbytes: id_len as u32,
            direction: Some(Direction::In),
        },
    };
    let mut buf = vec![0u8; id_len];
    controller.exec(&op, &mut buf)?;
    Ok(buf)
}
