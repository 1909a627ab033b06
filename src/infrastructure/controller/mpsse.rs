//! FTDI MPSSE (FT232H/FT2232H/FT4232H) SPI controller.
//!
//! MPSSE only ever shifts a single data line (it has no notion of dual/quad
//! I/O), so this controller's caps cap every bus width at 1. It reuses the
//! opcode constants and command builders already written for the legacy
//! `infrastructure::programmer::ftdi` stub rather than duplicating them;
//! that stub's `Programmer` impl stays in place for byte-oriented callers,
//! while this controller gives the SPI-mem-aware call sites (the SPI-NAND
//! core) a real implementation instead of `Error::NotSupported`.

use futures_lite::future::block_on;
use log::{debug, trace};
use nusb::transfer::RequestBuffer;

use crate::domain::spi_mem::{Direction, IoType, SpiMemOp};
use crate::error::{Error, Result};
use crate::infrastructure::programmer::ftdi::mpsse::{build_rw_bytes_cmd, build_set_low_gpio_cmd};
use crate::infrastructure::programmer::traits::Programmer;
use crate::infrastructure::spi_mem::{Controller, ControllerCaps};

const EP_OUT: u8 = 0x02;
const EP_IN: u8 = 0x81;

// ADBUS bit layout: 0=TCK 1=TDI 2=TDO 3=TMS/CS 4-7=GPIOL
const ADBUS_DIRECTION_OUT_MASK: u8 = 0b0000_1011; // TCK, TDI, CS driven; TDO input
const CS_BIT: u8 = 0b0000_1000;

const MPSSE_BASE_CLK_12M: u32 = 12_000_000;
const MPSSE_BASE_CLK_60M: u32 = 60_000_000;
const MPSSE_MAX_CLK_DIV: u32 = 0xffff;
const MPSSE_CMD_TCK_DIVISOR: u8 = 0x86;
const MPSSE_CMD_TCK_D5_DIS: u8 = 0x8A;
const MPSSE_CMD_TCK_D5_EN: u8 = 0x8B;

/// `baseclk / freq` rounded down to the nearest achievable divisor,
/// capped at `MPSSE_MAX_CLK_DIV`. Mirrors the two-candidate clock search:
/// callers try this against both the 60 MHz and (divide-by-5) 12 MHz base
/// clocks and keep whichever lands closer to `freq` without exceeding it.
fn calc_clock(baseclk: u32, freq: u32) -> (u32, u16) {
    if freq > baseclk / 2 {
        return (baseclk / 2, 0);
    }
    let div = ((baseclk / freq) / 2).saturating_sub(1).min(MPSSE_MAX_CLK_DIV);
    (baseclk / (div + 1) / 2, div as u16)
}

pub struct MpsseController {
    _device: nusb::Device,
    interface: nusb::Interface,
    caps: ControllerCaps,
    idle_gpio: u8,
    /// FT2232C lacks the TCK/5 prescaler toggle and the 60 MHz base clock;
    /// it is permanently clocked from the 12 MHz base.
    is_ft2232c: bool,
    /// SPI clock-stretching mode that shifts data a half-cycle later;
    /// when active the requested frequency is scaled by 3/2 before the
    /// divisor search, matching the extra TCK edge per bit.
    three_phase: bool,
}

impl MpsseController {
    pub fn new(device: nusb::Device) -> Result<Self> {
        let interface = device.claim_interface(0)?;
        let mut ctrl = Self {
            _device: device,
            interface,
            caps: ControllerCaps {
                max_data_buswidth: 1,
                max_addr_buswidth: 1,
                max_cmd_buswidth: 1,
                supports_dtr: false,
                max_data_len: 65536,
            },
            idle_gpio: CS_BIT,
            is_ft2232c: false,
            three_phase: false,
        };
        ctrl.send(&build_set_low_gpio_cmd(CS_BIT, ADBUS_DIRECTION_OUT_MASK))?;
        ctrl.set_speed(1_000_000)?;
        Ok(ctrl)
    }

    pub fn set_ft2232c(&mut self, is_ft2232c: bool) {
        self.is_ft2232c = is_ft2232c;
    }

    pub fn set_three_phase(&mut self, three_phase: bool) {
        self.three_phase = three_phase;
    }

    fn send(&self, data: &[u8]) -> Result<()> {
        trace!("MPSSE OUT: {:02X?}", data);
        let result = block_on(async { self.interface.bulk_out(EP_OUT, data.to_vec()).await });
        result.status?;
        Ok(())
    }

    fn recv(&self, len: usize) -> Result<Vec<u8>> {
        let result =
            block_on(async { self.interface.bulk_in(EP_IN, RequestBuffer::new(len)).await });
        let data = result.into_result()?;
        trace!("MPSSE IN: {:02X?}", data);
        Ok(data)
    }

    fn cs_assert(&self) -> Result<()> {
        self.send(&build_set_low_gpio_cmd(
            self.idle_gpio & !CS_BIT,
            ADBUS_DIRECTION_OUT_MASK,
        ))
    }

    fn cs_deassert(&self) -> Result<()> {
        self.send(&build_set_low_gpio_cmd(
            self.idle_gpio,
            ADBUS_DIRECTION_OUT_MASK,
        ))
    }

    /// Full-duplex byte transfer framed by CS, for byte-oriented callers
    /// that don't go through the phase-aware `Controller::exec` path
    /// (the `Programmer` adapter below).
    fn raw_transfer(&self, tx: &[u8], rx: &mut [u8]) -> Result<()> {
        self.cs_assert()?;
        let result = (|| -> Result<()> {
            if tx.is_empty() {
                return Ok(());
            }
            self.send(&build_rw_bytes_cmd(tx))?;
            let data = self.recv(tx.len())?;
            let n = data.len().min(rx.len());
            rx[..n].copy_from_slice(&data[..n]);
            Ok(())
        })();
        self.cs_deassert()?;
        result
    }

    /// Picks a clock divisor for `hz`, choosing between the 60 MHz base
    /// clock and the TCK/5-prescaled 12 MHz base clock (FT2232C only has
    /// the latter), whichever lands closer to the request.
    pub fn set_speed(&mut self, hz: u32) -> Result<()> {
        let mut freq = hz.max(1);
        if self.three_phase {
            freq = freq * 3 / 2;
        }

        let (real_freq_d5, div_d5) = calc_clock(MPSSE_BASE_CLK_12M, freq);

        if self.is_ft2232c {
            debug!("MPSSE: clock divisor {div_d5} (12 MHz/5 base) for {hz} Hz, actual {real_freq_d5} Hz");
            return self.send(&[MPSSE_CMD_TCK_DIVISOR, (div_d5 & 0xff) as u8, (div_d5 >> 8) as u8]);
        }

        let (real_freq, div) = calc_clock(MPSSE_BASE_CLK_60M, freq);
        let diff = freq.abs_diff(real_freq);
        let diff_d5 = freq.abs_diff(real_freq_d5);

        if diff <= diff_d5 {
            debug!("MPSSE: clock divisor {div} (60 MHz base) for {hz} Hz, actual {real_freq} Hz");
            self.send(&[
                MPSSE_CMD_TCK_D5_DIS,
                MPSSE_CMD_TCK_DIVISOR,
                (div & 0xff) as u8,
                (div >> 8) as u8,
            ])
        } else {
            debug!("MPSSE: clock divisor {div_d5} (12 MHz/5 base) for {hz} Hz, actual {real_freq_d5} Hz");
            self.send(&[
                MPSSE_CMD_TCK_D5_EN,
                MPSSE_CMD_TCK_DIVISOR,
                (div_d5 & 0xff) as u8,
                (div_d5 >> 8) as u8,
            ])
        }
    }
}

impl Controller for MpsseController {
    fn name(&self) -> &str {
        "FTDI MPSSE SPI Master"
    }

    fn caps(&self) -> ControllerCaps {
        self.caps
    }

    fn io_name(&self, io_type: IoType) -> &'static str {
        io_type.name()
    }

    fn exec(&mut self, op: &SpiMemOp, buf: &mut [u8]) -> Result<()> {
        if !self.supports(op) {
            return Err(Error::NotSupported(
                "MPSSE only supports single-IO (1-1-1) framing".to_string(),
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

        self.cs_assert()?;
        let result = (|| -> Result<()> {
            if !header.is_empty() {
                self.send(&build_rw_bytes_cmd(&header))?;
                // Discard the loopback bytes clocked in during the header.
                self.recv(header.len())?;
            }

            if op.data.nbytes == 0 {
                return Ok(());
            }

            match op.data.direction.unwrap_or(Direction::Out) {
                Direction::Out => {
                    self.send(&build_rw_bytes_cmd(&buf[..op.data.nbytes as usize]))?;
                    self.recv(op.data.nbytes as usize)?;
                }
                Direction::In => {
                    let tx = vec![0u8; op.data.nbytes as usize];
                    self.send(&build_rw_bytes_cmd(&tx))?;
                    let rx = self.recv(op.data.nbytes as usize)?;
                    buf[..rx.len()].copy_from_slice(&rx);
                }
            }
            Ok(())
        })();
        self.cs_deassert()?;
        result
    }
}

/// Byte-oriented view of the same hardware, for CLI call sites (and the
/// simpler NOR/EEPROM paths) that only need `spi_transfer`/`set_cs`
/// rather than phase-aware framing. Supersedes the old
/// `infrastructure::programmer::ftdi` stub, which never implemented any
/// of this.
impl Programmer for MpsseController {
    fn name(&self) -> &str {
        "FTDI MPSSE SPI Master"
    }

    fn spi_transfer(&mut self, tx: &[u8], rx: &mut [u8]) -> Result<()> {
        self.raw_transfer(tx, rx)
    }

    fn set_cs(&mut self, active: bool) -> Result<()> {
        if active {
            self.cs_assert()
        } else {
            self.cs_deassert()
        }
    }

    fn set_speed(&mut self, speed: u8) -> Result<()> {
        // Matches the teacher's CH341A speed-code convention (0..7), so
        // `--speed` behaves the same regardless of which driver is bound.
        let hz = match speed {
            0 => 21_000,
            1 => 100_000,
            2 => 400_000,
            3 => 750_000,
            4 => 1_500_000,
            5 => 3_000_000,
            6 => 6_000_000,
            7 => 12_000_000,
            _ => 3_000_000,
        };
        MpsseController::set_speed(self, hz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adbus_cs_bit_matches_direction_mask() {
        assert_eq!(CS_BIT & ADBUS_DIRECTION_OUT_MASK, CS_BIT);
    }

    #[test]
    fn calc_clock_caps_at_half_base() {
        let (freq, div) = calc_clock(MPSSE_BASE_CLK_60M, 40_000_000);
        assert_eq!(freq, MPSSE_BASE_CLK_60M / 2);
        assert_eq!(div, 0);
    }

    #[test]
    fn calc_clock_6mhz_prefers_60mhz_base() {
        // 60 MHz base gets an exact 6 MHz (div=4); 12 MHz/5 base can only
        // land on 6 MHz too (div=0), so both are exact - 60 MHz base is
        // picked on ties (diff <= diff_d5).
        let (freq60, div60) = calc_clock(MPSSE_BASE_CLK_60M, 6_000_000);
        let (freq12, _div12) = calc_clock(MPSSE_BASE_CLK_12M, 6_000_000);
        assert_eq!(freq60, 6_000_000);
        assert_eq!(div60, 4);
        assert_eq!(freq12, 6_000_000);
    }

    #[test]
    fn calc_clock_400khz_exact_from_both_bases() {
        let (freq60, _) = calc_clock(MPSSE_BASE_CLK_60M, 400_000);
        let (freq12, div12) = calc_clock(MPSSE_BASE_CLK_12M, 400_000);
        assert_eq!(freq12, 400_000);
        assert_eq!(div12, 14);
        assert_eq!(freq60, 400_000);
    }

    #[test]
    fn calc_clock_low_freq_needs_12mhz_base() {
        // Below ~458 Hz the 60 MHz base's 16-bit divisor saturates before
        // it can divide down far enough, while the 12 MHz/5 base still has
        // headroom - exercising the branch in `set_speed` that falls back
        // to the prescaled base clock.
        let freq = 300u32;
        let (freq60, div60) = calc_clock(MPSSE_BASE_CLK_60M, freq);
        let (freq12, _) = calc_clock(MPSSE_BASE_CLK_12M, freq);
        assert_eq!(div60, MPSSE_MAX_CLK_DIV as u16);
        assert_eq!(freq12, freq);
        assert!(freq.abs_diff(freq12) < freq.abs_diff(freq60));
    }
}
