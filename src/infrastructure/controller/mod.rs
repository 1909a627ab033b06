//! Infrastructure - FTDI bridge controllers (component B)
//!
//! Two controllers speak true phase-aware multi-IO framing directly,
//! rather than going through the single-IO `ProgrammerController` adapter
//! in `infrastructure::spi_mem`: the FT4222H (USB-to-SPI/I2C bridge) and
//! any FTDI chip in MPSSE mode (FT232H/FT2232H/FT4232H). Both replace the
//! `infrastructure::programmer::ftdi` stub, which never got past "under
//! development".
//!
//! A `simulator` controller is also provided here (rather than under
//! `programmer::simulator`, which only emulates byte-oriented `Programmer`
//! devices) so the SPI-NAND core, NAND generic layer, BBT, ECC and FTL can
//! all be exercised end-to-end, phase widths included, without hardware.

pub mod ft4222;
pub mod mpsse;
pub mod simulator;

pub use ft4222::Ft4222Controller;
pub use mpsse::MpsseController;
pub use simulator::SimulatedController;
