//! CLI Handler - Bad Block Table
//!
//! Handles 'bbt scan' and other BBT commands.

use crate::application::use_cases::detect_chip::DetectChipUseCase;
use crate::domain::{bad_block::BlockState, FlashOperation, FlashType};
use crate::error::{Error, Result};
use crate::infrastructure::chip_database::ChipRegistry;
use crate::infrastructure::flash_protocol::nand::SpiNand;
use colored::*;

pub struct BbtHandler {
    detect_use_case: DetectChipUseCase,
}

impl Default for BbtHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl BbtHandler {
    pub fn new() -> Self {
        Self {
            detect_use_case: DetectChipUseCase::new(ChipRegistry::new()),
        }
    }

    pub fn handle_scan(&self, speed: Option<u8>, driver: Option<&str>) -> Result<()> {
        println!("Detecting flash chip...");
        let (programmer, spec) = self.detect_use_case.execute(speed, driver)?;

        // BBT is only relevant for NAND
        if spec.flash_type != FlashType::Nand {
            return Err(Error::NotSupported(
                "BBT scan is only available for NAND flash".to_string(),
            ));
        }

        println!(
            "Detected: {} ({})",
            spec.name.green().bold(),
            spec.manufacturer.green()
        );
        println!("Scanning for bad blocks... (This may take a while)");

        // Note: We instantiate SpiNand directly but use it via FlashOperation trait methods if needed
        let mut protocol = SpiNand::new(programmer, spec.clone());
        let total_blocks = (spec.capacity.as_bytes() / spec.layout.block_size) as u64;

        let pb = super::create_progress_bar(total_blocks, "Scanning Blocks");

        let bbt = protocol.scan_bbt(&|progress| {
            pb.set_position(progress.current);
        })?;

        pb.finish_with_message("Scan Complete");
        println!("\n{}", "Scan Results:".cyan().bold());

        let bad_count = bbt.bad_block_count();
        if bad_count == 0 {
            println!("No bad blocks found! {}", "Excellent!".green());
        } else {
            println!("Found {} bad blocks:", bad_count.to_string().red().bold());
            println!("--------------------------------");
            println!("{:<10} {:<15}", "Block", "Status");
            println!("--------------------------------");

            for block in 0..total_blocks as u32 {
                if bbt.get_state(block) != BlockState::Bad {
                    continue;
                }
                let label = match bbt.reason(block) {
                    Some(crate::domain::bad_block::BadBlockReason::Factory) => "Factory Bad",
                    Some(crate::domain::bad_block::BadBlockReason::EccFailure) => "ECC Bad",
                    Some(crate::domain::bad_block::BadBlockReason::Manual) => "Manually Marked",
                    _ => "Runtime Bad",
                };
                println!("{:<10} {}", block, label.red());
            }
        }

        Ok(())
    }
}
