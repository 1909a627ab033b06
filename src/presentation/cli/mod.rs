//! CLI Presentation Module
//!
//! Entry point for the CLI presentation layer.

pub mod args;
pub mod handlers;

use crate::domain::bad_block::BadBlockStrategy;
use crate::domain::{FlashOptions, OobMode};
use crate::error::Result;
use args::{Args, BbtCommand, Command};
use handlers::*;

fn get_bad_block_strategy(skip: bool, include: bool) -> BadBlockStrategy {
    if include {
        BadBlockStrategy::Include
    } else if skip {
        BadBlockStrategy::Skip
    } else {
        BadBlockStrategy::Fail
    }
}

fn get_oob_mode(oob: bool, oob_only: bool) -> OobMode {
    if oob_only {
        OobMode::Only
    } else if oob {
        OobMode::Included
    } else {
        OobMode::None
    }
}

/// Execute the command specified by CLI arguments using the new architecture
pub fn execute(args: Args) -> Result<()> {
    let speed = Some(args.spi_speed);
    let driver = args.driver.as_deref();

    match args.command {
        Command::Info => {
            let handler = InfoHandler::new();
            handler.handle(speed, driver)
        }
        Command::List => {
            let handler = ListHandler::new();
            handler.handle()
        }
        Command::Read {
            output,
            length,
            start,
            disable_ecc,
            skip_bad,
            include_bad,
            oob,
            oob_only,
            ignore_ecc,
            retry_count,
        } => {
            let handler = ReadHandler::new();
            let options = FlashOptions {
                address: start,
                length,
                use_ecc: !disable_ecc,
                ignore_ecc_errors: ignore_ecc,
                bad_block_strategy: get_bad_block_strategy(skip_bad, include_bad),
                oob_mode: get_oob_mode(oob, oob_only),
                speed,
                verify: false,
                retry_count,
                bbt_file: None,
                driver: driver.map(str::to_string),
            };
            handler.handle(output, options)
        }
        Command::Write {
            input,
            start,
            verify,
            disable_ecc,
            skip_bad,
            include_bad,
            oob,
            oob_only,
            ignore_ecc,
            retry_count,
        } => {
            let handler = WriteHandler::new();
            let options = FlashOptions {
                address: start,
                length: None,
                use_ecc: !disable_ecc,
                ignore_ecc_errors: ignore_ecc,
                bad_block_strategy: get_bad_block_strategy(skip_bad, include_bad),
                oob_mode: get_oob_mode(oob, oob_only),
                speed,
                verify,
                retry_count,
                bbt_file: None,
                driver: driver.map(str::to_string),
            };
            handler.handle(input, options)
        }
        Command::Erase {
            length,
            start,
            disable_ecc: _,
            skip_bad,
            include_bad,
        } => {
            let handler = EraseHandler::new();
            let options = FlashOptions {
                address: start,
                length,
                use_ecc: true,
                ignore_ecc_errors: false,
                bad_block_strategy: get_bad_block_strategy(skip_bad, include_bad),
                oob_mode: OobMode::None,
                speed,
                verify: false,
                retry_count: 0,
                bbt_file: None,
                driver: driver.map(str::to_string),
            };
            handler.handle(options)
        }
        Command::Verify {
            input,
            start,
            disable_ecc,
            skip_bad,
            include_bad,
            oob,
            oob_only,
            ignore_ecc,
            retry_count,
        } => {
            let handler = VerifyHandler::new();
            let options = FlashOptions {
                address: start,
                length: None,
                use_ecc: !disable_ecc,
                ignore_ecc_errors: ignore_ecc,
                bad_block_strategy: get_bad_block_strategy(skip_bad, include_bad),
                oob_mode: get_oob_mode(oob, oob_only),
                speed,
                verify: false,
                retry_count,
                bbt_file: None,
                driver: driver.map(str::to_string),
            };
            handler.handle(input, options)
        }
        Command::Protect { operation } => {
            let handler = ProtectHandler::new();
            handler.handle_protect(&operation, speed, driver)
        }
        Command::Status { value } => {
            let handler = ProtectHandler::new();
            handler.handle_status(value, speed, driver)
        }
        Command::Bbt { command } => {
            let handler = BbtHandler::new();
            match command {
                BbtCommand::Scan => handler.handle_scan(speed, driver),
            }
        }
        Command::Passthrough {
            mode,
            tx,
            rx_len,
            addr,
        } => {
            let handler = PassthroughHandler::new();
            handler.handle(driver, speed, &mode, tx, rx_len, addr)
        }
    }
}
