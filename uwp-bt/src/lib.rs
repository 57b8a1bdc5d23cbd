#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![doc = include_str!("../README.md")]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

mod macros;

pub mod bd_addr;
pub mod bringup;
pub mod cmd;
pub mod conf;
pub mod fs;
pub mod pskey;
pub mod rf;
pub mod transport;

// Reexports
pub use bd_addr::BdAddr;
pub use bringup::{BringUp, BringUpConfig, BringUpError, BringUpReport, Stage};
pub use cmd::{CommandBuf, CommandError, Enable, Opcode, WireCommand};
pub use conf::{load_file, load_from, LoadReport, Schema};
pub use fs::{FileSystem, MountError};
pub use pskey::PskeyConfig;
pub use rf::RfConfig;
pub use transport::HciTransport;
