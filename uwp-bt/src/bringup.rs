//! Controller bring-up.
//!
//! Loads the pskey and RF calibration files, gives the controller a fresh
//! random address and sends the three vendor commands:
//!
//! ```text
//! Init -> MountFilesystem -> LoadPersonality -> LoadRfCalibration
//!      -> RandomizeAddress -> SendPersonality -> SendRfCalibration
//!      -> SendEnable -> Done
//! ```
//!
//! Missing files leave the defaults in place and a transport failure on one
//! command does not stop the others. Only a mount failure aborts.

use core::fmt;

use rand_core::RngCore;

use crate::bd_addr::BdAddr;
use crate::cmd::{CommandError, Enable, WireCommand};
use crate::conf::{load_file, LoadReport};
use crate::fs::{FileSystem, MountError};
use crate::pskey::PskeyConfig;
use crate::rf::RfConfig;
use crate::transport::HciTransport;

/// Default location of the pskey file.
pub const DEFAULT_PSKEY_PATH: &str = "/NAND:/BT_CON~1.INI";

/// Default location of the RF calibration file.
pub const DEFAULT_RF_PATH: &str = "/NAND:/BT_CON~2.INI";

/// Bring-up step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stage {
    Init,
    MountFilesystem,
    LoadPersonality,
    LoadRfCalibration,
    RandomizeAddress,
    SendPersonality,
    SendRfCalibration,
    SendEnable,
    Done,
}

/// Bring-up options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BringUpConfig<'a> {
    /// Path of the pskey file.
    pub pskey_path: &'a str,
    /// Path of the RF calibration file.
    pub rf_path: &'a str,
    /// Enable command sent last.
    pub enable: Enable,
    /// Start from the vendor reference tables instead of all zeros.
    pub seed_vendor_defaults: bool,
    /// Replace `device_addr` with a random address before sending.
    pub randomize_address: bool,
}

impl<'a> BringUpConfig<'a> {
    pub const fn new() -> Self {
        Self {
            pskey_path: DEFAULT_PSKEY_PATH,
            rf_path: DEFAULT_RF_PATH,
            enable: Enable::DEFAULT,
            seed_vendor_defaults: false,
            randomize_address: true,
        }
    }

    pub const fn pskey_path(mut self, path: &'a str) -> Self {
        self.pskey_path = path;
        self
    }

    pub const fn rf_path(mut self, path: &'a str) -> Self {
        self.rf_path = path;
        self
    }

    pub const fn enable(mut self, enable: Enable) -> Self {
        self.enable = enable;
        self
    }

    pub const fn seed_vendor_defaults(mut self, seed: bool) -> Self {
        self.seed_vendor_defaults = seed;
        self
    }

    pub const fn randomize_address(mut self, randomize: bool) -> Self {
        self.randomize_address = randomize;
        self
    }
}

impl Default for BringUpConfig<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// What a completed bring-up did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BringUpReport {
    pub pskey: LoadReport,
    pub rf: LoadReport,
    /// Address sent to the controller.
    pub bd_addr: BdAddr,
    /// Commands the transport failed to deliver.
    pub send_failures: usize,
}

/// Bring-up error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BringUpError<E> {
    /// Mounting the filesystem failed.
    Mount(E),
    /// A command payload could not be built.
    Command(CommandError),
}

impl<E: fmt::Debug> fmt::Display for BringUpError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mount(e) => write!(f, "mount failed: {:?}", e),
            Self::Command(e) => write!(f, "{}", e),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for BringUpError<E> {}

impl<E> From<CommandError> for BringUpError<E> {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

/// Runs the bring-up sequence.
#[derive(Debug)]
pub struct BringUp<'a> {
    config: BringUpConfig<'a>,
    stage: Stage,
    send_failures: usize,
}

impl<'a> BringUp<'a> {
    pub fn new(config: BringUpConfig<'a>) -> Self {
        Self {
            config,
            stage: Stage::Init,
            send_failures: 0,
        }
    }

    /// Last stage entered.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Run every stage into caller-owned structures.
    ///
    /// On return `pskey` and `rf` hold exactly what was sent.
    pub fn run<F, R, T>(
        &mut self,
        fs: &mut F,
        rng: &mut R,
        transport: &mut T,
        pskey: &mut PskeyConfig,
        rf: &mut RfConfig,
    ) -> Result<BringUpReport, BringUpError<F::Error>>
    where
        F: FileSystem + ?Sized,
        R: RngCore + ?Sized,
        T: HciTransport + ?Sized,
    {
        self.send_failures = 0;

        self.enter(Stage::Init);
        if self.config.seed_vendor_defaults {
            *pskey = PskeyConfig::VENDOR_DEFAULT;
            *rf = RfConfig::VENDOR_DEFAULT;
        } else {
            *pskey = PskeyConfig::ZEROED;
            *rf = RfConfig::ZEROED;
        }

        self.enter(Stage::MountFilesystem);
        MountError::ignore_already_mounted(fs.mount()).map_err(|e| {
            error!("filesystem mount failed: {:?}", debug_fmt!(e));
            BringUpError::Mount(e)
        })?;

        self.enter(Stage::LoadPersonality);
        let pskey_report = load_file(fs, self.config.pskey_path, pskey);

        self.enter(Stage::LoadRfCalibration);
        let rf_report = load_file(fs, self.config.rf_path, rf);

        self.enter(Stage::RandomizeAddress);
        if self.config.randomize_address {
            pskey.device_addr = BdAddr::random(rng).into_bytes();
        }
        let bd_addr = BdAddr::new(pskey.device_addr);
        info!("bd addr {}", bd_addr);

        self.enter(Stage::SendPersonality);
        self.send(transport, &*pskey)?;

        self.enter(Stage::SendRfCalibration);
        self.send(transport, &*rf)?;

        self.enter(Stage::SendEnable);
        let enable = self.config.enable;
        self.send(transport, &enable)?;

        self.enter(Stage::Done);
        Ok(BringUpReport {
            pskey: pskey_report,
            rf: rf_report,
            bd_addr,
            send_failures: self.send_failures,
        })
    }

    /// [`run`](Self::run) into fresh structures, returned with the report.
    pub fn run_owned<F, R, T>(
        &mut self,
        fs: &mut F,
        rng: &mut R,
        transport: &mut T,
    ) -> Result<(PskeyConfig, RfConfig, BringUpReport), BringUpError<F::Error>>
    where
        F: FileSystem + ?Sized,
        R: RngCore + ?Sized,
        T: HciTransport + ?Sized,
    {
        let mut pskey = PskeyConfig::ZEROED;
        let mut rf = RfConfig::ZEROED;
        let report = self.run(fs, rng, transport, &mut pskey, &mut rf)?;
        Ok((pskey, rf, report))
    }

    fn enter(&mut self, stage: Stage) {
        debug!("bring-up: {:?}", stage);
        self.stage = stage;
    }

    fn send<T, C>(&mut self, transport: &mut T, command: &C) -> Result<(), CommandError>
    where
        T: HciTransport + ?Sized,
        C: WireCommand,
    {
        let payload = command.to_command()?;
        match transport.send_sync(C::OPCODE, payload.as_slice()) {
            Ok(_status) => {}
            Err(e) => {
                error!("HCI command 0x{:04X} failed: {:?}", C::OPCODE.raw(), debug_fmt!(e));
                self.send_failures += 1;
            }
        }
        Ok(())
    }
}
