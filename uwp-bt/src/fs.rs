//! Filesystem seam.
//!
//! Bring-up only needs to mount the volume holding the `.ini` files and open
//! them for reading. Files are closed when the handle is dropped.

use core::fmt;

use embedded_io::Read;

/// Mount failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MountError<E> {
    /// The volume was mounted already. Callers treat this as success.
    AlreadyMounted,
    /// Any other failure.
    Failed(E),
}

impl<E> MountError<E> {
    /// Collapse "already mounted" into success.
    pub fn ignore_already_mounted(result: Result<(), Self>) -> Result<(), E> {
        match result {
            Ok(()) | Err(Self::AlreadyMounted) => Ok(()),
            Err(Self::Failed(e)) => Err(e),
        }
    }
}

impl<E: fmt::Debug> fmt::Display for MountError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyMounted => write!(f, "filesystem already mounted"),
            Self::Failed(e) => write!(f, "mount failed: {:?}", e),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for MountError<E> {}

/// Storage holding the configuration files.
pub trait FileSystem {
    /// Error for mount and open.
    type Error: fmt::Debug;
    /// Open file handle.
    type File: Read;

    /// Mount the volume.
    fn mount(&mut self) -> Result<(), MountError<Self::Error>>;

    /// Open `path` read-only.
    fn open(&mut self, path: &str) -> Result<Self::File, Self::Error>;
}

impl<T: FileSystem + ?Sized> FileSystem for &mut T {
    type Error = T::Error;
    type File = T::File;

    fn mount(&mut self) -> Result<(), MountError<Self::Error>> {
        T::mount(self)
    }

    fn open(&mut self, path: &str) -> Result<Self::File, Self::Error> {
        T::open(self, path)
    }
}

#[cfg(feature = "std")]
pub use self::std_fs::{StdFile, StdFs, DEFAULT_MOUNT_POINT};

#[cfg(feature = "std")]
mod std_fs {
    use std::io;
    use std::path::PathBuf;

    use super::{FileSystem, MountError};

    /// Device volume prefix used by the default paths.
    pub const DEFAULT_MOUNT_POINT: &str = "/NAND:";

    /// Host directory standing in for the device volume.
    ///
    /// `"/NAND:/BT_CON~1.INI"` opens `<root>/BT_CON~1.INI`. Paths without
    /// [`DEFAULT_MOUNT_POINT`] are taken relative to `root`.
    #[derive(Debug, Clone)]
    pub struct StdFs {
        root: PathBuf,
        mounted: bool,
    }

    impl StdFs {
        pub fn new(root: impl Into<PathBuf>) -> Self {
            Self {
                root: root.into(),
                mounted: false,
            }
        }

        /// Host path for a device path.
        pub fn resolve(&self, path: &str) -> PathBuf {
            let relative = path.strip_prefix(DEFAULT_MOUNT_POINT).unwrap_or(path);
            self.root.join(relative.trim_start_matches('/'))
        }
    }

    impl FileSystem for StdFs {
        type Error = io::Error;
        type File = StdFile;

        fn mount(&mut self) -> Result<(), MountError<io::Error>> {
            if self.mounted {
                return Err(MountError::AlreadyMounted);
            }
            if !self.root.is_dir() {
                return Err(MountError::Failed(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("{} is not a directory", self.root.display()),
                )));
            }
            self.mounted = true;
            Ok(())
        }

        fn open(&mut self, path: &str) -> Result<StdFile, io::Error> {
            let host = self.resolve(path);
            debug!("open {}", path);
            std::fs::File::open(host).map(StdFile)
        }
    }

    /// [`std::fs::File`] as an [`embedded_io::Read`].
    #[derive(Debug)]
    pub struct StdFile(pub std::fs::File);

    impl embedded_io::ErrorType for StdFile {
        type Error = io::Error;
    }

    impl embedded_io::Read for StdFile {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, io::Error> {
            io::Read::read(&mut self.0, buf)
        }
    }
}
