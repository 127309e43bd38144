use std::path::{Path, PathBuf};

use num_enum::{IntoPrimitive, TryFromPrimitive};
use object::{
    FileKind, LittleEndian,
    pe::{
        IMAGE_FILE_DLL, IMAGE_FILE_MACHINE_AMD64, IMAGE_FILE_MACHINE_ARM, IMAGE_FILE_MACHINE_ARM64,
        IMAGE_FILE_MACHINE_ARMNT, IMAGE_FILE_MACHINE_I386, ImageFileHeader,
    },
    read::pe::{ImageNtHeaders, PeFile32, PeFile64},
};

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("could not read {}: {error}", .path.display())]
    Io {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("not a PE image ({0:?})")]
    NotPe(FileKind),

    #[error("{0}")]
    Parse(#[from] object::Error),
}

/// Machine types the import library tooling knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive, IntoPrimitive)]
#[repr(u16)]
pub enum ImageMachine {
    I386 = IMAGE_FILE_MACHINE_I386,
    Amd64 = IMAGE_FILE_MACHINE_AMD64,
    Arm = IMAGE_FILE_MACHINE_ARM,
    ArmNt = IMAGE_FILE_MACHINE_ARMNT,
    Arm64 = IMAGE_FILE_MACHINE_ARM64,
}

impl ImageMachine {
    /// The value passed to `lib.exe /machine:`.
    pub fn lib_name(&self) -> &'static str {
        match self {
            ImageMachine::I386 => "x86",
            ImageMachine::Amd64 => "x64",
            ImageMachine::Arm | ImageMachine::ArmNt => "arm",
            ImageMachine::Arm64 => "arm64",
        }
    }

    /// Returns `true` if import libraries for `self` and `other` are
    /// interchangeable.
    pub fn is_compatible(&self, other: ImageMachine) -> bool {
        self.lib_name() == other.lib_name()
    }
}

impl std::fmt::Display for ImageMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lib_name())
    }
}

/// Header information read from the input binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputImage {
    /// Raw `IMAGE_FILE_HEADER.Machine` value.
    pub machine: u16,

    /// Whether `IMAGE_FILE_DLL` is set.
    pub is_dll: bool,
}

impl InputImage {
    /// Returns the machine type if it is one of the known values.
    pub fn known_machine(&self) -> Option<ImageMachine> {
        ImageMachine::try_from(self.machine).ok()
    }

    fn from_file_header(header: &ImageFileHeader) -> InputImage {
        Self {
            machine: header.machine.get(LittleEndian),
            is_dll: header.characteristics.get(LittleEndian) & IMAGE_FILE_DLL != 0,
        }
    }
}

/// Reads the PE headers of an image.
pub fn inspect(data: &[u8]) -> Result<InputImage, ImageError> {
    match FileKind::parse(data)? {
        FileKind::Pe32 => Ok(InputImage::from_file_header(
            PeFile32::parse(data)?.nt_headers().file_header(),
        )),
        FileKind::Pe64 => Ok(InputImage::from_file_header(
            PeFile64::parse(data)?.nt_headers().file_header(),
        )),
        kind => Err(ImageError::NotPe(kind)),
    }
}

/// Reads the PE headers of the image at `path`.
pub fn inspect_file(path: impl AsRef<Path>) -> Result<InputImage, ImageError> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|error| ImageError::Io {
        path: path.to_path_buf(),
        error,
    })?;

    inspect(&data)
}
