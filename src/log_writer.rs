//! Binary spike file header.
//!
//! Layout (8 bytes, little-endian):
//!   [0..4]   Signature: i32 = 206661989
//!   [4..8]   Version: f32 = 1.0
//!
//! The version is a 32-bit float, which matches the bytes historically produced by writing
//! the float through an integer-sized field on platforms where both are 4 bytes wide.
//! Event data following the header is appended by the simulation through the bound sink.
use derivative::Derivative;
use std::io::{self, Read, Write};

use crate::error::MonitorError;
use crate::{SPIKE_FILE_SIGNATURE, SPIKE_FILE_VERSION};

/// The header at the beginning of every spike file.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct SpikeFileHeader {
    pub signature: i32,
    pub version: f32,
}

impl Default for SpikeFileHeader {
    fn default() -> Self {
        SpikeFileHeader {
            signature: SPIKE_FILE_SIGNATURE,
            version: SPIKE_FILE_VERSION,
        }
    }
}

impl SpikeFileHeader {
    /// Size of the header in bytes.
    pub const SIZE: usize = 8;

    /// Returns the on-disk representation of the header.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut bytes = [0u8; Self::SIZE];
        bytes[0..4].copy_from_slice(&self.signature.to_le_bytes());
        bytes[4..8].copy_from_slice(&self.version.to_le_bytes());
        bytes
    }

    /// Read a header from the beginning of a spike file and check its signature.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self, MonitorError> {
        let mut bytes = [0u8; Self::SIZE];
        reader.read_exact(&mut bytes).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => {
                MonitorError::InvalidHeader("file is shorter than the header".to_string())
            }
            _ => MonitorError::from(e),
        })?;

        let signature = i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if signature != SPIKE_FILE_SIGNATURE {
            return Err(MonitorError::InvalidHeader(format!(
                "unknown signature {}",
                signature
            )));
        }

        let version = f32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        if !version.is_finite() || version <= 0.0 {
            return Err(MonitorError::InvalidHeader(format!(
                "invalid version {}",
                version
            )));
        }

        Ok(SpikeFileHeader { signature, version })
    }
}

/// Owner of the sink a monitor logs its spikes to.
/// The header is written once per bound sink.
#[derive(Derivative, Default)]
#[derivative(Debug)]
pub struct SpikeLogWriter {
    #[derivative(Debug = "ignore")]
    sink: Option<Box<dyn Write>>,
    header_written: bool,
}

impl SpikeLogWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a sink is bound.
    pub fn is_bound(&self) -> bool {
        self.sink.is_some()
    }

    /// Returns true if the header has been written to the bound sink.
    pub fn header_written(&self) -> bool {
        self.header_written
    }

    /// Bind a new sink, returning the previously bound one if any.
    /// The header must be written again for the new sink.
    pub fn bind(&mut self, sink: Box<dyn Write>) -> Option<Box<dyn Write>> {
        self.header_written = false;
        self.sink.replace(sink)
    }

    /// Write the header to the bound sink, unless already done or no sink is bound.
    /// A failed write is not retried.
    pub fn write_header(&mut self) -> io::Result<()> {
        if self.header_written {
            return Ok(());
        }
        let Some(sink) = self.sink.as_mut() else {
            return Ok(());
        };

        self.header_written = true;
        sink.write_all(&SpikeFileHeader::default().to_bytes())?;
        sink.flush()
    }

    /// Returns the bound sink, for appending event data after the header.
    pub fn sink_mut(&mut self) -> Option<&mut (dyn Write + 'static)> {
        self.sink.as_deref_mut()
    }
}
