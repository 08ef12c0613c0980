//! Status report formatting.
//!
//! Every report is exactly two lines, always in this order:
//!
//! ```text
//! POSITION: <angle>
//! INTENSITY: <value>
//! ```
//!
//! Lines end with LF CR. They are formatted into fixed-capacity `heapless` strings so reporting
//! needs no allocator.

use core::fmt::Write;

use heapless::String;

use crate::traits::StatusSink;

/// Line terminator written after every status line.
pub const LINE_ENDING: &[u8] = b"\n\r";

/// Bytes written once at startup, before the first cycle.
pub const DEFAULT_GREETING: [u8; 2] = [b'C', b'\r'];

/// Capacity of one formatted line.
pub const MAX_LINE: usize = 24;

/// One formatted status line.
pub type ReportLine = String<MAX_LINE>;

/// Snapshot of what a status report shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Report {
    /// Tracked angle in degrees.
    pub angle: i16,
    /// Latest sensor reading.
    pub intensity: u8,
}

impl Report {
    /// Creates a report.
    pub const fn new(angle: i16, intensity: u8) -> Self {
        Self { angle, intensity }
    }

    /// Format the two report lines, without terminators.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_lightseek::Report;
    ///
    /// let [position, intensity] = Report::new(140, 87).lines();
    /// assert_eq!(position.as_str(), "POSITION: 140");
    /// assert_eq!(intensity.as_str(), "INTENSITY: 87");
    /// ```
    pub fn lines(&self) -> [ReportLine; 2] {
        let mut position = ReportLine::new();
        let mut intensity = ReportLine::new();
        // "POSITION: -32768" is the longest possible line and fits
        let _ = write!(position, "POSITION: {}", self.angle);
        let _ = write!(intensity, "INTENSITY: {}", self.intensity);
        [position, intensity]
    }

    /// Write both lines to `sink`.
    pub fn emit<S: StatusSink>(&self, sink: &mut S) -> Result<(), S::Error> {
        for line in self.lines() {
            sink.write_line(&line)?;
        }
        Ok(())
    }
}
