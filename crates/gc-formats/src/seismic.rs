//! Seismic record files: filename attributes and signal access.
//!
//! Filenames encode the record's attributes in delimiter-separated markers
//! (`order_point_sensor_date_time.ext`, positions configurable). Signal
//! access goes through the [`SeismicReader`] trait so vendor binary formats
//! can slot in; the concrete reader here handles raw three-channel
//! interleaved little-endian i32 files whose start time comes from the
//! filename and whose sample rate comes from configuration.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use gc_config::SeismicConfig;
use gc_core::Axis;

use crate::error::FormatError;

const CHANNELS: u64 = 3;
const SAMPLE_BYTES: u64 = 4;

/// Attributes parsed from a seismic filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeisFileAttrs {
    pub name: String,
    pub order: i64,
    pub point: String,
    pub sensor: String,
    pub datetime_start: NaiveDateTime,
}

/// Parse the marker-encoded attributes out of a seismic filename.
///
/// # Errors
///
/// `Malformed` when a marker position is absent or fails to parse.
pub fn parse_seis_filename(
    filename: &str,
    config: &SeismicConfig,
) -> Result<SeisFileAttrs, FormatError> {
    let path = Path::new(filename);
    let stem = filename.split('.').next().unwrap_or_default();
    let parts: Vec<&str> = stem.split(config.delimiter.as_str()).collect();
    let markers = &config.markers;

    let get = |index: usize, what: &str| -> Result<&str, FormatError> {
        parts
            .get(index)
            .copied()
            .ok_or_else(|| FormatError::malformed(path, format!("missing {what} marker")))
    };

    let order: i64 = get(markers.order, "order")?
        .parse()
        .map_err(|e| FormatError::malformed(path, format!("bad order marker: {e}")))?;
    let point = get(markers.point, "point")?.to_string();
    let sensor = get(markers.sensor, "sensor")?.to_string();

    let date = NaiveDate::parse_from_str(get(markers.date, "date")?, "%Y-%m-%d")
        .map_err(|e| FormatError::malformed(path, format!("bad date marker: {e}")))?;
    let time = NaiveTime::parse_from_str(get(markers.time, "time")?, "%H-%M-%S")
        .map_err(|e| FormatError::malformed(path, format!("bad time marker: {e}")))?;

    Ok(SeisFileAttrs {
        name: filename.to_string(),
        order,
        point,
        sensor,
        datetime_start: date.and_time(time),
    })
}

/// A contiguous window of one axis' samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub samples: Vec<f64>,
    pub sample_rate: u32,
}

/// Read access to a three-component seismic record.
pub trait SeismicReader: Send {
    fn datetime_start(&self) -> NaiveDateTime;
    fn datetime_stop(&self) -> NaiveDateTime;

    /// Read one axis inside `[start, stop)`.
    ///
    /// # Errors
    ///
    /// `OutOfRange` when the window lies outside the record.
    fn read_signal(
        &self,
        axis: Axis,
        start: NaiveDateTime,
        stop: NaiveDateTime,
    ) -> Result<Signal, FormatError>;
}

/// Opens seismic files into readers. The energy extractor holds one provider
/// and opens an independent reader per worker.
pub trait SeismicProvider: Send + Sync {
    /// # Errors
    ///
    /// Format errors from the underlying reader.
    fn open(&self, path: &Path) -> Result<Box<dyn SeismicReader>, FormatError>;
}

/// Raw three-channel interleaved i32 LE record.
#[derive(Debug, Clone)]
pub struct RawSeisFile {
    path: PathBuf,
    datetime_start: NaiveDateTime,
    sample_rate: u32,
    frames: u64,
}

impl RawSeisFile {
    /// Open a raw record; start time from filename markers, rate from config.
    ///
    /// # Errors
    ///
    /// `Malformed` for bad filenames or a byte length that is not a whole
    /// number of frames.
    pub fn open(path: &Path, config: &SeismicConfig) -> Result<Self, FormatError> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| FormatError::malformed(path, "unreadable filename"))?;
        let attrs = parse_seis_filename(filename, config)?;

        let len = std::fs::metadata(path)
            .map_err(|e| FormatError::io(path, e))?
            .len();
        let frame_bytes = CHANNELS * SAMPLE_BYTES;
        if len == 0 || len % frame_bytes != 0 {
            return Err(FormatError::malformed(
                path,
                format!("byte length {len} is not a whole number of frames"),
            ));
        }

        Ok(Self {
            path: path.to_path_buf(),
            datetime_start: attrs.datetime_start,
            sample_rate: config.sample_rate,
            frames: len / frame_bytes,
        })
    }

    fn frame_at(&self, t: NaiveDateTime) -> i64 {
        let millis = (t - self.datetime_start).num_milliseconds();
        millis * i64::from(self.sample_rate) / 1000
    }
}

impl SeismicReader for RawSeisFile {
    fn datetime_start(&self) -> NaiveDateTime {
        self.datetime_start
    }

    fn datetime_stop(&self) -> NaiveDateTime {
        #[allow(clippy::cast_possible_wrap)]
        let seconds = self.frames as i64 / i64::from(self.sample_rate);
        self.datetime_start + Duration::seconds(seconds)
    }

    fn read_signal(
        &self,
        axis: Axis,
        start: NaiveDateTime,
        stop: NaiveDateTime,
    ) -> Result<Signal, FormatError> {
        let first = self.frame_at(start);
        let last = self.frame_at(stop);
        #[allow(clippy::cast_possible_wrap)]
        let total = self.frames as i64;
        if first < 0 || last > total || first >= last {
            return Err(FormatError::OutOfRange {
                start: start.to_string(),
                stop: stop.to_string(),
            });
        }

        #[allow(clippy::cast_sign_loss)]
        let (first, count) = (first as u64, (last - first) as usize);
        let frame_bytes = (CHANNELS * SAMPLE_BYTES) as usize;

        let mut file = File::open(&self.path).map_err(|e| FormatError::io(&self.path, e))?;
        file.seek(SeekFrom::Start(first * CHANNELS * SAMPLE_BYTES))
            .map_err(|e| FormatError::io(&self.path, e))?;
        let mut buf = vec![0u8; count * frame_bytes];
        file.read_exact(&mut buf)
            .map_err(|e| FormatError::io(&self.path, e))?;

        let offset = axis.channel() * SAMPLE_BYTES as usize;
        let samples = buf
            .chunks_exact(frame_bytes)
            .map(|frame| {
                let bytes: [u8; 4] = frame[offset..offset + 4].try_into().unwrap_or_default();
                f64::from(i32::from_le_bytes(bytes))
            })
            .collect();

        Ok(Signal {
            samples,
            sample_rate: self.sample_rate,
        })
    }
}

/// Default provider for raw seismic files.
#[derive(Debug, Clone)]
pub struct RawSeisProvider {
    config: SeismicConfig,
}

impl RawSeisProvider {
    #[must_use]
    pub const fn new(config: SeismicConfig) -> Self {
        Self { config }
    }
}

impl SeismicProvider for RawSeisProvider {
    fn open(&self, path: &Path) -> Result<Box<dyn SeismicReader>, FormatError> {
        Ok(Box::new(RawSeisFile::open(path, &self.config)?))
    }
}
