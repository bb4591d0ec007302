//! Fixed-layout binary adapters.
//!
//! Layout, all little-endian: `u64` row count, `u64` column count (always
//! 7), then per row seven `f64`s: open, high, low, close, adj close,
//! volume, signal. Timestamps and derived fields are not part of the
//! format; a reload yields empty timestamps and empty derived maps. OHLCV
//! values and the signal round-trip bit-exactly.

use crate::domain::error::Error;
use crate::domain::record::Record;
use crate::domain::timeseries::TimeSeries;
use crate::ports::data_port::{SeriesSink, SeriesSource};
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::PathBuf;

const BINARY_COLUMNS: u64 = 7;

pub struct BinarySink {
    path: PathBuf,
}

impl BinarySink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SeriesSink for BinarySink {
    fn write(&self, series: &TimeSeries) -> Result<(), Error> {
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);

        writer.write_all(&(series.len() as u64).to_le_bytes())?;
        writer.write_all(&BINARY_COLUMNS.to_le_bytes())?;

        for record in series {
            for value in [
                record.open,
                record.high,
                record.low,
                record.close,
                record.adj_close,
                record.volume,
                f64::from(record.signal),
            ] {
                writer.write_all(&value.to_le_bytes())?;
            }
        }
        writer.flush()?;
        Ok(())
    }
}

pub struct BinarySource {
    path: PathBuf,
}

impl BinarySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn truncated(&self) -> Error {
        Error::Data {
            path: self.path.display().to_string(),
            reason: "unexpected end of file".into(),
        }
    }

    fn read_u64(&self, reader: &mut impl Read) -> Result<u64, Error> {
        let mut buf = [0u8; 8];
        match reader.read_exact(&mut buf) {
            Ok(()) => Ok(u64::from_le_bytes(buf)),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(self.truncated()),
            Err(e) => Err(e.into()),
        }
    }

    fn read_f64(&self, reader: &mut impl Read) -> Result<f64, Error> {
        self.read_u64(reader).map(f64::from_bits)
    }
}

impl SeriesSource for BinarySource {
    fn load(&self) -> Result<TimeSeries, Error> {
        let file = File::open(&self.path).map_err(|e| Error::Data {
            path: self.path.display().to_string(),
            reason: format!("failed to open: {e}"),
        })?;
        let mut reader = BufReader::new(file);

        let rows = self.read_u64(&mut reader)?;
        let columns = self.read_u64(&mut reader)?;
        if columns != BINARY_COLUMNS {
            return Err(Error::Data {
                path: self.path.display().to_string(),
                reason: format!("expected {BINARY_COLUMNS} columns, found {columns}"),
            });
        }

        let mut series = TimeSeries::new();
        series.reserve(rows as usize);
        for _ in 0..rows {
            let open = self.read_f64(&mut reader)?;
            let high = self.read_f64(&mut reader)?;
            let low = self.read_f64(&mut reader)?;
            let close = self.read_f64(&mut reader)?;
            let adj_close = self.read_f64(&mut reader)?;
            let volume = self.read_f64(&mut reader)?;
            let mut record =
                Record::new(String::new(), open, high, low, close, adj_close, volume);
            record.signal = self.read_f64(&mut reader)? as i32;
            series.push(record);
        }
        Ok(series)
    }
}
