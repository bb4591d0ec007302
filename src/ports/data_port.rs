//! Series I/O port traits.

use crate::domain::error::Error;
use crate::domain::timeseries::TimeSeries;

/// Anything a TimeSeries can be loaded from.
pub trait SeriesSource {
    fn load(&self) -> Result<TimeSeries, Error>;
}

/// Anything a TimeSeries can be written to.
pub trait SeriesSink {
    fn write(&self, series: &TimeSeries) -> Result<(), Error>;
}
