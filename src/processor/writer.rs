//! Record sinks for parsed log data
//!
//! [`RecordSink`] is the bulk-storage seam of the pipeline. [`ParquetSink`]
//! writes every chunk as one batch of a single Parquet file through the
//! polars batched writer; [`MemorySink`] keeps records in memory.

use crate::config::ParquetSinkConfig;
use crate::constants::{DECIMAL_PRECISION, DECIMAL_SCALE, fields};
use crate::error::{ProcessorError, Result};
use crate::models::LogRecord;

use polars::io::parquet::write::BatchedWriter;
use polars::prelude::{
    Column, DataFrame, DataType, Int128Chunked, IntoSeries, NewChunkedArray,
    ParquetWriter as PolarsParquetWriter, PolarsError, StatisticsOptions, TimeUnit,
};
use rust_decimal::Decimal;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Destination for validated records, written chunk by chunk in input order
pub trait RecordSink: Send {
    /// Write one chunk; returns the number of records written
    fn write_chunk(&mut self, records: &[LogRecord]) -> Result<usize>;

    /// Flush and close; returns the total number of records written
    fn finish(&mut self) -> Result<u64>;
}

/// Parquet file sink
///
/// The file is created on the first non-empty chunk, so a run that yields no
/// records leaves no file behind.
pub struct ParquetSink {
    output_path: PathBuf,
    config: ParquetSinkConfig,
    writer: Option<BatchedWriter<File>>,
    rows_written: u64,
}

impl std::fmt::Debug for ParquetSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParquetSink")
            .field("output_path", &self.output_path)
            .field("config", &self.config)
            .field("open", &self.writer.is_some())
            .field("rows_written", &self.rows_written)
            .finish()
    }
}

impl ParquetSink {
    /// Create a new Parquet sink
    pub fn new(output_path: PathBuf, config: ParquetSinkConfig) -> Self {
        Self {
            output_path,
            config,
            writer: None,
            rows_written: 0,
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    fn write_failed(&self, reason: impl std::fmt::Display) -> ProcessorError {
        ProcessorError::WriteFailed {
            path: self.output_path.clone(),
            reason: reason.to_string(),
        }
    }

    fn open(&self, df: &DataFrame) -> Result<BatchedWriter<File>> {
        if let Some(parent) = self.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(&self.output_path)?;
        let statistics = if self.config.enable_statistics {
            StatisticsOptions::full()
        } else {
            StatisticsOptions::empty()
        };

        debug!(
            "Opening parquet output {} ({:?})",
            self.output_path.display(),
            self.config.compression
        );

        PolarsParquetWriter::new(file)
            .with_compression(self.config.compression.to_polars_compression())
            .with_statistics(statistics)
            .with_row_group_size(self.config.row_group_size)
            .batched(df.schema())
            .map_err(|e| self.write_failed(format!("failed to open parquet writer: {e}")))
    }
}

impl RecordSink for ParquetSink {
    fn write_chunk(&mut self, records: &[LogRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let df = records_to_dataframe(records)?;
        if self.writer.is_none() {
            self.writer = Some(self.open(&df)?);
        }

        if let Some(writer) = self.writer.as_mut() {
            writer
                .write_batch(&df)
                .map_err(|e| ProcessorError::WriteFailed {
                    path: self.output_path.clone(),
                    reason: format!("failed to write batch: {e}"),
                })?;
        }

        self.rows_written += records.len() as u64;
        Ok(records.len())
    }

    fn finish(&mut self) -> Result<u64> {
        if let Some(mut writer) = self.writer.take() {
            writer
                .finish()
                .map_err(|e| self.write_failed(format!("failed to finish parquet file: {e}")))?;
            debug!(
                "Closed {} after {} rows",
                self.output_path.display(),
                self.rows_written
            );
        }
        Ok(self.rows_written)
    }
}

/// In-memory sink, mostly useful for tests and embedding
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<LogRecord>,
}

impl RecordSink for MemorySink {
    fn write_chunk(&mut self, records: &[LogRecord]) -> Result<usize> {
        self.records.extend_from_slice(records);
        Ok(records.len())
    }

    fn finish(&mut self) -> Result<u64> {
        Ok(self.records.len() as u64)
    }
}

/// `value` as an integer count of `10^-DECIMAL_SCALE` units
///
/// `None` when the value does not fit `DECIMAL_PRECISION` digits.
fn decimal_units(value: Decimal) -> Option<i128> {
    let rounded = value.round_dp(DECIMAL_SCALE);
    let factor = 10i128.checked_pow(DECIMAL_SCALE - rounded.scale())?;
    let limit = 10i128.checked_pow(DECIMAL_PRECISION as u32)?;
    rounded
        .mantissa()
        .checked_mul(factor)
        .filter(|units| units.abs() < limit)
}

fn decimal_column(name: &str, values: impl Iterator<Item = Option<Decimal>>) -> Result<Column> {
    let units = values
        .map(|value| {
            value
                .map(|d| {
                    decimal_units(d).ok_or_else(|| {
                        PolarsError::ComputeError(
                            format!(
                                "{name} value {d} does not fit Decimal({DECIMAL_PRECISION}, {DECIMAL_SCALE})"
                            )
                            .into(),
                        )
                    })
                })
                .transpose()
        })
        .collect::<std::result::Result<Vec<Option<i128>>, PolarsError>>()?;

    let decimals = Int128Chunked::from_iter_options(name.into(), units.into_iter())
        .into_decimal(Some(DECIMAL_PRECISION), DECIMAL_SCALE as usize)?;
    Ok(Column::from(decimals.into_series()))
}

fn text_column<'a>(name: &str, values: impl Iterator<Item = Option<&'a str>>) -> Column {
    let values: Vec<Option<&str>> = values.collect();
    Column::new(name.into(), values)
}

/// Build one DataFrame from a chunk of records
///
/// Money is stored as `Decimal(38, 10)` and the timestamp as UTC milliseconds.
pub fn records_to_dataframe(records: &[LogRecord]) -> Result<DataFrame> {
    let timestamps: Vec<Option<i64>> = records
        .iter()
        .map(|r| r.timestamp.map(|ts| ts.timestamp_millis()))
        .collect();
    let timestamp = Column::new(fields::TIMESTAMP.into(), timestamps)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;

    let columns = vec![
        text_column(fields::MESSAGE_ID, records.iter().map(|r| r.message_id.as_deref())),
        timestamp,
        text_column(fields::ACCOUNT_ID, records.iter().map(|r| r.account_id.as_deref())),
        text_column(fields::GATEWAY_ID, records.iter().map(|r| r.gateway_id.as_deref())),
        text_column(fields::COUNTRY, records.iter().map(|r| r.country.as_deref())),
        text_column(fields::STATUS, records.iter().map(|r| r.status.as_deref())),
        decimal_column(fields::PRICE, records.iter().map(|r| r.price))?,
        decimal_column(fields::TRANSIT_COST, records.iter().map(|r| r.transit_cost()))?,
        decimal_column(fields::ROUTE_COST, records.iter().map(|r| r.route_cost()))?,
        decimal_column(fields::COST, records.iter().map(|r| r.cost().ok()))?,
    ];

    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompressionAlgorithm;
    use crate::parser::map_line;
    use polars::prelude::{LazyFrame, len};
    use tempfile::TempDir;

    const VALID_LINE: &str = "b1c76ea92a0ccb8f44c2230846a50fa4 :: 08/04/2017 13:47:23 (023),account-id=20fe9c40a0d2b1eb070723e6fa169d9c,gateway-id=a78dec0c5254e20a2dae44c76bd0ec18,country=JO,status=submitted,price={message-price=0.0624015},cost={transit-cost=0.02, route-cost=0.12}";

    fn sample_records(count: usize) -> Vec<LogRecord> {
        (0..count).map(|i| map_line(VALID_LINE, i + 1).unwrap()).collect()
    }

    fn count_rows(path: &Path) -> usize {
        let frame = LazyFrame::scan_parquet(path, Default::default()).unwrap();
        let df = frame.select([len()]).collect().unwrap();
        df.column("len")
            .unwrap()
            .get(0)
            .unwrap()
            .try_extract::<usize>()
            .unwrap()
    }

    #[test]
    fn test_dataframe_layout() {
        let df = records_to_dataframe(&sample_records(3)).unwrap();

        assert_eq!(df.height(), 3);
        assert_eq!(
            df.get_column_names_str(),
            vec![
                "message_id",
                "timestamp",
                "account_id",
                "gateway_id",
                "country",
                "status",
                "price",
                "transit_cost",
                "route_cost",
                "cost",
            ]
        );
        assert_eq!(
            df.column("timestamp").unwrap().dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
        assert_eq!(
            df.column("cost").unwrap().dtype(),
            &DataType::Decimal(Some(38), Some(10))
        );
    }

    #[test]
    fn test_decimal_units_are_exact() {
        let dec = |s: &str| Decimal::from_str_exact(s).unwrap();

        assert_eq!(decimal_units(dec("0.14")), Some(1_400_000_000));
        assert_eq!(decimal_units(dec("0.0624015")), Some(624_015_000));
        assert_eq!(decimal_units(dec("-3")), Some(-30_000_000_000));
        assert_eq!(decimal_units(dec("0.000000000049")), Some(0));
        assert_eq!(decimal_units(dec("0.000000000051")), Some(1));
        assert_eq!(decimal_units(Decimal::MAX), None);
    }

    #[test]
    fn test_cost_column_matches_record_sum() {
        let df = records_to_dataframe(&sample_records(1)).unwrap();
        let cost = df
            .column("cost")
            .unwrap()
            .cast(&DataType::Float64)
            .unwrap();

        assert!((cost.f64().unwrap().get(0).unwrap() - 0.14).abs() < 1e-12);
    }

    #[test]
    fn test_parquet_sink_writes_all_chunks() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("nested").join("out.parquet");

        let mut sink = ParquetSink::new(output_path.clone(), ParquetSinkConfig::default());
        assert_eq!(sink.write_chunk(&sample_records(4)).unwrap(), 4);
        assert_eq!(sink.write_chunk(&sample_records(3)).unwrap(), 3);
        assert_eq!(sink.finish().unwrap(), 7);

        assert!(output_path.exists());
        assert_eq!(count_rows(&output_path), 7);
    }

    #[test]
    fn test_parquet_sink_compression_options() {
        let temp_dir = TempDir::new().unwrap();

        for compression in [
            CompressionAlgorithm::Zstd,
            CompressionAlgorithm::Lz4,
            CompressionAlgorithm::Uncompressed,
        ] {
            let output_path = temp_dir.path().join(format!("{compression:?}.parquet"));
            let config = ParquetSinkConfig {
                compression,
                enable_statistics: false,
                row_group_size: Some(2),
            };

            let mut sink = ParquetSink::new(output_path.clone(), config);
            sink.write_chunk(&sample_records(5)).unwrap();
            sink.finish().unwrap();

            assert_eq!(count_rows(&output_path), 5);
        }
    }

    #[test]
    fn test_empty_run_creates_no_file() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("empty.parquet");

        let mut sink = ParquetSink::new(output_path.clone(), ParquetSinkConfig::default());
        assert_eq!(sink.write_chunk(&[]).unwrap(), 0);
        assert_eq!(sink.finish().unwrap(), 0);
        assert!(!output_path.exists());
    }

    #[test]
    fn test_memory_sink_keeps_order() {
        let mut sink = MemorySink::default();
        let records = sample_records(2);

        sink.write_chunk(&records).unwrap();
        assert_eq!(sink.finish().unwrap(), 2);
        assert_eq!(sink.records, records);
    }
}
