//! Integration tests for the processor module
//!
//! Runs the complete pipeline over small log files written to temporary
//! directories.


use polars::prelude::{DataFrame, LazyFrame};
use std::fs;
use std::path::{Path, PathBuf};

pub const VALID_LINE: &str = "b1c76ea92a0ccb8f44c2230846a50fa4 :: 08/04/2017 13:47:23 (023),account-id=20fe9c40a0d2b1eb070723e6fa169d9c,gateway-id=a78dec0c5254e20a2dae44c76bd0ec18,country=JO,status=submitted,price={message-price=0.0624015},cost={transit-cost=0.02, route-cost=0.12}";

/// A valid line with a distinct message id
pub fn valid_line(index: usize) -> String {
    VALID_LINE.replacen("b1c76ea92a0ccb8f44c2230846a50fa4", &format!("{index:032}"), 1)
}

/// Write `lines` to `dir/name`, creating `dir` if needed
pub fn write_log(dir: &Path, name: &str, lines: &[String]) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, lines.join("\n")).unwrap();
    path
}

/// Read a whole Parquet file on a blocking thread
///
/// Polars runs its own runtime for scans, which cannot start on a thread
/// already driving the test's runtime.
pub async fn read_parquet(path: &Path) -> DataFrame {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || {
        LazyFrame::scan_parquet(&path, Default::default())
            .unwrap()
            .collect()
            .unwrap()
    })
    .await
    .unwrap()
}
