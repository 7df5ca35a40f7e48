//! Batch driver for the Zig compatibility migration
//!
//! Turns a path into a report:
//! - [`discover`]: sorted candidate files, excluded directories pruned
//! - [`BatchDriver`]: read, migrate and write back (or not, in a dry run)
//! - [`report`]: text or JSON rendering ending in `Fixed X/Y files`
//!
//! Every failure the engine cannot raise is handled here, under the
//! configured [`ErrorPolicy`].
//!
//! # Example
//!
//! ```rust,no_run
//! use compat_driver::{report, BatchDriver, DriverConfig};
//! use std::path::Path;
//!
//! let driver = BatchDriver::new(DriverConfig::new().with_dry_run(true))?;
//! let batch = driver.run(Path::new("src"))?;
//! println!("{}", report::summary_line(&batch));
//! # Ok::<(), compat_driver::DriverError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod batch;
pub mod config;
pub mod discover;
pub mod error;
pub mod report;

pub use batch::{BatchDriver, BatchReport, FileOutcome, FileReport, NOT_CANDIDATE};
pub use config::{DriverConfig, ErrorPolicy, DEFAULT_MAX_FILE_SIZE};
pub use discover::{classify, discover, InputKind};
pub use error::{DriverError, DriverResult};
pub use report::ReportFormat;
