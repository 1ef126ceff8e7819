//! `ped-output` — simulation output writers for the rust_ped framework.
//!
//! The CSV backend creates two files:
//!
//! | File                  | Contents                                       |
//! |-----------------------|------------------------------------------------|
//! | `agent_snapshots.csv` | per-agent position at every snapshot tick      |
//! | `tick_summaries.csv`  | queue occupancy + releases per snapshot tick   |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `ped_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ped_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output")).unwrap();
//! let mut obs = SimOutputObserver::new(writer, &config);
//! sim.run(&mut obs).unwrap();
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use self::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{AgentSnapshotRow, TickSummaryRow};
pub use writer::OutputWriter;
