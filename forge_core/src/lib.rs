//! # forge_core - Ribbon Burner Forge Design Engine
//!
//! `forge_core` turns the internal dimensions of a forge chamber into a
//! complete, buildable design: burner and blower sizing, refractory and
//! blanket quantities, a steel cut list, dimensioned orthographic drawings
//! and a fifteen-section build guide rendered to PDF.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: every stage is a pure function of its input and a
//!   [`ForgeConfig`]
//! - **JSON-First**: inputs, results and errors implement Serialize
//! - **Rich Errors**: structured [`ForgeError`]s naming the failing field
//! - **Deterministic**: no clocks or randomness outside the PDF backend's
//!   date option
//!
//! ## Quick Start
//!
//! ```rust
//! use forge_core::calculations::door::DoorConfiguration;
//! use forge_core::calculations::geometry::ChamberInput;
//! use forge_core::config::ForgeConfig;
//! use forge_core::pipeline::build;
//!
//! let input = ChamberInput {
//!     internal_width_in: 7.0,
//!     internal_height_in: 8.0,
//!     internal_length_in: 14.0,
//!     insulation_in: 2.0,
//!     door_configuration: DoorConfiguration::FrontOnly,
//! };
//! let package = build(&input, &ForgeConfig::default()).unwrap();
//!
//! let export = package.specification.export_map();
//! println!("{}", serde_json::to_string_pretty(&export).unwrap());
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - geometry, burner, cut list and the derived specification
//! - [`drawing`] - parametric views, dimensioning and layout
//! - [`document`] - the backend-neutral build guide
//! - [`pdf`] - Typst rendering of the guide
//! - [`pipeline`] - runs every stage for one input
//! - [`config`] - tunable policies and input ranges
//! - [`project`] / [`file_io`] - `.forge` design files, locking and atomic output
//! - [`errors`], [`units`], [`logging`]

pub mod calculations;
pub mod config;
pub mod document;
pub mod drawing;
pub mod errors;
#[cfg(not(target_arch = "wasm32"))]
pub mod file_io;
pub mod logging;
pub mod pdf;
pub mod pipeline;
pub mod project;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{ChamberGeometry, ChamberInput, DoorConfiguration, Specification};
pub use config::ForgeConfig;
pub use errors::{ForgeError, ForgeResult};
#[cfg(not(target_arch = "wasm32"))]
pub use file_io::{load_config, load_design, save_design, FileLock, OutputFile};
pub use pipeline::{build, BuildPackage};
pub use project::{DesignMetadata, ForgeProject};
