//! # Forge Calculations
//!
//! Closed-form engineering heuristics that turn chamber dimensions into a
//! buildable design. Each stage follows the same pattern:
//!
//! - inputs are plain JSON-serializable records
//! - a pure function validates and derives (`resolve`, `design`, `build`,
//!   `calculate`)
//! - failures are structured [`ForgeError`](crate::errors::ForgeError)s
//!
//! ## Stages
//!
//! - [`geometry`] - internal/external chamber geometry and input validation
//! - [`door`] - door configuration and opening sizes
//! - [`burner`] - ribbon burner hole layout and casting size
//! - [`cut_list`] - steel plate panels, cutouts and angle-iron frame
//! - [`specification`] - every derived quantity in one immutable record

pub mod burner;
pub mod cut_list;
pub mod door;
pub mod geometry;
pub mod specification;

pub use burner::BurnerDesign;
pub use cut_list::{CutList, Cutout, CutoutPurpose, EdgeNotch, FrameMember, Panel, PanelProfile, PanelRole};
pub use door::{DoorConfiguration, DoorLocation, DoorOpening};
pub use geometry::{ChamberGeometry, ChamberInput};
pub use specification::{FieldValue, SpecField, Specification, StaticPressure};
