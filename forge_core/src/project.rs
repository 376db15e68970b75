//! # Design Files
//!
//! A `ForgeProject` is everything needed to regenerate a build guide: the
//! chamber input and the configuration it was designed under. Projects
//! serialize to `.forge` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! ForgeProject
//! ├── meta: DesignMetadata (schema version, builder, timestamps)
//! ├── input: ChamberInput (dimensions, insulation, doors)
//! └── config: ForgeConfig (policies; omitted fields use defaults)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use forge_core::calculations::door::DoorConfiguration;
//! use forge_core::calculations::geometry::ChamberInput;
//! use forge_core::config::ForgeConfig;
//! use forge_core::project::ForgeProject;
//!
//! let input = ChamberInput {
//!     internal_width_in: 7.0,
//!     internal_height_in: 8.0,
//!     internal_length_in: 14.0,
//!     insulation_in: 2.0,
//!     door_configuration: DoorConfiguration::FrontOnly,
//! };
//! let project = ForgeProject::new("Jane Smith", input, ForgeConfig::default());
//!
//! let json = serde_json::to_string_pretty(&project).unwrap();
//! assert!(json.contains("\"schema_version\""));
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calculations::geometry::ChamberInput;
use crate::config::ForgeConfig;

/// Current schema version for .forge files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root design file container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForgeProject {
    pub meta: DesignMetadata,
    pub input: ChamberInput,
    #[serde(default)]
    pub config: ForgeConfig,
}

impl ForgeProject {
    /// Create a design stamped with the current time.
    pub fn new(builder: impl Into<String>, input: ChamberInput, config: ForgeConfig) -> Self {
        let now = Utc::now();
        ForgeProject {
            meta: DesignMetadata {
                schema_version: SCHEMA_VERSION.to_string(),
                builder: builder.into(),
                created: now,
                modified: now,
            },
            input,
            config,
        }
    }

    /// Replace the chamber input and update the modified timestamp.
    pub fn set_input(&mut self, input: ChamberInput) {
        self.input = input;
        self.touch();
    }

    /// Update the modified timestamp to now.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

/// Design file metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignMetadata {
    /// Schema version for migration support
    pub schema_version: String,
    /// Person the guide is built for
    pub builder: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}
