//! Validity checks for point, line and polygon geometries
//!
//! Checks run either on the caller's thread (`validate_sync`) or on a
//! background worker (`begin_validation`) that pushes each defect as an event
//! and can be cancelled at any time.
//!
//! ```ignore
//! use geometry_validator::{validate_sync, Geometry, Ring};
//!
//! let bowtie = Ring::from_coords(&[(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 10.0), (0.0, 0.0)]);
//! let errors = validate_sync(&Geometry::simple_polygon(bowtie))?;
//! assert_eq!(errors.len(), 1);
//! ```

pub mod error;
pub mod geometry;
pub mod server;
pub mod validator;

pub use error::{Result, ValidatorError};
pub use geometry::{Geometry, GeometryKind, Part, Point, Ring};
pub use validator::{
    begin_validation, begin_validation_with_rules, validate_batch, validate_sync,
    validate_sync_with_rules, validate_with, ErrorKind, RunStatus, ValidationError,
    ValidationEvent, ValidationHandle, ValidationOutcome, ValidationRules, ValidationRun,
    ValidationSummary,
};
