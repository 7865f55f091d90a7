//! # Configuration Constants
//!
//! Centralized constants for the modeler pipeline. Geometry tolerances,
//! tessellation defaults, and material defaults are defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Resolution**: Default tessellation parameters
//! - **Appearance**: Default material values

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// Used for determining if two floating-point values are "equal" within
/// numerical tolerance. The boolean kernel itself computes in exact rational
/// arithmetic and never consults this value; it applies to reconstructed
/// double-precision output (interpolated normals, volumes, test assertions).
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Margin used to inflate double-precision bounding boxes that prefilter
/// exact geometric tests.
///
/// Exact rational coordinates are rounded to `f64` when building the
/// prefilter boxes; inflating by this margin keeps the filter conservative
/// so the exact test is never skipped for a genuinely intersecting pair.
pub const BBOX_INFLATION: f64 = 1e-6;

/// Tolerance below which an interpolated normal is considered degenerate
/// and replaced by a fallback.
pub const NORMAL_LENGTH_EPSILON: f64 = 1e-12;

// =============================================================================
// RESOLUTION CONSTANTS
// =============================================================================

/// Default segment count for curved shapes (cylinders, spheres).
///
/// Chosen to match the segmentation the application uses when the user does
/// not override it.
pub const DEFAULT_SEGMENTATION: u32 = 25;

/// Smallest segment count accepted by curved-shape generators.
pub const MIN_SEGMENTATION: u32 = 3;

// =============================================================================
// APPEARANCE CONSTANTS
// =============================================================================

/// Default material color (RGBA, linear, in `[0, 1]`).
pub const DEFAULT_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];

// =============================================================================
// TESTS
// =============================================================================
