//! Pipeline machinery: latches, hazard detection, and the five stages.

/// Hazard detection.
pub mod hazards;
/// Inter-stage latch structure.
pub mod latches;
/// Stage functions.
pub mod stages;
