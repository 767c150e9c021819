//! Geographic placement is an external collaborator, not part of this
//! pipeline: callers that need to place a loaded asset in a geocentric frame
//! supply their own `iscs_to_gocs`-shaped function and apply it to
//! [`crate::builder::DrawPrimitive::node_to_scene`] themselves. This module
//! only names the shape so call sites have something concrete to implement
//! against.

use crate::math::Mat4;

/// A cartographic triple: longitude, latitude, and height above the
/// reference ellipsoid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cartographic {
    /// Longitude in radians.
    pub lon: f64,
    /// Latitude in radians.
    pub lat: f64,
    /// Height above the ellipsoid, in meters.
    pub height: f64,
}

/// Converts a cartographic position into a geocentric (GOCS) placement
/// matrix. Not implemented here; the geographic coordinate math is an
/// external collaborator this crate composes with, not one it owns.
pub trait GeoFrame {
    /// Computes the GOCS placement matrix for `position`.
    fn iscs_to_gocs(&self, position: Cartographic) -> Mat4;
}
