/*

    Error types for the kd-tree core.

    Only structural geometry problems are errors here; a ray missing
    everything or an empty build input is a regular result, not an error.

    @date: 15 Nov, 2025
    @author: bartu
*/

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeometryError {
    /// Triangle with colinear edges, i.e. a zero-length face normal.
    /// Callers are expected to filter these upstream.
    #[error("invalid geometry: triangle edges are colinear")]
    InvalidGeometry,
}

pub type Result<T> = std::result::Result<T, GeometryError>;
