//! Coordinate reprojection between the Hong Kong 1980 Grid and WGS84.
//!
//! The Lands Department publishes its coordinates in HK1980 Grid (EPSG:2326),
//! a Transverse Mercator projection on the HK80 datum. Reprojection goes
//! through proj4rs with the EPSG definitions below.

use geo::Coord;
use proj4rs::proj::Proj;
use thiserror::Error;

/// EPSG:2326 as a proj string (Transverse Mercator, International 1924,
/// 7-parameter shift to WGS84).
const HK1980_GRID_DEF: &str = "+proj=tmerc +lat_0=22.31213333333334 +lon_0=114.1785555555556 \
     +k=1 +x_0=836694.05 +y_0=819069.8 +ellps=intl \
     +towgs84=-162.619,-276.959,-161.764,0.067753,-2.243649,-1.158827,-1.094246 +units=m";

const WGS84_DEF: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// Coordinate reference systems understood by [`transform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crs {
    /// Hong Kong 1980 Grid (EPSG:2326), easting/northing in metres
    Hk1980Grid,
    /// WGS84 geographic (EPSG:4326), longitude/latitude in degrees
    Wgs84,
}

impl Crs {
    pub fn epsg(&self) -> u32 {
        match self {
            Crs::Hk1980Grid => 2326,
            Crs::Wgs84 => 4326,
        }
    }

    fn definition(&self) -> &'static str {
        match self {
            Crs::Hk1980Grid => HK1980_GRID_DEF,
            Crs::Wgs84 => WGS84_DEF,
        }
    }

    fn is_geographic(&self) -> bool {
        matches!(self, Crs::Wgs84)
    }

    fn proj(&self) -> Result<Proj, ProjError> {
        Proj::from_proj_string(self.definition()).map_err(|e| ProjError::Definition {
            crs: *self,
            reason: e.to_string(),
        })
    }
}

impl std::fmt::Display for Crs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EPSG:{}", self.epsg())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ProjError {
    #[error("cannot reproject non-finite coordinate ({x}, {y}) from {crs}")]
    NonFinite { x: f64, y: f64, crs: Crs },
    #[error("invalid definition for {crs}: {reason}")]
    Definition { crs: Crs, reason: String },
    #[error("reprojection from {from} to {to} failed: {reason}")]
    Transform { from: Crs, to: Crs, reason: String },
}

/// Decimal places kept on reprojected coordinates (about 11 m).
pub const COORDINATE_PRECISION: i32 = 4;

/// Reproject `coord` from `from` to `to`.
///
/// Geographic coordinates use `x` for longitude and `y` for latitude.
pub fn transform(from: Crs, to: Crs, coord: Coord<f64>) -> Result<Coord<f64>, ProjError> {
    if !coord.x.is_finite() || !coord.y.is_finite() {
        return Err(ProjError::NonFinite {
            x: coord.x,
            y: coord.y,
            crs: from,
        });
    }
    if from == to {
        return Ok(coord);
    }

    // proj4rs works in radians for geographic systems
    let mut point = if from.is_geographic() {
        (coord.x.to_radians(), coord.y.to_radians(), 0.0)
    } else {
        (coord.x, coord.y, 0.0)
    };

    proj4rs::transform::transform(&from.proj()?, &to.proj()?, &mut point).map_err(|e| {
        ProjError::Transform {
            from,
            to,
            reason: e.to_string(),
        }
    })?;

    let (x, y, _) = point;
    if to.is_geographic() {
        Ok(Coord {
            x: x.to_degrees(),
            y: y.to_degrees(),
        })
    } else {
        Ok(Coord { x, y })
    }
}

/// Round a coordinate component to [`COORDINATE_PRECISION`] decimal places.
pub fn round_coordinate(value: f64) -> f64 {
    let factor = 10f64.powi(COORDINATE_PRECISION);
    (value * factor).round() / factor
}

/// Reproject an HK1980 grid point to WGS84 and round it for storage.
pub fn grid_to_wgs84_rounded(x: f64, y: f64) -> Result<Coord<f64>, ProjError> {
    let c = transform(Crs::Hk1980Grid, Crs::Wgs84, Coord { x, y })?;
    Ok(Coord {
        x: round_coordinate(c.x),
        y: round_coordinate(c.y),
    })
}
