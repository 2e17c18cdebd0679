//! Spawn-region descriptors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use spawnwave_core::types::{Vec2, Vec3};

use crate::error::SamplerError;
use crate::spline::Spline;

fn planar_default() -> bool {
    true
}

/// Where spawns may appear.
///
/// The `kind` tag is read through [`RegionKind`], so it is case-insensitive
/// and an unknown kind reports [`SamplerError::UnknownKind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", try_from = "RegionFields")]
pub enum SpawnRegion {
    /// Inside a sphere around `center`, flattened onto z = 0 when `planar`.
    Circle {
        center: Option<Vec3>,
        radius: f32,
        #[serde(default = "planar_default")]
        planar: bool,
    },
    /// Inside an axis-aligned box.
    Box { min: Vec3, max: Vec3 },
    /// One of a fixed list of points.
    Points { points: Vec<Vec3> },
    /// Anywhere along a spline.
    Spline { spline: Option<Spline> },
    /// Inside a 2D collider shape.
    Collider {
        shape: Option<ColliderShape>,
        #[serde(default = "planar_default")]
        planar: bool,
    },
    /// Recognized but not supported yet.
    NavMesh,
}

impl SpawnRegion {
    pub fn kind(&self) -> RegionKind {
        match self {
            SpawnRegion::Circle { .. } => RegionKind::Circle,
            SpawnRegion::Box { .. } => RegionKind::Box,
            SpawnRegion::Points { .. } => RegionKind::Points,
            SpawnRegion::Spline { .. } => RegionKind::Spline,
            SpawnRegion::Collider { .. } => RegionKind::Collider,
            SpawnRegion::NavMesh => RegionKind::NavMesh,
        }
    }
}

/// Wire shape of a [`SpawnRegion`] before its kind is resolved. Absent
/// fields fall back to the unset values `validate` reports on.
#[derive(Deserialize)]
struct RegionFields {
    kind: String,
    #[serde(default)]
    center: Option<Vec3>,
    #[serde(default)]
    radius: f32,
    #[serde(default = "planar_default")]
    planar: bool,
    #[serde(default)]
    min: Option<Vec3>,
    #[serde(default)]
    max: Option<Vec3>,
    #[serde(default)]
    points: Vec<Vec3>,
    #[serde(default)]
    spline: Option<Spline>,
    #[serde(default)]
    shape: Option<ColliderShape>,
}

impl TryFrom<RegionFields> for SpawnRegion {
    type Error = SamplerError;

    fn try_from(fields: RegionFields) -> Result<Self, Self::Error> {
        let region = match fields.kind.parse::<RegionKind>()? {
            RegionKind::Circle => SpawnRegion::Circle {
                center: fields.center,
                radius: fields.radius,
                planar: fields.planar,
            },
            RegionKind::Box => SpawnRegion::Box {
                min: fields.min.ok_or(SamplerError::MissingField("min"))?,
                max: fields.max.ok_or(SamplerError::MissingField("max"))?,
            },
            RegionKind::Points => SpawnRegion::Points {
                points: fields.points,
            },
            RegionKind::Spline => SpawnRegion::Spline {
                spline: fields.spline,
            },
            RegionKind::Collider => SpawnRegion::Collider {
                shape: fields.shape,
                planar: fields.planar,
            },
            RegionKind::NavMesh => SpawnRegion::NavMesh,
        };
        Ok(region)
    }
}

/// Tag of a [`SpawnRegion`], parseable from configuration strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionKind {
    Circle,
    Box,
    Points,
    Spline,
    Collider,
    NavMesh,
}

impl fmt::Display for RegionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegionKind::Circle => "circle",
            RegionKind::Box => "box",
            RegionKind::Points => "points",
            RegionKind::Spline => "spline",
            RegionKind::Collider => "collider",
            RegionKind::NavMesh => "nav_mesh",
        };
        f.write_str(name)
    }
}

impl FromStr for RegionKind {
    type Err = SamplerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "circle" => Ok(RegionKind::Circle),
            "box" => Ok(RegionKind::Box),
            "points" => Ok(RegionKind::Points),
            "spline" => Ok(RegionKind::Spline),
            "collider" => Ok(RegionKind::Collider),
            "nav_mesh" | "navmesh" => Ok(RegionKind::NavMesh),
            _ => Err(SamplerError::UnknownKind(s.to_string())),
        }
    }
}

/// 2D collider shapes, positioned by `offset`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape")]
pub enum ColliderShape {
    Box { offset: Vec2, size: Vec2 },
    Circle { offset: Vec2, radius: f32 },
    /// Vertices are relative to `offset`.
    Polygon { offset: Vec2, points: Vec<Vec2> },
}

impl ColliderShape {
    pub fn name(&self) -> &'static str {
        match self {
            ColliderShape::Box { .. } => "box",
            ColliderShape::Circle { .. } => "circle",
            ColliderShape::Polygon { .. } => "polygon",
        }
    }

    /// Axis-aligned bounds as (min, max).
    pub fn bounds(&self) -> (Vec2, Vec2) {
        match self {
            ColliderShape::Box { offset, size } => (*offset - *size / 2.0, *offset + *size / 2.0),
            ColliderShape::Circle { offset, radius } => {
                (*offset - Vec2::splat(*radius), *offset + Vec2::splat(*radius))
            }
            ColliderShape::Polygon { offset, points } => {
                let min = points.iter().fold(Vec2::splat(f32::INFINITY), |m, p| m.min(*p));
                let max = points
                    .iter()
                    .fold(Vec2::splat(f32::NEG_INFINITY), |m, p| m.max(*p));
                (*offset + min, *offset + max)
            }
        }
    }

    /// Point-in-shape test (even-odd rule for polygons).
    pub fn contains(&self, point: Vec2) -> bool {
        match self {
            ColliderShape::Box { offset, size } => {
                let d = (point - *offset).abs();
                d.x <= size.x / 2.0 && d.y <= size.y / 2.0
            }
            ColliderShape::Circle { offset, radius } => point.distance(*offset) <= *radius,
            ColliderShape::Polygon { offset, points } => {
                if points.len() < 3 {
                    return false;
                }
                let p = point - *offset;
                let mut inside = false;
                let mut j = points.len() - 1;
                for i in 0..points.len() {
                    let (a, b) = (points[i], points[j]);
                    if (a.y > p.y) != (b.y > p.y)
                        && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x
                    {
                        inside = !inside;
                    }
                    j = i;
                }
                inside
            }
        }
    }
}
