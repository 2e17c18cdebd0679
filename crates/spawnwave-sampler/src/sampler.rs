//! Drawing positions from spawn regions.

use log::warn;
use rand::seq::SliceRandom;
use rand::Rng;

use spawnwave_core::constants::POLYGON_SAMPLE_ATTEMPTS;
use spawnwave_core::types::{Vec2, Vec3};

use crate::error::SamplerError;
use crate::region::{ColliderShape, RegionKind, SpawnRegion};
use crate::spline::Spline;

/// Draw one spawn position from `region`.
///
/// Polygon colliders are rejection-sampled inside their bounds; if no hit is
/// found within [`POLYGON_SAMPLE_ATTEMPTS`] tries the origin is returned and a
/// warning is logged.
pub fn sample<R: Rng + ?Sized>(region: &SpawnRegion, rng: &mut R) -> Result<Vec3, SamplerError> {
    match region {
        SpawnRegion::Points { points } => {
            let point = points.choose(rng).ok_or(SamplerError::MissingField("points"))?;
            Ok(*point)
        }
        SpawnRegion::Circle {
            center,
            radius,
            planar,
        } => {
            let (center, radius) = circle_params(*center, *radius)?;
            let dir = inside_unit_sphere(rng);
            let z = if *planar { 0.0 } else { dir.z * radius };
            Ok(center + Vec3::new(dir.x * radius, dir.y * radius, z))
        }
        SpawnRegion::Box { min, max } => {
            check_box(*min, *max)?;
            Ok(Vec3::new(
                lerp_range(rng, min.x, max.x),
                lerp_range(rng, min.y, max.y),
                lerp_range(rng, min.z, max.z),
            ))
        }
        SpawnRegion::Spline { spline } => {
            let spline = spline_params(spline.as_ref())?;
            Ok(spline.evaluate(rng.gen::<f32>()))
        }
        SpawnRegion::Collider { shape, planar } => {
            let shape = collider_params(shape.as_ref(), *planar)?;
            Ok(sample_collider(shape, rng))
        }
        SpawnRegion::NavMesh => Err(SamplerError::Unimplemented(RegionKind::NavMesh)),
    }
}

/// Check that `region` can be sampled, without drawing from it.
pub fn validate(region: &SpawnRegion) -> Result<(), SamplerError> {
    match region {
        SpawnRegion::Points { points } => {
            if points.is_empty() {
                return Err(SamplerError::MissingField("points"));
            }
        }
        SpawnRegion::Circle { center, radius, .. } => {
            circle_params(*center, *radius)?;
        }
        SpawnRegion::Box { min, max } => check_box(*min, *max)?,
        SpawnRegion::Spline { spline } => {
            spline_params(spline.as_ref())?;
        }
        SpawnRegion::Collider { shape, planar } => {
            collider_params(shape.as_ref(), *planar)?;
        }
        SpawnRegion::NavMesh => return Err(SamplerError::Unimplemented(RegionKind::NavMesh)),
    }
    Ok(())
}

fn circle_params(center: Option<Vec3>, radius: f32) -> Result<(Vec3, f32), SamplerError> {
    let center = center.ok_or(SamplerError::MissingField("center"))?;
    if radius == 0.0 {
        return Err(SamplerError::MissingField("radius"));
    }
    if !radius.is_finite() || radius < 0.0 {
        return Err(SamplerError::InvalidField {
            field: "radius",
            reason: format!("{radius} is not a positive finite number"),
        });
    }
    Ok((center, radius))
}

fn check_box(min: Vec3, max: Vec3) -> Result<(), SamplerError> {
    if !min.is_finite() || !max.is_finite() || min.cmpgt(max).any() {
        return Err(SamplerError::InvalidField {
            field: "min",
            reason: format!("{min} must be finite and not exceed {max}"),
        });
    }
    Ok(())
}

fn spline_params(spline: Option<&Spline>) -> Result<&Spline, SamplerError> {
    let spline = spline.ok_or(SamplerError::MissingField("spline"))?;
    if spline.points.len() < 2 {
        return Err(SamplerError::InvalidField {
            field: "spline",
            reason: format!("needs at least 2 points, has {}", spline.points.len()),
        });
    }
    Ok(spline)
}

fn collider_params(
    shape: Option<&ColliderShape>,
    planar: bool,
) -> Result<&ColliderShape, SamplerError> {
    let shape = shape.ok_or(SamplerError::MissingField("shape"))?;
    if !planar {
        return Err(SamplerError::UnsupportedCollider(shape.name()));
    }
    if let ColliderShape::Polygon { points, .. } = shape {
        if points.len() < 3 {
            return Err(SamplerError::InvalidField {
                field: "points",
                reason: format!("a polygon needs at least 3 vertices, has {}", points.len()),
            });
        }
    }
    Ok(shape)
}

fn sample_collider<R: Rng + ?Sized>(shape: &ColliderShape, rng: &mut R) -> Vec3 {
    match shape {
        ColliderShape::Box { offset, size } => Vec3::new(
            lerp_range(rng, offset.x - size.x / 2.0, offset.x + size.x / 2.0),
            lerp_range(rng, offset.y - size.y / 2.0, offset.y + size.y / 2.0),
            0.0,
        ),
        ColliderShape::Circle { offset, radius } => {
            (*offset + inside_unit_circle(rng) * *radius).extend(0.0)
        }
        ColliderShape::Polygon { .. } => {
            let (min, max) = shape.bounds();
            for _ in 0..POLYGON_SAMPLE_ATTEMPTS {
                let candidate = Vec2::new(lerp_range(rng, min.x, max.x), lerp_range(rng, min.y, max.y));
                if shape.contains(candidate) {
                    return candidate.extend(0.0);
                }
            }
            warn!(
                "no spawn point found inside polygon collider after {POLYGON_SAMPLE_ATTEMPTS} attempts, using origin"
            );
            Vec3::ZERO
        }
    }
}

/// Uniform in [lo, hi]; tolerates lo == hi.
fn lerp_range<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    lo + (hi - lo) * rng.gen::<f32>()
}

fn inside_unit_sphere<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    loop {
        let v = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        if v.length_squared() <= 1.0 {
            return v;
        }
    }
}

fn inside_unit_circle<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    loop {
        let v = Vec2::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0));
        if v.length_squared() <= 1.0 {
            return v;
        }
    }
}
