//! Ray casting against interactive mesh nodes

use super::{Aabb, SceneModel};
use glam::Vec3;

/// A ray hit on one mesh node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub mesh_index: usize,
    pub distance: f32,
}

/// Ray-triangle intersection test using Möller-Trumbore algorithm
pub fn ray_triangle_intersect(
    ray_origin: Vec3,
    ray_direction: Vec3,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
) -> Option<f32> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray_direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a > -0.00001 && a < 0.00001 {
        return None;
    }

    let f = 1.0 / a;
    let s = ray_origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray_direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    if t > 0.00001 {
        Some(t)
    } else {
        None
    }
}

/// Slab test; returns the entry distance (0 when the origin is inside)
pub fn ray_aabb_intersect(ray_origin: Vec3, ray_direction: Vec3, bounds: &Aabb) -> Option<f32> {
    if bounds.is_empty() {
        return None;
    }
    let inv = ray_direction.recip();
    let t1 = (bounds.min - ray_origin) * inv;
    let t2 = (bounds.max - ray_origin) * inv;
    let t_near = t1.min(t2).max_element();
    let t_far = t1.max(t2).min_element();

    if t_far < 0.0 || t_near > t_far {
        None
    } else {
        Some(t_near.max(0.0))
    }
}

/// Nearest interactive mesh hit by the ray. Non-interactive meshes are
/// ignored entirely, so they never occlude an interactive one.
pub fn pick(model: &SceneModel, ray_origin: Vec3, ray_direction: Vec3) -> Option<PickHit> {
    let mut nearest: Option<PickHit> = None;

    for (mesh_index, mesh) in model.meshes.iter().enumerate() {
        if !mesh.is_interactive() {
            continue;
        }
        let Some(entry) = ray_aabb_intersect(ray_origin, ray_direction, &mesh.bounds) else {
            continue;
        };
        if nearest.is_some_and(|hit| entry > hit.distance) {
            continue;
        }

        let closest = mesh
            .triangles()
            .filter_map(|[a, b, c]| ray_triangle_intersect(ray_origin, ray_direction, a, b, c))
            .fold(None, |best: Option<f32>, t| Some(best.map_or(t, |b| b.min(t))));

        if let Some(distance) = closest {
            if nearest.map_or(true, |hit| distance < hit.distance) {
                nearest = Some(PickHit {
                    mesh_index,
                    distance,
                });
            }
        }
    }

    nearest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::test_support::{box_mesh, instance};

    #[test]
    fn test_ray_hits_triangle() {
        let t = ray_triangle_intersect(
            Vec3::new(0.25, 0.25, 5.0),
            Vec3::NEG_Z,
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y,
        );
        assert!((t.unwrap() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_ray_misses_triangle() {
        let t = ray_triangle_intersect(
            Vec3::new(2.0, 2.0, 5.0),
            Vec3::NEG_Z,
            Vec3::ZERO,
            Vec3::X,
            Vec3::Y,
        );
        assert!(t.is_none());
    }

    #[test]
    fn test_ray_aabb() {
        let bounds = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let t = ray_aabb_intersect(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, &bounds).unwrap();
        assert!((t - 9.0).abs() < 1e-5);
        assert!(ray_aabb_intersect(Vec3::new(5.0, 0.0, 10.0), Vec3::NEG_Z, &bounds).is_none());
        assert!(ray_aabb_intersect(Vec3::new(0.0, 0.0, 10.0), Vec3::Z, &bounds).is_none());
    }

    #[test]
    fn test_pick_nearest_interactive() {
        let mut model = SceneModel::new(
            "001",
            vec![
                box_mesh("far_0", Vec3::new(0.0, 0.0, -10.0), 1.0),
                box_mesh("near_0", Vec3::ZERO, 1.0),
            ],
        );
        model.bind_instances(&[instance("far_0"), instance("near_0")]);

        let hit = pick(&model, Vec3::new(0.0, 0.0, 20.0), Vec3::NEG_Z).unwrap();
        assert_eq!(hit.mesh_index, 1);
        assert!((hit.distance - 19.0).abs() < 1e-4);
    }

    #[test]
    fn test_non_interactive_does_not_block() {
        let mut model = SceneModel::new(
            "001",
            vec![
                box_mesh("wall", Vec3::ZERO, 3.0),
                box_mesh("mug_0", Vec3::new(0.0, 0.0, -10.0), 1.0),
            ],
        );
        model.bind_instances(&[instance("mug_0")]);

        let hit = pick(&model, Vec3::new(0.0, 0.0, 20.0), Vec3::NEG_Z).unwrap();
        assert_eq!(hit.mesh_index, 1);
    }

    #[test]
    fn test_pick_nothing() {
        let model = SceneModel::new("001", vec![box_mesh("wall", Vec3::ZERO, 3.0)]);
        assert!(pick(&model, Vec3::new(0.0, 0.0, 20.0), Vec3::NEG_Z).is_none());
    }
}
