//! Primitive collision shapes and intersection algorithms
//!
//! World-space rays, sphere-swept segments (capsules, with spheres as the
//! degenerate case) and axis-aligned boxes, with the contact and ray tests the
//! physics world needs. Contact normals always point from the second shape
//! towards the first.

use crate::foundation::math::Vec3;

const EPSILON: f32 = 1.0e-6;

/// A ray for ray casting and picking
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    ///
    /// Returns `None` for a zero-length direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        crate::foundation::math::try_direction(direction).map(|direction| Self { origin, direction })
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Penetration between two shapes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing from the second shape towards the first
    pub normal: Vec3,
    /// Penetration depth along `normal`
    pub depth: f32,
    /// Approximate contact point in world space
    pub point: Vec3,
}

impl Contact {
    /// Same contact seen from the other shape
    pub fn flipped(self) -> Self {
        Self {
            normal: -self.normal,
            ..self
        }
    }
}

/// A bounding sphere for collision detection
#[derive(Debug, Clone, Copy)]
pub struct BoundingSphere {
    /// The center position of the sphere in world space
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl BoundingSphere {
    /// Creates a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Check if this sphere intersects with another
    pub fn intersects(&self, other: &BoundingSphere) -> bool {
        let distance_squared = (self.center - other.center).magnitude_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared <= radius_sum * radius_sum
    }

    /// Entry point of a ray into this sphere
    ///
    /// Returns `(distance, hit_point, normal)`. A ray starting inside reports no hit.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, Vec3, Vec3)> {
        let oc = ray.origin - self.center;
        let b = oc.dot(&ray.direction);
        let c = oc.dot(&oc) - self.radius * self.radius;
        if c < 0.0 || b > 0.0 {
            // Inside, or outside and pointing away
            return None;
        }

        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let t = (-b - discriminant.sqrt()).max(0.0);
        let hit_point = ray.point_at(t);
        let normal = crate::foundation::math::try_direction(hit_point - self.center).unwrap_or(-ray.direction);
        Some((t, hit_point, normal))
    }
}

/// Closest point to `p` on segment `a`-`b`
pub fn closest_point_on_segment(p: Vec3, a: Vec3, b: Vec3) -> Vec3 {
    let ab = b - a;
    let length_squared = ab.magnitude_squared();
    if length_squared < EPSILON {
        return a;
    }
    let t = ((p - a).dot(&ab) / length_squared).clamp(0.0, 1.0);
    a + ab * t
}

/// Closest points between segments `p1`-`q1` and `p2`-`q2`
///
/// Ericson, Real-Time Collision Detection 5.1.9.
pub fn closest_points_between_segments(p1: Vec3, q1: Vec3, p2: Vec3, q2: Vec3) -> (Vec3, Vec3) {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.dot(&d1);
    let e = d2.dot(&d2);
    let f = d2.dot(&r);

    let (s, t) = if a <= EPSILON && e <= EPSILON {
        (0.0, 0.0)
    } else if a <= EPSILON {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(&r);
        if e <= EPSILON {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(&d2);
            let denom = a * e - b * b;
            let mut s = if denom > EPSILON {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                // Parallel, any s works
                0.0
            };
            let mut t = (b * s + f) / e;
            if t < 0.0 {
                t = 0.0;
                s = (-c / a).clamp(0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = ((b - c) / a).clamp(0.0, 1.0);
            }
            (s, t)
        }
    };

    (p1 + d1 * s, p2 + d2 * t)
}

/// Sphere swept along a segment; a sphere when both ends coincide
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    /// First end of the core segment
    pub a: Vec3,
    /// Second end of the core segment
    pub b: Vec3,
    /// Distance from the segment to the surface
    pub radius: f32,
}

impl Capsule {
    /// Creates a capsule from its core segment and radius
    pub fn new(a: Vec3, b: Vec3, radius: f32) -> Self {
        Self { a, b, radius }
    }

    /// Creates a sphere
    pub fn sphere(center: Vec3, radius: f32) -> Self {
        Self::new(center, center, radius)
    }

    /// Segment midpoint
    pub fn center(&self) -> Vec3 {
        (self.a + self.b) * 0.5
    }

    /// Whether `p` lies inside the capsule
    pub fn contains(&self, p: Vec3) -> bool {
        (p - closest_point_on_segment(p, self.a, self.b)).magnitude_squared() < self.radius * self.radius
    }

    /// Penetration against another capsule
    pub fn contact_capsule(&self, other: &Capsule) -> Option<Contact> {
        let (on_self, on_other) = closest_points_between_segments(self.a, self.b, other.a, other.b);
        let delta = on_self - on_other;
        let distance = delta.magnitude();
        let radius_sum = self.radius + other.radius;
        if distance >= radius_sum {
            return None;
        }

        let normal = if distance > EPSILON {
            delta / distance
        } else {
            // Coincident cores, separate upwards
            crate::foundation::math::up()
        };
        Some(Contact {
            normal,
            depth: radius_sum - distance,
            point: on_other + normal * other.radius,
        })
    }

    /// Penetration against a box; the normal points out of the box
    pub fn contact_aabb(&self, aabb: &Aabb) -> Option<Contact> {
        // Alternate projections converge on the closest segment point for convex boxes
        let mut on_segment = self.center();
        for _ in 0..4 {
            let on_box = aabb.closest_point(on_segment);
            on_segment = closest_point_on_segment(on_box, self.a, self.b);
        }
        let on_box = aabb.closest_point(on_segment);

        let delta = on_segment - on_box;
        let distance = delta.magnitude();
        if distance > EPSILON {
            if distance >= self.radius {
                return None;
            }
            return Some(Contact {
                normal: delta / distance,
                depth: self.radius - distance,
                point: on_box,
            });
        }

        // Core segment inside the box, push out along the shallowest face
        let (normal, depth) = aabb.shallowest_exit(on_segment);
        Some(Contact {
            normal,
            depth: depth + self.radius,
            point: on_segment,
        })
    }

    /// Entry point of a ray into this capsule
    ///
    /// Returns `(distance, hit_point, normal)`. A ray starting inside reports no hit.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, Vec3, Vec3)> {
        if self.contains(ray.origin) {
            return None;
        }

        let axis = self.b - self.a;
        let axis_length_squared = axis.magnitude_squared();
        let mut best: Option<(f32, Vec3, Vec3)> = None;
        let mut consider = |candidate: Option<(f32, Vec3, Vec3)>| {
            if let Some(hit) = candidate {
                if best.map_or(true, |current| hit.0 < current.0) {
                    best = Some(hit);
                }
            }
        };

        consider(BoundingSphere::new(self.a, self.radius).intersect_ray(ray));
        if axis_length_squared < EPSILON {
            return best;
        }
        consider(BoundingSphere::new(self.b, self.radius).intersect_ray(ray));

        // Side of the infinite cylinder, kept only between the end caps
        let m = ray.origin - self.a;
        let md = m.dot(&axis);
        let nd = ray.direction.dot(&axis);
        let mn = m.dot(&ray.direction);
        let k = m.dot(&m) - self.radius * self.radius;
        let qa = axis_length_squared - nd * nd;
        if qa.abs() > EPSILON {
            let qb = axis_length_squared * mn - nd * md;
            let qc = axis_length_squared * k - md * md;
            let discriminant = qb * qb - qa * qc;
            if discriminant >= 0.0 {
                let t = (-qb - discriminant.sqrt()) / qa;
                let along_axis = md + t * nd;
                if t >= 0.0 && (0.0..=axis_length_squared).contains(&along_axis) {
                    let point = ray.point_at(t);
                    let core = self.a + axis * (along_axis / axis_length_squared);
                    let normal = crate::foundation::math::try_direction(point - core).unwrap_or(-ray.direction);
                    consider(Some((t, point, normal)));
                }
            }
        }

        best
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Creates a box from its corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Creates a box from its centre and half extents
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Box centre
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Closest point inside the box to `p`
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        Vec3::new(
            p.x.clamp(self.min.x, self.max.x),
            p.y.clamp(self.min.y, self.max.y),
            p.z.clamp(self.min.z, self.max.z),
        )
    }

    /// Whether `p` lies inside the box
    pub fn contains(&self, p: Vec3) -> bool {
        (0..3).all(|i| p[i] > self.min[i] && p[i] < self.max[i])
    }

    /// Face normal and distance of the nearest face for a point inside the box
    fn shallowest_exit(&self, p: Vec3) -> (Vec3, f32) {
        let mut normal = crate::foundation::math::up();
        let mut depth = f32::MAX;
        for i in 0..3 {
            let to_min = p[i] - self.min[i];
            let to_max = self.max[i] - p[i];
            if to_min < depth {
                depth = to_min;
                normal = Vec3::zeros();
                normal[i] = -1.0;
            }
            if to_max < depth {
                depth = to_max;
                normal = Vec3::zeros();
                normal[i] = 1.0;
            }
        }
        (normal, depth.max(0.0))
    }

    /// Penetration against another box, along the axis of least overlap
    pub fn contact_aabb(&self, other: &Aabb) -> Option<Contact> {
        let mut axis = 0;
        let mut depth = f32::MAX;
        for i in 0..3 {
            let overlap = self.max[i].min(other.max[i]) - self.min[i].max(other.min[i]);
            if overlap <= 0.0 {
                return None;
            }
            if overlap < depth {
                depth = overlap;
                axis = i;
            }
        }

        let mut normal = Vec3::zeros();
        normal[axis] = if self.center()[axis] >= other.center()[axis] { 1.0 } else { -1.0 };
        let overlap_min = self.min.sup(&other.min);
        let overlap_max = self.max.inf(&other.max);
        Some(Contact {
            normal,
            depth,
            point: (overlap_min + overlap_max) * 0.5,
        })
    }

    /// Entry point of a ray into this box (slab test)
    ///
    /// Returns `(distance, hit_point, normal)`. A ray starting inside reports no hit.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, Vec3, Vec3)> {
        let mut t_min = 0.0_f32;
        let mut t_max = f32::MAX;
        let mut entry_axis: Option<(usize, f32)> = None;

        for i in 0..3 {
            let origin = ray.origin[i];
            let direction = ray.direction[i];
            if direction.abs() < EPSILON {
                if origin < self.min[i] || origin > self.max[i] {
                    return None;
                }
                continue;
            }

            let inverse = 1.0 / direction;
            let mut t_near = (self.min[i] - origin) * inverse;
            let mut t_far = (self.max[i] - origin) * inverse;
            if t_near > t_far {
                std::mem::swap(&mut t_near, &mut t_far);
            }
            if t_near > t_min {
                t_min = t_near;
                entry_axis = Some((i, -direction.signum()));
            }
            t_max = t_max.min(t_far);
            if t_min > t_max {
                return None;
            }
        }

        let (axis, sign) = entry_axis?;
        let mut normal = Vec3::zeros();
        normal[axis] = sign;
        Some((t_min, ray.point_at(t_min), normal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn down_ray(from: Vec3) -> Ray {
        Ray::new(from, Vec3::new(0.0, -1.0, 0.0)).unwrap()
    }

    #[test]
    fn test_ray_rejects_zero_direction() {
        assert!(Ray::new(Vec3::zeros(), Vec3::zeros()).is_none());
    }

    #[test]
    fn test_sphere_ray_entry() {
        let sphere = BoundingSphere::new(Vec3::zeros(), 1.0);
        let (t, point, normal) = sphere.intersect_ray(&down_ray(Vec3::new(0.0, 5.0, 0.0))).unwrap();
        assert_relative_eq!(t, 4.0, epsilon = 1.0e-5);
        assert_relative_eq!(point, Vec3::new(0.0, 1.0, 0.0), epsilon = 1.0e-5);
        assert_relative_eq!(normal, Vec3::new(0.0, 1.0, 0.0), epsilon = 1.0e-5);
    }

    #[test]
    fn test_sphere_ray_from_inside_misses() {
        let sphere = BoundingSphere::new(Vec3::zeros(), 1.0);
        assert!(sphere.intersect_ray(&down_ray(Vec3::zeros())).is_none());
    }

    #[test]
    fn test_segment_closest_points_crossing() {
        let (a, b) = closest_points_between_segments(
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, -1.0),
            Vec3::new(0.0, 1.0, 1.0),
        );
        assert_relative_eq!(a, Vec3::zeros(), epsilon = 1.0e-6);
        assert_relative_eq!(b, Vec3::new(0.0, 1.0, 0.0), epsilon = 1.0e-6);
    }

    #[test]
    fn test_segment_closest_points_parallel() {
        let (a, b) = closest_points_between_segments(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
        );
        assert_relative_eq!((a - b).magnitude(), 1.0, epsilon = 1.0e-6);
    }

    #[test]
    fn test_sphere_sphere_contact() {
        let a = Capsule::sphere(Vec3::new(0.0, 1.5, 0.0), 1.0);
        let b = Capsule::sphere(Vec3::zeros(), 1.0);
        let contact = a.contact_capsule(&b).unwrap();
        assert_relative_eq!(contact.normal, Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(contact.depth, 0.5);

        let far = Capsule::sphere(Vec3::new(0.0, 3.0, 0.0), 1.0);
        assert!(far.contact_capsule(&b).is_none());
    }

    #[test]
    fn test_capsule_resting_on_box() {
        let floor = Aabb::new(Vec3::new(-5.0, -1.0, -5.0), Vec3::new(5.0, 0.0, 5.0));
        let capsule = Capsule::new(Vec3::new(0.0, 0.4, 0.0), Vec3::new(0.0, 1.4, 0.0), 0.5);
        let contact = capsule.contact_aabb(&floor).unwrap();
        assert_relative_eq!(contact.normal, Vec3::new(0.0, 1.0, 0.0), epsilon = 1.0e-5);
        assert_relative_eq!(contact.depth, 0.1, epsilon = 1.0e-5);
    }

    #[test]
    fn test_capsule_core_inside_box() {
        let block = Aabb::from_center(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        let sphere = Capsule::sphere(Vec3::new(0.0, 0.8, 0.0), 0.25);
        let contact = sphere.contact_aabb(&block).unwrap();
        assert_relative_eq!(contact.normal, Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(contact.depth, 0.45, epsilon = 1.0e-5);
    }

    #[test]
    fn test_box_box_least_overlap_axis() {
        let a = Aabb::from_center(Vec3::new(1.5, 0.2, 0.0), Vec3::new(1.0, 1.0, 1.0));
        let b = Aabb::from_center(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        let contact = a.contact_aabb(&b).unwrap();
        assert_relative_eq!(contact.normal, Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(contact.depth, 0.5);
        assert_relative_eq!(b.contact_aabb(&a).unwrap().normal, Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_box_ray_slab() {
        let floor = Aabb::new(Vec3::new(-5.0, -1.0, -5.0), Vec3::new(5.0, 0.0, 5.0));
        let (t, _, normal) = floor.intersect_ray(&down_ray(Vec3::new(1.0, 2.0, 1.0))).unwrap();
        assert_relative_eq!(t, 2.0);
        assert_relative_eq!(normal, Vec3::new(0.0, 1.0, 0.0));

        assert!(floor.intersect_ray(&down_ray(Vec3::new(6.0, 2.0, 0.0))).is_none());
        assert!(floor.intersect_ray(&down_ray(Vec3::new(0.0, -0.5, 0.0))).is_none());
    }

    #[test]
    fn test_capsule_ray_hits_side_and_cap() {
        let capsule = Capsule::new(Vec3::new(0.0, -1.0, 0.0), Vec3::new(0.0, 1.0, 0.0), 0.5);

        let side = Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0)).unwrap();
        let (t, _, normal) = capsule.intersect_ray(&side).unwrap();
        assert_relative_eq!(t, 4.5, epsilon = 1.0e-5);
        assert_relative_eq!(normal, Vec3::new(1.0, 0.0, 0.0), epsilon = 1.0e-5);

        let (t, _, normal) = capsule.intersect_ray(&down_ray(Vec3::new(0.0, 5.0, 0.0))).unwrap();
        assert_relative_eq!(t, 3.5, epsilon = 1.0e-5);
        assert_relative_eq!(normal, Vec3::new(0.0, 1.0, 0.0), epsilon = 1.0e-5);

        assert!(capsule.intersect_ray(&down_ray(Vec3::zeros())).is_none());
    }
}
