use crate::ray::Ray;
use crate::sphere::Sphere;

/// An open interval `(min, max)` of parametric distances along a ray.
///
/// Both ends are exclusive. The lower end keeps a ray from hitting the
/// surface it starts on; the upper end bounds shadow rays at the light.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub fn new(min: f64, max: f64) -> Interval {
        Interval { min, max }
    }

    /// An interval from `min` to positive infinity.
    pub fn above(min: f64) -> Interval {
        Interval { min, max: f64::INFINITY }
    }

    /// Returns true if `t` lies strictly between `min` and `max`.
    pub fn surrounds(&self, t: f64) -> bool {
        self.min < t && t < self.max
    }
}

/// An intersection.
///
/// This structure assumes that some ray produced an intersection. Parameter `t`
/// is analogous to `t` for a ray (the offset from the ray origin), and `what`
/// borrows the sphere that was struck from the scene.
#[derive(Copy, Clone, Debug)]
pub struct Intersection<'a> {
    pub t: f64,
    pub what: &'a Sphere,
}

/// Implements partial equality on an Intersection.
///
/// Two intersections are equal if their offsets `t` are equal and they refer
/// to the *same* sphere in memory, not merely an identical one.
impl<'a> PartialEq for Intersection<'a> {
    fn eq(&self, other: &Intersection<'a>) -> bool {
        self.t == other.t && std::ptr::eq(self.what, other.what)
    }
}

/// Finds the nearest intersection of a ray within `interval`.
///
/// Every sphere is tested, and both roots of each are considered. Roots outside
/// the open interval are discarded, and the smallest remaining `t` wins. Since
/// a candidate must be strictly smaller to replace the current best, equal `t`
/// values resolve to the sphere that comes first in `spheres`.
///
/// Returns `None` if nothing is hit; this is the ordinary background case.
pub fn closest_intersection<'a>(spheres: &'a [Sphere], ray: &Ray,
    interval: Interval) -> Option<Intersection<'a>> {
    let mut closest: Option<Intersection<'a>> = None;

    for sphere in spheres.iter() {
        let roots = match sphere.intersect(ray) {
            Some(roots) => roots,
            None => continue,
        };

        for t in [roots.t1, roots.t2].iter().copied() {
            if !interval.surrounds(t) {
                continue;
            }

            let nearer = match closest {
                Some(ref best) => t < best.t,
                None => true,
            };

            if nearer {
                closest = Some(Intersection { t, what: sphere });
            }
        }
    }

    closest
}

/// Returns true if any sphere is hit within `interval`.
///
/// Used for shadow rays, where only occlusion matters; stops at the first
/// qualifying root.
pub fn any_intersection(spheres: &[Sphere], ray: &Ray, interval: Interval)
    -> bool {
    spheres.iter().any(|sphere| match sphere.intersect(ray) {
        Some(roots) => interval.surrounds(roots.t1)
            || interval.surrounds(roots.t2),
        None => false,
    })
}

#[cfg(test)]
use crate::vector::Vector3;

#[test]
fn interval_is_open_at_both_ends() {
    let i = Interval::new(1.0, 2.0);

    assert!(!i.surrounds(1.0));
    assert!(i.surrounds(1.5));
    assert!(!i.surrounds(2.0));
    assert!(Interval::above(1.0).surrounds(1e300));
}

#[test]
fn closest_hit_picks_nearest_sphere() {
    let spheres = vec![
        Sphere::new(Vector3::new(0.0, 0.0, 10.0), 1.0, [0, 0, 255]),
        Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0, [255, 0, 0]),
    ];
    let r = Ray::new(Vector3::ZERO, Vector3::new(0.0, 0.0, 1.0));

    let hit = closest_intersection(&spheres, &r, Interval::above(1.0))
        .expect("ray along +z should hit both spheres");
    assert_eq!(hit.t, 4.0);
    assert!(std::ptr::eq(hit.what, &spheres[1]));
}

#[test]
fn closest_hit_uses_far_root_when_near_root_is_excluded() {
    let spheres = vec![Sphere::new(Vector3::ZERO, 2.0, [255, 0, 0])];
    let r = Ray::new(Vector3::ZERO, Vector3::new(0.0, 0.0, 1.0));

    let hit = closest_intersection(&spheres, &r, Interval::above(1.0)).unwrap();
    assert_eq!(hit.t, 2.0);
}

#[test]
fn closest_hit_excludes_roots_before_t_min() {
    // Both roots (0.5 and 1.5) of the nearer sphere: only 1.5 qualifies.
    let spheres = vec![Sphere::new(Vector3::new(0.0, 0.0, 1.0), 0.5, [0, 0, 0])];
    let r = Ray::new(Vector3::ZERO, Vector3::new(0.0, 0.0, 1.0));

    let hit = closest_intersection(&spheres, &r, Interval::above(1.0)).unwrap();
    assert_eq!(hit.t, 1.5);

    assert_eq!(
        closest_intersection(&spheres, &r, Interval::above(2.0)), None);
}

#[test]
fn closest_hit_respects_t_max() {
    let spheres = vec![Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0, [0, 0, 0])];
    let r = Ray::new(Vector3::ZERO, Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(
        closest_intersection(&spheres, &r, Interval::new(0.001, 4.0)), None);
    assert!(!any_intersection(&spheres, &r, Interval::new(0.001, 4.0)));
    assert!(any_intersection(&spheres, &r, Interval::new(0.001, 4.5)));
}

#[test]
fn closest_hit_tie_goes_to_first_sphere() {
    let spheres = vec![
        Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0, [255, 0, 0]),
        Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0, [0, 255, 0]),
    ];
    let r = Ray::new(Vector3::ZERO, Vector3::new(0.0, 0.0, 1.0));

    let hit = closest_intersection(&spheres, &r, Interval::above(1.0)).unwrap();
    assert!(std::ptr::eq(hit.what, &spheres[0]));
}

#[test]
fn closest_hit_misses_everything() {
    let spheres = vec![
        Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0, [255, 0, 0]),
        Sphere::new(Vector3::new(3.0, 0.0, 5.0), 1.0, [0, 255, 0]),
    ];
    // Parallel to both sphere axes, offset above them.
    let r = Ray::new(Vector3::new(0.0, 5.0, 0.0), Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(closest_intersection(&spheres, &r, Interval::above(1.0)), None);
}
