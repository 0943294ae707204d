use crate::vector::Vector3;
use crate::ray::Ray;
use crate::color::Rgb8;

/// A sphere and its material.
///
/// `shininess` is the specular exponent; `None` disables the specular term
/// entirely. `reflectivity` is the fraction of the final color taken from a
/// mirror-reflected ray, in `[0, 1]`.
///
/// Spheres are plain records. Their invariants (positive radius, reflectivity
/// in range) are checked when a `Scene` is built, not here.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vector3,
    pub radius: f64,
    pub color: Rgb8,
    pub shininess: Option<f64>,
    pub reflectivity: f64,
}

/// The two roots of a ray-sphere quadratic, `t1 <= t2`.
///
/// A tangent ray yields `t1 == t2`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Roots {
    pub t1: f64,
    pub t2: f64,
}

impl Sphere {
    /// Creates a matte, non-reflective sphere.
    pub fn new(center: Vector3, radius: f64, color: Rgb8) -> Sphere {
        Sphere {
            center,
            radius,
            color,
            shininess: None,
            reflectivity: 0.0,
        }
    }

    pub fn with_shininess(mut self, shininess: f64) -> Sphere {
        self.shininess = Some(shininess);
        self
    }

    pub fn with_reflectivity(mut self, reflectivity: f64) -> Sphere {
        self.reflectivity = reflectivity;
        self
    }

    /// Checks whether a ray intersects the sphere.
    ///
    /// Solves `a*t^2 + b*t + c = 0` for the ray `origin + t * direction`. The
    /// direction need not be normalized. Returns `None` when the discriminant
    /// is negative (the ray's line misses the sphere); otherwise both roots,
    /// which may be negative if the sphere lies behind the origin.
    ///
    /// ```
    /// # use sphere_tracer::vector::Vector3;
    /// # use sphere_tracer::ray::Ray;
    /// # use sphere_tracer::sphere::Sphere;
    /// let s = Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0, [255, 0, 0]);
    /// let r = Ray::new(Vector3::ZERO, Vector3::new(0.0, 0.0, 1.0));
    /// let roots = s.intersect(&r).unwrap();
    /// assert_eq!((roots.t1, roots.t2), (4.0, 6.0));
    /// ```
    pub fn intersect(&self, ray: &Ray) -> Option<Roots> {
        let sphere_to_ray = ray.origin - self.center;

        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * sphere_to_ray.dot(&ray.direction);
        let c = sphere_to_ray.dot(&sphere_to_ray) - self.radius.powi(2);

        let discriminant = b.powi(2) - (4.0 * a * c);
        // A zero direction gives a == 0; there is no line to intersect.
        if discriminant < 0.0 || a == 0.0 {
            return None;
        }

        let sqrt_d = discriminant.sqrt();
        let t1 = (-b - sqrt_d) / (2.0 * a);
        let t2 = (-b + sqrt_d) / (2.0 * a);

        Some(Roots { t1, t2 })
    }

    /// The outward unit normal at a point on the surface.
    ///
    /// Returns `None` only for the degenerate case of `at == center`.
    pub fn normal_at(&self, at: Vector3) -> Option<Vector3> {
        (at - self.center).normalize()
    }
}

#[test]
fn ray_through_center_has_two_positive_roots() {
    let s = Sphere::new(Vector3::new(0.0, -1.0, 3.0), 1.0, [255, 0, 0]);
    let r = Ray::new(Vector3::ZERO, Vector3::new(0.0, -1.0, 3.0));

    let roots = s.intersect(&r).expect("ray aimed at the center should hit");
    assert!(roots.t1 <= roots.t2);
    assert!(roots.t1 > 0.0);
    assert!(roots.t2 > 0.0);
}

#[test]
fn ray_tangent_to_sphere() {
    let s = Sphere::new(Vector3::new(0.0, -1.0, 3.0), 1.0, [255, 0, 0]);
    let r = Ray::new(Vector3::ZERO, Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(s.intersect(&r), Some(Roots { t1: 3.0, t2: 3.0 }));
}

#[test]
fn ray_misses_sphere() {
    let s = Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0, [255, 0, 0]);
    let r = Ray::new(Vector3::new(0.0, 2.0, 0.0), Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(s.intersect(&r), None);
}

#[test]
fn ray_originates_inside_sphere() {
    let s = Sphere::new(Vector3::ZERO, 1.0, [255, 0, 0]);
    let r = Ray::new(Vector3::ZERO, Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(s.intersect(&r), Some(Roots { t1: -1.0, t2: 1.0 }));
}

#[test]
fn sphere_behind_ray() {
    let s = Sphere::new(Vector3::ZERO, 1.0, [255, 0, 0]);
    let r = Ray::new(Vector3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, 1.0));

    assert_eq!(s.intersect(&r), Some(Roots { t1: -6.0, t2: -4.0 }));
}

#[test]
fn unnormalized_direction_scales_roots() {
    let s = Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0, [255, 0, 0]);
    let r = Ray::new(Vector3::ZERO, Vector3::new(0.0, 0.0, 2.0));

    assert_eq!(s.intersect(&r), Some(Roots { t1: 2.0, t2: 3.0 }));
}

#[test]
fn normal_points_away_from_center() {
    let s = Sphere::new(Vector3::new(0.0, -1.0, 3.0), 1.0, [255, 0, 0]);

    assert_eq!(s.normal_at(Vector3::new(0.0, 0.0, 3.0)),
        Some(Vector3::new(0.0, 1.0, 0.0)));
    assert_eq!(s.normal_at(s.center), None);
}
