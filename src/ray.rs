use crate::vector::Vector3;

/// A ray, starting at `origin` and travelling along `direction`.
///
/// The direction does not have to be of unit length; `t` values returned by
/// intersection queries are always measured in multiples of `direction`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray {
    pub origin: Vector3,
    pub direction: Vector3,
}

impl Ray {
    pub fn new(origin: Vector3, direction: Vector3) -> Ray {
        Ray { origin, direction }
    }

    /// The point at parametric distance `t` along the ray.
    pub fn position(&self, t: f64) -> Vector3 {
        self.origin + (t * self.direction)
    }
}

#[test]
fn ray_position() {
    let r = Ray::new(
                Vector3::new(2.0, 3.0, 4.0),
                Vector3::new(1.0, 0.0, 0.0)
            );

    assert_eq!(r.position(0.0), Vector3::new(2.0, 3.0, 4.0));
    assert_eq!(r.position(1.0), Vector3::new(3.0, 3.0, 4.0));
    assert_eq!(r.position(-1.0), Vector3::new(1.0, 3.0, 4.0));
    assert_eq!(r.position(2.5), Vector3::new(4.5, 3.0, 4.0));
}

#[test]
fn ray_position_unnormalized() {
    let r = Ray::new(Vector3::ZERO, Vector3::new(0.0, 0.0, 2.0));

    assert_eq!(r.position(1.5), Vector3::new(0.0, 0.0, 3.0));
}
