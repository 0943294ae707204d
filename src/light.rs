use serde::{ Serialize, Deserialize };

use crate::vector::Vector3;
use crate::ray::Ray;
use crate::scene::Scene;
use crate::intersect::{ Interval, any_intersection };

/// A light source.
///
/// Intensities are scalars; lights have no color of their own. Ambient light
/// reaches every point unconditionally. Point and directional lights are
/// tested for occlusion with a shadow ray before contributing.
///
/// A directional light's `direction` points from the scene *toward* the
/// light, so it can be used as the light vector as-is.
///
/// In scene files lights are tagged by a `type` field:
///
/// ```
/// # use sphere_tracer::light::Light;
/// # use sphere_tracer::vector::Vector3;
/// let json = r#"{ "type": "point", "intensity": 0.6, "position": [2, 1, 0] }"#;
/// let light: Light = serde_json::from_str(json).unwrap();
/// assert_eq!(light, Light::Point {
///     intensity: 0.6,
///     position: Vector3::new(2.0, 1.0, 0.0),
/// });
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Light {
    Ambient { intensity: f64 },
    Point { intensity: f64, position: Vector3 },
    Directional { intensity: f64, direction: Vector3 },
}

impl Light {
    pub fn intensity(&self) -> f64 {
        match *self {
            Light::Ambient { intensity } => intensity,
            Light::Point { intensity, .. } => intensity,
            Light::Directional { intensity, .. } => intensity,
        }
    }
}

/// Calculates how brightly a point on a surface is lit.
///
/// `normalv` is the unit outward surface normal at `point`, and `viewv` the
/// unit vector from `point` back toward the viewer. `shininess` is the
/// struck sphere's specular exponent; `None` turns specular highlights off.
///
/// For every light:
///
/// * ambient intensity is added unconditionally;
/// * point and directional lights cast a shadow ray over
///   `(shadow_epsilon, distance to light)`. If anything is hit the light is
///   skipped entirely;
/// * otherwise the diffuse term `intensity * (N . L)` is added when positive,
///   and the specular term `intensity * (R . V)^shininess` when `R . V` is
///   positive, where `R` is `L` mirrored about `N`.
///
/// A point light sitting exactly on `point` has no direction and is skipped.
/// The sum is clamped to 1.0; no term is ever negative.
pub fn lighting(scene: &Scene, point: Vector3, normalv: Vector3,
    viewv: Vector3, shininess: Option<f64>, shadow_epsilon: f64) -> f64 {
    let mut total = 0.0;

    for light in scene.lights().iter() {
        let (intensity, lightv, t_max) = match *light {
            Light::Ambient { intensity } => {
                total += intensity;
                continue;
            },
            Light::Point { intensity, position } => {
                let to_light = position - point;
                match to_light.normalize() {
                    Some(lightv) => (intensity, lightv, to_light.magnitude()),
                    None => continue,
                }
            },
            Light::Directional { intensity, direction } => {
                match direction.normalize() {
                    Some(lightv) => (intensity, lightv, f64::INFINITY),
                    None => continue,
                }
            },
        };

        // Shadow check
        let shadow_ray = Ray::new(point, lightv);
        if any_intersection(scene.spheres(), &shadow_ray,
            Interval::new(shadow_epsilon, t_max)) {
            continue;
        }

        // Diffuse
        let light_dot_normal = normalv.dot(&lightv);
        if light_dot_normal > 0.0 {
            total += intensity * light_dot_normal;
        }

        // Specular
        if let Some(exponent) = shininess {
            if let Some(reflectv) = lightv.reflect(&normalv).normalize() {
                let reflect_dot_view = reflectv.dot(&viewv);
                if reflect_dot_view > 0.0 {
                    total += intensity * reflect_dot_view.powf(exponent);
                }
            }
        }
    }

    total.min(1.0)
}

#[cfg(test)]
use crate::sphere::Sphere;

#[cfg(test)]
const EPS: f64 = 0.001;

#[cfg(test)]
fn unit_sphere_scene(lights: Vec<Light>) -> Scene {
    let spheres = vec![Sphere::new(Vector3::ZERO, 1.0, [255, 255, 255])];
    Scene::new(spheres, lights).unwrap()
}

#[test]
fn ambient_only() {
    let scene = unit_sphere_scene(vec![Light::Ambient { intensity: 0.2 }]);
    let n = Vector3::new(0.0, 1.0, 0.0);

    let res = lighting(&scene, n, n, n, None, EPS);
    assert!((res - 0.2).abs() < 1e-9);
}

#[test]
fn sum_is_clamped_to_one() {
    let scene = unit_sphere_scene(vec![
        Light::Ambient { intensity: 0.7 },
        Light::Ambient { intensity: 0.6 },
    ]);
    let n = Vector3::new(0.0, 1.0, 0.0);

    assert_eq!(lighting(&scene, n, n, n, None, EPS), 1.0);
}

#[test]
fn point_light_straight_above() {
    let scene = unit_sphere_scene(vec![
        Light::Point { intensity: 0.6, position: Vector3::new(0.0, 5.0, 0.0) },
    ]);
    let p = Vector3::new(0.0, 1.0, 0.0);
    let n = Vector3::new(0.0, 1.0, 0.0);

    let res = lighting(&scene, p, n, n, None, EPS);
    assert!((res - 0.6).abs() < 1e-9);
}

#[test]
fn directional_light_at_45_degrees() {
    let scene = unit_sphere_scene(vec![
        Light::Directional {
            intensity: 0.5,
            direction: Vector3::new(0.0, 1.0, 1.0),
        },
    ]);
    let p = Vector3::new(0.0, 1.0, 0.0);
    let n = Vector3::new(0.0, 1.0, 0.0);

    let res = lighting(&scene, p, n, n, None, EPS);
    assert!((res - 0.5 / 2.0f64.sqrt()).abs() < 1e-9);
}

#[test]
fn light_behind_surface_contributes_nothing() {
    let scene = Scene::new(vec![], vec![
        Light::Directional {
            intensity: 0.5,
            direction: Vector3::new(0.0, -1.0, 0.0),
        },
    ]).unwrap();
    let p = Vector3::new(0.0, 1.0, 0.0);
    let n = Vector3::new(0.0, 1.0, 0.0);

    assert_eq!(lighting(&scene, p, n, n, None, EPS), 0.0);
}

#[test]
fn blocked_light_contributes_nothing() {
    let spheres = vec![
        Sphere::new(Vector3::ZERO, 1.0, [255, 255, 255]),
        Sphere::new(Vector3::new(0.0, 3.0, 0.0), 0.5, [255, 255, 255]),
    ];
    let scene = Scene::new(spheres, vec![
        Light::Ambient { intensity: 0.2 },
        Light::Point { intensity: 0.6, position: Vector3::new(0.0, 5.0, 0.0) },
    ]).unwrap();
    let p = Vector3::new(0.0, 1.0, 0.0);
    let n = Vector3::new(0.0, 1.0, 0.0);

    // Both the diffuse and the specular term are suppressed.
    let res = lighting(&scene, p, n, n, Some(10.0), EPS);
    assert!((res - 0.2).abs() < 1e-9);
}

#[test]
fn blocked_light_behind_surface_adds_no_highlight() {
    // The light sits below the surface, so N . L < 0, but the view lines up
    // with its mirror direction. Unblocked, only the specular term lights the
    // point.
    let lights = vec![
        Light::Directional {
            intensity: 0.5,
            direction: Vector3::new(0.0, -1.0, 1.0),
        },
    ];
    let p = Vector3::new(0.0, 1.0, 0.0);
    let n = Vector3::new(0.0, 1.0, 0.0);
    let v = Vector3::new(0.0, -1.0, -1.0).normalize().unwrap();

    let open = Scene::new(vec![], lights.clone()).unwrap();
    let res = lighting(&open, p, n, v, Some(10.0), EPS);
    assert!((res - 0.5).abs() < 1e-9);

    // The unit sphere under the point blocks the light, highlight included.
    let blocked = unit_sphere_scene(lights);
    assert_eq!(lighting(&blocked, p, n, v, Some(10.0), EPS), 0.0);
}

#[test]
fn occluder_beyond_point_light_casts_no_shadow() {
    let spheres = vec![
        Sphere::new(Vector3::ZERO, 1.0, [255, 255, 255]),
        Sphere::new(Vector3::new(0.0, 8.0, 0.0), 0.5, [255, 255, 255]),
    ];
    let scene = Scene::new(spheres, vec![
        Light::Point { intensity: 0.6, position: Vector3::new(0.0, 5.0, 0.0) },
    ]).unwrap();
    let p = Vector3::new(0.0, 1.0, 0.0);
    let n = Vector3::new(0.0, 1.0, 0.0);

    let res = lighting(&scene, p, n, n, None, EPS);
    assert!((res - 0.6).abs() < 1e-9);
}

#[test]
fn directional_light_is_blocked_at_any_distance() {
    let spheres = vec![
        Sphere::new(Vector3::ZERO, 1.0, [255, 255, 255]),
        Sphere::new(Vector3::new(0.0, 1000.0, 0.0), 1.0, [255, 255, 255]),
    ];
    let scene = Scene::new(spheres, vec![
        Light::Directional {
            intensity: 0.6,
            direction: Vector3::new(0.0, 1.0, 0.0),
        },
    ]).unwrap();
    let p = Vector3::new(0.0, 1.0, 0.0);
    let n = Vector3::new(0.0, 1.0, 0.0);

    assert_eq!(lighting(&scene, p, n, n, None, EPS), 0.0);
}

#[test]
fn specular_highlight_facing_viewer() {
    let scene = unit_sphere_scene(vec![
        Light::Point { intensity: 0.3, position: Vector3::new(0.0, 5.0, 0.0) },
    ]);
    let p = Vector3::new(0.0, 1.0, 0.0);
    let n = Vector3::new(0.0, 1.0, 0.0);

    // Diffuse 0.3 plus a full-strength highlight of 0.3.
    let res = lighting(&scene, p, n, n, Some(10.0), EPS);
    assert!((res - 0.6).abs() < 1e-9);
}

#[test]
fn specular_highlight_off_axis() {
    let scene = unit_sphere_scene(vec![
        Light::Point { intensity: 0.3, position: Vector3::new(0.0, 5.0, 0.0) },
    ]);
    let p = Vector3::new(0.0, 1.0, 0.0);
    let n = Vector3::new(0.0, 1.0, 0.0);
    let v = Vector3::new(0.0, 1.0, 1.0).normalize().unwrap();

    // (R . V)^10 == (1 / sqrt 2)^10 == 1 / 32
    let res = lighting(&scene, p, n, v, Some(10.0), EPS);
    assert!((res - (0.3 + 0.3 / 32.0)).abs() < 1e-9);

    // Without shininess only the diffuse term remains.
    let matte = lighting(&scene, p, n, v, None, EPS);
    assert!((matte - 0.3).abs() < 1e-9);
}

#[test]
fn negative_shininess_disables_highlight() {
    let spheres = vec![
        Sphere::new(Vector3::ZERO, 1.0, [255, 255, 255]).with_shininess(-1.0),
    ];
    let scene = Scene::new(spheres, vec![
        Light::Point { intensity: 0.3, position: Vector3::new(0.0, 5.0, 0.0) },
    ]).unwrap();
    let p = Vector3::new(0.0, 1.0, 0.0);
    let n = Vector3::new(0.0, 1.0, 0.0);
    let v = Vector3::new(0.0, 1.0, 4.0).normalize().unwrap();

    // A wide highlight angle must not blow up through a negative exponent.
    let shininess = scene.spheres()[0].shininess;
    let res = lighting(&scene, p, n, v, shininess, EPS);
    assert!((res - 0.3).abs() < 1e-9);
}

#[test]
fn point_light_on_surface_is_skipped() {
    let p = Vector3::new(0.0, 1.0, 0.0);
    let scene = unit_sphere_scene(vec![
        Light::Ambient { intensity: 0.1 },
        Light::Point { intensity: 0.6, position: p },
    ]);
    let n = Vector3::new(0.0, 1.0, 0.0);

    let res = lighting(&scene, p, n, n, Some(10.0), EPS);
    assert!((res - 0.1).abs() < 1e-9);
}

#[test]
fn diffuse_ignores_distance_from_origin() {
    // Older renders divided the diffuse and specular terms by |N| * |P|,
    // darkening surfaces far from the camera. Shading must only depend on
    // the angle to the light.
    let scene = Scene::new(vec![], vec![
        Light::Directional {
            intensity: 0.8,
            direction: Vector3::new(0.0, 1.0, 1.0),
        },
    ]).unwrap();
    let n = Vector3::new(0.0, 1.0, 0.0);

    let near = lighting(&scene, Vector3::new(0.0, 0.0, 2.0), n, n, None, EPS);
    let far = lighting(&scene, Vector3::new(0.0, 0.0, 20.0), n, n, None, EPS);
    assert!((near - far).abs() < 1e-12);
    assert!((near - 0.8 / 2.0f64.sqrt()).abs() < 1e-9);
}

#[test]
fn deserialize_tagged_lights() {
    let json = r#"[
        { "type": "ambient", "intensity": 0.2 },
        { "type": "directional", "intensity": 0.2, "direction": [1, 4, 4] }
    ]"#;
    let lights: Vec<Light> = serde_json::from_str(json).unwrap();

    assert_eq!(lights[0], Light::Ambient { intensity: 0.2 });
    assert_eq!(lights[1], Light::Directional {
        intensity: 0.2,
        direction: Vector3::new(1.0, 4.0, 4.0),
    });

    // A point light without a position is rejected.
    let missing = r#"{ "type": "point", "intensity": 0.6 }"#;
    assert!(serde_json::from_str::<Light>(missing).is_err());
}
