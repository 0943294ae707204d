use crate::color::Color;
use crate::consts::{ NEAR_CLIP, REFLECTION_BIAS, REFLECTION_RECURSION_DEPTH,
    SHADOW_EPSILON };
use crate::intersect::{ Interval, closest_intersection };
use crate::light::lighting;
use crate::ray::Ray;
use crate::scene::{ Scene, SceneError };
use crate::vector::Vector3;

/// Parameters for tracing rays through a scene.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderSettings {
    /// How many trace levels a primary ray may use, itself included. A depth
    /// of 1 means no reflections; 0 renders black.
    pub max_depth: u32,

    /// The exclusive lower bound for shadow and reflection rays.
    pub shadow_epsilon: f64,

    /// How far a reflection ray's origin is pushed off the surface, along the
    /// normal.
    pub reflection_bias: f64,

    /// The exclusive lower bound for primary rays. Intersections closer to the
    /// camera than this are ignored.
    pub near_clip: f64,

    /// The color returned by rays that hit nothing.
    pub background: Color,
}

impl Default for RenderSettings {
    fn default() -> RenderSettings {
        RenderSettings {
            max_depth: REFLECTION_RECURSION_DEPTH,
            shadow_epsilon: SHADOW_EPSILON,
            reflection_bias: REFLECTION_BIAS,
            near_clip: NEAR_CLIP,
            background: Color::black(),
        }
    }
}

impl RenderSettings {
    /// Checks that the ray interval bounds are usable.
    ///
    /// The shadow epsilon must be positive, or a surface shadows itself. The
    /// near clip and reflection bias may be zero but not negative.
    pub fn validate(&self) -> Result<(), SceneError> {
        let positive = |name: &'static str, value: f64| {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(SceneError::InvalidSetting { name, value })
            }
        };
        let non_negative = |name: &'static str, value: f64| {
            if value >= 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(SceneError::InvalidSetting { name, value })
            }
        };

        positive("shadow_epsilon", self.shadow_epsilon)?;
        non_negative("reflection_bias", self.reflection_bias)?;
        non_negative("near_clip", self.near_clip)?;

        Ok(())
    }
}

/// Determines the color seen along a primary ray.
///
/// Only intersections beyond `settings.near_clip` count. `depth` is the
/// number of trace levels still available; see `RenderSettings::max_depth`.
/// The direction is normalized on entry, so any non-zero vector will do; a
/// zero direction sees the background.
///
/// Every channel of the returned color lies in `[0, 255]`.
pub fn trace_ray(scene: &Scene, settings: &RenderSettings, origin: Vector3,
    direction: Vector3, depth: u32) -> Color {
    let ray = Ray::new(origin, direction);
    trace(scene, settings, &ray, Interval::above(settings.near_clip), depth)
}

fn trace(scene: &Scene, settings: &RenderSettings, ray: &Ray,
    interval: Interval, depth: u32) -> Color {
    if depth == 0 {
        return Color::black();
    }

    let direction = match ray.direction.normalize() {
        Some(direction) => direction,
        None => return settings.background,
    };
    let ray = Ray::new(ray.origin, direction);

    let hit = match closest_intersection(scene.spheres(), &ray, interval) {
        Some(hit) => hit,
        None => return settings.background,
    };

    let sphere = hit.what;
    let point = ray.position(hit.t);
    let normalv = match sphere.normal_at(point) {
        Some(normalv) => normalv,
        // Only reachable for a zero radius, which a Scene never holds.
        None => return Color::black(),
    };
    let viewv = -direction;

    let intensity = lighting(scene, point, normalv, viewv, sphere.shininess,
        settings.shadow_epsilon);
    let local = Color::from(sphere.color) * intensity;

    let reflectivity = sphere.reflectivity;
    if reflectivity <= 0.0 || depth <= 1 {
        return local.clamped();
    }

    let reflectv = match viewv.reflect(&normalv).normalize() {
        Some(reflectv) => reflectv,
        None => return local.clamped(),
    };

    let over_point = point + normalv * settings.reflection_bias;
    let reflected = trace(scene, settings, &Ray::new(over_point, reflectv),
        Interval::above(settings.shadow_epsilon), depth - 1);

    local.blend(&reflected, reflectivity).clamped()
}

#[cfg(test)]
use crate::light::Light;
#[cfg(test)]
use crate::sphere::Sphere;

#[cfg(test)]
fn red_sphere_scene(reflectivity: f64) -> Scene {
    let spheres = vec![
        Sphere::new(Vector3::new(0.0, -1.0, 3.0), 1.0, [255, 0, 0])
            .with_reflectivity(reflectivity),
    ];
    Scene::new(spheres, vec![Light::Ambient { intensity: 1.0 }]).unwrap()
}

#[test]
fn primary_ray_hits_red_sphere() {
    let scene = red_sphere_scene(0.0);
    let settings = RenderSettings::default();

    let c = trace_ray(&scene, &settings, Vector3::ZERO,
        Vector3::new(0.0, 0.0, 1.0), 3);
    assert_eq!(c.to_rgb8(), [255, 0, 0]);
}

#[test]
fn miss_returns_background() {
    let scene = red_sphere_scene(0.0);
    let settings = RenderSettings {
        background: Color::white(),
        ..Default::default()
    };

    let c = trace_ray(&scene, &settings, Vector3::ZERO,
        Vector3::new(0.0, 1.0, 1.0), 3);
    assert_eq!(c, Color::white());
}

#[test]
fn depth_zero_is_black_even_on_a_hit() {
    let scene = red_sphere_scene(0.0);
    let settings = RenderSettings {
        background: Color::white(),
        ..Default::default()
    };

    let c = trace_ray(&scene, &settings, Vector3::ZERO,
        Vector3::new(0.0, 0.0, 1.0), 0);
    assert_eq!(c, Color::black());
}

#[test]
fn near_clip_ignores_close_spheres() {
    // The sphere spans t in (0.5, 1.5) along the ray; only the far side lies
    // beyond the default near clip of 1.
    let spheres = vec![Sphere::new(Vector3::new(0.0, 0.0, 1.0), 0.5, [0, 255, 0])];
    let scene = Scene::new(spheres, vec![Light::Ambient { intensity: 0.5 }])
        .unwrap();
    let settings = RenderSettings::default();

    let c = trace_ray(&scene, &settings, Vector3::ZERO,
        Vector3::new(0.0, 0.0, 1.0), 1);
    assert_eq!(c, Color::rgb(0.0, 127.5, 0.0));

    let clipped = RenderSettings { near_clip: 2.0, ..Default::default() };
    let c = trace_ray(&scene, &clipped, Vector3::ZERO,
        Vector3::new(0.0, 0.0, 1.0), 1);
    assert_eq!(c, clipped.background);
}

#[test]
fn unnormalized_direction_gives_same_color() {
    let scene = red_sphere_scene(0.0);
    let settings = RenderSettings::default();

    let unit = trace_ray(&scene, &settings, Vector3::ZERO,
        Vector3::new(0.0, -0.2, 1.0), 1);
    let long = trace_ray(&scene, &settings, Vector3::ZERO,
        Vector3::new(0.0, -2.0, 10.0), 1);
    assert_eq!(unit, long);
}

#[cfg(test)]
fn mirror_scene(reflectivity: f64) -> Scene {
    // A blue mirror straight ahead and a green sphere behind the camera that
    // is only visible in the reflection. The light sits at the camera, so
    // both facing sides are lit head-on.
    let spheres = vec![
        Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0, [0, 0, 255])
            .with_reflectivity(reflectivity),
        Sphere::new(Vector3::new(0.0, 0.0, -5.0), 1.0, [0, 255, 0]),
    ];
    let lights = vec![
        Light::Point { intensity: 1.0, position: Vector3::ZERO },
    ];
    Scene::new(spheres, lights).unwrap()
}

#[test]
fn reflection_blends_local_and_reflected() {
    let scene = mirror_scene(0.5);
    let settings = RenderSettings::default();

    // The primary ray hits the mirror at (0, 0, 4) and reflects straight
    // back along -z onto the green sphere.
    let c = trace_ray(&scene, &settings, Vector3::ZERO,
        Vector3::new(0.0, 0.0, 1.0), 2);
    assert_eq!(c, Color::rgb(0.0, 127.5, 127.5));
}

#[test]
fn zero_reflectivity_is_pure_local_shading() {
    let scene = mirror_scene(0.0);
    let settings = RenderSettings::default();

    let c = trace_ray(&scene, &settings, Vector3::ZERO,
        Vector3::new(0.0, 0.0, 1.0), 5);
    assert_eq!(c, Color::rgb(0.0, 0.0, 255.0));
}

#[test]
fn depth_one_skips_reflection() {
    let scene = mirror_scene(1.0);
    let settings = RenderSettings::default();

    let shallow = trace_ray(&scene, &settings, Vector3::ZERO,
        Vector3::new(0.0, 0.0, 1.0), 1);
    let deep = trace_ray(&scene, &settings, Vector3::ZERO,
        Vector3::new(0.0, 0.0, 1.0), 2);
    assert_eq!(shallow, Color::rgb(0.0, 0.0, 255.0));
    assert_eq!(deep, Color::rgb(0.0, 255.0, 0.0));
}

#[test]
fn facing_mirrors_terminate() {
    // Two perfect mirrors facing each other bounce a ray forever unless the
    // depth counter stops it.
    let spheres = vec![
        Sphere::new(Vector3::new(0.0, 0.0, 5.0), 1.0, [255, 0, 0])
            .with_reflectivity(1.0),
        Sphere::new(Vector3::new(0.0, 0.0, -5.0), 1.0, [0, 0, 255])
            .with_reflectivity(1.0),
    ];
    let scene = Scene::new(spheres, vec![Light::Ambient { intensity: 1.0 }])
        .unwrap();
    let settings = RenderSettings::default();
    let dir = Vector3::new(0.0, 0.0, 1.0);

    // Odd depths end on the red mirror, even depths on the blue one.
    assert_eq!(trace_ray(&scene, &settings, Vector3::ZERO, dir, 1),
        Color::rgb(255.0, 0.0, 0.0));
    assert_eq!(trace_ray(&scene, &settings, Vector3::ZERO, dir, 2),
        Color::rgb(0.0, 0.0, 255.0));
    assert_eq!(trace_ray(&scene, &settings, Vector3::ZERO, dir, 101),
        Color::rgb(255.0, 0.0, 0.0));
}

#[test]
fn output_channels_stay_in_range() {
    let spheres = vec![
        Sphere::new(Vector3::new(0.0, 0.0, 4.0), 1.0, [255, 255, 255])
            .with_shininess(1.0)
            .with_reflectivity(0.3),
        Sphere::new(Vector3::new(0.0, -5001.0, 0.0), 5000.0, [255, 255, 0])
            .with_shininess(1000.0),
    ];
    let scene = Scene::new(spheres, vec![
        Light::Ambient { intensity: 0.9 },
        Light::Point { intensity: 0.9, position: Vector3::new(2.0, 1.0, 0.0) },
        Light::Directional {
            intensity: 0.9,
            direction: Vector3::new(1.0, 4.0, 4.0),
        },
    ]).unwrap();
    let settings = RenderSettings::default();

    for i in -10..=10 {
        for j in -10..=10 {
            let dir = Vector3::new(i as f64 / 10.0, j as f64 / 10.0, 1.0);
            let c = trace_ray(&scene, &settings, Vector3::ZERO, dir, 4);
            for channel in [c.r, c.g, c.b].iter() {
                assert!(*channel >= 0.0 && *channel <= 255.0);
            }
        }
    }
}

#[test]
fn settings_reject_zero_epsilon() {
    let settings = RenderSettings { shadow_epsilon: 0.0, ..Default::default() };

    assert_eq!(settings.validate(), Err(SceneError::InvalidSetting {
        name: "shadow_epsilon",
        value: 0.0,
    }));
    assert_eq!(RenderSettings::default().validate(), Ok(()));
}
