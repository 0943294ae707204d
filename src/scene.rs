use thiserror::Error;

use crate::light::Light;
use crate::sphere::Sphere;

/// Errors from building a scene out of invalid parts.
///
/// Indices refer to positions in the sphere or light list the scene was
/// built from.
#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("sphere {index}: radius must be positive and finite, got {radius}")]
    InvalidRadius { index: usize, radius: f64 },

    #[error("sphere {index}: center must be finite")]
    NonFiniteCenter { index: usize },

    #[error("sphere {index}: reflectivity must lie in [0, 1], got {reflectivity}")]
    InvalidReflectivity { index: usize, reflectivity: f64 },

    #[error("sphere {index}: shininess must be finite, got {shininess}")]
    InvalidShininess { index: usize, shininess: f64 },

    #[error("light {index}: intensity must be non-negative and finite, got {intensity}")]
    InvalidIntensity { index: usize, intensity: f64 },

    #[error("light {index}: position must be finite")]
    NonFinitePosition { index: usize },

    #[error("light {index}: directional light needs a non-zero, finite direction")]
    ZeroDirection { index: usize },

    #[error("canvas must be at least 1x1 pixels, got {width}x{height}")]
    EmptyCanvas { width: usize, height: usize },

    #[error("{name} must be positive and finite, got {value}")]
    InvalidSetting { name: &'static str, value: f64 },
}

/// A static scene of spheres and lights.
///
/// Both lists are fixed once the scene is built; tracing only ever borrows
/// them. `Scene::new` is the only way to build one, so every scene has passed
/// validation and the tracer never re-checks radii or intensities.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    spheres: Vec<Sphere>,
    lights: Vec<Light>,
}

impl Scene {
    /// Validates and assembles a scene.
    ///
    /// Directional light directions are normalized here, and a negative
    /// shininess is treated as no shininess at all. A total light
    /// intensity above 1.0 is allowed (the shading intensity is clamped) but
    /// logged, since it usually means an over-exposed scene.
    pub fn new(spheres: Vec<Sphere>, lights: Vec<Light>)
        -> Result<Scene, SceneError> {
        let spheres = spheres.into_iter()
            .enumerate()
            .map(|(index, sphere)| validate_sphere(index, sphere))
            .collect::<Result<Vec<Sphere>, SceneError>>()?;

        let lights = lights.into_iter()
            .enumerate()
            .map(|(index, light)| validate_light(index, light))
            .collect::<Result<Vec<Light>, SceneError>>()?;

        let total: f64 = lights.iter().map(|l| l.intensity()).sum();
        if total > 1.0 {
            log::warn!("Total light intensity is {:.3}; shading will saturate",
                total);
        }

        log::debug!("Built scene with {} spheres and {} lights",
            spheres.len(), lights.len());

        Ok(Scene { spheres, lights })
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }
}

fn validate_sphere(index: usize, mut sphere: Sphere)
    -> Result<Sphere, SceneError> {
    if !(sphere.radius > 0.0 && sphere.radius.is_finite()) {
        return Err(SceneError::InvalidRadius { index, radius: sphere.radius });
    }

    if !sphere.center.is_finite() {
        return Err(SceneError::NonFiniteCenter { index });
    }

    if !(0.0..=1.0).contains(&sphere.reflectivity) {
        return Err(SceneError::InvalidReflectivity {
            index,
            reflectivity: sphere.reflectivity,
        });
    }

    match sphere.shininess {
        Some(shininess) if !shininess.is_finite() => {
            return Err(SceneError::InvalidShininess { index, shininess });
        },
        // Negative exponents mark a matte sphere
        Some(shininess) if shininess < 0.0 => sphere.shininess = None,
        _ => {},
    }

    Ok(sphere)
}

fn validate_light(index: usize, light: Light) -> Result<Light, SceneError> {
    let intensity = light.intensity();
    if !(intensity >= 0.0 && intensity.is_finite()) {
        return Err(SceneError::InvalidIntensity { index, intensity });
    }

    match light {
        Light::Ambient { .. } => Ok(light),
        Light::Point { position, .. } => {
            if position.is_finite() {
                Ok(light)
            } else {
                Err(SceneError::NonFinitePosition { index })
            }
        },
        Light::Directional { intensity, direction } => {
            match direction.normalize() {
                Some(direction) => Ok(Light::Directional { intensity, direction }),
                None => Err(SceneError::ZeroDirection { index }),
            }
        },
    }
}

#[cfg(test)]
use crate::vector::Vector3;

#[test]
fn rejects_non_positive_radius() {
    let spheres = vec![
        Sphere::new(Vector3::ZERO, 1.0, [255, 0, 0]),
        Sphere::new(Vector3::ZERO, 0.0, [255, 0, 0]),
    ];

    assert_eq!(Scene::new(spheres, vec![]),
        Err(SceneError::InvalidRadius { index: 1, radius: 0.0 }));

    let negative = vec![Sphere::new(Vector3::ZERO, -2.0, [0, 0, 0])];
    assert!(Scene::new(negative, vec![]).is_err());
}

#[test]
fn rejects_reflectivity_out_of_range() {
    let spheres = vec![
        Sphere::new(Vector3::ZERO, 1.0, [0, 0, 0]).with_reflectivity(1.5)
    ];

    assert_eq!(Scene::new(spheres, vec![]),
        Err(SceneError::InvalidReflectivity { index: 0, reflectivity: 1.5 }));
}

#[test]
fn rejects_negative_intensity() {
    let lights = vec![Light::Ambient { intensity: -0.1 }];

    assert_eq!(Scene::new(vec![], lights),
        Err(SceneError::InvalidIntensity { index: 0, intensity: -0.1 }));
}

#[test]
fn rejects_zero_directional_light() {
    let lights = vec![
        Light::Ambient { intensity: 0.2 },
        Light::Directional { intensity: 0.2, direction: Vector3::ZERO },
    ];

    assert_eq!(Scene::new(vec![], lights),
        Err(SceneError::ZeroDirection { index: 1 }));
}

#[test]
fn normalizes_directional_lights() {
    let lights = vec![
        Light::Directional {
            intensity: 0.2,
            direction: Vector3::new(0.0, 3.0, 4.0),
        },
    ];

    let scene = Scene::new(vec![], lights).unwrap();
    assert_eq!(scene.lights()[0], Light::Directional {
        intensity: 0.2,
        direction: Vector3::new(0.0, 0.6, 0.8),
    });
}

#[test]
fn negative_shininess_means_matte() {
    let spheres = vec![
        Sphere::new(Vector3::ZERO, 1.0, [0, 0, 0]).with_shininess(-1.0),
        Sphere::new(Vector3::ZERO, 1.0, [0, 0, 0]).with_shininess(0.0),
        Sphere::new(Vector3::ZERO, 1.0, [0, 0, 0]).with_shininess(500.0),
    ];

    let scene = Scene::new(spheres, vec![]).unwrap();
    assert_eq!(scene.spheres()[0].shininess, None);
    assert_eq!(scene.spheres()[1].shininess, Some(0.0));
    assert_eq!(scene.spheres()[2].shininess, Some(500.0));
}

#[test]
fn rejects_non_finite_shininess() {
    let spheres = vec![
        Sphere::new(Vector3::ZERO, 1.0, [0, 0, 0]).with_shininess(f64::INFINITY)
    ];

    assert_eq!(Scene::new(spheres, vec![]),
        Err(SceneError::InvalidShininess { index: 0, shininess: f64::INFINITY }));
}

#[test]
fn keeps_sphere_order() {
    let spheres = vec![
        Sphere::new(Vector3::new(0.0, 0.0, 3.0), 1.0, [255, 0, 0]),
        Sphere::new(Vector3::new(2.0, 0.0, 4.0), 1.0, [0, 0, 255]),
    ];

    let scene = Scene::new(spheres.clone(), vec![]).unwrap();
    assert_eq!(scene.spheres(), &spheres[..]);
}
