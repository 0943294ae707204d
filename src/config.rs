use std::convert::TryFrom;
use std::fs;
use std::io;
use std::path::Path;

use serde::{ Serialize, Deserialize };
use thiserror::Error;

use crate::camera::{ Camera, Viewport };
use crate::canvas::Canvas;
use crate::color::{ Color, Rgb8 };
use crate::consts::{ CANVAS_WIDTH, CANVAS_HEIGHT, NEAR_CLIP, REFLECTION_BIAS,
    REFLECTION_RECURSION_DEPTH, SHADOW_EPSILON };
use crate::light::Light;
use crate::scene::{ Scene, SceneError };
use crate::sphere::Sphere;
use crate::tracer::RenderSettings;
use crate::vector::Vector3;

/// Errors from loading a scene description.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid scene: {0}")]
    Scene(#[from] SceneError),
}

/// Everything needed to produce an image: what to draw, from where, and how.
pub struct RenderJob {
    pub scene: Scene,
    pub camera: Camera,
    pub settings: RenderSettings,
}

impl RenderJob {
    /// Loads and validates a scene description file.
    pub fn load(path: &Path) -> Result<RenderJob, ConfigError> {
        let scene_json = SceneJson::from_path(path)?;
        Ok(RenderJob::try_from(scene_json)?)
    }

    pub fn render(&self) -> Canvas {
        self.camera.render(&self.scene, &self.settings)
    }
}

impl TryFrom<SceneJson> for RenderJob {
    type Error = SceneError;

    fn try_from(scene_json: SceneJson) -> Result<RenderJob, SceneError> {
        // Create the camera.
        let camera = Camera::new(
            scene_json.canvas_width,
            scene_json.canvas_height,
            scene_json.viewport,
        )?;

        let settings = RenderSettings {
            max_depth: scene_json.max_depth,
            shadow_epsilon: scene_json.shadow_epsilon,
            reflection_bias: scene_json.reflection_bias,
            near_clip: scene_json.near_clip,
            background: Color::from(scene_json.background),
        };
        settings.validate()?;

        // Create the scene.
        let spheres: Vec<Sphere> = scene_json.spheres.into_iter()
            .map(|x| x.into())
            .collect();
        let scene = Scene::new(spheres, scene_json.lights)?;

        Ok(RenderJob { scene, camera, settings })
    }
}

/// A scene description as stored on disk.
///
/// Only `spheres` and `lights` are required; every other field falls back to
/// the defaults in `consts`.
///
/// ```
/// # use sphere_tracer::config::SceneJson;
/// let json = r#"{
///     "canvas_width": 3,
///     "canvas_height": 3,
///     "spheres": [
///         { "center": [0, -1, 3], "radius": 1, "color": [255, 0, 0] }
///     ],
///     "lights": [ { "type": "ambient", "intensity": 1.0 } ]
/// }"#;
/// let scene_json: SceneJson = serde_json::from_str(json).unwrap();
/// assert_eq!(scene_json.spheres.len(), 1);
/// assert_eq!(scene_json.max_depth, 3);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneJson {
    #[serde(default = "default_canvas_width")]
    pub canvas_width: usize,
    #[serde(default = "default_canvas_height")]
    pub canvas_height: usize,
    #[serde(default)]
    pub viewport: Viewport,

    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
    #[serde(default = "default_shadow_epsilon")]
    pub shadow_epsilon: f64,
    #[serde(default = "default_reflection_bias")]
    pub reflection_bias: f64,
    #[serde(default = "default_near_clip")]
    pub near_clip: f64,
    #[serde(default)]
    pub background: Rgb8,

    pub spheres: Vec<SphereJson>,
    pub lights: Vec<Light>,
}

/// A sphere as stored on disk.
///
/// `shininess` may be left out, set to `null`, or set negative (`-1` is the
/// customary marker) to disable specular highlights.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SphereJson {
    pub center: Vector3,
    pub radius: f64,
    pub color: Rgb8,
    #[serde(default)]
    pub shininess: Option<f64>,
    #[serde(default)]
    pub reflectivity: f64,
}

impl From<SphereJson> for Sphere {
    fn from(sphere_json: SphereJson) -> Sphere {
        Sphere {
            center: sphere_json.center,
            radius: sphere_json.radius,
            color: sphere_json.color,
            // NaN also fails the comparison and is dropped here.
            shininess: sphere_json.shininess.filter(|s| *s >= 0.0),
            reflectivity: sphere_json.reflectivity,
        }
    }
}

impl SceneJson {
    pub fn from_path(path: &Path) -> Result<SceneJson, ConfigError> {
        let text = fs::read_to_string(path)?;
        let scene_json = serde_json::from_str(&text)?;
        log::info!("Loaded scene description from {}", path.display());
        Ok(scene_json)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// The built-in scene: red, blue and green spheres resting on a huge yellow
/// sphere that acts as the ground, lit by ambient, point and directional
/// light.
impl Default for SceneJson {
    fn default() -> SceneJson {
        let sphere = |center: [f64; 3], radius: f64, color: Rgb8, shine: f64,
            reflectivity: f64| SphereJson {
            center: center.into(),
            radius,
            color,
            shininess: Some(shine),
            reflectivity,
        };

        SceneJson {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            viewport: Default::default(),
            max_depth: REFLECTION_RECURSION_DEPTH,
            shadow_epsilon: SHADOW_EPSILON,
            reflection_bias: REFLECTION_BIAS,
            near_clip: NEAR_CLIP,
            background: [0, 0, 0],
            spheres: vec![
                sphere([0.0, -1.0, 3.0], 1.0, [255, 0, 0], 500.0, 0.2),
                sphere([2.0, 0.0, 4.0], 1.0, [0, 0, 255], 500.0, 0.3),
                sphere([-2.0, 0.0, 4.0], 1.0, [0, 255, 0], 10.0, 0.4),
                sphere([0.0, -5001.0, 0.0], 5000.0, [255, 255, 0], 1000.0, 0.5),
            ],
            lights: vec![
                Light::Ambient { intensity: 0.2 },
                Light::Point {
                    intensity: 0.6,
                    position: Vector3::new(2.0, 1.0, 0.0),
                },
                Light::Directional {
                    intensity: 0.2,
                    direction: Vector3::new(1.0, 4.0, 4.0),
                },
            ],
        }
    }
}

fn default_canvas_width() -> usize { CANVAS_WIDTH }
fn default_canvas_height() -> usize { CANVAS_HEIGHT }
fn default_max_depth() -> u32 { REFLECTION_RECURSION_DEPTH }
fn default_shadow_epsilon() -> f64 { SHADOW_EPSILON }
fn default_reflection_bias() -> f64 { REFLECTION_BIAS }
fn default_near_clip() -> f64 { NEAR_CLIP }

#[test]
fn default_scene_is_valid() {
    let job = RenderJob::try_from(SceneJson::default()).unwrap();

    assert_eq!(job.scene.spheres().len(), 4);
    assert_eq!(job.scene.lights().len(), 3);
    assert_eq!(job.camera.hsize, CANVAS_WIDTH);
    assert_eq!(job.settings, RenderSettings::default());
}

#[test]
fn negative_shininess_disables_specular() {
    let json = r#"[
        { "center": [0, 0, 3], "radius": 1, "color": [1, 2, 3], "shininess": -1 },
        { "center": [0, 0, 3], "radius": 1, "color": [1, 2, 3], "shininess": null },
        { "center": [0, 0, 3], "radius": 1, "color": [1, 2, 3] },
        { "center": [0, 0, 3], "radius": 1, "color": [1, 2, 3], "shininess": 10 }
    ]"#;
    let spheres: Vec<SphereJson> = serde_json::from_str(json).unwrap();
    let spheres: Vec<Sphere> = spheres.into_iter().map(|s| s.into()).collect();

    assert_eq!(spheres[0].shininess, None);
    assert_eq!(spheres[1].shininess, None);
    assert_eq!(spheres[2].shininess, None);
    assert_eq!(spheres[3].shininess, Some(10.0));
    assert_eq!(spheres[3].reflectivity, 0.0);
}

#[test]
fn color_channels_must_fit_in_a_byte() {
    let json = r#"{ "center": [0, 0, 3], "radius": 1, "color": [256, 0, 0] }"#;

    assert!(serde_json::from_str::<SphereJson>(json).is_err());
}

#[test]
fn invalid_sphere_fails_conversion() {
    let mut scene_json = SceneJson::default();
    scene_json.spheres[2].radius = 0.0;

    assert_eq!(RenderJob::try_from(scene_json).err(),
        Some(SceneError::InvalidRadius { index: 2, radius: 0.0 }));
}

#[test]
fn invalid_epsilon_fails_conversion() {
    let mut scene_json = SceneJson::default();
    scene_json.shadow_epsilon = -1.0;

    assert!(RenderJob::try_from(scene_json).is_err());
}

#[test]
fn default_scene_round_trips_through_json() {
    let scene_json = SceneJson::default();
    let text = scene_json.to_json().unwrap();

    assert_eq!(serde_json::from_str::<SceneJson>(&text).unwrap(), scene_json);
}
