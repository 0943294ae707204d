use serde::{ Serialize, Deserialize };

use crate::canvas::Canvas;
use crate::consts::{ VIEWPORT_WIDTH, VIEWPORT_HEIGHT, VIEWPORT_DISTANCE };
use crate::ray::Ray;
use crate::scene::{ Scene, SceneError };
use crate::tracer::{ RenderSettings, trace_ray };
use crate::vector::Vector3;

/// The virtual rectangle the canvas is projected onto.
///
/// The viewport is centered on the +Z axis, `distance` units in front of the
/// camera. Its size relative to its distance sets the field of view.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub distance: f64,
}

impl Default for Viewport {
    fn default() -> Viewport {
        Viewport {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
            distance: VIEWPORT_DISTANCE,
        }
    }
}

/// A pinhole camera at the origin, looking down +Z.
///
/// The camera cannot move or rotate. It maps an `hsize` by `vsize` canvas onto
/// its viewport and generates one primary ray per pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// The horizontal size of the resultant canvas.
    pub hsize: usize,

    /// The vertical size of the resultant canvas.
    pub vsize: usize,

    pub viewport: Viewport,
}

impl Camera {
    pub fn new(hsize: usize, vsize: usize, viewport: Viewport)
        -> Result<Camera, SceneError> {
        if hsize == 0 || vsize == 0 {
            return Err(SceneError::EmptyCanvas { width: hsize, height: vsize });
        }

        let dimensions = [
            ("viewport.width", viewport.width),
            ("viewport.height", viewport.height),
            ("viewport.distance", viewport.distance),
        ];
        for &(name, value) in dimensions.iter() {
            if !(value > 0.0 && value.is_finite()) {
                return Err(SceneError::InvalidSetting { name, value });
            }
        }

        Ok(Camera { hsize, vsize, viewport })
    }

    /// Maps the center of pixel `(px, py)` to a point on the viewport.
    ///
    /// Pixel rows grow downward while viewport `y` grows upward. For an odd
    /// canvas the middle pixel lands exactly on `(0, 0, distance)`.
    pub fn canvas_to_viewport(&self, px: usize, py: usize) -> Vector3 {
        let u = (px as f64 + 0.5) / self.hsize as f64;
        let v = (py as f64 + 0.5) / self.vsize as f64;

        Vector3::new(
            (u - 0.5) * self.viewport.width,
            (0.5 - v) * self.viewport.height,
            self.viewport.distance,
        )
    }

    /// The primary ray through the center of pixel `(px, py)`.
    ///
    /// The ray starts at the origin; its direction is normalized.
    pub fn ray_for_pixel(&self, px: usize, py: usize) -> Ray {
        let target = self.canvas_to_viewport(px, py);
        // The viewport distance is positive, so the target is never zero.
        let direction = target.normalize().unwrap_or(target);

        Ray::new(Vector3::ZERO, direction)
    }

    /// Traces every pixel and collects the results in a canvas.
    ///
    /// Pixels are independent of one another; rows are traced in order on
    /// the calling thread.
    pub fn render(&self, scene: &Scene, settings: &RenderSettings) -> Canvas {
        let mut image = Canvas::new(self.hsize, self.vsize);

        log::info!("Rendering {}x{} pixels, {} spheres, {} lights, depth {}",
            self.hsize, self.vsize, scene.spheres().len(),
            scene.lights().len(), settings.max_depth);

        for y in 0..self.vsize {
            for x in 0..self.hsize {
                let ray = self.ray_for_pixel(x, y);
                let color = trace_ray(scene, settings, ray.origin,
                    ray.direction, settings.max_depth);
                image.write_pixel(x, y, color.to_rgb8());
            }

            if (y + 1) % 100 == 0 {
                log::debug!("Finished row {} of {}", y + 1, self.vsize);
            }
        }

        log::info!("...done.");
        image
    }
}

#[test]
fn center_pixel_looks_down_z() {
    let c = Camera::new(3, 3, Default::default()).unwrap();
    let r = c.ray_for_pixel(1, 1);

    assert_eq!(r.origin, Vector3::ZERO);
    assert_eq!(r.direction, Vector3::new(0.0, 0.0, 1.0));
}

#[test]
fn corner_pixels_map_to_viewport_corners() {
    let c = Camera::new(3, 3, Default::default()).unwrap();

    let third = 1.0 / 3.0;
    assert_eq!(c.canvas_to_viewport(0, 0), Vector3::new(-third, third, 1.0));
    assert_eq!(c.canvas_to_viewport(2, 2), Vector3::new(third, -third, 1.0));
}

#[test]
fn viewport_scales_with_size_and_distance() {
    let viewport = Viewport { width: 4.0, height: 2.0, distance: 3.0 };
    let c = Camera::new(4, 2, viewport).unwrap();

    assert_eq!(c.canvas_to_viewport(3, 0), Vector3::new(1.5, 0.5, 3.0));
}

#[test]
fn rejects_empty_canvas() {
    assert_eq!(Camera::new(0, 10, Default::default()),
        Err(SceneError::EmptyCanvas { width: 0, height: 10 }));
}

#[test]
fn rejects_flat_viewport() {
    let viewport = Viewport { distance: 0.0, ..Default::default() };

    assert_eq!(Camera::new(10, 10, viewport),
        Err(SceneError::InvalidSetting { name: "viewport.distance", value: 0.0 }));
}

#[test]
fn render_single_red_sphere() {
    use crate::light::Light;
    use crate::sphere::Sphere;

    let scene = Scene::new(
        vec![Sphere::new(Vector3::new(0.0, -1.0, 3.0), 1.0, [255, 0, 0])],
        vec![Light::Ambient { intensity: 1.0 }],
    ).unwrap();
    let settings = RenderSettings {
        background: crate::color::Color::white(),
        ..Default::default()
    };
    let c = Camera::new(3, 3, Default::default()).unwrap();

    let image = c.render(&scene, &settings);
    assert_eq!(image.read_pixel(1, 1), Some([255, 0, 0]));
    assert_eq!(image.read_pixel(0, 0), Some([255, 255, 255]));
    assert_eq!(image.read_pixel(2, 0), Some([255, 255, 255]));
}
