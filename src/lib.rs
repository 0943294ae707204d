pub mod consts;

pub mod vector;
pub mod ray;
pub mod color;

pub mod sphere;
pub mod intersect;
pub mod light;
pub mod scene;
pub mod tracer;
pub mod camera;

pub mod canvas;
pub mod config;

use crate::consts::FEQ_EPSILON;

pub fn feq(left: f64, right: f64) -> bool {
    (left - right).abs() < FEQ_EPSILON
}
