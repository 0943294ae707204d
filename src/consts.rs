// Runtime parameters
pub const CANVAS_WIDTH: usize = 500;
pub const CANVAS_HEIGHT: usize = 500;
pub const OUT_FILE: &'static str = "output.png";

// Floating point comparisons
pub const FEQ_EPSILON: f64 = 0.0001;

// Maximum recursion depth (number of trace levels, primary ray included)
pub const REFLECTION_RECURSION_DEPTH: u32 = 3;

// Ray interval lower bounds
pub const NEAR_CLIP: f64 = 1.0;
pub const SHADOW_EPSILON: f64 = 0.001;
pub const REFLECTION_BIAS: f64 = 0.001;

// Viewport defaults
pub const VIEWPORT_WIDTH: f64 = 1.0;
pub const VIEWPORT_HEIGHT: f64 = 1.0;
pub const VIEWPORT_DISTANCE: f64 = 1.0;
