use std::convert::TryFrom;
use std::fs;
use std::path::{ Path, PathBuf };

use sphere_tracer::config::{ RenderJob, SceneJson };

fn scene_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("scenes").join(name)
}

#[test]
fn red_sphere_scene_from_file() {
    let job = RenderJob::load(&scene_path("red_sphere.json"))
        .expect("red_sphere.json should load");
    let image = job.render();

    assert_eq!((image.width, image.height), (3, 3));

    // The center ray grazes the top of the sphere; ambient light alone gives
    // the full sphere color.
    assert_eq!(image.read_pixel(1, 1), Some([255, 0, 0]));

    // The top row looks above the sphere and sees the white background.
    for x in 0..3 {
        assert_eq!(image.read_pixel(x, 0), Some([255, 255, 255]));
    }
}

#[test]
fn shipped_default_scene_matches_built_in() {
    let from_file = SceneJson::from_path(&scene_path("default.json")).unwrap();

    assert_eq!(from_file, SceneJson::default());
}

#[test]
fn shipped_scenes_are_valid() {
    for name in ["default.json", "matte.json", "red_sphere.json"].iter() {
        let result = RenderJob::load(&scene_path(name));
        assert!(result.is_ok(), "{} failed to load: {:?}", name, result.err());
    }
}

#[test]
fn small_default_render() {
    let mut scene_json = SceneJson::default();
    scene_json.canvas_width = 20;
    scene_json.canvas_height = 20;
    scene_json.max_depth = 1;
    let job = RenderJob::try_from(scene_json).unwrap();

    let image = job.render();
    assert_eq!(image.pixels().len(), 400);

    // The top corners look past every sphere.
    assert_eq!(image.read_pixel(0, 0), Some([0, 0, 0]));
    assert_eq!(image.read_pixel(19, 0), Some([0, 0, 0]));

    // Without reflections the bottom row sees only the red sphere and the
    // yellow ground, neither of which has any blue.
    for x in 0..20 {
        let pixel = image.read_pixel(x, 19).unwrap();
        assert_eq!(pixel[2], 0);
        assert!(pixel[0] > 0);
    }
}

#[test]
fn missing_scene_file_is_an_error() {
    assert!(RenderJob::load(&scene_path("does_not_exist.json")).is_err());
}

#[test]
fn save_ppm_and_png() {
    let job = RenderJob::load(&scene_path("red_sphere.json")).unwrap();
    let image = job.render();

    let dir = std::env::temp_dir();
    let ppm = dir.join(format!("sphere-tracer-{}.ppm", std::process::id()));
    let png = dir.join(format!("sphere-tracer-{}.png", std::process::id()));

    image.save(&ppm).unwrap();
    image.save(&png).unwrap();

    let text = fs::read_to_string(&ppm).unwrap();
    assert!(text.starts_with("P3\n3 3\n255\n"));
    assert!(fs::metadata(&png).unwrap().len() > 0);

    fs::remove_file(ppm).ok();
    fs::remove_file(png).ok();
}
