#![cfg(target_arch = "wasm32")]

use fractal_tree::mesh::{ColorSpec, SphereParams};
use fractal_tree::{ConfigError, FractalConfig, Scene, SceneConfig};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn default_scene_builds() {
    let scene = Scene::new(SceneConfig::default()).unwrap();
    // 31 x 31 grid, 30 x 30 quads
    assert_eq!(scene.sphere().vertex_count(), 961);
    assert_eq!(scene.sphere().triangle_count(), 1800);
    assert_eq!(scene.instructions().len(), 126);
}

#[wasm_bindgen_test]
fn entropy_seeded_colors_stay_in_palette() {
    let config = SceneConfig {
        sphere: SphereParams { smoothness: 8, radius: 1.0, color: ColorSpec::random() },
        seed: None,
        ..SceneConfig::default()
    };
    let scene = Scene::new(config).unwrap();
    for vertex in &scene.sphere().vertices {
        for channel in &vertex.color[..3] {
            assert!(*channel >= 1.0 / 256.0 && *channel <= 255.0 / 256.0);
        }
        assert_eq!(vertex.color[3], 1.0);
    }
}

#[wasm_bindgen_test]
fn rejected_fractal_keeps_previous() {
    let mut scene = Scene::new(SceneConfig::default()).unwrap();
    assert_eq!(
        scene.set_fractal(FractalConfig::new(-2, 2)),
        Err(ConfigError::NegativeDepth(-2))
    );
    assert_eq!(scene.config().fractal, FractalConfig::default());
}

#[wasm_bindgen_test]
fn yaml_config_round_trips_through_scene() {
    let config = SceneConfig::from_yaml("fractal:\n  depth: 1\n  branch_count: 3\n").unwrap();
    let scene = Scene::new(config).unwrap();
    assert_eq!(scene.instructions().len(), 8);
}
