//! Renders a small demo scene to `render.png`.
//!
//! Run with: cargo run --release --example simple_render

use lume_core::{Light, LightList, Material, Mesh};
use lume_math::{Mat4, Vec3};
use lume_renderer::{render_image, CameraDesc, Raytracer, RenderConfig};
use std::sync::atomic::AtomicBool;

fn main() {
    env_logger::init();

    let mut tracer = Raytracer::new();

    // Slightly reflective gray floor.
    let floor = Material {
        roughness: 0.3,
        ..Material::new(Vec3::new(0.6, 0.6, 0.6))
    };
    tracer
        .load_model(&Mesh::quad(20.0), Mat4::IDENTITY, 0.25, &floor)
        .expect("floor mesh is valid");

    // A red rough cube, a polished metal cube, and a glass cube.
    let red = Material {
        roughness: 0.8,
        ..Material::new(Vec3::new(0.8, 0.15, 0.1))
    };
    let metal = Material {
        roughness: 0.05,
        metallic: 1.0,
        ..Material::new(Vec3::new(0.9, 0.85, 0.7))
    };
    let glass = Material::glass(1.5, 0.9);

    let placements = [
        (Vec3::new(-2.2, 0.5, 0.0), &red),
        (Vec3::new(0.0, 0.5, 0.0), &metal),
        (Vec3::new(2.2, 0.5, 0.0), &glass),
    ];
    for (position, material) in placements {
        tracer
            .load_model(
                &Mesh::cube(1.0),
                Mat4::from_translation(position),
                0.0,
                material,
            )
            .expect("cube mesh is valid");
    }

    let mut lights = LightList::default();
    lights.add(Light::point(Vec3::new(3.0, 6.0, 4.0), Vec3::ONE, 8.0));
    lights.add(Light::directional(
        Vec3::new(-0.3, -1.0, -0.2),
        Vec3::new(0.9, 0.9, 1.0),
        0.4,
    ));
    lights.add(Light::spot(
        Vec3::new(-4.0, 5.0, 2.0),
        Vec3::new(0.6, -1.0, -0.3),
        Vec3::new(1.0, 0.8, 0.6),
        6.0,
        12.0,
        25.0,
    ));

    let camera = CameraDesc {
        position: Vec3::new(0.0, 3.0, 7.0),
        forward: Vec3::new(0.0, -0.35, -1.0),
        up: Vec3::Y,
        fov_y_deg: 50.0,
    };

    let config = RenderConfig::default();
    println!(
        "rendering {}x{} at depth {}...",
        config.width, config.height, config.max_depth
    );

    let start = std::time::Instant::now();
    let image = render_image(&tracer, &camera, &lights, &config, &AtomicBool::new(false));
    println!("done in {:.2?}", start.elapsed());

    let rgba = image.to_rgba8();
    image::save_buffer(
        "render.png",
        &rgba,
        image.width,
        image.height,
        image::ColorType::Rgba8,
    )
    .expect("failed to write render.png");
    println!("wrote render.png");
}
