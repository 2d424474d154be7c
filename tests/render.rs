//! End-to-end rendering tests against a real adapter
//!
//! Every test goes through an off-screen target & pixel readback, so they
//! run headless; on machines with no usable GPU they skip instead of fail.

use glam::vec2;
use lantern::graphics::{
    Color, RectangleShape, RenderStates, RenderTarget, RenderTexture, Vertex,
};

fn pixel(pixels: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * width + x) * 4) as usize;
    [pixels[i], pixels[i + 1], pixels[i + 2], pixels[i + 3]]
}

fn offscreen(width: u32, height: u32) -> Option<RenderTexture> {
    match RenderTexture::new(width, height) {
        Ok(target) => Some(target),
        Err(e) => {
            eprintln!("skipping: {e}");
            None
        }
    }
}

#[test]
fn clear_fills_every_pixel() {
    let Some(mut target) = offscreen(64, 64) else {
        return;
    };
    target.clear(Color::RED);
    target.display();

    let pixels = target.read_pixels();
    assert_eq!(pixels.len(), 64 * 64 * 4);
    assert_eq!(pixel(&pixels, 64, 0, 0), [255, 0, 0, 255]);
    assert_eq!(pixel(&pixels, 64, 63, 63), [255, 0, 0, 255]);
    assert_eq!(pixel(&pixels, 64, 32, 17), [255, 0, 0, 255]);
}

#[test]
fn shape_lands_where_the_view_says() {
    let Some(mut target) = offscreen(64, 64) else {
        return;
    };
    // a small rectangle around the default view's center
    let mut shape = RectangleShape::new(vec2(2.0, 2.0));
    shape.set_position(vec2(31.0, 31.0));
    shape.set_fill_color(Color::GREEN);

    target.clear(Color::BLACK);
    target.draw(&shape);
    target.display();

    let pixels = target.read_pixels();
    assert_eq!(pixel(&pixels, 64, 32, 32), [0, 255, 0, 255]);
    assert_eq!(pixel(&pixels, 64, 0, 0), [0, 0, 0, 255]);
    assert_eq!(pixel(&pixels, 64, 40, 32), [0, 0, 0, 255]);
}

#[test]
fn raw_vertices_draw_through_default_states() {
    let Some(mut target) = offscreen(32, 32) else {
        return;
    };
    // cover the left half of the target with one triangle pair
    let vertices = [
        Vertex::colored(vec2(0.0, 0.0), Color::BLUE),
        Vertex::colored(vec2(16.0, 0.0), Color::BLUE),
        Vertex::colored(vec2(0.0, 32.0), Color::BLUE),
        Vertex::colored(vec2(16.0, 32.0), Color::BLUE),
    ];
    target.clear(Color::WHITE);
    target.draw_vertices(
        &vertices,
        lantern::graphics::PrimitiveType::TriangleStrip,
        RenderStates::default(),
    );
    target.display();

    let pixels = target.read_pixels();
    assert_eq!(pixel(&pixels, 32, 4, 16), [0, 0, 255, 255]);
    assert_eq!(pixel(&pixels, 32, 24, 16), [255, 255, 255, 255]);
}

#[test]
fn clear_discards_earlier_draws() {
    let Some(mut target) = offscreen(16, 16) else {
        return;
    };
    let mut shape = RectangleShape::new(vec2(16.0, 16.0));
    shape.set_fill_color(Color::RED);

    target.clear(Color::BLACK);
    target.draw(&shape);
    target.clear(Color::WHITE);
    target.display();

    let pixels = target.read_pixels();
    assert_eq!(pixel(&pixels, 16, 8, 8), [255, 255, 255, 255]);
}

#[test]
fn sample_texture_tracks_display() {
    let Some(mut target) = offscreen(8, 8) else {
        return;
    };
    target.clear(Color::RED);
    target.display();
    assert_eq!(target.texture().size(), (8, 8));

    // draw the off-screen result into a second target
    let Some(mut second) = offscreen(8, 8) else {
        return;
    };
    let sprite = lantern::graphics::Sprite::new(target.texture());
    second.clear(Color::BLACK);
    second.draw(&sprite);
    second.display();

    let pixels = second.read_pixels();
    assert_eq!(pixel(&pixels, 8, 4, 4), [255, 0, 0, 255]);
}
