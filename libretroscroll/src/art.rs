//! Procedural SVG art: feed images, avatars and game thumbnails
//!
//! Everything is returned as a `data:image/svg+xml,` URI so it can be
//! stored and displayed without touching the filesystem.

use rand::Rng;

const AVATAR_COLORS: [&str; 5] = ["#ff0000", "#00ff00", "#0000ff", "#ffff00", "#ff00ff"];
const ART_PIXELS: usize = 20;

/// Wrap raw SVG markup in a percent-encoded data URI
pub fn svg_data_uri(svg: &str) -> String {
    format!("data:image/svg+xml,{}", urlencoding::encode(svg))
}

/// 10x10 black canvas with 20 randomly placed pixels of random hue
pub fn pixel_art<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut svg = String::from(
        r##"<svg width="100" height="100" viewBox="0 0 10 10" xmlns="http://www.w3.org/2000/svg"><rect width="10" height="10" fill="#000"/>"##,
    );
    for _ in 0..ART_PIXELS {
        let x = rng.gen_range(0..10);
        let y = rng.gen_range(0..10);
        let hue = rng.gen_range(0.0..360.0_f64);
        svg.push_str(&format!(
            r#"<rect x="{}" y="{}" width="1" height="1" fill="hsl({:.1}, 100%, 50%)"/>"#,
            x, y, hue
        ));
    }
    svg.push_str("</svg>");
    svg
}

/// 8x8 avatar, each cell lit with probability 1/2
pub fn pixel_avatar<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut svg = String::from(
        r#"<svg width="64" height="64" viewBox="0 0 8 8" xmlns="http://www.w3.org/2000/svg">"#,
    );
    for x in 0..8 {
        for y in 0..8 {
            if rng.gen_bool(0.5) {
                let color = AVATAR_COLORS[rng.gen_range(0..AVATAR_COLORS.len())];
                svg.push_str(&format!(
                    r#"<rect x="{}" y="{}" width="1" height="1" fill="{}"/>"#,
                    x, y, color
                ));
            }
        }
    }
    svg.push_str("</svg>");
    svg
}

/// Static preview card showing the game id
pub fn game_thumbnail(game_id: &str) -> String {
    format!(
        r##"<svg width="200" height="200" viewBox="0 0 20 20" xmlns="http://www.w3.org/2000/svg"><rect width="20" height="20" fill="#000"/><text x="10" y="10" fill="#0f0" text-anchor="middle">{}</text></svg>"##,
        game_id
    )
}
