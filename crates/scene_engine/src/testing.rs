//! Fixtures shared by unit tests

use crate::assets::MemoryAssets;

/// Locator of the reference level
pub const LEVEL_ONE: &str = "scenes/level-1.json";

/// Reference level: a perspective camera, one light, a floor and a falling cube
pub const LEVEL_ONE_JSON: &str = r#"{
    "scene": { "background": "0x101010" },
    "lights": [
        { "type": "PointLight", "color": "0xFFFFFF", "intensity": 1.5, "position": { "x": 2, "y": 4, "z": 2 } }
    ],
    "camera": {
        "type": "perspective",
        "fov": 75,
        "position": { "x": 0, "y": 1, "z": 5 }
    },
    "objects": [
        {
            "name": "floor",
            "position": { "x": 0, "y": -0.5, "z": 0 },
            "geometry": { "type": "BoxGeometry", "width": 10, "height": 1, "depth": 10 },
            "material": { "color": "0x556655" }
        },
        {
            "name": "cube",
            "position": { "x": 0, "y": 3, "z": 0 },
            "geometry": { "type": "BoxGeometry" },
            "material": { "color": "0x3366FF" },
            "scripts": [{ "type": "gravity" }]
        }
    ]
}"#;

/// In-memory asset source holding the reference level
pub fn level_one_assets() -> MemoryAssets {
    let assets = MemoryAssets::new();
    assets.insert_text(LEVEL_ONE, LEVEL_ONE_JSON);
    assets
}

/// A blank PNG of the given size
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbaImage::new(width, height);
    let mut bytes = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, image::ImageFormat::Png)
        .expect("encode png");
    bytes.into_inner()
}
