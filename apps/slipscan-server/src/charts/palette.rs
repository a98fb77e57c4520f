//! Chart colours

use image::Rgb;

pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
pub const AXIS: Rgb<u8> = Rgb([0, 0, 0]);
pub const TEXT: Rgb<u8> = Rgb([0, 0, 0]);
pub const GRID: Rgb<u8> = Rgb([225, 225, 225]);

/// Bar fill (sky blue)
pub const BAR_FILL: Rgb<u8> = Rgb([135, 206, 235]);

/// Twelve-colour qualitative palette for pie slices, cycled
pub const PAIRED: [Rgb<u8>; 12] = [
    Rgb([0xa6, 0xce, 0xe3]),
    Rgb([0x1f, 0x78, 0xb4]),
    Rgb([0xb2, 0xdf, 0x8a]),
    Rgb([0x33, 0xa0, 0x2c]),
    Rgb([0xfb, 0x9a, 0x99]),
    Rgb([0xe3, 0x1a, 0x1c]),
    Rgb([0xfd, 0xbf, 0x6f]),
    Rgb([0xff, 0x7f, 0x00]),
    Rgb([0xca, 0xb2, 0xd6]),
    Rgb([0x6a, 0x3d, 0x9a]),
    Rgb([0xff, 0xff, 0x99]),
    Rgb([0xb1, 0x59, 0x28]),
];

pub fn slice_colour(index: usize) -> Rgb<u8> {
    PAIRED[index % PAIRED.len()]
}
