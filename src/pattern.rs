/*!
Procedural test image.

*/

/// Returns the RGB triple of the XOR gradient at `(row, col)`.
#[inline]
pub fn texel(row: u32, col: u32) -> [u8; 3] {
    let xor = row ^ col;
    [
        (xor & 0xff) as u8,
        ((xor << 1) & 0xff) as u8,
        ((xor << 2) & 0xff) as u8,
    ]
}

/// Generates a `width` x `height` RGB8 image, row-major, with no padding between rows.
pub fn generate(width: u32, height: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width as usize * height as usize * 3);

    for row in 0 .. height {
        for col in 0 .. width {
            pixels.extend_from_slice(&texel(row, col));
        }
    }

    pixels
}
