pub fn normalize_rgba_color(color: &[u8; 4]) -> [f32; 4] {
    [
        color[0] as f32 / 255.0,
        color[1] as f32 / 255.0,
        color[2] as f32 / 255.0,
        color[3] as f32 / 255.0,
    ]
}

/// Maps a cursor position in physical window pixels to normalized device
/// coordinates in `[-1, 1]`, y pointing up.
///
/// This is the mapping the fold solver expects its pointer input in; window
/// event handlers feed cursor positions through here before calling
/// [`crate::Renderer::set_pointer`].
#[inline(always)]
pub fn pointer_to_ndc(position: (f64, f64), physical_size: (u32, u32)) -> (f32, f32) {
    let x = (position.0 / physical_size.0 as f64 / 0.5) - 1.0;
    let y = -(position.1 / physical_size.1 as f64 / 0.5) + 1.0;
    (x as f32, y as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_mapping_covers_the_ndc_square() {
        let size = (800, 600);
        assert_eq!(pointer_to_ndc((0.0, 0.0), size), (-1.0, 1.0));
        assert_eq!(pointer_to_ndc((800.0, 600.0), size), (1.0, -1.0));
        assert_eq!(pointer_to_ndc((400.0, 300.0), size), (0.0, 0.0));
    }
}
