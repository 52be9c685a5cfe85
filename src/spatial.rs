/// Pixel-space top-left corner of the tile at flat `index` in a grid
/// `map_width` tiles wide.
///
/// # Panics
///
/// Panics if `map_width` is 0.
#[inline]
pub fn tile_position(index: u32, map_width: u32, tile_width: u32, tile_height: u32) -> (u32, u32) {
    let x = (index % map_width) * tile_width;
    let y = (index / map_width) * tile_height;
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tile_is_origin() {
        assert_eq!(tile_position(0, 5, 16, 16), (0, 0));
    }

    #[test]
    fn wraps_to_next_row() {
        assert_eq!(tile_position(4, 5, 16, 16), (64, 0));
        assert_eq!(tile_position(5, 5, 16, 16), (0, 16));
        assert_eq!(tile_position(29, 5, 16, 8), (64, 40));
    }

    #[test]
    #[should_panic]
    fn zero_width_panics() {
        tile_position(3, 0, 16, 16);
    }
}
