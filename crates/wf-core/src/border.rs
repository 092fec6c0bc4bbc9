#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderMode {
    Clamp,
    /// Circular extension: index `len` wraps to `0`, `-1` to `len - 1`.
    Periodic,
}

/// Maps a possibly out-of-range index into `0..len`; `None` only when
/// `len == 0`.
pub fn map_index(i: isize, len: usize, mode: &BorderMode) -> Option<usize> {
    if len == 0 {
        return None;
    }

    match mode {
        BorderMode::Clamp => {
            if i < 0 {
                Some(0)
            } else {
                Some((i as usize).min(len - 1))
            }
        }
        BorderMode::Periodic => Some(i.rem_euclid(len as isize) as usize),
    }
}

#[cfg(test)]
mod tests {
    use super::{BorderMode, map_index};

    #[test]
    fn clamp_mapping_handles_negative_and_overflow() {
        let mode = BorderMode::Clamp;

        assert_eq!(map_index(-3, 5, &mode), Some(0));
        assert_eq!(map_index(-1, 5, &mode), Some(0));
        assert_eq!(map_index(0, 5, &mode), Some(0));
        assert_eq!(map_index(4, 5, &mode), Some(4));
        assert_eq!(map_index(5, 5, &mode), Some(4));
        assert_eq!(map_index(99, 5, &mode), Some(4));
    }

    #[test]
    fn periodic_wraps_in_both_directions() {
        let mode = BorderMode::Periodic;

        for i in -8..=8 {
            assert_eq!(map_index(i, 1, &mode), Some(0));
        }

        let cases_len4 = [
            (-9, 3),
            (-5, 3),
            (-4, 0),
            (-1, 3),
            (0, 0),
            (3, 3),
            (4, 0),
            (5, 1),
            (13, 1),
        ];
        for (i, expected) in cases_len4 {
            assert_eq!(map_index(i, 4, &mode), Some(expected));
        }
    }

    #[test]
    fn empty_length_never_maps() {
        assert_eq!(map_index(0, 0, &BorderMode::Clamp), None);
        assert_eq!(map_index(0, 0, &BorderMode::Periodic), None);
    }
}
