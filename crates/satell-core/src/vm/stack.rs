//! Stack index resolution

/// Resolve a frame-relative index to an absolute stack slot.
///
/// Positive indices count from the frame base (`1` is the first argument),
/// negative ones from the top (`-1` is the last pushed value). Index `0` and
/// anything outside `base..top` resolve to `None`.
pub fn absolute_index(base: usize, top: usize, idx: i32) -> Option<usize> {
    if idx > 0 {
        let slot = base + (idx as usize - 1);
        (slot < top).then_some(slot)
    } else if idx < 0 {
        let back = idx.unsigned_abs() as usize;
        (back <= top - base).then(|| top - back)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_index_from_base() {
        assert_eq!(absolute_index(3, 6, 1), Some(3));
        assert_eq!(absolute_index(3, 6, 3), Some(5));
        assert_eq!(absolute_index(3, 6, 4), None);
    }

    #[test]
    fn test_negative_index_from_top() {
        assert_eq!(absolute_index(3, 6, -1), Some(5));
        assert_eq!(absolute_index(3, 6, -3), Some(3));
        // Cannot reach below the current frame
        assert_eq!(absolute_index(3, 6, -4), None);
    }

    #[test]
    fn test_zero_index_is_invalid() {
        assert_eq!(absolute_index(0, 2, 0), None);
    }

    #[test]
    fn test_empty_frame() {
        assert_eq!(absolute_index(2, 2, 1), None);
        assert_eq!(absolute_index(2, 2, -1), None);
    }
}
