//! One-hot block encoding

/// Concatenate one one-hot block of `width` per value.
///
/// Callers validate `value < width`; an out-of-range value leaves its
/// block all-zero.
#[must_use]
pub fn encode_one_hot(values: &[u32], width: u32) -> Vec<f32> {
    let width = width as usize;
    let mut encoded = vec![0.0; values.len() * width];
    for (block, &value) in values.iter().enumerate() {
        let value = value as usize;
        if value < width {
            encoded[block * width + value] = 1.0;
        }
    }
    encoded
}

/// Recover the values from concatenated one-hot blocks of `width`.
///
/// Returns `None` unless the vector splits into whole blocks that each
/// hold exactly one `1.0` and zeros elsewhere.
#[must_use]
pub fn decode_one_hot(encoded: &[f32], width: u32) -> Option<Vec<u32>> {
    let width = width as usize;
    if width == 0 || encoded.len() % width != 0 {
        return None;
    }

    encoded
        .chunks(width)
        .map(|block| {
            let mut hot = None;
            for (index, &x) in block.iter().enumerate() {
                if x == 1.0 {
                    if hot.is_some() {
                        return None;
                    }
                    hot = Some(index);
                } else if x != 0.0 {
                    return None;
                }
            }
            hot.and_then(|index| u32::try_from(index).ok())
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_two_blocks() {
        let encoded = encode_one_hot(&[2, 0], 3);
        assert_eq!(encoded, vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_decode_recovers_values() {
        let encoded = encode_one_hot(&[4, 1, 0], 5);
        assert_eq!(decode_one_hot(&encoded, 5), Some(vec![4, 1, 0]));
    }

    #[test]
    fn test_decode_rejects_partial_block() {
        assert_eq!(decode_one_hot(&[0.0, 1.0, 0.0], 2), None);
    }

    #[test]
    fn test_decode_rejects_cold_block() {
        assert_eq!(decode_one_hot(&[0.0, 1.0, 0.0, 0.0], 2), None);
    }

    #[test]
    fn test_decode_rejects_double_hot() {
        assert_eq!(decode_one_hot(&[1.0, 1.0], 2), None);
    }

    #[test]
    fn test_decode_rejects_soft_values() {
        assert_eq!(decode_one_hot(&[0.5, 0.5], 2), None);
    }

    #[test]
    fn test_zero_width() {
        assert_eq!(decode_one_hot(&[], 0), None);
        assert!(encode_one_hot(&[], 0).is_empty());
    }
}
