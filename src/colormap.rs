//! Fixed single-channel encoding: a scalar lands, truncated, in the third
//! channel; the first two channels are always zero.

/// How channel values outside `0..=255` are brought into range.
///
/// The upstream visualizer relied on an incidental uint8 cast, which wraps;
/// here the behavior is an explicit parameter.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Saturate `trunc(x)` into `0..=255`.
    #[default]
    Clamp,
    /// Truncate toward zero, then wrap mod 256 (a numpy `astype(uint8)` cast).
    Wrap,
}

fn channel_value(x: f64, policy: OverflowPolicy) -> u8 {
    let t = x.trunc();
    match policy {
        OverflowPolicy::Clamp => t.clamp(0.0, 255.0) as u8,
        OverflowPolicy::Wrap => (t as i64) as u8,
    }
}

/// Map one scalar to an RGB8 pixel.
///
/// Exactly zero maps to pure black in all channels; any other value is placed,
/// truncated per `policy`, into the third channel.
pub fn map_scalar(x: f64, policy: OverflowPolicy) -> [u8; 3] {
    if x == 0.0 {
        return [0, 0, 0];
    }
    [0, 0, channel_value(x, policy)]
}

/// Map a row of scalars to flat channel-interleaved bytes (3 per scalar).
pub fn map_row(row: &[f64], policy: OverflowPolicy) -> Vec<u8> {
    let mut out = Vec::with_capacity(row.len() * 3);
    for &x in row {
        out.extend_from_slice(&map_scalar(x, policy));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_pure_black_under_both_policies() {
        assert_eq!(map_scalar(0.0, OverflowPolicy::Clamp), [0, 0, 0]);
        assert_eq!(map_scalar(0.0, OverflowPolicy::Wrap), [0, 0, 0]);
        assert_eq!(map_scalar(-0.0, OverflowPolicy::Clamp), [0, 0, 0]);
    }

    #[test]
    fn in_range_values_truncate_into_the_third_channel() {
        for x in [1.0, 10.9, 128.2, 255.0] {
            let px = map_scalar(x, OverflowPolicy::Clamp);
            assert_eq!(px, [0, 0, x.trunc() as u8]);
            assert_eq!(px, map_scalar(x, OverflowPolicy::Wrap));
        }
    }

    #[test]
    fn clamp_saturates_out_of_range_values() {
        assert_eq!(map_scalar(256.7, OverflowPolicy::Clamp), [0, 0, 255]);
        assert_eq!(map_scalar(-1.2, OverflowPolicy::Clamp), [0, 0, 0]);
        assert_eq!(map_scalar(1e12, OverflowPolicy::Clamp), [0, 0, 255]);
    }

    #[test]
    fn wrap_reproduces_the_uint8_cast() {
        assert_eq!(map_scalar(256.7, OverflowPolicy::Wrap), [0, 0, 0]);
        assert_eq!(map_scalar(257.0, OverflowPolicy::Wrap), [0, 0, 1]);
        assert_eq!(map_scalar(-1.2, OverflowPolicy::Wrap), [0, 0, 255]);
    }

    #[test]
    fn map_row_preserves_length_and_order() {
        let row = [0.0, 255.0, 10.0];
        let bytes = map_row(&row, OverflowPolicy::Clamp);
        assert_eq!(bytes, vec![0, 0, 0, 0, 0, 255, 0, 0, 10]);
    }
}
