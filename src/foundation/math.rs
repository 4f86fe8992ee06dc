const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01B3;
const SPLITMIX_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// FNV-1a over the little-endian bytes of `words`.
fn fold_words(words: &[u64]) -> u64 {
    words
        .iter()
        .flat_map(|w| w.to_le_bytes())
        .fold(FNV_OFFSET_BASIS, |h, b| {
            (h ^ u64::from(b)).wrapping_mul(FNV_PRIME)
        })
}

/// One SplitMix64 step from `state`.
fn splitmix64(state: u64) -> u64 {
    let mut z = state.wrapping_add(SPLITMIX_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Deterministic draw in `[0, 1)` for a `random(lo, hi)` evaluation.
///
/// The context seed and the bit patterns of both bounds are folded into one
/// SplitMix64 state, so equal inputs always yield the same draw and nothing else
/// about the context is consulted. The top 53 bits become the mantissa.
pub(crate) fn random_unit(seed: u64, lo: f64, hi: f64) -> f64 {
    let state = fold_words(&[seed, lo.to_bits(), hi.to_bits()]);
    let bits = splitmix64(state) >> 11;
    (bits as f64) * (1.0 / ((1u64 << 53) as f64))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
