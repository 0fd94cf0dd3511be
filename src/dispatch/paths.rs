//! Synthetic request-path generation.
//!
//! Every run draws a pool of exactly three URI-safe tokens, then builds
//! paths shaped `/api/<seg>(/<seg>)*/` with 1-6 segments drawn from that
//! pool with replacement. Pure functions of the supplied RNG.

use rand::seq::SliceRandom;
use rand::Rng;

const SAFE_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const INTERIOR_CHARS: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789-_.";

const MIN_TOKEN_LEN: usize = 3;
const MAX_TOKEN_LEN: usize = 12;
const MIN_SEGMENTS: usize = 1;
const MAX_SEGMENTS: usize = 6;

/// Generate one URI path segment of the given length.
///
/// First and last characters are alphanumeric so segments never start or
/// end with punctuation; interior characters may also use `-`, `_` and `.`.
pub fn generate_segment<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    let pick = |rng: &mut R, alphabet: &[u8]| alphabet[rng.gen_range(0..alphabet.len())] as char;

    match length {
        0 => String::new(),
        1 => pick(rng, SAFE_CHARS).to_string(),
        _ => {
            let mut segment = String::with_capacity(length);
            segment.push(pick(rng, SAFE_CHARS));
            for _ in 0..length - 2 {
                segment.push(pick(rng, INTERIOR_CHARS));
            }
            segment.push(pick(rng, SAFE_CHARS));
            segment
        }
    }
}

/// Draw the three tokens backing one run's generated paths.
pub fn generate_token_pool<R: Rng + ?Sized>(rng: &mut R) -> [String; 3] {
    std::array::from_fn(|_| {
        let length = rng.gen_range(MIN_TOKEN_LEN..=MAX_TOKEN_LEN);
        generate_segment(rng, length)
    })
}

/// Build one request path from the run's token pool.
pub fn generate_path<R: Rng + ?Sized>(rng: &mut R, pool: &[String; 3]) -> String {
    let num_segments = rng.gen_range(MIN_SEGMENTS..=MAX_SEGMENTS);
    let segments: Vec<&str> = (0..num_segments)
        .map(|_| {
            pool.choose(rng)
                .expect("token pool is non-empty")
                .as_str()
        })
        .collect();

    format!("/api/{}/", segments.join("/"))
}
