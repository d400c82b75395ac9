use rand::Rng;

use super::{Gen, Sequence};
use crate::rng::GenRng;

/// Longest string produced by [`strings`] unless configured otherwise
pub const MAX_STRING_LEN: usize = 100;

// Printable ASCII without the space: '!' through '~'.
const PRINTABLE_START: u8 = 33;
const PRINTABLE_END: u8 = 127;

/// Random printable strings of random length
#[derive(Debug, Clone, Copy)]
pub struct Strings {
    max_len: usize,
}

pub fn strings() -> Strings {
    Strings {
        max_len: MAX_STRING_LEN,
    }
}

impl Strings {
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }
}

impl Gen for Strings {
    type Value = String;

    /// The empty string and the two ends of the printable range.
    fn constants(&self) -> Vec<String> {
        let mut constants = vec![String::new()];
        if self.max_len > 0 {
            constants.push(char::from(PRINTABLE_START).to_string());
            constants.push(char::from(PRINTABLE_END - 1).to_string());
        }
        constants
    }

    fn random_with(&self, mut rng: GenRng) -> Sequence<'_, String> {
        let max_len = self.max_len;
        Box::new(std::iter::repeat_with(move || {
            let len = rng.gen_range(0..=max_len);
            printable_string(&mut rng, len)
        }))
    }
}

/// A string of exactly `len` printable ASCII characters (code points 33..127).
pub fn printable_string<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len)
        .map(|_| char::from(rng.gen_range(PRINTABLE_START..PRINTABLE_END)))
        .collect()
}
