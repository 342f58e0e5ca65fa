//! Utilities shared across the payment router and other crates.

pub mod consts;
pub mod errors;
pub mod ext_traits;
pub mod request;
pub mod types;

use nanoid::nanoid;

/// Characters used for generating identifiers: URL-safe, unambiguous.
pub(crate) const ID_ALPHABET: [char; 62] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i',
    'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', 'A', 'B',
    'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U',
    'V', 'W', 'X', 'Y', 'Z',
];

/// Generate a nanoid-based identifier of the given length with the given
/// prefix, e.g. `ik_F9gQ...`.
pub fn generate_id(length: usize, prefix: &str) -> String {
    format!("{}_{}", prefix, nanoid!(length, &ID_ALPHABET))
}

/// Generate an identifier with the default length.
pub fn generate_id_with_default_len(prefix: &str) -> String {
    generate_id(consts::ID_LENGTH, prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_carry_prefix_and_length() {
        let id = generate_id_with_default_len("ik");
        assert!(id.starts_with("ik_"));
        assert_eq!(id.len(), "ik_".len() + consts::ID_LENGTH);
    }
}
