//! Anchor instruction and account framing.

use borsh::BorshDeserialize;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Discriminator length prefixed to instructions and accounts.
pub const DISCRIMINATOR_LEN: usize = 8;

fn hashed_prefix(preimage: &str) -> [u8; DISCRIMINATOR_LEN] {
    let digest = Sha256::digest(preimage.as_bytes());
    let mut out = [0u8; DISCRIMINATOR_LEN];
    out.copy_from_slice(&digest[..DISCRIMINATOR_LEN]);
    out
}

/// Instruction discriminator for `snake_name`.
#[must_use]
pub fn instruction_discriminator(snake_name: &str) -> [u8; DISCRIMINATOR_LEN] {
    hashed_prefix(&format!("global:{snake_name}"))
}

/// Account discriminator for the account type `name`.
#[must_use]
pub fn account_discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    hashed_prefix(&format!("account:{name}"))
}

/// Instruction data: discriminator followed by borsh-encoded arguments.
pub(crate) fn instruction_data(snake_name: &str, args: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(DISCRIMINATOR_LEN + args.len());
    data.extend_from_slice(&instruction_discriminator(snake_name));
    data.extend_from_slice(args);
    data
}

/// Borsh-encode `value` into a byte vector.
pub(crate) fn encode<T: borsh::BorshSerialize>(value: &T) -> Result<Vec<u8>> {
    borsh::to_vec(value).map_err(|e| Error::Parse(e.to_string()))
}

/// Decode an Anchor account of type `name`, checking its discriminator.
///
/// Trailing bytes (account padding) are ignored.
pub(crate) fn decode_account<T: BorshDeserialize>(name: &str, data: &[u8]) -> Result<T> {
    if data.len() < DISCRIMINATOR_LEN {
        return Err(Error::Parse(format!("{name} account data too short")));
    }
    let (discriminator, mut body) = data.split_at(DISCRIMINATOR_LEN);
    if discriminator != account_discriminator(name) {
        return Err(Error::Parse(format!("account is not a {name}")));
    }
    T::deserialize(&mut body).map_err(|e| Error::Parse(format!("{name}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_instruction_discriminators() {
        assert_eq!(instruction_discriminator("buy"), [102, 6, 61, 18, 1, 218, 235, 234]);
        assert_eq!(instruction_discriminator("sell"), [51, 230, 133, 164, 1, 127, 131, 173]);
        assert_eq!(
            instruction_discriminator("swap_tokens"),
            [201, 226, 234, 16, 70, 155, 131, 206]
        );
        assert_eq!(
            instruction_discriminator("process_payment"),
            [189, 81, 30, 198, 139, 186, 115, 23]
        );
    }

    #[test]
    fn known_account_discriminators() {
        assert_eq!(
            account_discriminator("BondingCurve"),
            [23, 183, 248, 55, 96, 216, 172, 96]
        );
        assert_eq!(account_discriminator("Payroll"), [194, 86, 146, 159, 169, 29, 234, 51]);
    }

    #[test]
    fn decode_rejects_wrong_discriminator() {
        let data = [0u8; 16];
        let result: Result<u64> = decode_account("BondingCurve", &data);
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn decode_reads_body_after_discriminator() {
        let mut data = account_discriminator("Counter").to_vec();
        data.extend_from_slice(&42u64.to_le_bytes());
        data.extend_from_slice(&[0u8; 4]);
        let value: u64 = decode_account("Counter", &data).unwrap();
        assert_eq!(value, 42);
    }
}
