use crate::error::ChainError;
use model::core::token_id::TokenId;

/// `keccak256("Transfer(address,address,uint256)")`
pub const TRANSFER_TOPIC: &str =
    "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

/// The zero address left-padded to a 32-byte topic.
pub const ZERO_ADDRESS_TOPIC: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000000";

/// Selector of `name()`.
pub const NAME_SELECTOR: &str = "0x06fdde03";

const WORD: usize = 32;

/// Decodes `0x`-prefixed hex call data into bytes.
pub fn decode_hex(data: &str) -> Result<Vec<u8>, ChainError> {
    let digits = data.strip_prefix("0x").unwrap_or(data);
    hex::decode(digits).map_err(|err| ChainError::MalformedResponse(format!("bad hex data: {err}")))
}

/// Token id carried in the fourth topic of an ERC-721 `Transfer` log.
pub fn token_id_from_topics(topics: &[String]) -> Result<TokenId, ChainError> {
    let topic = topics.get(3).ok_or_else(|| {
        ChainError::MalformedResponse(format!(
            "transfer log has {} topics, expected an indexed token id",
            topics.len()
        ))
    })?;
    TokenId::from_hex(topic)
        .map_err(|err| ChainError::MalformedResponse(format!("bad token id topic {topic}: {err}")))
}

/// Decodes the return data of a `string` view.
///
/// Some early contracts return `bytes32` instead; a single word is
/// read as a NUL-padded string.
pub fn decode_string(data: &[u8]) -> Result<String, ChainError> {
    if data.is_empty() {
        return Err(ChainError::EmptyReturnData);
    }

    let bytes = if data.len() == WORD {
        let end = data.iter().position(|b| *b == 0).unwrap_or(WORD);
        &data[..end]
    } else {
        let offset = read_word(data, 0)?;
        let len = read_word(data, offset)?;
        let start = offset + WORD;
        let end = start
            .checked_add(len)
            .filter(|end| *end <= data.len())
            .ok_or_else(|| malformed_string("string length runs past return data"))?;
        &data[start..end]
    };

    String::from_utf8(bytes.to_vec()).map_err(|_| malformed_string("string is not valid UTF-8"))
}

/// Reads the word at byte `at` as a length/offset.
fn read_word(data: &[u8], at: usize) -> Result<usize, ChainError> {
    let word = at
        .checked_add(WORD)
        .and_then(|end| data.get(at..end))
        .ok_or_else(|| malformed_string("return data truncated"))?;

    if word[..WORD - 8].iter().any(|b| *b != 0) {
        return Err(malformed_string("offset or length out of range"));
    }

    let mut low = [0u8; 8];
    low.copy_from_slice(&word[WORD - 8..]);
    usize::try_from(u64::from_be_bytes(low))
        .map_err(|_| malformed_string("offset or length out of range"))
}

fn malformed_string(reason: &str) -> ChainError {
    ChainError::MalformedResponse(format!("cannot decode name(): {reason}"))
}
