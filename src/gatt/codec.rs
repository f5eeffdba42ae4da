/// Textual wire encoding for attribute values
///
/// Every value crosses the air as plain text, one byte per character:
/// flags are "0"/"1", units are "C"/"F", temperatures are "<value> <unit>".
/// Decoding never fails; deciding whether a value makes sense is up to the
/// write handler that receives it.
use crate::models::TemperatureUnit;

/// Byte written in place of characters that do not fit in 7 bits.
const SUBSTITUTE: u8 = b'?';

/// Encode text as one byte per character.
pub fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if c.is_ascii() { c as u8 } else { SUBSTITUTE })
        .collect()
}

/// Decode any byte sequence into text, one character per byte.
pub fn decode_text(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// First character of a written value, uppercased. `None` for an empty write.
pub fn first_token(bytes: &[u8]) -> Option<char> {
    bytes.first().map(|&b| (b as char).to_ascii_uppercase())
}

pub fn encode_flag(flag: bool) -> Vec<u8> {
    encode_text(if flag { "1" } else { "0" })
}

pub fn encode_unit(unit: TemperatureUnit) -> Vec<u8> {
    vec![unit.letter() as u8]
}

/// Format a Celsius reading for display in `unit`, e.g. `"74.3 F"`.
pub fn format_temperature(celsius: f64, unit: TemperatureUnit) -> String {
    format!("{:.1} {}", unit.convert(celsius), unit.letter())
}

pub fn encode_temperature(celsius: f64, unit: TemperatureUnit) -> Vec<u8> {
    encode_text(&format_temperature(celsius, unit))
}
