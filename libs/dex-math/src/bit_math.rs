//! Tick decomposition for the three-tier bitmap index.
//!
//! A 24-bit tick splits into a lobby byte (high, signed), a mezzanine byte and
//! a terminal byte. The lobby byte is biased by +128 so that unsigned bit order
//! in the lobby word matches signed tick order.

/// Storage key of the mezzanine word holding `tick`
pub fn lobby_key(tick: i32) -> i32 {
    tick >> 16
}

/// Storage key of the terminal word holding `tick`
pub fn mezz_key(tick: i32) -> i32 {
    tick >> 8
}

/// Bit of `tick`'s lobby key inside the global lobby word
pub fn lobby_bit(tick: i32) -> u8 {
    (lobby_key(tick) + 128) as u8
}

/// Bit of `tick`'s mezzanine key inside its mezzanine word
pub fn mezz_bit(tick: i32) -> u8 {
    (mezz_key(tick) & 0xFF) as u8
}

/// Bit of `tick` inside its terminal word
pub fn term_bit(tick: i32) -> u8 {
    (tick & 0xFF) as u8
}

/// Lobby key encoded by a lobby word bit
pub fn lobby_key_from_bit(bit: u8) -> i32 {
    bit as i32 - 128
}

/// Mezzanine key from a lobby key and a mezzanine word bit
pub fn weld_lobby(lobby: i32, mezz_bit: u8) -> i32 {
    (lobby << 8) | mezz_bit as i32
}

/// Tick from a mezzanine key and a terminal word bit
pub fn weld_mezz(mezz: i32, term_bit: u8) -> i32 {
    (mezz << 8) | term_bit as i32
}
