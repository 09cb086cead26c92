use phf::phf_map;

/// Characters above U+007F that Windows-1250 can represent, mapped to their byte.
static WINDOWS_1250_HIGH: phf::Map<char, u8> = phf_map! {
    '\u{20AC}' => 0x80, '\u{201A}' => 0x82, '\u{201E}' => 0x84, '\u{2026}' => 0x85, '\u{2020}' => 0x86,
    '\u{2021}' => 0x87, '\u{2030}' => 0x89, '\u{0160}' => 0x8A, '\u{2039}' => 0x8B, '\u{015A}' => 0x8C,
    '\u{0164}' => 0x8D, '\u{017D}' => 0x8E, '\u{0179}' => 0x8F, '\u{2018}' => 0x91, '\u{2019}' => 0x92,
    '\u{201C}' => 0x93, '\u{201D}' => 0x94, '\u{2022}' => 0x95, '\u{2013}' => 0x96, '\u{2014}' => 0x97,
    '\u{2122}' => 0x99, '\u{0161}' => 0x9A, '\u{203A}' => 0x9B, '\u{015B}' => 0x9C, '\u{0165}' => 0x9D,
    '\u{017E}' => 0x9E, '\u{017A}' => 0x9F, '\u{00A0}' => 0xA0, '\u{02C7}' => 0xA1, '\u{02D8}' => 0xA2,
    '\u{0141}' => 0xA3, '\u{00A4}' => 0xA4, '\u{0104}' => 0xA5, '\u{00A6}' => 0xA6, '\u{00A7}' => 0xA7,
    '\u{00A8}' => 0xA8, '\u{00A9}' => 0xA9, '\u{015E}' => 0xAA, '\u{00AB}' => 0xAB, '\u{00AC}' => 0xAC,
    '\u{00AD}' => 0xAD, '\u{00AE}' => 0xAE, '\u{017B}' => 0xAF, '\u{00B0}' => 0xB0, '\u{00B1}' => 0xB1,
    '\u{02DB}' => 0xB2, '\u{0142}' => 0xB3, '\u{00B4}' => 0xB4, '\u{00B5}' => 0xB5, '\u{00B6}' => 0xB6,
    '\u{00B7}' => 0xB7, '\u{00B8}' => 0xB8, '\u{0105}' => 0xB9, '\u{015F}' => 0xBA, '\u{00BB}' => 0xBB,
    '\u{013D}' => 0xBC, '\u{02DD}' => 0xBD, '\u{013E}' => 0xBE, '\u{017C}' => 0xBF, '\u{0154}' => 0xC0,
    '\u{00C1}' => 0xC1, '\u{00C2}' => 0xC2, '\u{0102}' => 0xC3, '\u{00C4}' => 0xC4, '\u{0139}' => 0xC5,
    '\u{0106}' => 0xC6, '\u{00C7}' => 0xC7, '\u{010C}' => 0xC8, '\u{00C9}' => 0xC9, '\u{0118}' => 0xCA,
    '\u{00CB}' => 0xCB, '\u{011A}' => 0xCC, '\u{00CD}' => 0xCD, '\u{00CE}' => 0xCE, '\u{010E}' => 0xCF,
    '\u{0110}' => 0xD0, '\u{0143}' => 0xD1, '\u{0147}' => 0xD2, '\u{00D3}' => 0xD3, '\u{00D4}' => 0xD4,
    '\u{0150}' => 0xD5, '\u{00D6}' => 0xD6, '\u{00D7}' => 0xD7, '\u{0158}' => 0xD8, '\u{016E}' => 0xD9,
    '\u{00DA}' => 0xDA, '\u{0170}' => 0xDB, '\u{00DC}' => 0xDC, '\u{00DD}' => 0xDD, '\u{0162}' => 0xDE,
    '\u{00DF}' => 0xDF, '\u{0155}' => 0xE0, '\u{00E1}' => 0xE1, '\u{00E2}' => 0xE2, '\u{0103}' => 0xE3,
    '\u{00E4}' => 0xE4, '\u{013A}' => 0xE5, '\u{0107}' => 0xE6, '\u{00E7}' => 0xE7, '\u{010D}' => 0xE8,
    '\u{00E9}' => 0xE9, '\u{0119}' => 0xEA, '\u{00EB}' => 0xEB, '\u{011B}' => 0xEC, '\u{00ED}' => 0xED,
    '\u{00EE}' => 0xEE, '\u{010F}' => 0xEF, '\u{0111}' => 0xF0, '\u{0144}' => 0xF1, '\u{0148}' => 0xF2,
    '\u{00F3}' => 0xF3, '\u{00F4}' => 0xF4, '\u{0151}' => 0xF5, '\u{00F6}' => 0xF6, '\u{00F7}' => 0xF7,
    '\u{0159}' => 0xF8, '\u{016F}' => 0xF9, '\u{00FA}' => 0xFA, '\u{0171}' => 0xFB, '\u{00FC}' => 0xFC,
    '\u{00FD}' => 0xFD, '\u{0163}' => 0xFE, '\u{02D9}' => 0xFF,
};

const CHECKSUM_MODULUS: u64 = 714025;
const CHECKSUM_MULTIPLIER: u64 = 1366;
const CHECKSUM_INCREMENT: u64 = 150889;

/// Code page the text is encoded to before its bytes are summed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChecksumEncoding {
    /// Windows-1250, the code page SHELX files are conventionally written in.
    #[default]
    Windows1250,
    /// Plain 7-bit ASCII.
    Ascii,
}

impl ChecksumEncoding {
    /// Encodes `text`, silently dropping characters the code page cannot represent.
    pub fn encode(self, text: &str) -> Vec<u8> {
        text.chars()
            .filter_map(|c| match (self, c) {
                (_, c) if c.is_ascii() => Some(c as u8),
                (ChecksumEncoding::Windows1250, c) => WINDOWS_1250_HIGH.get(&c).copied(),
                (ChecksumEncoding::Ascii, _) => None,
            })
            .collect()
    }
}

/// SHELX checksum of embedded report text, using Windows-1250.
pub fn shelx_checksum(text: &str) -> u32 {
    shelx_checksum_with(text, ChecksumEncoding::Windows1250)
}

/// SHELX checksum of `text` encoded with `encoding`.
pub fn shelx_checksum_with(text: &str, encoding: ChecksumEncoding) -> u32 {
    shelx_checksum_bytes(&encoding.encode(text))
}

/// SHELX checksum of bytes that are already in the target code page.
///
/// Bytes above 32 (everything but control characters and space) are summed, reduced
/// modulo 714025, passed through `x * 1366 + 150889 (mod 714025)` and finally reduced
/// modulo 100000.
pub fn shelx_checksum_bytes(bytes: &[u8]) -> u32 {
    let sum: u64 = bytes
        .iter()
        .filter(|&&b| b > 32)
        .map(|&b| u64::from(b))
        .sum();
    let reduced = sum % CHECKSUM_MODULUS;
    let scrambled = (reduced * CHECKSUM_MULTIPLIER + CHECKSUM_INCREMENT) % CHECKSUM_MODULUS;
    (scrambled % 100_000) as u32
}
