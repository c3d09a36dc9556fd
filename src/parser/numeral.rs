//! Numeral Conversion
//!
//! Roman numerals (chapters, sections, incisos) and letters (alíneas).

/// Decode a Roman numeral using subtractive pairs
///
/// Returns `None` for empty input or characters outside `IVXLCDM`.
/// Non-canonical forms such as `IIII` still decode (to 4).
pub fn roman_to_int(numeral: &str) -> Option<u32> {
    if numeral.is_empty() {
        return None;
    }

    let mut total = 0u32;
    let mut previous = 0u32;
    for ch in numeral.chars().rev() {
        let value = match ch {
            'I' => 1,
            'V' => 5,
            'X' => 10,
            'L' => 50,
            'C' => 100,
            'D' => 500,
            'M' => 1000,
            _ => return None,
        };
        if value < previous {
            total = total.checked_sub(value)?;
        } else {
            total = total.checked_add(value)?;
            previous = value;
        }
    }
    Some(total)
}

/// Canonical Roman form of `value` (empty for zero)
pub fn int_to_roman(mut value: u32) -> String {
    const TABLE: [(u32, &str); 13] = [
        (1000, "M"),
        (900, "CM"),
        (500, "D"),
        (400, "CD"),
        (100, "C"),
        (90, "XC"),
        (50, "L"),
        (40, "XL"),
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];

    let mut out = String::new();
    for (weight, glyphs) in TABLE {
        while value >= weight {
            out.push_str(glyphs);
            value -= weight;
        }
    }
    out
}

/// Position of an alínea letter in the alphabet (`a` = 1)
pub fn letter_to_ordinal(letter: char) -> Option<u32> {
    letter
        .is_ascii_lowercase()
        .then(|| letter as u32 - 'a' as u32 + 1)
}

/// Alínea letter for a 1-based position
pub fn ordinal_to_letter(ordinal: u32) -> Option<char> {
    (1..=26)
        .contains(&ordinal)
        .then(|| char::from(b'a' + (ordinal - 1) as u8))
}
