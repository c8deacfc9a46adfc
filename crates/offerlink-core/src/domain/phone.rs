/// Canonicalizes a US phone number to `(AAA) BBB-CCCC`.
///
/// Every character other than an ASCII digit is dropped (fullwidth and other
/// Unicode digits included), and a leading `1` country code is removed from
/// 11-digit values. Anything that does not reduce to exactly ten digits is
/// returned unchanged.
pub fn normalize_phone(value: &str) -> String {
    let mut digits: String = value.chars().filter(|ch| ch.is_ascii_digit()).collect();

    if digits.len() == 11 && digits.starts_with('1') {
        digits.remove(0);
    }

    if digits.len() != 10 {
        return value.to_string();
    }

    format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..])
}
