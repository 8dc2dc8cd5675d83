/// Title-case a Unicode character name for the trailing `//` comments.
///
/// The first letter of each word is upper-cased and the rest lower-cased.
/// Any non-letter (space, hyphen, digit) ends a word.
///
/// # Example
/// ```
/// use ct_core::names::title_case;
/// assert_eq!(title_case("LATIN CAPITAL LETTER A WITH GRAVE"), "Latin Capital Letter A With Grave");
/// assert_eq!(title_case("HYPHEN-MINUS"), "Hyphen-Minus");
/// ```
#[must_use]
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_word = false;

    for ch in name.chars() {
        if ch.is_alphabetic() {
            if in_word {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(ch);
            in_word = false;
        }
    }

    out
}
