/// Decode the backslash escapes string literals keep raw until output time.
/// Unknown escapes are left as written.
pub(crate) fn unescape(text: &str) -> String {
	let mut decoded = String::with_capacity(text.len());
	let mut chars = text.chars();
	while let Some(c) = chars.next() {
		if c != '\\' {
			decoded.push(c);
			continue;
		}
		match chars.next() {
			Some('n') => decoded.push('\n'),
			Some('t') => decoded.push('\t'),
			Some('r') => decoded.push('\r'),
			Some('0') => decoded.push('\0'),
			Some(c @ ('\\' | '"' | '\'')) => decoded.push(c),
			Some(other) => {
				decoded.push('\\');
				decoded.push(other);
			}
			None => decoded.push('\\'),
		}
	}
	decoded
}
