//! `printf`-style substitution for print statements.
//!
//! Supported conversions: `%d %i %u %x %X %c %f %s %%`, with optional `-`/`0`
//! flags, a width and a `.precision`. Placeholders without a matching
//! argument are emitted as written, arguments without a placeholder are
//! appended in order.

use std::{iter::Peekable, str::Chars};

use super::value::Value;

/// Widths and precisions are capped here.
const MAX_FIELD: usize = 4096;

#[derive(Debug, Default)]
struct Spec {
	left:      bool,
	zero:      bool,
	width:     usize,
	precision: Option<usize>,
}

pub(crate) fn format(template: &str, arguments: &[Value]) -> String {
	let mut output = String::with_capacity(template.len());
	let mut arguments = arguments.iter();
	let mut chars = template.chars().peekable();

	while let Some(c) = chars.next() {
		if c != '%' {
			output.push(c);
			continue;
		}

		let mut raw = String::from('%');
		let spec = parse_spec(&mut chars, &mut raw);
		let Some(conversion) = chars.next() else {
			output.push_str(&raw);
			break;
		};
		raw.push(conversion);

		match conversion {
			'%' => output.push('%'),
			'd' | 'i' | 'u' | 'x' | 'X' | 'c' | 'f' | 's' => match arguments.next() {
				Some(argument) => output.push_str(&pad(&spec, convert(conversion, &spec, argument))),
				None => output.push_str(&raw),
			},
			_ => output.push_str(&raw),
		}
	}

	for argument in arguments {
		output.push_str(&argument.to_string());
	}
	output
}

fn parse_spec(chars: &mut Peekable<Chars<'_>>, raw: &mut String) -> Spec {
	let mut spec = Spec::default();
	while let Some(&flag @ ('-' | '0')) = chars.peek() {
		if flag == '-' {
			spec.left = true;
		} else {
			spec.zero = true;
		}
		raw.push(flag);
		chars.next();
	}
	spec.width = digits(chars, raw).unwrap_or(0);
	if chars.peek() == Some(&'.') {
		raw.push('.');
		chars.next();
		spec.precision = Some(digits(chars, raw).unwrap_or(0));
	}
	spec
}

fn digits(chars: &mut Peekable<Chars<'_>>, raw: &mut String) -> Option<usize> {
	let mut number: Option<usize> = None;
	while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
		raw.push(chars.next().unwrap_or_default());
		number = Some(number.unwrap_or(0).saturating_mul(10).saturating_add(digit as usize));
	}
	number.map(|n| n.min(MAX_FIELD))
}

fn convert(conversion: char, spec: &Spec, argument: &Value) -> String {
	// Strings substitute as-is whatever the conversion.
	if let Value::Str(s) = argument {
		return s.clone();
	}
	let (Some(int), Some(float)) = (argument.as_int(), argument.as_float()) else { return argument.to_string() };
	match conversion {
		'd' | 'i' => int.to_string(),
		'u' => (int as u64).to_string(),
		'x' => format!("{int:x}"),
		'X' => format!("{int:X}"),
		'c' => char::from_u32(int as u32).map(String::from).unwrap_or_default(),
		'f' => format!("{float:.*}", spec.precision.unwrap_or(6)),
		_ => argument.to_string(),
	}
}

fn pad(spec: &Spec, text: String) -> String {
	let len = text.chars().count();
	if len >= spec.width {
		return text;
	}
	let fill = spec.width - len;
	if spec.left {
		format!("{text}{}", " ".repeat(fill))
	} else if spec.zero {
		match text.strip_prefix('-') {
			Some(digits) => format!("-{}{digits}", "0".repeat(fill)),
			None => format!("{}{text}", "0".repeat(fill)),
		}
	} else {
		format!("{}{text}", " ".repeat(fill))
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::interpreter::value::Value::*;

	#[test]
	fn substitutes_in_order() {
		assert_eq!(format("%d + %d = %d", &[Int(1), Int(2), Int(3)]), "1 + 2 = 3");
		assert_eq!(format("%s!", &[Str("hi".into())]), "hi!");
		assert_eq!(format("%d", &[Str("as is".into())]), "as is");
		assert_eq!(format("100%%", &[]), "100%");
	}

	#[test]
	fn conversions() {
		assert_eq!(format("%x %X", &[Int(255), Int(255)]), "ff FF");
		assert_eq!(format("%u", &[Int(-1)]), "18446744073709551615");
		assert_eq!(format("%c%c", &[Int(72), Int(105)]), "Hi");
		assert_eq!(format("%f", &[Float(1.5)]), "1.500000");
		assert_eq!(format("%.2f", &[Int(2)]), "2.00");
		assert_eq!(format("%d", &[Float(2.9)]), "2");
	}

	#[test]
	fn width_and_flags() {
		assert_eq!(format("[%5d]", &[Int(42)]), "[   42]");
		assert_eq!(format("[%-5d]", &[Int(42)]), "[42   ]");
		assert_eq!(format("[%05d]", &[Int(-42)]), "[-0042]");
		assert_eq!(format("[%2d]", &[Int(12345)]), "[12345]");
	}

	#[test]
	fn oversized_fields_are_capped() {
		assert_eq!(format("%99999999999999999999d", &[Int(1)]).len(), MAX_FIELD);
		assert_eq!(format("%-99999999999999999999s|", &[Str("x".into())]).len(), MAX_FIELD + 1);
		assert_eq!(format("%.99999999999999999999f", &[Float(0.5)]).len(), MAX_FIELD + 2);
	}

	#[test]
	fn unmatched_placeholders_and_extra_arguments() {
		assert_eq!(format("%d and %d", &[Int(1)]), "1 and %d");
		assert_eq!(format("l", &[Str("y".into())]), "ly");
		assert_eq!(format("%q %", &[Int(1)]), "%q %1");
	}
}
