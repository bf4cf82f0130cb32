//! Content negotiation over `Accept` headers.
//!
//! Routes can register several response representations keyed by media type
//! (optionally with an embedded charset, eg `"text/plain;charset=ascii"`).
//! Negotiation picks the representation the client prefers, or none, in
//! which case the route does not match at all.

/// One media range from an `Accept` header, eg `application/xml;q=0.9`.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaRange {
	pub media_type: String,
	pub media_subtype: String,
	pub charset: Option<String>,
	pub quality: f32,
}

impl MediaRange {
	/// Parses a single media range.  Returns `None` for unparseable input,
	/// which negotiation skips over rather than failing the request.
	pub fn parse(value: &str) -> Option<Self> {
		let mut parts = value.split(';');
		let essence = parts.next()?.trim().to_ascii_lowercase();
		let (media_type, media_subtype) = essence.split_once('/')?;
		if media_type.is_empty() || media_subtype.is_empty() {
			return None;
		}

		let mut quality = 1.0_f32;
		let mut charset = None;
		for param in parts {
			let Some((key, value)) = param.split_once('=') else {
				continue;
			};
			match key.trim().to_ascii_lowercase().as_str() {
				"q" => quality = value.trim().parse().unwrap_or(0.0),
				"charset" => charset = Some(value.trim().trim_matches('"').to_ascii_lowercase()),
				_ => {}
			}
		}

		Some(MediaRange {
			media_type: media_type.to_string(),
			media_subtype: media_subtype.to_string(),
			charset,
			quality,
		})
	}

	/// 2 for an exact type/subtype, 1 for `type/*`, 0 for `*/*`.
	fn specificity(&self) -> u8 {
		match (self.media_type.as_str(), self.media_subtype.as_str()) {
			("*", _) => 0,
			(_, "*") => 1,
			_ => 2,
		}
	}

	fn accepts(&self, representation: &Representation) -> bool {
		if self.media_type != "*" && self.media_type != representation.media_type {
			return false;
		}
		if self.media_subtype != "*" && self.media_subtype != representation.media_subtype {
			return false;
		}
		match &self.charset {
			None => true,
			Some(wanted) => representation.effective_charset() == Some(wanted.as_str()),
		}
	}
}

/// A parsed `Accept` header: the client's media ranges in written order.
#[derive(Debug, Clone, Default)]
pub struct AcceptHeader {
	pub media_ranges: Vec<MediaRange>,
}

impl AcceptHeader {
	pub fn parse(value: &str) -> Self {
		AcceptHeader {
			media_ranges: value.split(',').filter_map(MediaRange::parse).collect(),
		}
	}
}

/// One registered response representation, parsed from its media-type key.
struct Representation<'a> {
	key: &'a str,
	media_type: String,
	media_subtype: String,
	charset: Option<String>,
}

impl<'a> Representation<'a> {
	fn parse(key: &'a str) -> Option<Self> {
		let range = MediaRange::parse(key)?;
		Some(Representation {
			key,
			media_type: range.media_type,
			media_subtype: range.media_subtype,
			charset: range.charset,
		})
	}

	/// The charset this representation is served in: the declared one, or
	/// UTF-8 for `text/*` and `application/json` when none is declared.
	fn effective_charset(&self) -> Option<&str> {
		if let Some(charset) = &self.charset {
			return Some(charset);
		}
		if self.media_type == "text" || (self.media_type == "application" && self.media_subtype == "json") {
			return Some("utf-8");
		}
		None
	}
}

/// Picks the representation key the client prefers.
///
/// Without an `Accept` header the first registered representation wins.
/// For each representation the most specific matching range governs, so
/// `text/plain;q=0.5` downgrades (or with `q=0` refuses) `text/plain`
/// even when `text/*` would allow it.  Representations then compete on
/// their governing quality; ties resolve by specificity, then earlier
/// `Accept`-list position, then earlier registration.  `None` means no
/// representation is acceptable and the route should be treated as not
/// matching.
///
/// # Examples
///
/// ```
/// use lambda_rest_router::negotiation::negotiate_media_type;
///
/// let negotiated = negotiate_media_type(
/// 	Some("text/html, application/xhtml+xml, application/xml;q=0.9, */*;q=0.8"),
/// 	["application/json", "application/xml"],
/// );
/// assert_eq!(negotiated, Some("application/xml"));
/// ```
pub fn negotiate_media_type<'a, I>(accept: Option<&str>, available: I) -> Option<&'a str>
where
	I: IntoIterator<Item = &'a str>,
{
	let representations: Vec<Representation<'a>> = available.into_iter().filter_map(Representation::parse).collect();

	let header = match accept {
		Some(value) => AcceptHeader::parse(value),
		None => return representations.first().map(|rep| rep.key),
	};
	if header.media_ranges.is_empty() {
		return representations.first().map(|rep| rep.key);
	}

	// Strictly-greater comparisons keep the earliest winner on ties.
	let mut best: Option<((f32, u8, isize), &'a str)> = None;
	for representation in &representations {
		// The most specific matching range governs this representation,
		// whatever its quality; a governing q of 0 refuses it outright.
		let mut governing: Option<(u8, f32, isize)> = None;
		for (position, range) in header.media_ranges.iter().enumerate() {
			if !range.accepts(representation) {
				continue;
			}
			let rank = (range.specificity(), range.quality, -(position as isize));
			if governing.is_none_or(|current| rank > current) {
				governing = Some(rank);
			}
		}
		let Some((specificity, quality, position)) = governing else {
			continue;
		};
		if quality <= 0.0 {
			continue;
		}
		let rank = (quality, specificity, position);
		if best.as_ref().is_none_or(|(current, _)| rank > *current) {
			best = Some((rank, representation.key));
		}
	}
	best.map(|(_, key)| key)
}

/// True when the media type is the JSON family: `application/json`,
/// `text/json`, the `x-json` variants, or any `+json` suffix, ignoring
/// parameters and case.
pub fn is_json_media_type(value: &str) -> bool {
	let essence = value.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
	let Some((media_type, media_subtype)) = essence.split_once('/') else {
		return false;
	};
	matches!(media_type, "application" | "text")
		&& (media_subtype == "json" || media_subtype == "x-json" || media_subtype.ends_with("+json"))
}

/// True when a binary body under this media type should be sent as UTF-8
/// text rather than base64: anything `text/*`, the JSON family, and the
/// XML family.
pub fn is_text_media_type(value: &str) -> bool {
	if is_json_media_type(value) {
		return true;
	}
	let essence = value.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
	let Some((media_type, media_subtype)) = essence.split_once('/') else {
		return false;
	};
	media_type == "text" || (media_type == "application" && (media_subtype == "xml" || media_subtype.ends_with("+xml")))
}

#[cfg(test)]
mod tests {
	use super::*;

	const BROWSER_ACCEPT: &str = "text/html, application/xhtml+xml, application/xml;q=0.9, */*;q=0.8";

	#[test]
	fn exact_match_beats_wildcard() {
		let negotiated = negotiate_media_type(Some(BROWSER_ACCEPT), ["application/json", "application/xml"]);
		assert_eq!(negotiated, Some("application/xml"));
	}

	#[test]
	fn wildcard_matches_anything() {
		let negotiated = negotiate_media_type(Some(BROWSER_ACCEPT), ["text/csv"]);
		assert_eq!(negotiated, Some("text/csv"));
	}

	#[test]
	fn no_wildcard_means_no_match() {
		let negotiated = negotiate_media_type(
			Some("text/html, application/xhtml+xml, application/xml;q=0.9"),
			["text/csv"],
		);
		assert_eq!(negotiated, None);
	}

	#[test]
	fn no_accept_header_picks_the_first_registered() {
		let negotiated = negotiate_media_type(None, ["application/xml", "application/json"]);
		assert_eq!(negotiated, Some("application/xml"));
	}

	#[test]
	fn earlier_accept_position_breaks_quality_ties() {
		let negotiated = negotiate_media_type(
			Some("application/json, application/xml"),
			["application/xml", "application/json"],
		);
		assert_eq!(negotiated, Some("application/json"));
	}

	#[test]
	fn zero_quality_refuses_a_type() {
		let negotiated = negotiate_media_type(Some("application/json;q=0"), ["application/json"]);
		assert_eq!(negotiated, None);
	}

	// Test: an explicit downgrade of a specific type under a broader
	// wildcard must stick; the wildcard's quality does not rescue it.
	#[test]
	fn a_specific_range_downgrades_its_type_below_a_wildcard() {
		let negotiated = negotiate_media_type(Some("text/*, text/plain;q=0.5"), ["text/plain", "text/html"]);
		assert_eq!(negotiated, Some("text/html"));
	}

	#[test]
	fn a_zero_quality_specific_range_refuses_despite_a_wildcard() {
		let negotiated = negotiate_media_type(Some("*/*, application/json;q=0"), ["application/json"]);
		assert_eq!(negotiated, None);

		let negotiated = negotiate_media_type(
			Some("*/*, application/json;q=0"),
			["application/json", "application/xml"],
		);
		assert_eq!(negotiated, Some("application/xml"));
	}

	#[test]
	fn type_wildcard_outranks_full_wildcard() {
		let negotiated = negotiate_media_type(Some("*/*, text/*"), ["application/json", "text/plain"]);
		assert_eq!(negotiated, Some("text/plain"));
	}

	#[test]
	fn charset_must_match_a_declared_charset() {
		let negotiated = negotiate_media_type(
			Some("text/plain;charset=ascii"),
			["text/plain;charset=utf-16", "text/plain;charset=ascii"],
		);
		assert_eq!(negotiated, Some("text/plain;charset=ascii"));
	}

	#[test]
	fn text_defaults_to_utf8_charset() {
		assert_eq!(
			negotiate_media_type(Some("text/plain;charset=utf-8"), ["text/plain"]),
			Some("text/plain"),
		);
		assert_eq!(negotiate_media_type(Some("text/plain;charset=utf-16"), ["text/plain"]), None);
	}

	#[test]
	fn binary_types_have_no_default_charset() {
		assert_eq!(
			negotiate_media_type(Some("application/octet-stream;charset=utf-8"), ["application/octet-stream"]),
			None,
		);
		assert_eq!(
			negotiate_media_type(Some("application/octet-stream"), ["application/octet-stream"]),
			Some("application/octet-stream"),
		);
	}

	#[test]
	fn json_media_type_family() {
		assert!(is_json_media_type("application/json"));
		assert!(is_json_media_type("Application/JSON; charset=utf-8"));
		assert!(is_json_media_type("text/x-json"));
		assert!(is_json_media_type("application/vnd.api+json"));
		assert!(!is_json_media_type("text/plain"));
		assert!(!is_json_media_type("application/jsonp"));
	}

	#[test]
	fn text_media_type_family() {
		assert!(is_text_media_type("text/plain"));
		assert!(is_text_media_type("application/json"));
		assert!(is_text_media_type("application/xml"));
		assert!(is_text_media_type("application/atom+xml"));
		assert!(!is_text_media_type("application/octet-stream"));
		assert!(!is_text_media_type("image/png"));
	}
}
