//! Payloads dragged onto the canvas from outside the editor.

use serde::Deserialize;

/// Recognised drop payloads. Anything else fails to parse and is ignored.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DropPayload {
	/// A suggestion from the recommendation list; becomes a new project.
	Recommendation { title: String, description: String },
}

impl DropPayload {
	/// Parse serialized drag data. Unknown tags and malformed JSON both yield
	/// `None` without logging.
	pub fn parse(raw: &str) -> Option<Self> {
		serde_json::from_str(raw).ok()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn accepts_recommendations() {
		let payload = DropPayload::parse(r#"{"type":"recommendation","title":"X","description":"Y"}"#);
		assert_eq!(
			payload,
			Some(DropPayload::Recommendation {
				title: "X".into(),
				description: "Y".into(),
			})
		);
	}

	#[test]
	fn ignores_everything_else() {
		for raw in [
			r#"{"type":"node","title":"X","description":"Y"}"#,
			r#"{"title":"X","description":"Y"}"#,
			r#"{"type":"recommendation","title":"X"}"#,
			r#"{"type":"recommendation","title":7,"description":"Y"}"#,
			"plain text",
			"",
		] {
			assert_eq!(DropPayload::parse(raw), None, "{raw}");
		}
	}
}
