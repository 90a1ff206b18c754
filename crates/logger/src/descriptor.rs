use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The resolved output of one chain traversal, handed to the transport.
///
/// Serializes with the wire field names subscribers match on
/// (`eventName`, `modeFlags`, `rawArgs`); `mode_flags` preserves the
/// order modes were recorded in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmissionDescriptor {
	/// Name of the emitted event; also the specific publish topic.
	pub event_name: Box<str>,
	/// First terminal argument after all transforms, `None` when the
	/// terminal call carried no arguments.
	pub message: Option<String>,
	/// Asserted value per recorded mode name.
	pub mode_flags: IndexMap<Box<str>, bool>,
	/// The full argument list passed to the terminal call, untransformed.
	pub raw_args: Vec<String>,
}

impl EmissionDescriptor {
	/// Asserted value for `mode`, if it was recorded on the chain.
	pub fn mode(&self, mode: &str) -> Option<bool> {
		self.mode_flags.get(mode).copied()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn serializes_with_wire_field_names() {
		let descriptor = EmissionDescriptor {
			event_name: Box::from("info"),
			message: Some("hello".to_string()),
			mode_flags: IndexMap::new(),
			raw_args: vec!["hello".to_string()],
		};
		let value = serde_json::to_value(&descriptor).unwrap();
		assert_eq!(
			value,
			serde_json::json!({
				"eventName": "info",
				"message": "hello",
				"modeFlags": {},
				"rawArgs": ["hello"],
			})
		);
	}

	#[test]
	fn mode_flags_keep_recorded_order() {
		let mut mode_flags = IndexMap::new();
		mode_flags.insert(Box::<str>::from("verbose"), true);
		mode_flags.insert(Box::<str>::from("debug"), false);
		let descriptor = EmissionDescriptor {
			event_name: Box::from("log"),
			message: None,
			mode_flags,
			raw_args: Vec::new(),
		};
		let keys: Vec<&str> = descriptor.mode_flags.keys().map(AsRef::as_ref).collect();
		assert_eq!(keys, ["verbose", "debug"]);
		assert_eq!(descriptor.mode("verbose"), Some(true));
		assert_eq!(descriptor.mode("quiet"), None);
	}
}
