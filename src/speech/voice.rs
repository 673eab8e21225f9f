//! Voice descriptors and the positional voice catalog

use serde::{Deserialize, Serialize};

/// Label used for the selector when the host has reported no voices
pub const NO_VOICES_LABEL: &str = "No voices available";

/// One selectable synthetic voice as reported by the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceDescriptor {
    /// Human readable voice name
    pub name: String,
    /// BCP 47 language tag (e.g. "en-US")
    pub lang: String,
    /// Whether the host treats this voice as its default
    pub default: bool,
}

impl VoiceDescriptor {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
            default: false,
        }
    }

    pub fn as_default(mut self) -> Self {
        self.default = true;
        self
    }

    /// Selector label, e.g. `Amy (en-US) [default]`
    pub fn label(&self) -> String {
        let mut label = format!("{} ({})", self.name, self.lang);
        if self.default {
            label.push_str(" [default]");
        }
        label
    }
}

/// An entry in the voice selector. `index` is `None` only for the
/// "no voices" sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceOption {
    pub index: Option<usize>,
    pub label: String,
}

/// Ordered voices from the last host report. Voices have no identity beyond
/// their position, so any index held by a consumer is only meaningful
/// against the catalog it was read from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceCatalog {
    voices: Vec<VoiceDescriptor>,
}

impl VoiceCatalog {
    pub fn new(voices: Vec<VoiceDescriptor>) -> Self {
        Self { voices }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<&VoiceDescriptor> {
        self.voices.get(index)
    }

    pub fn voices(&self) -> &[VoiceDescriptor] {
        &self.voices
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn default_index(&self) -> Option<usize> {
        self.voices.iter().position(|v| v.default)
    }

    /// Options for the voice selector; a single sentinel when empty
    pub fn options(&self) -> Vec<VoiceOption> {
        if self.voices.is_empty() {
            return vec![VoiceOption {
                index: None,
                label: NO_VOICES_LABEL.to_string(),
            }];
        }

        self.voices
            .iter()
            .enumerate()
            .map(|(index, voice)| VoiceOption {
                index: Some(index),
                label: voice.label(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_catalog_has_sentinel_option() {
        let catalog = VoiceCatalog::empty();
        let options = catalog.options();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].index, None);
        assert_eq!(options[0].label, NO_VOICES_LABEL);
    }

    #[test]
    fn test_labels_mark_default_voice() {
        let catalog = VoiceCatalog::new(vec![
            VoiceDescriptor::new("Amy", "en-US").as_default(),
            VoiceDescriptor::new("Thorsten", "de-DE"),
        ]);

        let options = catalog.options();
        assert_eq!(options[0].label, "Amy (en-US) [default]");
        assert_eq!(options[1].label, "Thorsten (de-DE)");
        assert_eq!(options[1].index, Some(1));
        assert_eq!(catalog.default_index(), Some(0));
    }

    #[test]
    fn test_out_of_range_lookup() {
        let catalog = VoiceCatalog::new(vec![VoiceDescriptor::new("Amy", "en-US")]);
        assert!(catalog.get(0).is_some());
        assert!(catalog.get(1).is_none());
    }
}
