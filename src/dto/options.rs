//! Selectable filter values offered to players.

use serde::Serialize;

use crate::dao::models::{ANY_CATEGORY, Difficulty};

/// A labelled filter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    /// Text shown to the player.
    pub label: &'static str,
    /// Value stored in preferences and sent to the provider.
    pub value: &'static str,
}

/// Categories offered for question requests; `any` disables the filter.
pub const CATEGORY_OPTIONS: [SelectOption; 8] = [
    SelectOption { label: "All categories", value: ANY_CATEGORY },
    SelectOption { label: "General knowledge", value: "9" },
    SelectOption { label: "Books", value: "10" },
    SelectOption { label: "Film & TV", value: "11" },
    SelectOption { label: "Science & Nature", value: "17" },
    SelectOption { label: "Technology", value: "18" },
    SelectOption { label: "History", value: "23" },
    SelectOption { label: "Sports", value: "21" },
];

/// Difficulty tiers with their labels.
pub fn difficulty_options() -> [SelectOption; 3] {
    Difficulty::ALL.map(|tier| SelectOption {
        label: match tier {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        },
        value: tier.as_str(),
    })
}

/// Label of a category value, if it is one of [`CATEGORY_OPTIONS`].
pub fn category_label(value: &str) -> Option<&'static str> {
    CATEGORY_OPTIONS
        .iter()
        .find(|option| option.value == value)
        .map(|option| option.label)
}
