// ABOUTME: Ingredient-name normalizer - canonical name from a free-text quantity string
// ABOUTME: Heuristic and best-effort; unparseable input falls back to trim+lowercase
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder Project

//! Free-text ingredient normalization.
//!
//! Meal plans carry ingredient strings like `"2 cups rice, chopped"`; for
//! inventory reconciliation only the canonical name matters. This is a
//! heuristic, not a grammar: quantity tokens (anything containing a digit)
//! are dropped, one following measurement-unit word is dropped, and a fixed
//! set of preparation suffixes is truncated. Anything it cannot parse comes
//! back trimmed and lowercased unchanged.

/// Preparation descriptors; the name is truncated at the first occurrence.
const DESCRIPTOR_SUFFIXES: [&str; 4] = [", chopped", ", diced", ", sliced", ", minced"];

/// Measurement words dropped when they directly follow a quantity.
const MEASUREMENT_UNITS: [&str; 28] = [
    "cup",
    "cups",
    "g",
    "kg",
    "gram",
    "grams",
    "ml",
    "l",
    "liter",
    "liters",
    "litre",
    "litres",
    "tbsp",
    "tsp",
    "tablespoon",
    "tablespoons",
    "teaspoon",
    "teaspoons",
    "oz",
    "ounce",
    "ounces",
    "lb",
    "lbs",
    "pound",
    "pounds",
    "pinch",
    "can",
    "cans",
];

/// Extract a canonical, lowercase ingredient name from a free-text
/// quantity+ingredient string.
///
/// `"500 g flour, chopped"` becomes `"flour"`; `"Tomatoes"` becomes
/// `"tomatoes"`; `"2 eggs"` becomes `"eggs"`.
#[must_use]
pub fn normalize_ingredient(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();

    let truncated = DESCRIPTOR_SUFFIXES
        .iter()
        .filter_map(|suffix| lowered.find(suffix))
        .min()
        .map_or(lowered.as_str(), |index| &lowered[..index]);

    let mut tokens: Vec<&str> = truncated.split_whitespace().collect();

    let mut dropped_quantity = false;
    while tokens
        .first()
        .is_some_and(|token| token.chars().any(|c| c.is_ascii_digit()))
    {
        tokens.remove(0);
        dropped_quantity = true;
    }

    // "500 g flour" still carries the unit after the number goes; drop it
    // only when more of the name remains.
    if dropped_quantity
        && tokens.len() > 1
        && tokens
            .first()
            .is_some_and(|token| MEASUREMENT_UNITS.contains(token))
    {
        tokens.remove(0);
    }

    let name = tokens.join(" ");
    if name.is_empty() {
        lowered
    } else {
        name
    }
}
