//! Flat placeholder substitution for template content
//!
//! Token syntax is `{{identifier}}` with `identifier` matching
//! `[A-Za-z0-9_]+`. Substitution is a single left-to-right pass; the
//! output is never re-scanned, so values containing `{{...}}` are left
//! verbatim. No loops or conditionals; legal boilerplate is flat text.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    static ref TOKEN: Regex = Regex::new(r"\{\{([A-Za-z0-9_]+)\}\}").unwrap();
}

/// Substitute `{{name}}` tokens in `content` with entries from `values`.
///
/// Tokens without a supplied value render as the literal `[name]`, so
/// missing data is visually obvious rather than silently blank. Pure
/// and infallible; the generation service decides separately whether
/// missing required values block persistence.
pub fn render(content: &str, values: &HashMap<String, String>) -> String {
    TOKEN
        .replace_all(content, |caps: &Captures| {
            let name = &caps[1];
            match values.get(name) {
                Some(value) => value.clone(),
                None => format!("[{}]", name),
            }
        })
        .into_owned()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn identifier() -> impl Strategy<Value = String> {
        "[A-Za-z0-9_]{1,20}"
    }

    proptest! {
        /// Property: rendering is a pure function of its inputs.
        #[test]
        fn render_is_deterministic(
            content in ".{0,200}",
            name in identifier(),
            value in "[^{}]{0,40}",
        ) {
            let mut values = HashMap::new();
            values.insert(name, value);
            let once = render(&content, &values);
            let twice = render(&content, &values);
            prop_assert_eq!(once, twice);
        }

        /// Property: when every token name has a value, the output
        /// contains no bracketed placeholder for those names.
        #[test]
        fn full_values_leave_no_placeholders(
            names in prop::collection::hash_set("[a-z_]{1,12}", 1..5),
            value in "[a-z0-9 ]{0,20}",
        ) {
            let content = names
                .iter()
                .map(|n| format!("{{{{{}}}}}", n))
                .collect::<Vec<_>>()
                .join(" ");
            let values: HashMap<String, String> = names
                .iter()
                .map(|n| (n.clone(), value.clone()))
                .collect();

            let out = render(&content, &values);
            for name in &names {
                let bracketed = format!("[{}]", name);
                prop_assert!(!out.contains(&bracketed));
            }
        }

        /// Property: absent variables are visibly bracketed in the output.
        #[test]
        fn absent_values_are_visible(name in "[a-z_]{1,12}") {
            let content = format!("start {{{{{}}}}} end", name);
            let out = render(&content, &HashMap::new());
            let bracketed = format!("[{}]", name);
            prop_assert!(out.contains(&bracketed));
        }
    }
}
