//! English noun singularizer, used by the emitters to derive resource
//! names from plural path segments.

fn irregular(word: &str) -> Option<&'static str> {
    match word {
        "men" => Some("man"),
        "women" => Some("woman"),
        "children" => Some("child"),
        "feet" => Some("foot"),
        "teeth" => Some("tooth"),
        "geese" => Some("goose"),
        "mice" => Some("mouse"),
        "people" => Some("person"),
        _ => None,
    }
}

/// Convert a plural noun to its singular form. Returns the lowercased
/// word and whether a plural rule applied.
pub fn singularize(word: &str) -> (String, bool) {
    let word = word.to_lowercase();

    if let Some(singular) = irregular(&word) {
        return (singular.to_string(), true);
    }

    // -ies -> y
    if word.ends_with("ies") && word.len() > 3 {
        return (format!("{}y", &word[..word.len() - 3]), true);
    }

    // -es after a sibilant: drop the "es"
    if word.ends_with("ses")
        || word.ends_with("xes")
        || word.ends_with("zes")
        || word.ends_with("ches")
        || word.ends_with("shes")
    {
        return (word[..word.len() - 2].to_string(), true);
    }

    // plain plural -s
    if word.ends_with('s') && word.len() > 3 && !word.ends_with("ss") && !word.ends_with("us") {
        return (word[..word.len() - 1].to_string(), true);
    }

    (word, false)
}

#[cfg(test)]
mod tests {
    use super::singularize;

    #[test]
    fn plural_to_singular() {
        let cases = [
            // irregulars
            ("men", "man", true),
            ("women", "woman", true),
            ("children", "child", true),
            ("feet", "foot", true),
            ("teeth", "tooth", true),
            ("geese", "goose", true),
            ("mice", "mouse", true),
            ("people", "person", true),
            // -ies -> y
            ("parties", "party", true),
            ("stories", "story", true),
            ("flies", "fly", true),
            // -es endings
            ("boxes", "box", true),
            ("wishes", "wish", true),
            ("buses", "bus", true),
            ("benches", "bench", true),
            // -s endings
            ("cats", "cat", true),
            ("dogs", "dog", true),
            ("cars", "car", true),
            // already singular
            ("dog", "dog", false),
            ("bus", "bus", false),
            ("quiz", "quiz", false),
            // edge cases
            ("s", "s", false),
            ("", "", false),
            ("ies", "ies", false),
        ];
        for (input, want, want_applied) in cases {
            let (got, applied) = singularize(input);
            assert_eq!(
                (got.as_str(), applied),
                (want, want_applied),
                "singularize({:?})",
                input
            );
        }
    }

    #[test]
    fn uppercase_input_is_lowercased() {
        assert_eq!(singularize("Books"), ("book".to_string(), true));
    }
}
