// ============================================================================
// Identifier case conversions
// ============================================================================

/// Split a PascalCase / camelCase identifier into words.
///
/// Acronym runs stay together: "HTTPServer" -> ["HTTP", "Server"].
/// Digit runs are glued to the preceding word.
pub fn split_words(ident: &str) -> Vec<String> {
    let chars: Vec<char> = ident.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Capitalise the first letter; an all-caps word is lowered after it.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let rest: String = chars.collect();
    let rest = if word.chars().count() > 1 && word.chars().all(|c| !c.is_lowercase()) {
        rest.to_lowercase()
    } else {
        rest
    };
    format!("{}{}", first.to_uppercase(), rest)
}

/// Space-separated words -> PascalCase, preserving inner camel humps.
pub fn to_pascal_case(text: &str) -> String {
    text.split_whitespace().map(capitalize).collect()
}

/// "SignIn" -> "SIGN_IN"
pub fn to_upper_snake(ident: &str) -> String {
    split_words(ident)
        .iter()
        .map(|w| w.to_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// "SignIn" -> "sign in"
pub fn decamelize(ident: &str) -> String {
    split_words(ident)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// "user clicks on sign in" -> "userClicksOnSignIn"
pub fn to_camel_case(text: &str) -> String {
    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
        .collect();

    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(word);
        } else {
            out.push_str(&capitalize(word));
        }
    }
    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert_str(0, "step");
    }
    out
}

/// "Sign In Form" -> "sign_in_form"
pub fn to_snake_case(text: &str) -> String {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .flat_map(split_words)
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// "Sign In" -> "sign-in"
pub fn to_kebab_case(text: &str) -> String {
    to_snake_case(text).replace('_', "-")
}
