use regex::Regex;
use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^{}]*)\}").expect("placeholder pattern is valid"));

/// Replace every `${name}` marker whose name is a key of `variables`.
///
/// Keys are matched literally, so a key may itself contain `{` or `}`. When
/// several keys fit at the same `${`, the longest wins: with keys `a` and
/// `a}b`, the template `${a}b}` resolves `a}b`. Markers with no matching key
/// are kept verbatim. The template is scanned once, so substituted values are
/// never themselves expanded.
pub fn render(prompt: &str, variables: &HashMap<String, String>) -> String {
    if variables.is_empty() {
        return prompt.to_string();
    }

    let mut names: Vec<&str> = variables.keys().map(String::as_str).collect();
    names.sort_by_key(|name| Reverse(name.len()));

    let mut out = String::with_capacity(prompt.len());
    let mut rest = prompt;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let hit = names.iter().find_map(|name| {
            after
                .strip_prefix(name)
                .and_then(|tail| tail.strip_prefix('}'))
                .map(|tail| (*name, tail))
        });
        match hit {
            Some((name, tail)) => {
                out.push_str(&variables[name]);
                rest = tail;
            }
            None => {
                out.push_str("${");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Names of the `${...}` markers still present in `prompt`, in order.
///
/// Only brace-free names are reported.
pub fn unresolved(prompt: &str) -> Vec<String> {
    PLACEHOLDER
        .captures_iter(prompt)
        .map(|caps| caps[1].to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_known_variable() {
        assert_eq!(
            render("Hello ${name}", &vars(&[("name", "World")])),
            "Hello World"
        );
    }

    #[test]
    fn leaves_missing_variable_literal() {
        assert_eq!(
            render("Hi ${missing}", &vars(&[("name", "World")])),
            "Hi ${missing}"
        );
        assert_eq!(render("${missing}", &HashMap::new()), "${missing}");
    }

    #[test]
    fn replaces_every_occurrence() {
        assert_eq!(
            render("${x} and ${x} again", &vars(&[("x", "y")])),
            "y and y again"
        );
    }

    #[test]
    fn values_are_not_expanded_again() {
        let variables = vars(&[("a", "${b}"), ("b", "B")]);
        assert_eq!(render("${a}/${b}", &variables), "${b}/B");
    }

    #[test]
    fn nested_braces_match_innermost_marker() {
        assert_eq!(render("${a${b}}", &vars(&[("b", "c")])), "${ac}");
    }

    #[test]
    fn keys_may_contain_braces() {
        assert_eq!(render("${a}b}", &vars(&[("a}b", "X")])), "X");
        assert_eq!(render("<${{x}}>", &vars(&[("{x}", "Y")])), "<Y>");
    }

    #[test]
    fn longest_key_wins_at_the_same_marker() {
        let variables = vars(&[("a", "short"), ("a}b", "long")]);
        assert_eq!(render("${a}b}", &variables), "long");
        assert_eq!(render("${a}", &variables), "short");
        assert_eq!(render("${a}b", &vars(&[("a", "short")])), "shortb");
    }

    #[test]
    fn unterminated_marker_is_untouched() {
        assert_eq!(render("cost: ${price", &vars(&[("price", "1")])), "cost: ${price");
    }

    #[test]
    fn lists_unresolved_markers() {
        let rendered = render("${role} talks to ${user} about ${topic}", &vars(&[("role", "bot")]));
        assert_eq!(unresolved(&rendered), vec!["user", "topic"]);
        assert!(unresolved("plain text").is_empty());
    }
}
