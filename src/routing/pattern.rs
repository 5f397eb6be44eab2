//! Path template matching and building.
//!
//! # Responsibilities
//! - Compile a template like `/users/:id/posts/:post` into literal parts and parameter names
//! - Match a concrete path, binding each parameter to the text between its neighbouring literals
//! - Build a concrete path from a parameter map
//!
//! # Design Decisions
//! - No regex: literals are located by forward scan, first occurrence wins
//! - Greedy-leftmost per literal, not globally optimal; a value containing the
//!   next literal's text splits early
//! - A parameter followed by an empty literal consumes the rest of the input
//! - Values are raw substrings, no decoding

use std::fmt;

use crate::routing::types::{RouteParams, RoutingError, RoutingResult};

/// A compiled path template.
///
/// `parts` always holds one more entry than `params`: the literal before the
/// first parameter, then the literal following each parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    template: String,
    parts: Vec<String>,
    params: Vec<String>,
}

impl PathPattern {
    /// Compile a template. `:` followed by one or more word characters
    /// (`[A-Za-z0-9_]`) starts a parameter; any other `:` is literal text.
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let mut parts = Vec::new();
        let mut params = Vec::new();

        let bytes = template.as_bytes();
        let mut literal_start = 0;
        let mut cursor = 0;
        while cursor < bytes.len() {
            if bytes[cursor] == b':' {
                let name_len = bytes[cursor + 1..]
                    .iter()
                    .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
                    .count();
                if name_len > 0 {
                    parts.push(template[literal_start..cursor].to_string());
                    params.push(template[cursor + 1..cursor + 1 + name_len].to_string());
                    cursor += 1 + name_len;
                    literal_start = cursor;
                    continue;
                }
            }
            cursor += 1;
        }
        parts.push(template[literal_start..].to_string());

        Self {
            template,
            parts,
            params,
        }
    }

    /// The template this pattern was compiled from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Declared parameter names, in template order.
    pub fn param_names(&self) -> &[String] {
        &self.params
    }

    /// Match a path, returning the bound parameters or `None`.
    pub fn matches(&self, path: &str) -> Option<RouteParams> {
        let rest = path.strip_prefix(self.parts[0].as_str())?;

        let mut values = RouteParams::new();
        let mut index = 0;
        let mut last_index = 0;
        for (param, part) in self.params.iter().zip(&self.parts[1..]) {
            index = if part.is_empty() {
                rest.len()
            } else {
                index + rest[index..].find(part.as_str())?
            };
            values.insert(param.clone(), rest[last_index..index].to_string());
            index += part.len();
            last_index = index;
        }

        if index < rest.len() {
            return None;
        }
        Some(values)
    }

    /// Substitute parameters into the template.
    pub fn build(&self, params: &RouteParams) -> RoutingResult<String> {
        let mut path = self.parts[0].clone();
        for (param, part) in self.params.iter().zip(&self.parts[1..]) {
            let value = params
                .get(param)
                .ok_or_else(|| RoutingError::MissingParameter {
                    template: self.template.clone(),
                    param: param.clone(),
                })?;
            path.push_str(value);
            path.push_str(part);
        }
        Ok(path)
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> RouteParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_literal_template() {
        let pattern = PathPattern::new("/aap/noot");
        assert_eq!(pattern.matches("/aap/noot"), Some(RouteParams::new()));
        assert_eq!(pattern.matches("/aap/noot/mies"), None);
        assert_eq!(pattern.matches("/aap"), None);
    }

    #[test]
    fn test_parameters() {
        let pattern = PathPattern::new("/:a/:b/:c");
        assert_eq!(pattern.param_names(), ["a", "b", "c"]);
        assert_eq!(pattern.matches("/aap/noot"), None);
        assert_eq!(
            pattern.matches("/aap/noot/mies"),
            Some(params(&[("a", "aap"), ("b", "noot"), ("c", "mies")]))
        );
    }

    #[test]
    fn test_trailing_literal_must_be_consumed() {
        let pattern = PathPattern::new("/home/:aap/noot");
        assert_eq!(
            pattern.matches("/home/123/noot"),
            Some(params(&[("aap", "123")]))
        );
        assert_eq!(pattern.matches("/home/123/noot/x"), None);
        assert_eq!(pattern.matches("/home/123/mies"), None);
    }

    #[test]
    fn test_greedy_leftmost_split() {
        // The first "/" after the prefix ends `a`, even if a later split fits better.
        let pattern = PathPattern::new("/:a/:b");
        assert_eq!(
            pattern.matches("/x/y/z"),
            Some(params(&[("a", "x"), ("b", "y/z")]))
        );
    }

    #[test]
    fn test_adjacent_parameters() {
        let pattern = PathPattern::new("/:a:b");
        assert_eq!(pattern.param_names(), ["a", "b"]);
        assert_eq!(
            pattern.matches("/xy"),
            Some(params(&[("a", "xy"), ("b", "")]))
        );
    }

    #[test]
    fn test_colon_without_name_is_literal() {
        let pattern = PathPattern::new("/a:/:b");
        assert_eq!(pattern.param_names(), ["b"]);
        assert_eq!(pattern.matches("/a:/1"), Some(params(&[("b", "1")])));
    }

    #[test]
    fn test_empty_template_matches_only_empty_path() {
        let pattern = PathPattern::new("");
        assert_eq!(pattern.matches(""), Some(RouteParams::new()));
        assert_eq!(pattern.matches("/"), None);
    }

    #[test]
    fn test_build() {
        let pattern = PathPattern::new("/users/:id/posts/:post");
        let path = pattern
            .build(&params(&[("id", "7"), ("post", "hello")]))
            .unwrap();
        assert_eq!(path, "/users/7/posts/hello");

        let err = pattern.build(&params(&[("id", "7")])).unwrap_err();
        assert_eq!(
            err,
            RoutingError::MissingParameter {
                template: "/users/:id/posts/:post".into(),
                param: "post".into(),
            }
        );
    }

    #[test]
    fn test_build_ignores_extra_params() {
        let pattern = PathPattern::new("/about");
        assert_eq!(pattern.build(&params(&[("x", "1")])).unwrap(), "/about");
    }
}
