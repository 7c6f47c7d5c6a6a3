//! Mapping from internal-scheme locators to built-in icon names.
//!
//! Rules are evaluated top-down; the first rule that yields a name wins.
//! Fixed overrides come before the generic first-segment rule.

use crate::loader::is_valid_builtin_name;

/// Default internal scheme served from the built-in icon set.
pub const DEFAULT_INTERNAL_SCHEME: &str = "beaker://";

#[derive(Debug, Clone, Copy)]
enum BuiltinRule {
    /// Locator path (after the scheme) starts with `prefix`.
    Prefix { prefix: &'static str, name: &'static str },
    /// First path segment after the scheme, cut at `/`, `?` or `#`, so `start?tab=2`
    /// names `start` rather than the whole `start?tab=2`.
    FirstSegment,
}

const RULES: &[BuiltinRule] = &[
    BuiltinRule::Prefix { prefix: "library/?view=addressbook", name: "addressbook" },
    BuiltinRule::Prefix { prefix: "library/?view=bookmarks", name: "bookmarks" },
    BuiltinRule::Prefix { prefix: "library/?view=websites", name: "websites" },
    BuiltinRule::FirstSegment,
];

impl BuiltinRule {
    fn apply<'a>(&self, path: &'a str) -> Option<&'a str> {
        match *self {
            BuiltinRule::Prefix { prefix, name } => path.starts_with(prefix).then_some(name),
            BuiltinRule::FirstSegment => {
                let segment = path.split(['/', '?', '#']).next().unwrap_or_default();
                is_valid_builtin_name(segment).then_some(segment)
            }
        }
    }
}

/// Derive the built-in icon name for `locator`.
///
/// Returns None when `locator` is not under `scheme` or no rule yields a
/// usable name.
pub fn builtin_name<'a>(locator: &'a str, scheme: &str) -> Option<&'a str> {
    let path = locator.strip_prefix(scheme)?;
    RULES.iter().find_map(|rule| rule.apply(path))
}
