//! Module specifier classification.

use std::path::{Component, Path};

/// Prefix the host puts on ids that a plugin already resolved to a virtual module.
pub const INTERNAL_ID_PREFIX: char = '\0';

/// How a module specifier should be routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecifierKind<'a> {
    /// Carries the alias prefix. Holds the remainder after the prefix.
    Alias(&'a str),

    /// Starts with `.` (`./x`, `../x`, `.`).
    Relative,

    /// An absolute filesystem path.
    Absolute,

    /// An already-resolved internal id (`\0...`).
    Internal,

    /// The shared-types package or one of its subpaths.
    Shared,

    /// Anything else: a package name such as `lodash` or `@scope/pkg`.
    Bare,
}

impl SpecifierKind<'_> {
    /// Whether bare-import re-anchoring applies to this specifier.
    pub fn is_bare(&self) -> bool {
        matches!(self, SpecifierKind::Bare)
    }
}

/// Classify `specifier` given the alias prefix and the shared package name.
///
/// # Example
///
/// ```
/// use forge_overlay::specifier::{classify, SpecifierKind};
///
/// assert_eq!(classify("@/components/logo", "@/", "shared"), SpecifierKind::Alias("components/logo"));
/// assert_eq!(classify("./logo", "@/", "shared"), SpecifierKind::Relative);
/// assert_eq!(classify("shared/types", "@/", "shared"), SpecifierKind::Shared);
/// assert_eq!(classify("lodash", "@/", "shared"), SpecifierKind::Bare);
/// ```
pub fn classify<'a>(specifier: &'a str, alias_prefix: &str, shared_package: &str) -> SpecifierKind<'a> {
    if !alias_prefix.is_empty() {
        if let Some(rest) = specifier.strip_prefix(alias_prefix) {
            return SpecifierKind::Alias(rest);
        }
    }
    if specifier.starts_with(INTERNAL_ID_PREFIX) {
        return SpecifierKind::Internal;
    }
    if specifier.starts_with('.') {
        return SpecifierKind::Relative;
    }
    if specifier.starts_with('/') || Path::new(specifier).is_absolute() {
        return SpecifierKind::Absolute;
    }
    if is_package_or_subpath(specifier, shared_package) {
        return SpecifierKind::Shared;
    }
    SpecifierKind::Bare
}

/// `name` itself or `name/<anything>`.
pub fn is_package_or_subpath(specifier: &str, name: &str) -> bool {
    if name.is_empty() {
        return false;
    }
    match specifier.strip_prefix(name) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Whether a relative path stays inside whatever root it is joined onto.
///
/// Rejects absolute paths and any `..` component.
pub fn stays_within_root(relative: &str) -> bool {
    Path::new(relative)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}
