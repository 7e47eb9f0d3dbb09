use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::core::version::Version;

pub const WILDCARD: &str = "*";

/// One version range with independently hard (inclusive) or soft (exclusive)
/// bounds. An empty bound is unbounded on that side.
///
/// Equal, non-empty bounds of equal hardness form a pin: `[1.0]` is a hard pin,
/// the bare `1.0` a recommended one. Both match only that version. The bare
/// `*` matches everything.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionConstraint {
    lower: Version,
    is_lower_hard: bool,
    upper: Version,
    is_upper_hard: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    #[error("invalid version constraint '{spec}': {reason}")]
    InvalidConstraintSyntax { spec: String, reason: &'static str },
}

impl VersionConstraint {
    pub fn range(
        lower: impl Into<String>,
        is_lower_hard: bool,
        upper: impl Into<String>,
        is_upper_hard: bool,
    ) -> Self {
        Self {
            lower: Version::new(lower),
            is_lower_hard,
            upper: Version::new(upper),
            is_upper_hard,
        }
    }

    pub fn wildcard() -> Self {
        Self::range(WILDCARD, false, WILDCARD, false)
    }

    /// Hard pin, `[version]`.
    pub fn exact(version: impl Into<String>) -> Self {
        let version = version.into();
        Self::range(version.clone(), true, version, true)
    }

    /// Recommended version, the bare `version` form.
    pub fn recommended(version: impl Into<String>) -> Self {
        let version = version.into();
        Self::range(version.clone(), false, version, false)
    }

    pub fn parse(spec: &str) -> Result<Self, ConstraintError> {
        parse_range(spec, spec)
    }

    /// Parses a spec holding one or more ranges, e.g. `(,1.0],[1.2,)`.
    ///
    /// A comma inside a bracket pair separates the bounds of one range; a comma
    /// outside any pair separates ranges.
    pub fn parse_all(spec: &str) -> Result<Vec<Self>, ConstraintError> {
        let mut constraints = Vec::new();
        let mut depth = 0usize;
        let mut start = 0;

        for (idx, ch) in spec.char_indices() {
            match ch {
                '[' | '(' => {
                    depth += 1;
                    if depth > 1 {
                        return Err(invalid(spec, "nested brackets"));
                    }
                }
                ']' | ')' => {
                    if depth == 0 {
                        return Err(invalid(spec, "unbalanced brackets"));
                    }
                    depth -= 1;
                }
                ',' if depth == 0 => {
                    constraints.push(parse_range(spec, &spec[start..idx])?);
                    start = idx + 1;
                }
                _ => {}
            }
        }
        if depth != 0 {
            return Err(invalid(spec, "unbalanced brackets"));
        }
        constraints.push(parse_range(spec, &spec[start..])?);
        Ok(constraints)
    }

    pub fn lower_bound(&self) -> &str {
        self.lower.as_str()
    }

    pub fn upper_bound(&self) -> &str {
        self.upper.as_str()
    }

    pub fn is_lower_hard(&self) -> bool {
        self.is_lower_hard
    }

    pub fn is_upper_hard(&self) -> bool {
        self.is_upper_hard
    }

    pub fn is_wildcard(&self) -> bool {
        self.lower.as_str() == WILDCARD
            && self.upper.as_str() == WILDCARD
            && !self.is_lower_hard
            && !self.is_upper_hard
    }

    pub fn is_pin(&self) -> bool {
        !self.lower.as_str().is_empty()
            && self.lower == self.upper
            && self.is_lower_hard == self.is_upper_hard
    }

    pub fn matches(&self, version: &Version) -> bool {
        if self.is_wildcard() {
            return true;
        }
        if self.is_pin() {
            return self.lower.is_semantically_equal(version);
        }
        let above_lower = self.lower.as_str().is_empty()
            || match version.semantic_cmp(&self.lower) {
                Ordering::Greater => true,
                Ordering::Equal => self.is_lower_hard,
                Ordering::Less => false,
            };
        let below_upper = self.upper.as_str().is_empty()
            || match version.semantic_cmp(&self.upper) {
                Ordering::Less => true,
                Ordering::Equal => self.is_upper_hard,
                Ordering::Greater => false,
            };
        above_lower && below_upper
    }
}

/// True when `version` satisfies at least one of the OR'd `constraints`.
pub fn matches_any(constraints: &[VersionConstraint], version: &Version) -> bool {
    constraints
        .iter()
        .any(|constraint| constraint.matches(version))
}

/// Joins OR'd constraints back into the comma-separated spec they parse from.
pub fn constraint_spec(constraints: &[VersionConstraint]) -> String {
    constraints
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_pin() {
            return if self.is_lower_hard {
                write!(f, "[{}]", self.lower)
            } else {
                write!(f, "{}", self.lower)
            };
        }
        let open = if self.is_lower_hard { '[' } else { '(' };
        let close = if self.is_upper_hard { ']' } else { ')' };
        write!(f, "{open}{},{}{close}", self.lower, self.upper)
    }
}

impl FromStr for VersionConstraint {
    type Err = ConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn invalid(spec: &str, reason: &'static str) -> ConstraintError {
    ConstraintError::InvalidConstraintSyntax {
        spec: spec.to_string(),
        reason,
    }
}

fn parse_range(spec: &str, segment: &str) -> Result<VersionConstraint, ConstraintError> {
    let trimmed = segment.trim();
    if trimmed.is_empty() {
        return Err(invalid(spec, "empty range"));
    }
    if trimmed == WILDCARD {
        return Ok(VersionConstraint::wildcard());
    }

    let opens = trimmed.starts_with(['[', '(']);
    let closes = trimmed.ends_with([']', ')']);
    if !opens && !closes {
        if trimmed.contains(['[', ']', '(', ')', ',']) {
            return Err(invalid(spec, "unexpected bracket or comma in version"));
        }
        return Ok(VersionConstraint::recommended(trimmed));
    }
    if !opens || !closes || trimmed.len() < 2 {
        return Err(invalid(spec, "unbalanced brackets"));
    }

    let is_lower_hard = trimmed.starts_with('[');
    let is_upper_hard = trimmed.ends_with(']');
    let inner = &trimmed[1..trimmed.len() - 1];
    if inner.contains(['[', ']', '(', ')']) {
        return Err(invalid(spec, "nested brackets"));
    }

    match inner.split_once(',') {
        None => {
            let version = inner.trim();
            if version.is_empty() {
                Err(invalid(spec, "empty version"))
            } else {
                Ok(VersionConstraint::range(
                    version,
                    is_lower_hard,
                    version,
                    is_upper_hard,
                ))
            }
        }
        Some((_, upper)) if upper.contains(',') => {
            Err(invalid(spec, "a range takes exactly two bounds"))
        }
        Some((lower, upper)) => Ok(VersionConstraint::range(
            lower.trim(),
            is_lower_hard,
            upper.trim(),
            is_upper_hard,
        )),
    }
}

#[cfg(test)]
mod tests {
    use crate::core::constraint::{constraint_spec, ConstraintError, VersionConstraint};
    use crate::core::version::Version;

    fn c(spec: &str) -> VersionConstraint {
        VersionConstraint::parse(spec).expect("parse constraint")
    }

    fn v(raw: &str) -> Version {
        Version::new(raw)
    }

    #[test]
    fn parses_bracket_ranges() {
        let constraint = c("(1.2.3,2.3.4]");
        assert_eq!(constraint.lower_bound(), "1.2.3");
        assert!(!constraint.is_lower_hard());
        assert_eq!(constraint.upper_bound(), "2.3.4");
        assert!(constraint.is_upper_hard());

        let open_upper = c("[1.0,)");
        assert_eq!(open_upper.upper_bound(), "");
        assert!(open_upper.is_lower_hard());
    }

    #[test]
    fn bare_token_is_a_recommended_pin() {
        let constraint = c("4.12");
        assert_eq!(constraint, VersionConstraint::recommended("4.12"));
        assert!(constraint.is_pin());
        assert!(constraint.matches(&v("4.12")));
        assert!(!constraint.matches(&v("4.13")));
    }

    #[test]
    fn hard_pin_matches_only_that_version() {
        let constraint = c("[1.5]");
        assert_eq!(constraint, VersionConstraint::exact("1.5"));
        assert!(constraint.matches(&v("1.5")));
        assert!(!constraint.matches(&v("1.5.1")));
        assert!(!constraint.matches(&v("1.4")));
    }

    #[test]
    fn range_bounds_respect_hardness() {
        let constraint = c("(1.0,2.0]");
        assert!(!constraint.matches(&v("1.0")));
        assert!(constraint.matches(&v("1.0.1")));
        assert!(constraint.matches(&v("2.0")));
        assert!(!constraint.matches(&v("2.0.1")));

        let inclusive = c("[1,2]");
        assert!(inclusive.matches(&v("1")));
        assert!(inclusive.matches(&v("1.3")));
        assert!(inclusive.matches(&v("2")));
        assert!(!inclusive.matches(&v("2.1")));

        let below = c("(,1.0)");
        assert!(below.matches(&v("0.1")));
        assert!(!below.matches(&v("1.0")));
        assert!(below.matches(&v("1.0-SNAPSHOT")));

        let above = c("[1.0,)");
        assert!(above.matches(&v("1.0")));
        assert!(above.matches(&v("99")));
    }

    #[test]
    fn wildcard_matches_everything() {
        let wildcard = c("*");
        assert!(wildcard.is_wildcard());
        for raw in ["0", "1.0", "2.0-SNAPSHOT", "weird", "", "1.0.0.0.0-rc7"] {
            assert!(wildcard.matches(&v(raw)), "{raw}");
        }
    }

    #[test]
    fn splits_multiple_ranges_bracket_aware() {
        let constraints = VersionConstraint::parse_all("(,1.0],[1.2,)").expect("parse all");
        assert_eq!(constraints, vec![c("(,1.0]"), c("[1.2,)")]);
        assert!(crate::core::constraint::matches_any(&constraints, &v("0.9")));
        assert!(!crate::core::constraint::matches_any(&constraints, &v("1.1")));
        assert!(crate::core::constraint::matches_any(&constraints, &v("1.3")));

        let single = VersionConstraint::parse_all("[1.0]").expect("parse single");
        assert_eq!(single, vec![VersionConstraint::exact("1.0")]);
    }

    #[test]
    fn malformed_specs_fail_instead_of_matching_everything() {
        for spec in [
            "", "  ", "[1.0", "1.0]", "[1.0,2.0,3.0]", "[[1.0]]", "[]", "(  )", "1.0,",
            "[1,2],,[3,4]",
        ] {
            let err = VersionConstraint::parse_all(spec).expect_err(spec);
            assert!(
                matches!(err, ConstraintError::InvalidConstraintSyntax { .. }),
                "{spec}"
            );
        }
    }

    #[test]
    fn single_version_takes_the_hardness_of_each_bracket() {
        let mixed = c("[1.2)");
        assert_eq!(mixed, VersionConstraint::range("1.2", true, "1.2", false));
        assert!(!mixed.is_pin());
        assert!(!mixed.matches(&v("1.2")));
        assert_eq!(mixed.to_string(), "[1.2,1.2)");
        assert_eq!(c(&mixed.to_string()), mixed);

        let soft = c("(1.0)");
        assert_eq!(soft, VersionConstraint::recommended("1.0"));
        assert!(soft.matches(&v("1.0")));

        let dependency = VersionConstraint::parse_all("[1.2),[2.0,)").expect("parse all");
        assert_eq!(dependency.len(), 2);
        assert!(crate::core::constraint::matches_any(&dependency, &v("2.1")));
    }

    #[test]
    fn joined_spec_reparses_to_the_same_constraints() {
        let constraints = VersionConstraint::parse_all("(,1.0],[1.2,),2.0").expect("parse all");
        let spec = constraint_spec(&constraints);
        assert_eq!(spec, "(,1.0],[1.2,),2.0");
        assert_eq!(VersionConstraint::parse_all(&spec).expect("reparse"), constraints);
    }

    #[test]
    fn display_round_trips_parsed_constraints() {
        for spec in [
            "*", "1.0", "[1.0]", "(1.0,2.0)", "[1.0,2.0)", "(,1.0]", "[1.2,)", "(,)",
            "[1.0,1.0)", "(1.0,1.0)", "[,]",
        ] {
            let parsed = c(spec);
            let reparsed = c(&parsed.to_string());
            assert_eq!(parsed, reparsed, "{spec} -> {parsed}");
        }
        assert_eq!(c("[1.0,2.0)").to_string(), "[1.0,2.0)");
        assert_eq!(c("[1.0,1.0]").to_string(), "[1.0]");
    }

    #[test]
    fn error_names_the_offending_spec() {
        let err = VersionConstraint::parse("[1.0").expect_err("unbalanced");
        assert_eq!(
            err.to_string(),
            "invalid version constraint '[1.0': unbalanced brackets"
        );
    }
}
