//! Constraint resolution: picking the newest candidate that satisfies
//! every accumulated constraint at or above a stability floor.
//!
//! Constraint expressions follow the usual range grammar: `^1.2`,
//! `~2.1`, exact `1.0.0`, comparison operators, wildcards, and
//! comma-separated conjunctions. Expressions are converted to
//! [`pubgrub::Range`] values so that pairwise compatibility can be
//! checked by range intersection before any candidate is scanned.

use pubgrub::Range;
use semver::{Prerelease, Version};

use crate::core::stability::Stability;
use crate::resolver::errors::ResolveError;
use crate::resolver::version::VersionCandidate;

/// Select the newest candidate satisfying every constraint at or above
/// the stability floor.
///
/// Candidates must be sorted canonical-descending (newest first); the
/// scan returns the first match, so the ordering is load-bearing.
/// Selection is deterministic for a fixed input triple.
pub fn select<'a>(
    package: &str,
    constraints: &[String],
    candidates: &'a [VersionCandidate],
    floor: Stability,
) -> Result<&'a VersionCandidate, ResolveError> {
    let mut ranges = Vec::with_capacity(constraints.len());
    for constraint in constraints {
        let effective = inject_floor(constraint, floor);
        let range = parse_constraint(&effective)?;
        ranges.push((constraint.as_str(), range));
    }

    // Up-front pairwise compatibility pass: any two constraints whose
    // ranges cannot intersect abort resolution before the scan.
    for (i, (first, r1)) in ranges.iter().enumerate() {
        for (second, r2) in ranges.iter().skip(i + 1) {
            if r1.intersection(r2).is_empty() {
                return Err(ResolveError::MutuallyExclusive {
                    first: (*first).to_string(),
                    second: (*second).to_string(),
                });
            }
        }
    }

    for candidate in candidates {
        if candidate.stability < floor {
            continue;
        }
        if ranges.iter().all(|(_, r)| r.contains(&candidate.semver)) {
            return Ok(candidate);
        }
    }

    Err(ResolveError::NoSatisfyingVersion {
        package: package.to_string(),
        constraints: constraints.to_vec(),
    })
}

/// Append the floor's tier name to constraints lacking an explicit
/// prerelease qualifier, so pre-release candidates become eligible.
/// Stable's tier name is empty and is never appended.
fn inject_floor(constraint: &str, floor: Stability) -> String {
    if floor < Stability::Stable && !constraint.contains('-') {
        format!("{}-{}", constraint, floor.suffix())
    } else {
        constraint.to_string()
    }
}

/// Parse a constraint expression into a version range.
///
/// Comma-separated comparators are intersected (logical AND).
pub fn parse_constraint(expr: &str) -> Result<Range<Version>, ResolveError> {
    let parts: Vec<&str> = expr
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if parts.is_empty() {
        return Err(ResolveError::ConstraintParse {
            constraint: expr.to_string(),
            reason: "empty constraint".to_string(),
        });
    }

    let mut range = Range::full();
    for part in parts {
        range = range.intersection(&parse_comparator(part).ok_or_else(|| {
            ResolveError::ConstraintParse {
                constraint: expr.to_string(),
                reason: format!("unrecognized comparator `{}`", part),
            }
        })?);
    }

    Ok(range)
}

/// Parse a single comparator (`^1.2`, `>=1.0.0-beta`, `1.x`, ...).
fn parse_comparator(s: &str) -> Option<Range<Version>> {
    if s == "*" || s.eq_ignore_ascii_case("x") {
        return Some(Range::full());
    }

    let (op, rest) = split_op(s);
    let spec = VersionSpec::parse(rest.trim())?;
    let lower = spec.lower();

    let range = match op {
        Op::Exact if spec.is_complete() => Range::singleton(lower),
        // `1.0` and `1.2.x` behave as a range over the unspecified parts.
        Op::Exact => Range::between(lower, spec.pad_upper()),
        Op::NotEqual => Range::singleton(lower).complement(),
        Op::Greater => Range::strictly_higher_than(lower),
        Op::GreaterEq => Range::higher_than(lower),
        Op::Less => Range::strictly_lower_than(lower),
        Op::LessEq => {
            let mut next = lower;
            next.patch += 1;
            next.pre = Prerelease::new("0").ok()?;
            Range::strictly_lower_than(next)
        }
        Op::Tilde => Range::between(lower, spec.tilde_upper()),
        Op::Caret => Range::between(lower, spec.caret_upper()),
    };

    Some(range)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Exact,
    NotEqual,
    Greater,
    GreaterEq,
    Less,
    LessEq,
    Tilde,
    Caret,
}

fn split_op(s: &str) -> (Op, &str) {
    for (prefix, op) in [
        (">=", Op::GreaterEq),
        ("<=", Op::LessEq),
        ("!=", Op::NotEqual),
        (">", Op::Greater),
        ("<", Op::Less),
        ("=", Op::Exact),
        ("^", Op::Caret),
        ("~", Op::Tilde),
    ] {
        if let Some(rest) = s.strip_prefix(prefix) {
            return (op, rest);
        }
    }
    (Op::Exact, s)
}

/// A version token with knowledge of which components were written out,
/// since `^1.0` and `^1.0.0` expand to different upper bounds.
struct VersionSpec {
    major: u64,
    minor: Option<u64>,
    patch: Option<u64>,
    pre: Prerelease,
}

impl VersionSpec {
    fn parse(s: &str) -> Option<VersionSpec> {
        if s.is_empty() {
            return None;
        }

        let (core, pre) = match s.split_once('-') {
            Some((core, pre)) => (core, Prerelease::new(pre).ok()?),
            None => (s, Prerelease::EMPTY),
        };

        let mut components = core.split('.');
        let major: u64 = components.next()?.parse().ok()?;
        let minor = match components.next() {
            None => None,
            Some(c) if is_wildcard(c) => None,
            Some(c) => Some(c.parse().ok()?),
        };
        let patch = match components.next() {
            None => None,
            Some(c) if is_wildcard(c) => None,
            Some(c) => Some(c.parse().ok()?),
        };
        if components.next().is_some() {
            return None;
        }

        Some(VersionSpec {
            major,
            minor,
            patch,
            pre,
        })
    }

    fn is_complete(&self) -> bool {
        self.minor.is_some() && self.patch.is_some()
    }

    /// Lower bound: unspecified components are zero, prerelease kept.
    fn lower(&self) -> Version {
        let mut v = Version::new(
            self.major,
            self.minor.unwrap_or(0),
            self.patch.unwrap_or(0),
        );
        v.pre = self.pre.clone();
        v
    }

    /// Upper bound for a partial version used as a range (`1.0` means
    /// `>=1.0.0 <1.1.0`, `1` means `>=1.0.0 <2.0.0`).
    fn pad_upper(&self) -> Version {
        if self.minor.is_some() {
            exclusive_bound(self.major, self.minor.unwrap() + 1, 0)
        } else {
            exclusive_bound(self.major + 1, 0, 0)
        }
    }

    /// Tilde allows patch-level changes when minor is given, otherwise
    /// minor-level changes.
    fn tilde_upper(&self) -> Version {
        match self.minor {
            Some(minor) => exclusive_bound(self.major, minor + 1, 0),
            None => exclusive_bound(self.major + 1, 0, 0),
        }
    }

    /// Caret allows changes that keep the left-most non-zero component.
    fn caret_upper(&self) -> Version {
        let minor = self.minor.unwrap_or(0);
        let patch = self.patch.unwrap_or(0);

        if self.major > 0 {
            exclusive_bound(self.major + 1, 0, 0)
        } else if minor > 0 {
            exclusive_bound(0, minor + 1, 0)
        } else {
            exclusive_bound(0, 0, patch + 1)
        }
    }
}

fn is_wildcard(c: &str) -> bool {
    c == "*" || c.eq_ignore_ascii_case("x")
}

/// An exclusive upper bound that also shuts out prereleases of the
/// bound itself (`<2.0.0-0` rather than `<2.0.0`).
fn exclusive_bound(major: u64, minor: u64, patch: u64) -> Version {
    let mut v = Version::new(major, minor, patch);
    v.pre = Prerelease::new("0").expect("static prerelease");
    v
}
