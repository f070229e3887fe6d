use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::parse_util;
use crate::parse_util::ParseError;

/// Rules of Conway's Game of Life.
pub const B3S23: RuleSet = RuleSet::new(0b1000, 0b1100);

/// Well-known rules, as `(name, title)`.
const AVAILABLE: [(&str, &str); 15] = [
    ("B3/S23", "Conway's Life"),
    ("B36/S23", "HighLife"),
    ("B1357/S02468", "Replicator"),
    ("B1357/S02468", "Fredkin"),
    ("B2/S", "Seeds"),
    ("B2/S0", "Live Free or Die"),
    ("B3/S012345678", "Life Without Death"),
    ("B3/S12", "Flock"),
    ("B3/S1234", "Mazectric"),
    ("B3/S12345", "Maze"),
    ("B36/S125", "2x2"),
    ("B368/S245", "Move"),
    ("B3678/S34678", "Day & Night"),
    ("B37/S23", "DryLife"),
    ("B38/S23", "Pedestrian Life"),
];

/// Birth and survival neighbour counts.
///
/// # Representation
/// Life rules are represented as
/// ```notrust
/// |------birth------|
/// 0000_0000_0000_0000_0000_0000_0000_0000
///                     |----survival-----|
/// ```
/// Bit `i` of either half is set when `i` neighbours trigger a birth (resp. survival).
///
/// # Examples
/// ```notrust
/// b3s23:                0000_0000_0000_1000_0000_0000_0000_1100
///
/// b0s0:                 0000_0000_0000_0001_0000_0000_0000_0001
/// b012345678s012345678: 0000_0001_1111_1111_0000_0001_1111_1111
/// ```
///
/// See: https://conwaylife.com/wiki/Rulestring
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct RuleSet {
    rule: u32,
}

impl Default for RuleSet {
    fn default() -> Self {
        B3S23
    }
}

impl RuleSet {
    /// Create a new `RuleSet` for the given births and survivals. For both `b` and
    /// `s`, numbers are set on a bit basis. For instance if bit `i` in `b` is on, it
    /// means `i` is included in the set of births. Any bit past the 8th is ignored.
    pub const fn new(b: u16, s: u16) -> Self {
        let b = b & 0x1FF;
        let s = s & 0x1FF;

        Self {
            rule: (b as u32) << 16 | s as u32,
        }
    }

    pub const fn births(&self) -> u16 {
        ((self.rule & 0x1FF0000) >> 0x10) as u16
    }

    pub const fn survivals(&self) -> u16 {
        (self.rule & 0x1FF) as u16
    }

    /// Does a dead cell with `neighbors` live neighbours come to life?
    pub const fn born(&self, neighbors: u8) -> bool {
        neighbors <= 8 && self.births() & (1 << neighbors) != 0
    }

    /// Does a live cell with `neighbors` live neighbours stay alive?
    pub const fn survives(&self, neighbors: u8) -> bool {
        neighbors <= 8 && self.survivals() & (1 << neighbors) != 0
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("Malformed rule \"{rule}\": {reason}")]
    MalformedRule { rule: String, reason: RuleSyntax },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleSyntax {
    #[error("missing '/' between births and survivals")]
    MissingSeparator,

    #[error("bad births prefix: {0}")]
    BirthPrefix(#[source] ParseError),

    #[error("bad survivals prefix: {0}")]
    SurvivalPrefix(#[source] ParseError),

    #[error("'{got}' is not a neighbour count between 0 and 8")]
    InvalidCount { got: char },
}

/// Parse rules that look like `B3/S23`, ignoring case.
pub(crate) fn parse_rule(bytes: &[u8]) -> Result<RuleSet, RuleSyntax> {
    let Some((b, s)) = parse_util::split_once(b'/', bytes) else {
        return Err(RuleSyntax::MissingSeparator);
    };

    let b = parse_util::expect_ignore_case(b'B', b).map_err(RuleSyntax::BirthPrefix)?;
    let s = parse_util::expect_ignore_case(b'S', s).map_err(RuleSyntax::SurvivalPrefix)?;

    Ok(RuleSet::new(bytes_to_num(b)?, bytes_to_num(s)?))
}

/// Convert the human readable birth/survival counts to a packed bit representation
fn bytes_to_num(bytes: &[u8]) -> Result<u16, RuleSyntax> {
    let mut n = 0;

    for &b in bytes {
        if !(b'0'..=b'8').contains(&b) {
            return Err(RuleSyntax::InvalidCount { got: b as char });
        }

        n |= 1 << (b - b'0');
    }

    Ok(n)
}

/// A named birth/survival rule.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Rule {
    name: String,
    title: String,
    set: RuleSet,
}

impl Default for Rule {
    fn default() -> Self {
        Self {
            name: AVAILABLE[0].0.to_string(),
            title: AVAILABLE[0].1.to_string(),
            set: B3S23,
        }
    }
}

impl Rule {
    /// Parse a rule and give it a title.
    pub fn new(name: &str, title: &str) -> Result<Self, RuleError> {
        let set = parse_rule(name.as_bytes()).map_err(|reason| RuleError::MalformedRule {
            rule: name.to_string(),
            reason,
        })?;

        Ok(Self {
            name: name.to_ascii_uppercase(),
            title: title.to_string(),
            set,
        })
    }

    /// Parse a user-supplied rule, titled "Custom".
    pub fn parse(name: &str) -> Result<Self, RuleError> {
        Self::new(name, "Custom")
    }

    /// Every well-known rule, in menu order.
    pub fn available() -> Vec<Rule> {
        AVAILABLE
            .iter()
            .filter_map(|(name, title)| Self::new(name, title).ok())
            .collect()
    }

    /// Resolve `name` against the well-known rules first, then as a custom rule.
    pub fn lookup(name: &str) -> Result<Self, RuleError> {
        let upper = name.trim().to_ascii_uppercase();

        match Self::available().into_iter().find(|r| r.name == upper) {
            Some(rule) => Ok(rule),
            None => Self::parse(&upper),
        }
    }

    /// Canonical uppercase name, e.g. `B3/S23`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn display_title(&self) -> String {
        format!("{} ({})", self.title, self.name)
    }

    pub fn rule_set(&self) -> RuleSet {
        self.set
    }

    pub fn born(&self, neighbors: u8) -> bool {
        self.set.born(neighbors)
    }

    pub fn survives(&self, neighbors: u8) -> bool {
        self.set.survives(neighbors)
    }

    pub fn born_set(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=8).filter(|&n| self.set.born(n))
    }

    pub fn survive_set(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=8).filter(|&n| self.set.survives(n))
    }
}

impl FromStr for Rule {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_title())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::Rule;
    use super::RuleError;
    use super::RuleSyntax;
    use super::B3S23;

    #[test]
    fn conway() {
        let rule: Rule = "b3/s23".parse().unwrap();

        assert_eq!(rule.name(), "B3/S23");
        assert_eq!(rule.rule_set(), B3S23);
        assert_eq!(rule.born_set().collect::<Vec<_>>(), [3]);
        assert_eq!(rule.survive_set().collect::<Vec<_>>(), [2, 3]);
    }

    #[test]
    fn empty_survivals_are_valid() {
        let seeds = Rule::parse("B2/S").unwrap();

        assert!(seeds.born(2));
        assert_eq!(seeds.survive_set().count(), 0);
    }

    #[test]
    fn display_title() {
        let rule = Rule::new("B36/S23", "HighLife").unwrap();

        assert_eq!(rule.display_title(), "HighLife (B36/S23)");
        assert_eq!(rule.to_string(), "HighLife (B36/S23)");
    }

    #[test]
    fn malformed() {
        let reason = |s: &str| match Rule::parse(s) {
            Err(RuleError::MalformedRule { reason, .. }) => reason,
            Ok(rule) => panic!("{s} parsed as {rule:?}"),
        };

        assert_eq!(reason("B3S23"), RuleSyntax::MissingSeparator);
        assert!(matches!(reason("3/S23"), RuleSyntax::BirthPrefix(_)));
        assert!(matches!(reason("B3/23"), RuleSyntax::SurvivalPrefix(_)));
        assert!(matches!(reason("/S23"), RuleSyntax::BirthPrefix(_)));
        assert!(matches!(reason("B3/"), RuleSyntax::SurvivalPrefix(_)));
        assert_eq!(reason("B39/S23"), RuleSyntax::InvalidCount { got: '9' });
        assert_eq!(reason("B3/S2/3"), RuleSyntax::InvalidCount { got: '/' });
    }

    #[test]
    fn registry() {
        let rules = Rule::available();

        assert_eq!(rules.len(), 15);
        assert_eq!(rules[0], Rule::default());
        assert!(rules.iter().any(|r| r.title() == "Day & Night"));
    }

    #[test]
    fn lookup_prefers_registry() {
        assert_eq!(Rule::lookup("b36/s23").unwrap().title(), "HighLife");
        assert_eq!(Rule::lookup("B45/S12").unwrap().title(), "Custom");
        assert!(Rule::lookup("nonsense").is_err());
    }

    fn rule_name() -> impl Strategy<Value = (String, Vec<u8>, Vec<u8>)> {
        let counts = || proptest::collection::vec(0u8..=8, 0..12);

        (any::<bool>(), any::<bool>(), counts(), counts()).prop_map(|(lb, ls, b, s)| {
            let digits = |v: &[u8]| v.iter().map(|d| char::from(b'0' + d)).collect::<String>();
            let name = format!(
                "{}{}/{}{}",
                if lb { 'b' } else { 'B' },
                digits(&b),
                if ls { 's' } else { 'S' },
                digits(&s)
            );

            (name, b, s)
        })
    }

    proptest! {
        #[test]
        fn name_round_trips((name, b, s) in rule_name()) {
            let rule = Rule::parse(&name).unwrap();

            prop_assert_eq!(rule.name(), name.to_uppercase());

            for n in 0..=8 {
                prop_assert_eq!(rule.born(n), b.contains(&n));
                prop_assert_eq!(rule.survives(n), s.contains(&n));
            }
        }
    }
}
