//! Built-in mathematical constants recognized by the expression grammar
//!
//! Identifiers matching one of these names parse to a constant rather than a
//! free variable, so they never appear in an equation's variable set.

use std::collections::BTreeSet;

/// Euler–Mascheroni constant
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;
/// Catalan's constant
const CATALAN: f64 = 0.915_965_594_177_219;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constant {
    Pi,
    E,
    /// Imaginary unit
    I,
    Infinity,
    /// Complex (unsigned) infinity
    ComplexInfinity,
    NaN,
    EulerGamma,
    GoldenRatio,
    Catalan,
}

impl Constant {
    pub const ALL: [Constant; 9] = [
        Constant::Pi,
        Constant::E,
        Constant::I,
        Constant::Infinity,
        Constant::ComplexInfinity,
        Constant::NaN,
        Constant::EulerGamma,
        Constant::GoldenRatio,
        Constant::Catalan,
    ];

    /// Name as written in equation text
    pub fn name(&self) -> &'static str {
        match self {
            Constant::Pi => "pi",
            Constant::E => "E",
            Constant::I => "I",
            Constant::Infinity => "oo",
            Constant::ComplexInfinity => "zoo",
            Constant::NaN => "nan",
            Constant::EulerGamma => "EulerGamma",
            Constant::GoldenRatio => "GoldenRatio",
            Constant::Catalan => "Catalan",
        }
    }

    pub fn from_name(name: &str) -> Option<Constant> {
        Constant::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Real value of the constant, or `None` when it has no real value
    pub fn value(&self) -> Option<f64> {
        match self {
            Constant::Pi => Some(std::f64::consts::PI),
            Constant::E => Some(std::f64::consts::E),
            Constant::I | Constant::ComplexInfinity => None,
            Constant::Infinity => Some(f64::INFINITY),
            Constant::NaN => Some(f64::NAN),
            Constant::EulerGamma => Some(EULER_GAMMA),
            Constant::GoldenRatio => Some((1.0 + 5.0_f64.sqrt()) / 2.0),
            Constant::Catalan => Some(CATALAN),
        }
    }

    /// Whether a variable with this name must be rejected as input.
    ///
    /// Number-like symbols, the imaginary unit and complex infinity are
    /// restricted; `oo` and `nan` are not.
    pub fn is_restricted(&self) -> bool {
        !matches!(self, Constant::Infinity | Constant::NaN)
    }
}

/// Return the names that collide with a restricted built-in constant, sorted
pub fn restricted_names<'a, I>(names: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .filter(|name| Constant::from_name(name).is_some_and(|c| c.is_restricted()))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_round_trips_names() {
        for c in Constant::ALL {
            assert_eq!(Constant::from_name(c.name()), Some(c));
        }
        assert_eq!(Constant::from_name("PI"), None);
        assert_eq!(Constant::from_name("e"), None);
    }

    #[test]
    fn test_restricted_names() {
        let found = restricted_names(["I", "R", "pi", "oo", "radius", "E"]);
        let expected: Vec<&str> = vec!["E", "I", "pi"];
        assert_eq!(found.iter().map(String::as_str).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn test_imaginary_unit_has_no_real_value() {
        assert!(Constant::I.value().is_none());
        assert!(Constant::ComplexInfinity.value().is_none());
        assert!((Constant::GoldenRatio.value().unwrap() - 1.618_033_988_75).abs() < 1e-10);
    }
}
