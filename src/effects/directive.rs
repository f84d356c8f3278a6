use std::fmt;
use std::str::FromStr;

use crate::error::{EffectError, FactoryError, Result};

/// A textual effect instruction: `"<name>,<param1>,<param2>,..."`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectDirective {
    pub name: String,
    pub params: Vec<String>,
}

impl EffectDirective {
    /// Split on commas; the first trimmed token is the name, the rest are
    /// positional parameters
    pub fn parse(text: &str) -> Result<Self> {
        let mut tokens = text.split(',').map(str::trim);
        let name = tokens.next().unwrap_or_default();
        if name.is_empty() {
            return Err(EffectError::EmptyDirective.into());
        }
        Ok(Self {
            name: name.to_string(),
            params: tokens.map(str::to_string).collect(),
        })
    }

    /// Fail unless the parameter count is within `min..=max`
    pub fn expect_params(&self, min: usize, max: usize) -> Result<()> {
        let count = self.params.len();
        if count < min || count > max {
            let expected = if min == max { min.to_string() } else { format!("{} to {}", min, max) };
            return Err(self.invalid(format!("expected {} parameters, got {}", expected, count)));
        }
        Ok(())
    }

    /// Parse the parameter at `index`
    pub fn param<T>(&self, index: usize) -> Result<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        let raw = self
            .params
            .get(index)
            .ok_or_else(|| self.invalid(format!("missing parameter {}", index + 1)))?;
        raw.parse()
            .map_err(|e| self.invalid(format!("parameter {} ('{}'): {}", index + 1, raw, e)))
    }

    /// Parse the parameter at `index` if it is present
    pub fn optional_param<T>(&self, index: usize) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        if index < self.params.len() {
            self.param(index).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Build an invalid-parameter error for this directive
    pub fn invalid(&self, reason: String) -> FactoryError {
        EffectError::InvalidParameters {
            effect: self.name.clone(),
            reason,
        }
        .into()
    }
}

impl FromStr for EffectDirective {
    type Err = FactoryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for EffectDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        for param in &self.params {
            write!(f, ",{}", param)?;
        }
        Ok(())
    }
}

/// What happened when a directive was applied to a clip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveOutcome {
    Applied,
    SkippedUnknown,
    SkippedInvalidParams { reason: String },
}

impl DirectiveOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// A directive string paired with its outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveReport {
    pub directive: String,
    pub outcome: DirectiveOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_name_and_params() {
        let d = EffectDirective::parse("center_foreground,2880,1920,300").unwrap();
        assert_eq!(d.name, "center_foreground");
        assert_eq!(d.params, vec!["2880", "1920", "300"]);
        assert_eq!(d.to_string(), "center_foreground,2880,1920,300");
    }

    #[test]
    fn parse_trims_and_keeps_empty_params() {
        let d: EffectDirective = " resize , 0.5 ,".parse().unwrap();
        assert_eq!(d.name, "resize");
        assert_eq!(d.params, vec!["0.5", ""]);

        let bare = EffectDirective::parse("even_size").unwrap();
        assert!(bare.params.is_empty());
    }

    #[test]
    fn parse_is_idempotent() {
        let text = "sparkle,1,2";
        assert_eq!(EffectDirective::parse(text).unwrap(), EffectDirective::parse(text).unwrap());
    }

    #[test]
    fn empty_directive_is_an_error() {
        assert!(matches!(
            EffectDirective::parse("  ,1"),
            Err(FactoryError::Effect(EffectError::EmptyDirective))
        ));
        assert!(EffectDirective::parse("").is_err());
    }

    #[test]
    fn typed_params() {
        let d = EffectDirective::parse("pan,800,abc").unwrap();
        assert_eq!(d.param::<u32>(0).unwrap(), 800);
        assert!(d.param::<f64>(1).is_err());
        assert!(d.param::<f64>(2).is_err());
        assert_eq!(d.optional_param::<f64>(2).unwrap(), None);
        assert!(d.expect_params(2, 3).is_ok());
        assert!(d.expect_params(0, 0).is_err());
    }
}
