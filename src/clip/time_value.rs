use std::fmt;
use std::sync::Arc;

/// An effect parameter that is either fixed or a pure function of time
///
/// Functions must be deterministic: resolving the same `t` twice has to give
/// the same value, since frames may be rendered in any order and in parallel.
#[derive(Clone)]
pub enum TimeValue<T> {
    Constant(T),
    Function(Arc<dyn Fn(f64) -> T + Send + Sync>),
}

impl<T: Clone> TimeValue<T> {
    pub fn constant(value: T) -> Self {
        Self::Constant(value)
    }

    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(f64) -> T + Send + Sync + 'static,
    {
        Self::Function(Arc::new(f))
    }

    /// Value at time `t` (seconds)
    pub fn resolve(&self, t: f64) -> T {
        match self {
            Self::Constant(value) => value.clone(),
            Self::Function(f) => f(t),
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Constant(_))
    }
}

impl TimeValue<f64> {
    /// `start + per_second * t`
    pub fn linear(start: f64, per_second: f64) -> Self {
        Self::from_fn(move |t| start + per_second * t)
    }

    /// `base + amplitude * sin(2π * frequency_hz * t)`
    pub fn sinusoid(base: f64, amplitude: f64, frequency_hz: f64) -> Self {
        Self::from_fn(move |t| base + amplitude * (std::f64::consts::TAU * frequency_hz * t).sin())
    }
}

impl<T> From<T> for TimeValue<T> {
    fn from(value: T) -> Self {
        Self::Constant(value)
    }
}

impl<T: Default> Default for TimeValue<T> {
    fn default() -> Self {
        Self::Constant(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for TimeValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}
