//! Whitelisted math namespace
//!
//! The only names an expression can reach. Normalization rewrites bare
//! `sqrt(`, `PI`, ... into `<prefix>.sqrt(`, `<prefix>.PI`; the tokenizer
//! resolves qualified names through [`MathNamespace`] and rejects everything
//! else.

/// Default qualifying prefix for namespace members
pub const DEFAULT_PREFIX: &str = "Math";

/// Whitelisted single-argument functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathFunction {
    /// Square root
    Sqrt,
    /// Sine (radians)
    Sin,
    /// Cosine (radians)
    Cos,
    /// Tangent (radians)
    Tan,
    /// Natural logarithm
    Log,
    /// Base-10 logarithm
    Log10,
}

impl MathFunction {
    /// Every whitelisted function
    pub const ALL: [Self; 6] = [
        Self::Sqrt,
        Self::Sin,
        Self::Cos,
        Self::Tan,
        Self::Log,
        Self::Log10,
    ];

    /// Name as written in expressions
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Sqrt => "sqrt",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Log => "log",
            Self::Log10 => "log10",
        }
    }

    /// Applies the function
    #[must_use]
    pub fn apply(&self, x: f64) -> f64 {
        match self {
            Self::Sqrt => x.sqrt(),
            Self::Sin => x.sin(),
            Self::Cos => x.cos(),
            Self::Tan => x.tan(),
            Self::Log => x.ln(),
            Self::Log10 => x.log10(),
        }
    }
}

/// Whitelisted named constants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathConstant {
    /// The ratio of a circle's circumference to its diameter
    Pi,
    /// Euler's number
    E,
}

impl MathConstant {
    /// Every whitelisted constant
    pub const ALL: [Self; 2] = [Self::Pi, Self::E];

    /// Name as written in expressions
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pi => "PI",
            Self::E => "E",
        }
    }

    /// Bound value
    #[must_use]
    pub const fn value(&self) -> f64 {
        match self {
            Self::Pi => std::f64::consts::PI,
            Self::E => std::f64::consts::E,
        }
    }
}

/// Math namespace: a qualifying prefix plus the whitelisted bindings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathNamespace {
    prefix: String,
}

impl Default for MathNamespace {
    fn default() -> Self {
        Self::new()
    }
}

impl MathNamespace {
    /// Creates the standard namespace (`Math.*`)
    #[must_use]
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_PREFIX)
    }

    /// Creates a namespace under a custom prefix
    #[must_use]
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Returns the qualifying prefix
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Looks up a function member by name
    #[must_use]
    pub fn function(&self, name: &str) -> Option<MathFunction> {
        MathFunction::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Looks up a constant member by name
    #[must_use]
    pub fn constant(&self, name: &str) -> Option<MathConstant> {
        MathConstant::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Qualified spelling of a member, e.g. `Math.sqrt`
    #[must_use]
    pub fn qualify(&self, member: &str) -> String {
        format!("{}.{member}", self.prefix)
    }
}
