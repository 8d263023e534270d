/// Best-effort side effects a use case may perform besides its primary operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SideEffect {
    CacheLookup,
    CachePopulate,
    CacheInvalidate,
    ImageUpload,
    ImageCleanup,
    Notify,
}

impl std::fmt::Display for SideEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::CacheLookup => "cache lookup",
            Self::CachePopulate => "cache populate",
            Self::CacheInvalidate => "cache invalidate",
            Self::ImageUpload => "image upload",
            Self::ImageCleanup => "image cleanup",
            Self::Notify => "notification",
        };
        write!(f, "{name}")
    }
}

/// A side effect that failed without failing the use case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Advisory {
    pub effect: SideEffect,
    pub reason: String,
}

impl Advisory {
    pub fn new(effect: SideEffect, reason: impl std::fmt::Display) -> Self {
        Self {
            effect,
            reason: reason.to_string(),
        }
    }
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.effect, self.reason)
    }
}

/// Successful result of a use case.
///
/// The primary value is what the caller asked for; advisories report best
/// effort steps that did not go through. Advisories never change the value.
#[derive(Debug, Clone)]
pub struct Outcome<T> {
    value: T,
    advisories: Vec<Advisory>,
}

impl<T> Outcome<T> {
    pub fn new(value: T, advisories: Vec<Advisory>) -> Self {
        Self { value, advisories }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn into_parts(self) -> (T, Vec<Advisory>) {
        (self.value, self.advisories)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        Outcome {
            value: f(self.value),
            advisories: self.advisories,
        }
    }

    pub fn advisories(&self) -> &[Advisory] {
        &self.advisories
    }

    pub fn is_clean(&self) -> bool {
        self.advisories.is_empty()
    }

    pub fn failed(&self, effect: SideEffect) -> bool {
        self.advisories.iter().any(|a| a.effect == effect)
    }

    /// Whether the new tweet notification reached the publisher, meaningful
    /// only for create outcomes.
    pub fn notification_published(&self) -> bool {
        !self.failed(SideEffect::Notify)
    }
}
