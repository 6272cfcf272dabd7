//! Key classification and the nesting state machine.
//!
//! Every key of a block is classified once into a [`KeyKind`]. Whether that
//! kind may appear depends only on the [`NestingState`] of the enclosing
//! block, and entering a nested kind moves the walker to a new state:
//!
//! | State | Property | Pseudo | Media | Variants |
//! |-------|----------|--------|-------|----------|
//! | `TopLevel` | yes | -> `PseudoSelector` | -> `MediaQuery` | -> `Variant` |
//! | `Variant` | yes | -> `PseudoSelector` | -> `MediaQuery` | no |
//! | `MediaQuery` | yes | -> `PseudoSelector` | no | no |
//! | `PseudoSelector` | yes | no | no | no |

/// The literal key that introduces named variants.
pub const VARIANTS_KEY: &str = "@variants";

/// Syntactic kind of a block key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// A CSS property name, e.g. `color` or `-webkit-appearance`.
    Property,
    /// A pseudo-class or pseudo-element, e.g. `:hover` or `::before`.
    PseudoSelector,
    /// A media query, e.g. `@media (min-width: 600px)`.
    MediaQuery,
    /// The `@variants` block.
    Variants,
    /// Anything else.
    Invalid,
}

impl KeyKind {
    /// Classifies a key.
    ///
    /// Precedence is `@variants`, then pseudo-selector, then media query,
    /// then property.
    pub fn classify(key: &str) -> Self {
        if key == VARIANTS_KEY {
            KeyKind::Variants
        } else if is_pseudo_selector(key) {
            KeyKind::PseudoSelector
        } else if key.starts_with("@media") {
            KeyKind::MediaQuery
        } else if is_property(key) {
            KeyKind::Property
        } else {
            KeyKind::Invalid
        }
    }

    /// Returns a human-readable name for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            KeyKind::Property => "property",
            KeyKind::PseudoSelector => "pseudo-selector",
            KeyKind::MediaQuery => "media query",
            KeyKind::Variants => "variants",
            KeyKind::Invalid => "invalid",
        }
    }
}

impl std::fmt::Display for KeyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// `:` followed by a letter or a second colon.
fn is_pseudo_selector(key: &str) -> bool {
    let mut chars = key.chars();
    chars.next() == Some(':')
        && chars
            .next()
            .is_some_and(|c| c == ':' || c.is_ascii_alphabetic())
}

fn is_property(key: &str) -> bool {
    key.chars()
        .next()
        .is_some_and(|c| c == '-' || c.is_ascii_alphabetic())
}

/// Which kind of block the walker is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NestingState {
    /// Directly inside a class block.
    TopLevel,
    /// Inside one variant's block.
    Variant,
    /// Inside a media query block.
    MediaQuery,
    /// Inside a pseudo-selector block.
    PseudoSelector,
}

impl NestingState {
    /// Returns `true` if a key of `kind` may appear in this state.
    ///
    /// [`KeyKind::Invalid`] is never allowed.
    pub fn allows(self, kind: KeyKind) -> bool {
        match kind {
            KeyKind::Property => true,
            KeyKind::PseudoSelector => matches!(
                self,
                NestingState::TopLevel | NestingState::Variant | NestingState::MediaQuery
            ),
            KeyKind::MediaQuery => {
                matches!(self, NestingState::TopLevel | NestingState::Variant)
            }
            KeyKind::Variants => self == NestingState::TopLevel,
            KeyKind::Invalid => false,
        }
    }

    /// The state a nested block of `kind` is walked in.
    ///
    /// Returns `None` for kinds that do not open a block, or that are not
    /// allowed here.
    pub fn enter(self, kind: KeyKind) -> Option<NestingState> {
        if !self.allows(kind) {
            return None;
        }
        match kind {
            KeyKind::PseudoSelector => Some(NestingState::PseudoSelector),
            KeyKind::MediaQuery => Some(NestingState::MediaQuery),
            KeyKind::Variants => Some(NestingState::Variant),
            KeyKind::Property | KeyKind::Invalid => None,
        }
    }

    /// Returns a human-readable name for this state.
    pub fn as_str(self) -> &'static str {
        match self {
            NestingState::TopLevel => "top-level",
            NestingState::Variant => "variant",
            NestingState::MediaQuery => "media-query",
            NestingState::PseudoSelector => "pseudo-selector",
        }
    }
}

impl std::fmt::Display for NestingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
