//! The tag-filter grammar compiled into Overpass QL bracket fragments.
//!
//! A [`Tag`] describes one attribute predicate on a map feature. Each valid
//! tag compiles to exactly one bracketed fragment of the query language;
//! negation is single-level only, and the two forms the language cannot
//! express compile to the empty fragment instead.

/// An attribute filter on a map feature.
///
/// Negation wraps another tag, but only one level deep: `Not(Not(_))` and
/// `Not(MatchesKeyAndValue { .. })` have no Overpass QL spelling. Those
/// combinations report `false` from [`Tag::is_valid`] and compile to the
/// empty fragment, matching the historical skip-then-fail behaviour.
///
/// # Examples
/// ```
/// use overpass_core::Tag;
///
/// assert_eq!(Tag::has_key("amenity").fragment(), r#"["amenity"]"#);
/// assert_eq!(
///     Tag::not(Tag::has_value("amenity", "pub")).fragment(),
///     r#"["amenity"!="pub"]"#,
/// );
/// ```
#[derive(Debug, Clone)]
pub enum Tag {
    /// The key is present, with any value.
    HasKey(String),
    /// The key is present with exactly this value.
    HasValue {
        /// Literal key.
        key: String,
        /// Literal value to match.
        value: String,
    },
    /// The key is present and its value matches a regular expression.
    MatchesValue {
        /// Literal key.
        key: String,
        /// Regular expression applied to the value.
        value: String,
    },
    /// Both key and value match regular expressions.
    MatchesKeyAndValue {
        /// Regular expression applied to the key.
        key: String,
        /// Regular expression applied to the value.
        value: String,
    },
    /// Negation of another tag.
    Not(Box<Tag>),
}

impl Tag {
    /// Filter for the presence of `key`.
    pub fn has_key(key: impl Into<String>) -> Self {
        Tag::HasKey(key.into())
    }

    /// Filter for `key` having exactly `value`.
    pub fn has_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Tag::HasValue {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Filter for `key` having a value matching the `value` regex.
    pub fn matches_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Tag::MatchesValue {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Filter matching both key and value as regexes.
    pub fn matches_key_and_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Tag::MatchesKeyAndValue {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Negate another tag.
    pub fn not(tag: Tag) -> Self {
        Tag::Not(Box::new(tag))
    }

    /// Whether the tag has an Overpass QL spelling.
    ///
    /// Double negation and negated key-and-value regex matches do not;
    /// negating an already-invalid tag is likewise invalid.
    pub fn is_valid(&self) -> bool {
        match self {
            Tag::Not(inner) => {
                !matches!(**inner, Tag::Not(_) | Tag::MatchesKeyAndValue { .. })
                    && inner.is_valid()
            }
            _ => true,
        }
    }

    /// Compile the tag to its bracket fragment.
    ///
    /// Invalid tags compile to the empty string rather than a malformed
    /// fragment.
    pub fn fragment(&self) -> String {
        match self {
            Tag::HasKey(key) => format!("[\"{key}\"]"),
            Tag::HasValue { key, value } => format!("[\"{key}\"=\"{value}\"]"),
            Tag::MatchesValue { key, value } => format!("[\"{key}\"~\"{value}\"]"),
            Tag::MatchesKeyAndValue { key, value } => format!("[~\"{key}\"~\"{value}\"]"),
            Tag::Not(inner) => match &**inner {
                Tag::HasKey(key) => format!("[!\"{key}\"]"),
                Tag::HasValue { key, value } => format!("[\"{key}\"!=\"{value}\"]"),
                Tag::MatchesValue { key, value } => format!("[\"{key}\"!~\"{value}\"]"),
                _ => String::new(),
            },
        }
    }

    /// Structural comparison without the validity gate.
    fn structurally_eq(&self, other: &Tag) -> bool {
        match (self, other) {
            (Tag::HasKey(lhs), Tag::HasKey(rhs)) => lhs == rhs,
            (
                Tag::HasValue {
                    key: lhs_key,
                    value: lhs_value,
                },
                Tag::HasValue {
                    key: rhs_key,
                    value: rhs_value,
                },
            )
            | (
                Tag::MatchesValue {
                    key: lhs_key,
                    value: lhs_value,
                },
                Tag::MatchesValue {
                    key: rhs_key,
                    value: rhs_value,
                },
            )
            | (
                Tag::MatchesKeyAndValue {
                    key: lhs_key,
                    value: lhs_value,
                },
                Tag::MatchesKeyAndValue {
                    key: rhs_key,
                    value: rhs_value,
                },
            ) => lhs_key == rhs_key && lhs_value == rhs_value,
            (Tag::Not(lhs), Tag::Not(rhs)) => lhs.structurally_eq(rhs),
            _ => false,
        }
    }
}

/// Two tags are equal only when both are valid and structurally identical.
///
/// An invalid tag is unequal to everything, itself included, so `Eq` is
/// deliberately not implemented. This preserves the original contract and is
/// why tag collections are slices rather than hash sets.
impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.is_valid() && other.is_valid() && self.structurally_eq(other)
    }
}
