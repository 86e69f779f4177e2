use alloc::{borrow::Cow, string::String};
use core::fmt;

/// One step of a path into a JSON document.
///
/// A path is a slice of segments: keys select object members, indices select
/// array elements. Use the [`path!`](crate::path) macro to build one from
/// literals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment<'a> {
    Key(Cow<'a, str>),
    Index(usize),
}

impl PathSegment<'_> {
    #[must_use]
    /// Returns the index if this segment is an index, otherwise `None`.
    pub fn as_index(&self) -> Option<usize> {
        if let Self::Index(v) = self {
            Some(*v)
        } else {
            None
        }
    }

    #[must_use]
    /// Returns the key if this segment is a key, otherwise `None`.
    pub fn as_key(&self) -> Option<&str> {
        if let Self::Key(v) = self {
            Some(v)
        } else {
            None
        }
    }

    /// Detaches the segment from any borrowed key text.
    #[must_use]
    pub fn into_owned(self) -> PathSegment<'static> {
        match self {
            Self::Key(k) => PathSegment::Key(Cow::Owned(k.into_owned())),
            Self::Index(i) => PathSegment::Index(i),
        }
    }
}

impl fmt::Display for PathSegment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => f.write_str(k),
            PathSegment::Index(i) => write!(f, "{i}"),
        }
    }
}

impl<'a> From<&'a str> for PathSegment<'a> {
    fn from(s: &'a str) -> Self {
        Self::Key(Cow::Borrowed(s))
    }
}

impl From<String> for PathSegment<'_> {
    fn from(s: String) -> Self {
        Self::Key(Cow::Owned(s))
    }
}

impl From<usize> for PathSegment<'_> {
    fn from(i: usize) -> Self {
        Self::Index(i)
    }
}

#[doc(hidden)]
pub trait PathSegmentFrom<T> {
    fn from_path_segment(value: T) -> Self;
}

macro_rules! impl_unsigned_as_path_segment {
    ($($t:ty),+) => {
        $(
            impl PathSegmentFrom<$t> for PathSegment<'_> {
                fn from_path_segment(value: $t) -> Self {
                    #[allow(clippy::cast_possible_truncation)]
                    PathSegment::Index(value as usize)
                }
            }
        )+
    };
}
impl_unsigned_as_path_segment!(u8, u16, u32, u64, usize);

// Integer literals without a suffix resolve to `i32`, so signed types must be
// accepted; a negative value is a caller bug.
macro_rules! impl_signed_as_path_segment {
    ($($t:ty),+) => {
        $(
            impl PathSegmentFrom<$t> for PathSegment<'_> {
                fn from_path_segment(value: $t) -> Self {
                    match usize::try_from(value) {
                        Ok(index) => PathSegment::Index(index),
                        Err(_) => panic!("negative path index {value}"),
                    }
                }
            }
        )+
    };
}
impl_signed_as_path_segment!(i8, i16, i32, i64, isize);

impl<'a> PathSegmentFrom<&'a str> for PathSegment<'a> {
    fn from_path_segment(value: &'a str) -> Self {
        PathSegment::Key(Cow::Borrowed(value))
    }
}

impl<'a> PathSegmentFrom<&'a String> for PathSegment<'a> {
    fn from_path_segment(value: &'a String) -> Self {
        PathSegment::Key(Cow::Borrowed(value.as_str()))
    }
}

impl PathSegmentFrom<String> for PathSegment<'_> {
    fn from_path_segment(value: String) -> Self {
        PathSegment::Key(Cow::Owned(value))
    }
}

impl<'a> PathSegmentFrom<PathSegment<'a>> for PathSegment<'a> {
    fn from_path_segment(value: PathSegment<'a>) -> Self {
        value
    }
}

// Custom (de)serialization so that a `Vec<PathSegment>` becomes e.g.
// `["foo", 0, "bar"]` instead of the default tagged representation.
#[cfg(any(test, feature = "serde"))]
mod serde_impls {
    use alloc::{borrow::Cow, string::String};
    use core::{fmt, marker::PhantomData};

    use serde::{
        Deserialize, Deserializer, Serialize, Serializer,
        de::{Error, Unexpected, Visitor},
    };

    use super::PathSegment;

    impl Serialize for PathSegment<'_> {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match self {
                PathSegment::Key(k) => serializer.serialize_str(k),
                PathSegment::Index(i) => serializer.serialize_u64(*i as u64),
            }
        }
    }

    struct PathSegmentVisitor<'a>(PhantomData<&'a ()>);

    impl<'de: 'a, 'a> Visitor<'de> for PathSegmentVisitor<'a> {
        type Value = PathSegment<'a>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or unsigned integer")
        }

        fn visit_borrowed_str<E>(self, value: &'de str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(PathSegment::Key(Cow::Borrowed(value)))
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(PathSegment::Key(Cow::Owned(value.into())))
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(PathSegment::Key(Cow::Owned(value)))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            usize::try_from(value)
                .map(PathSegment::Index)
                .map_err(|_| Error::invalid_value(Unexpected::Unsigned(value), &"array index"))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            usize::try_from(value).map(PathSegment::Index).map_err(|_| {
                Error::invalid_value(Unexpected::Signed(value), &"non-negative index")
            })
        }
    }

    impl<'de: 'a, 'a> Deserialize<'de> for PathSegment<'a> {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(PathSegmentVisitor(PhantomData))
        }
    }
}
