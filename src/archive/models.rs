/*!
 Data structures used to describe and rebuild the archived class shapes this decoder recognizes.
*/

use std::fmt::{Display, Formatter, Result};

use plist::Value;

/// Field holding an archived dictionary's keys
pub(crate) const KEYS_FIELD: &str = "NS.keys";
/// Field holding an archived collection's members
pub(crate) const OBJECTS_FIELD: &str = "NS.objects";
/// Field holding an archived string's text
pub(crate) const STRING_FIELD: &str = "NS.string";
/// Field holding an archived date's offset from the reference date
pub(crate) const TIME_FIELD: &str = "NS.time";

const DICTIONARY_DESCRIPTOR: ShapeDescriptor = ShapeDescriptor {
    required_fields: &[KEYS_FIELD, OBJECTS_FIELD],
    class_names: &["NSDictionary", "NSMutableDictionary"],
};
const ARRAY_DESCRIPTOR: ShapeDescriptor = ShapeDescriptor {
    required_fields: &[OBJECTS_FIELD],
    class_names: &["NSArray", "NSMutableArray"],
};
const SET_DESCRIPTOR: ShapeDescriptor = ShapeDescriptor {
    required_fields: &[OBJECTS_FIELD],
    class_names: &["NSSet", "NSMutableSet"],
};
const STRING_DESCRIPTOR: ShapeDescriptor = ShapeDescriptor {
    required_fields: &[STRING_FIELD],
    class_names: &["NSString", "NSMutableString"],
};
const DATE_DESCRIPTOR: ShapeDescriptor = ShapeDescriptor {
    required_fields: &[TIME_FIELD],
    class_names: &["NSDate"],
};

/// The archived class shapes this decoder can rebuild
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// An archived `NSDictionary` or `NSMutableDictionary`
    Dictionary,
    /// An archived `NSArray` or `NSMutableArray`
    Array,
    /// An archived `NSSet` or `NSMutableSet`
    Set,
    /// An archived `NSString` or `NSMutableString`
    String,
    /// An archived `NSDate`
    Date,
    /// A UID reference to the archiver's `$null` sentinel
    Null,
    /// An archived class this decoder does not recognize
    Unrecognized,
}

impl Shape {
    /// Shapes matched through a [`ShapeDescriptor`], in the order
    /// [`classify`](crate::archive::decoder::classify) attempts them
    pub(crate) const RECOGNIZED: [Shape; 5] = [
        Shape::Dictionary,
        Shape::Array,
        Shape::Set,
        Shape::String,
        Shape::Date,
    ];

    /// The structural requirements an archived record must meet to match this shape
    ///
    /// [`Shape::Null`] and [`Shape::Unrecognized`] have no descriptor: the null sentinel
    /// is detected at the reference-token level and unrecognized records match nothing.
    pub fn descriptor(&self) -> Option<&'static ShapeDescriptor> {
        match self {
            Shape::Dictionary => Some(&DICTIONARY_DESCRIPTOR),
            Shape::Array => Some(&ARRAY_DESCRIPTOR),
            Shape::Set => Some(&SET_DESCRIPTOR),
            Shape::String => Some(&STRING_DESCRIPTOR),
            Shape::Date => Some(&DATE_DESCRIPTOR),
            Shape::Null | Shape::Unrecognized => None,
        }
    }
}

impl Display for Shape {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> Result {
        match self {
            Shape::Dictionary => write!(fmt, "NSDictionary"),
            Shape::Array => write!(fmt, "NSArray"),
            Shape::Set => write!(fmt, "NSSet"),
            Shape::String => write!(fmt, "NSString"),
            Shape::Date => write!(fmt, "NSDate"),
            Shape::Null => write!(fmt, "$null"),
            Shape::Unrecognized => write!(fmt, "an unrecognized class"),
        }
    }
}

/// Describes the structure an archived record must have to match a [`Shape`]
#[derive(Debug, PartialEq, Eq)]
pub struct ShapeDescriptor {
    /// Fields that must all be present on the record
    pub required_fields: &'static [&'static str],
    /// Class names accepted for the record's resolved `$classname`
    pub class_names: &'static [&'static str],
}

/// An archived dictionary rebuilt from its parallel key and value arrays
///
/// The archive stores keys and values as two separate lists, and the keys themselves
/// are usually unresolved [`Uid`](plist::Uid) tokens rather than strings. Entries
/// therefore keep the full [`Value`] key and preserve the archive's ordering instead
/// of going through a string-keyed map.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArchivedDictionary {
    entries: Vec<(Value, Value)>,
}

impl ArchivedDictionary {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Appends an entry, refusing a key that is already present
    pub(crate) fn insert(&mut self, key: Value, value: Value) -> bool {
        if self.contains_key(&key) {
            return false;
        }
        self.entries.push((key, value));
        true
    }

    /// Looks up the value stored for a key
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == key)
            .map(|(_, value)| value)
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        self.entries.iter().any(|(candidate, _)| candidate == key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in the archive's key order
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, value)| value)
    }
}
