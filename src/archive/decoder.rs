/*!
 Contains logic to classify archived records by shape and convert them back into
 native Rust data structures.

 Conversion is shallow on purpose: a converter rebuilds one level of structure, and
 the members it returns may still be UID tokens. Callers walk the graph by applying
 [`classify`] and the matching converter repeatedly, resolving references through the
 supplied [`ResolveUid`] as they go.
*/

use chrono::{DateTime, Utc};
use plist::{Dictionary, Value};

use crate::{
    archive::{
        models::{
            ArchivedDictionary, Shape, ShapeDescriptor, KEYS_FIELD, OBJECTS_FIELD, STRING_FIELD,
            TIME_FIELD,
        },
        resolver::{ResolveUid, NULL_MARKER},
    },
    error::archive::ArchiveError,
};

/// Key holding the UID of a record's class descriptor
const CLASS_KEY: &str = "$class";
/// Key holding the class name inside a resolved class descriptor
const CLASS_NAME_KEY: &str = "$classname";
/// Seconds between the unix epoch and the reference date of 2001-01-01T00:00:00Z
const REFERENCE_DATE_OFFSET: i64 = 978_307_200;
/// Nanoseconds in one second, for rebuilding the fractional part of an offset
const NANOS_PER_SECOND: f64 = 1_000_000_000.;

/// Checks whether a candidate value structurally matches a [`ShapeDescriptor`]
///
/// A candidate matches when it is a record containing every required field whose
/// `$class` token resolves to a class descriptor with an accepted `$classname`.
/// A missing or malformed `$class` means no match, never an error.
pub fn matches_shape<R: ResolveUid>(
    candidate: &Value,
    resolver: &R,
    descriptor: &ShapeDescriptor,
) -> bool {
    let Some(record) = candidate.as_dictionary() else {
        return false;
    };
    if !descriptor
        .required_fields
        .iter()
        .all(|field| record.contains_key(field))
    {
        return false;
    }
    let class_descriptor = match record.get(CLASS_KEY) {
        Some(Value::Uid(token)) => resolver.resolve(token),
        Some(_) | None => return false,
    };
    match class_descriptor
        .as_dictionary()
        .and_then(|class| class.get(CLASS_NAME_KEY))
        .and_then(Value::as_string)
    {
        Some(name) => descriptor.class_names.contains(&name),
        None => false,
    }
}

/// Determines which [`Shape`] a candidate value matches
///
/// Unknown archived classes are not an error: they classify as
/// [`Shape::Unrecognized`] and the caller decides whether to pass the raw
/// record through or fail.
pub fn classify<R: ResolveUid>(candidate: &Value, resolver: &R) -> Shape {
    if is_null(candidate, resolver) {
        return Shape::Null;
    }
    for shape in Shape::RECOGNIZED {
        if matches(candidate, resolver, shape) {
            return shape;
        }
    }
    Shape::Unrecognized
}

fn matches<R: ResolveUid>(candidate: &Value, resolver: &R, shape: Shape) -> bool {
    shape
        .descriptor()
        .is_some_and(|descriptor| matches_shape(candidate, resolver, descriptor))
}

/// Checks whether a candidate is an archived `NSDictionary` or `NSMutableDictionary`
pub fn is_dictionary<R: ResolveUid>(candidate: &Value, resolver: &R) -> bool {
    matches(candidate, resolver, Shape::Dictionary)
}

/// Checks whether a candidate is an archived `NSArray` or `NSMutableArray`
pub fn is_array<R: ResolveUid>(candidate: &Value, resolver: &R) -> bool {
    matches(candidate, resolver, Shape::Array)
}

/// Checks whether a candidate is an archived `NSSet` or `NSMutableSet`
pub fn is_set<R: ResolveUid>(candidate: &Value, resolver: &R) -> bool {
    matches(candidate, resolver, Shape::Set)
}

/// Checks whether a candidate is an archived `NSString` or `NSMutableString`
pub fn is_string<R: ResolveUid>(candidate: &Value, resolver: &R) -> bool {
    matches(candidate, resolver, Shape::String)
}

/// Checks whether a candidate is an archived `NSDate`
pub fn is_date<R: ResolveUid>(candidate: &Value, resolver: &R) -> bool {
    matches(candidate, resolver, Shape::Date)
}

/// Checks whether a candidate is a UID reference to the archiver's `$null` sentinel
///
/// Unlike the shape predicates this inspects the raw token itself: the null marker is
/// stored once in the object table and referenced by UID wherever a value is absent,
/// so there is no record to match against.
pub fn is_null<R: ResolveUid>(candidate: &Value, resolver: &R) -> bool {
    match candidate {
        Value::Uid(token) => resolver.resolve(token).as_string() == Some(NULL_MARKER),
        _ => false,
    }
}

/// Verifies a candidate matches the given shape before any extraction happens
///
/// Converters are safe to call without classifying first, so each one re-runs its
/// shape check and refuses non-matching input here.
fn ensure_shape<'a, R: ResolveUid>(
    candidate: &'a Value,
    resolver: &R,
    shape: Shape,
) -> Result<&'a Dictionary, ArchiveError> {
    if !matches(candidate, resolver, shape) {
        return Err(ArchiveError::ShapeMismatch(shape));
    }
    candidate
        .as_dictionary()
        .ok_or(ArchiveError::ShapeMismatch(shape))
}

fn extract_members(record: &Dictionary) -> Result<Vec<Value>, ArchiveError> {
    record
        .get(OBJECTS_FIELD)
        .and_then(Value::as_array)
        .cloned()
        .ok_or(ArchiveError::InvalidType(OBJECTS_FIELD, "array"))
}

/// Rebuilds an archived dictionary from its parallel `NS.keys` and `NS.objects` arrays
///
/// The archive stores a dictionary as two lists, one of keys and one of values, which
/// removes all of the convenience a dictionary affords. This pairs them back up so
/// values can be looked up by key, keeping the archive's key order. Keys and values
/// may still be unresolved UID tokens.
pub fn convert_dictionary<R: ResolveUid>(
    candidate: &Value,
    resolver: &R,
) -> Result<ArchivedDictionary, ArchiveError> {
    let record = ensure_shape(candidate, resolver, Shape::Dictionary)?;

    let keys = record
        .get(KEYS_FIELD)
        .and_then(Value::as_array)
        .ok_or(ArchiveError::InvalidType(KEYS_FIELD, "array"))?;
    let values = record
        .get(OBJECTS_FIELD)
        .and_then(Value::as_array)
        .ok_or(ArchiveError::InvalidType(OBJECTS_FIELD, "array"))?;
    if keys.len() != values.len() {
        return Err(ArchiveError::LengthMismatch(keys.len(), values.len()));
    }

    let mut dictionary = ArchivedDictionary::with_capacity(keys.len());
    for (key, value) in keys.iter().zip(values) {
        if !dictionary.insert(key.clone(), value.clone()) {
            return Err(ArchiveError::DuplicateKey);
        }
    }
    Ok(dictionary)
}

/// Extracts an archived array's members, preserving order and duplicates
pub fn convert_array<R: ResolveUid>(
    candidate: &Value,
    resolver: &R,
) -> Result<Vec<Value>, ArchiveError> {
    let record = ensure_shape(candidate, resolver, Shape::Array)?;
    extract_members(record)
}

/// Extracts an archived set's members
///
/// The members come back as a sequence in storage order; the archiver is trusted to
/// have enforced uniqueness, so nothing is deduplicated here.
pub fn convert_set<R: ResolveUid>(
    candidate: &Value,
    resolver: &R,
) -> Result<Vec<Value>, ArchiveError> {
    let record = ensure_shape(candidate, resolver, Shape::Set)?;
    extract_members(record)
}

/// Extracts an archived string's text
pub fn convert_string<R: ResolveUid>(
    candidate: &Value,
    resolver: &R,
) -> Result<String, ArchiveError> {
    let record = ensure_shape(candidate, resolver, Shape::String)?;
    record
        .get(STRING_FIELD)
        .and_then(Value::as_string)
        .map(String::from)
        .ok_or(ArchiveError::InvalidType(STRING_FIELD, "string"))
}

/// Rebuilds an archived date from its `NS.time` offset
///
/// `NS.time` stores seconds relative to the reference date of 2001-01-01T00:00:00Z,
/// not the unix epoch.
pub fn convert_date<R: ResolveUid>(
    candidate: &Value,
    resolver: &R,
) -> Result<DateTime<Utc>, ArchiveError> {
    let record = ensure_shape(candidate, resolver, Shape::Date)?;
    let offset = match record.get(TIME_FIELD) {
        Some(Value::Real(seconds)) => *seconds,
        Some(Value::Integer(seconds)) => seconds
            .as_signed()
            .ok_or(ArchiveError::InvalidType(TIME_FIELD, "number"))?
            as f64,
        _ => return Err(ArchiveError::InvalidType(TIME_FIELD, "number")),
    };

    // A NaN or infinite offset would otherwise saturate the casts below into a real date
    if !offset.is_finite() {
        return Err(ArchiveError::InvalidDate(offset));
    }

    let timestamp = REFERENCE_DATE_OFFSET as f64 + offset;
    let whole = timestamp.floor();
    let mut seconds = whole as i64;
    let mut nanoseconds = ((timestamp - whole) * NANOS_PER_SECOND).round() as u32;
    // A fraction that rounds up to a full second must roll into the next second;
    // `from_timestamp` reads a full second of nanos as a leap second instead
    if nanoseconds >= NANOS_PER_SECOND as u32 {
        seconds = seconds.saturating_add(1);
        nanoseconds = 0;
    }
    DateTime::from_timestamp(seconds, nanoseconds).ok_or(ArchiveError::InvalidDate(offset))
}

/// Converts a reference to the archiver's `$null` sentinel into the native absence value
pub fn convert_null<R: ResolveUid>(candidate: &Value, resolver: &R) -> Result<(), ArchiveError> {
    if !is_null(candidate, resolver) {
        return Err(ArchiveError::ShapeMismatch(Shape::Null));
    }
    Ok(())
}
