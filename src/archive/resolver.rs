/*!
 Reference resolution for the UID tokens an archive stores in place of inline values.
*/

use plist::{Uid, Value};

/// The value stored at the reserved first slot of the `$objects` table, referenced
/// wherever the archive encodes the absence of a value
pub const NULL_MARKER: &str = "$null";

/// Resolves UID reference tokens into the object table entries they point at
///
/// The decoder stays decoupled from any concrete binary plist parser by receiving one
/// of these with every call. Implementations must return the [`NULL_MARKER`] string for
/// tokens with no corresponding table entry, and must not mutate the underlying table.
pub trait ResolveUid {
    fn resolve(&self, token: &Uid) -> Value;
}

impl<F> ResolveUid for F
where
    F: Fn(&Uid) -> Value,
{
    fn resolve(&self, token: &Uid) -> Value {
        self(token)
    }
}

/// A [`ResolveUid`] implementation backed by an archive's `$objects` array
#[derive(Debug, Clone, Copy)]
pub struct ObjectTable<'a> {
    /// The archive's flat object table, in `$objects` order
    objects: &'a [Value],
}

impl<'a> ObjectTable<'a> {
    pub fn new(objects: &'a [Value]) -> Self {
        Self { objects }
    }
}

impl ResolveUid for ObjectTable<'_> {
    fn resolve(&self, token: &Uid) -> Value {
        self.objects
            .get(token.get() as usize)
            .cloned()
            .unwrap_or_else(|| Value::String(NULL_MARKER.to_string()))
    }
}
