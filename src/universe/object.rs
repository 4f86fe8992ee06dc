use std::collections::BTreeMap;

use crate::foundation::core::{ObjectId, UniverseObjectType, Value};
use crate::foundation::error::{ValueRefError, ValueRefResult};

/// One object of the game state, as seen by expression evaluation.
///
/// Besides the free-form `properties` map, every object answers the built-in
/// properties `ID`, `Name` and `ObjectType`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UniverseObject {
    /// Unique object id.
    pub id: ObjectId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Concrete object kind.
    pub object_type: UniverseObjectType,
    /// Named property values. [`Value::Object`] entries are links followed by dotted paths.
    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
}

impl UniverseObject {
    /// Create an object without properties.
    pub fn new(id: ObjectId, object_type: UniverseObjectType, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            object_type,
            properties: BTreeMap::new(),
        }
    }

    /// Builder-style property setter.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    /// Look up one property segment on this object.
    pub fn property(&self, name: &str) -> Option<Value> {
        match name {
            "ID" => Some(Value::Int(self.id.0)),
            "Name" => Some(Value::Text(self.name.clone())),
            "ObjectType" => Some(Value::ObjectType(self.object_type)),
            _ => self.properties.get(name).cloned(),
        }
    }
}

/// In-memory object graph consulted during evaluation.
///
/// Objects iterate in ascending id order, which makes every sampling condition
/// deterministic.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "UniverseDef", into = "UniverseDef")]
pub struct Universe {
    objects: BTreeMap<ObjectId, UniverseObject>,
    properties: BTreeMap<String, Value>,
}

/// Serde boundary form of [`Universe`]: objects as a list so ids stay plain integers.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
struct UniverseDef {
    #[serde(default)]
    objects: Vec<UniverseObject>,
    #[serde(default)]
    properties: BTreeMap<String, Value>,
}

impl TryFrom<UniverseDef> for Universe {
    type Error = ValueRefError;

    fn try_from(def: UniverseDef) -> Result<Self, Self::Error> {
        let mut out = Universe::new();
        out.properties = def.properties;
        for obj in def.objects {
            let id = obj.id;
            if out.insert(obj).is_some() {
                return Err(ValueRefError::config(format!("duplicate object id {id}")));
            }
        }
        Ok(out)
    }
}

impl From<Universe> for UniverseDef {
    fn from(u: Universe) -> Self {
        Self {
            objects: u.objects.into_values().collect(),
            properties: u.properties,
        }
    }
}

impl Universe {
    /// Create an empty universe.
    pub const fn new() -> Self {
        Self {
            objects: BTreeMap::new(),
            properties: BTreeMap::new(),
        }
    }

    /// Parse a universe fixture from JSON.
    #[tracing::instrument(skip(json), fields(bytes = json.len()))]
    pub fn from_json_str(json: &str) -> ValueRefResult<Self> {
        let u: Self = serde_json::from_str(json)
            .map_err(|e| ValueRefError::config(format!("universe json: {e}")))?;
        tracing::debug!(objects = u.len(), "loaded universe");
        Ok(u)
    }

    /// Insert an object, returning the previous object with the same id.
    pub fn insert(&mut self, obj: UniverseObject) -> Option<UniverseObject> {
        self.objects.insert(obj.id, obj)
    }

    /// Builder-style [`Self::insert`].
    pub fn with_object(mut self, obj: UniverseObject) -> Self {
        self.insert(obj);
        self
    }

    /// Set a universe-level property such as `CurrentTurn`.
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(name.into(), value.into());
    }

    /// Look up a universe-level property.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Look up an object by id.
    pub fn object(&self, id: ObjectId) -> Option<&UniverseObject> {
        self.objects.get(&id)
    }

    /// All objects, ascending by id.
    pub fn objects(&self) -> impl Iterator<Item = &UniverseObject> {
        self.objects.values()
    }

    /// Number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Return `true` when there are no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Resolve a property path starting at `start`.
    ///
    /// Every segment but the last must name an object link. An empty path yields the
    /// start object's id.
    pub fn resolve_path(&self, start: &UniverseObject, path: &[String]) -> ValueRefResult<Value> {
        let Some((last, links)) = path.split_last() else {
            return Ok(Value::Int(start.id.0));
        };

        let mut obj = start;
        for seg in links {
            obj = match obj.property(seg) {
                Some(Value::Object(id)) => self.object(id).ok_or_else(|| {
                    ValueRefError::property(format!(
                        "object {id} linked by `{seg}` on object {} does not exist",
                        obj.id
                    ))
                })?,
                Some(other) => {
                    return Err(ValueRefError::property(format!(
                        "`{seg}` on object {} is a {}, not an object link",
                        obj.id,
                        other.kind()
                    )));
                }
                None => return Err(unknown_property(obj, seg)),
            };
        }

        obj.property(last).ok_or_else(|| unknown_property(obj, last))
    }
}

fn unknown_property(obj: &UniverseObject, name: &str) -> ValueRefError {
    ValueRefError::property(format!("object {} has no property `{name}`", obj.id))
}

#[cfg(test)]
#[path = "../../tests/unit/universe/object.rs"]
mod tests;
