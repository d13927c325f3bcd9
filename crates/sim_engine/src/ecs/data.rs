//! Flat field maps used by the component persistence contract
//!
//! Components serialize to a [`ComponentData`]: a sorted map from field key
//! to a primitive [`FieldValue`]. Vectors are flattened into `name.x`,
//! `name.y`, `name.z` keys so every format that can hold a string-keyed map
//! of scalars can hold a component.

use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ComponentError;
use crate::foundation::math::{Quat, Vec3};

/// A primitive field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Boolean flag
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating-point number
    Float(f64),
    /// Text
    Text(String),
}

impl FieldValue {
    /// Numeric view of the value (integers widen to floats)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            Self::Int(value) => Some(*value as f64),
            _ => None,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        Self::Float(f64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Serialized form of one component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentData {
    fields: BTreeMap<String, FieldValue>,
}

impl ComponentData {
    /// Create an empty field map
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Get a field
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Whether a field is present
    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in key order
    pub fn iter(&self) -> btree_map::Iter<'_, String, FieldValue> {
        self.fields.iter()
    }

    /// Store a vector as `prefix.x`, `prefix.y`, `prefix.z`
    pub fn set_vec3(&mut self, prefix: &str, value: &Vec3) {
        self.set(format!("{prefix}.x"), value.x);
        self.set(format!("{prefix}.y"), value.y);
        self.set(format!("{prefix}.z"), value.z);
    }

    /// Store a rotation as `prefix.x`, `prefix.y`, `prefix.z`, `prefix.w`
    pub fn set_quat(&mut self, prefix: &str, value: &Quat) {
        self.set(format!("{prefix}.x"), value.i);
        self.set(format!("{prefix}.y"), value.j);
        self.set(format!("{prefix}.z"), value.k);
        self.set(format!("{prefix}.w"), value.w);
    }

    /// Overwrite `target` if `key` is present and numeric
    #[allow(clippy::cast_possible_truncation)]
    pub fn read_f32(&self, key: &str, target: &mut f32) -> Result<(), ComponentError> {
        match self.fields.get(key) {
            None => Ok(()),
            Some(value) => {
                let number = value.as_f64().ok_or_else(|| mismatch(key, "a number"))?;
                *target = number as f32;
                Ok(())
            }
        }
    }

    /// Overwrite `target` if `key` is present and boolean
    pub fn read_bool(&self, key: &str, target: &mut bool) -> Result<(), ComponentError> {
        match self.fields.get(key) {
            None => Ok(()),
            Some(FieldValue::Bool(value)) => {
                *target = *value;
                Ok(())
            }
            Some(_) => Err(mismatch(key, "a boolean")),
        }
    }

    /// Integer field, if present
    pub fn int(&self, key: &str) -> Result<Option<i64>, ComponentError> {
        match self.fields.get(key) {
            None => Ok(None),
            Some(FieldValue::Int(value)) => Ok(Some(*value)),
            Some(_) => Err(mismatch(key, "an integer")),
        }
    }

    /// Text field, if present
    pub fn text(&self, key: &str) -> Result<Option<&str>, ComponentError> {
        match self.fields.get(key) {
            None => Ok(None),
            Some(FieldValue::Text(value)) => Ok(Some(value)),
            Some(_) => Err(mismatch(key, "text")),
        }
    }

    /// Overwrite the components of `target` present under `prefix`
    pub fn read_vec3(&self, prefix: &str, target: &mut Vec3) -> Result<(), ComponentError> {
        self.read_f32(&format!("{prefix}.x"), &mut target.x)?;
        self.read_f32(&format!("{prefix}.y"), &mut target.y)?;
        self.read_f32(&format!("{prefix}.z"), &mut target.z)
    }

    /// Rotation stored under `prefix`, if all four fields are present and non-degenerate
    pub fn quat(&self, prefix: &str) -> Result<Option<Quat>, ComponentError> {
        let keys = ["x", "y", "z", "w"].map(|axis| format!("{prefix}.{axis}"));
        if !keys.iter().all(|key| self.contains(key)) {
            return Ok(None);
        }
        let mut coords = [0.0_f32; 4];
        for (key, coord) in keys.iter().zip(coords.iter_mut()) {
            self.read_f32(key, coord)?;
        }
        let [x, y, z, w] = coords;
        let raw = nalgebra::Quaternion::new(w, x, y, z);
        Ok(Quat::try_new(raw, crate::foundation::math::constants::EPSILON))
    }
}

impl<'a> IntoIterator for &'a ComponentData {
    type Item = (&'a String, &'a FieldValue);
    type IntoIter = btree_map::Iter<'a, String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

fn mismatch(field: &str, expected: &'static str) -> ComponentError {
    ComponentError::TypeMismatch {
        field: field.to_owned(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_missing_fields_keep_target() {
        let data = ComponentData::new();
        let mut value = 4.0;
        data.read_f32("mass", &mut value).expect("absent field is fine");
        assert_relative_eq!(value, 4.0);
    }

    #[test]
    fn test_integer_widens_to_float() {
        let mut data = ComponentData::new();
        data.set("mass", 3_i64);
        let mut value = 0.0;
        data.read_f32("mass", &mut value).expect("int is numeric");
        assert_relative_eq!(value, 3.0);
    }

    #[test]
    fn test_type_mismatch_is_reported() {
        let mut data = ComponentData::new();
        data.set("use_gravity", "yes");
        let mut flag = false;
        assert_eq!(
            data.read_bool("use_gravity", &mut flag),
            Err(ComponentError::TypeMismatch {
                field: "use_gravity".into(),
                expected: "a boolean",
            })
        );
    }

    #[test]
    fn test_vectors_are_flattened() {
        let mut data = ComponentData::new();
        data.set_vec3("position", &Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(data.len(), 3);
        assert_eq!(data.get("position.y"), Some(&FieldValue::Float(2.0)));

        let mut out = Vec3::zeros();
        data.read_vec3("position", &mut out).expect("numeric");
        assert_relative_eq!(out, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_degenerate_quaternion_is_rejected() {
        let mut data = ComponentData::new();
        for axis in ["x", "y", "z", "w"] {
            data.set(format!("rotation.{axis}"), 0.0_f32);
        }
        assert_eq!(data.quat("rotation"), Ok(None));
    }

    #[test]
    fn test_untagged_values_parse_from_ron() {
        let data: ComponentData =
            ron::from_str(r#"{"flag": true, "count": 2, "mass": 1.5, "shape": "box"}"#)
                .expect("valid ron");
        assert_eq!(data.get("flag"), Some(&FieldValue::Bool(true)));
        assert_eq!(data.get("count"), Some(&FieldValue::Int(2)));
        assert_eq!(data.get("mass"), Some(&FieldValue::Float(1.5)));
        assert_eq!(data.text("shape"), Ok(Some("box")));
    }
}
