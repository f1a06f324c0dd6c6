//! Dimensional unit conversion driven by declarative unit tables.
//!
//! Every [`ConversionCategory`] names a base unit. Each [`Unit`] carries a
//! [`Transform`] into and out of that base, and a conversion between any two
//! units is always routed `from → base → to`. Adding a unit therefore only
//! needs its own transform pair, never a rule for every other unit.
//!
//! # Transforms
//!
//! | Variant | `to_base(x)` | `from_base(y)` | Serializable |
//! |---|---|---|---|
//! | [`Transform::Affine`] | `scale·x + offset` | `(y − offset)/scale` | yes |
//! | [`Transform::Reciprocal`] | `scale/x` | `scale/y` | yes |
//! | [`Transform::Custom`] | `forward(x)` | `inverse(y)` | no |
//!
//! Affine covers linear scales and offset scales such as temperature.
//! Reciprocal covers quantities defined as inverses of the base (fuel
//! consumption vs. economy, conductance vs. resistance); a zero input maps
//! to an infinite result, which is a defined output. Custom is reserved for
//! logarithmic and other non-linear scales.

pub mod tables;

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, Result};

/// Transform between a unit and its category's base unit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    /// `base = scale·x + offset`.
    Affine {
        scale: f64,
        #[serde(default)]
        offset: f64,
    },

    /// `base = scale/x`. Self-inverse.
    Reciprocal { scale: f64 },

    /// Arbitrary monotonic pair of functions.
    #[serde(skip)]
    Custom {
        forward: fn(f64) -> f64,
        inverse: fn(f64) -> f64,
    },
}

impl Transform {
    /// The identity transform carried by every base unit.
    pub const IDENTITY: Transform = Transform::Affine {
        scale: 1.0,
        offset: 0.0,
    };

    /// A purely multiplicative transform.
    pub const fn linear(scale: f64) -> Self {
        Transform::Affine { scale, offset: 0.0 }
    }

    /// Maps a value in this unit to the base unit.
    #[inline]
    pub fn to_base(&self, x: f64) -> f64 {
        match *self {
            Transform::Affine { scale, offset } => scale * x + offset,
            Transform::Reciprocal { scale } => scale / x,
            Transform::Custom { forward, .. } => forward(x),
        }
    }

    /// Maps a value in the base unit to this unit.
    #[inline]
    pub fn from_base(&self, y: f64) -> f64 {
        match *self {
            Transform::Affine { scale, offset } => (y - offset) / scale,
            Transform::Reciprocal { scale } => scale / y,
            Transform::Custom { inverse, .. } => inverse(y),
        }
    }

    /// Returns `true` for `Affine { scale: 1, offset: 0 }`.
    pub fn is_identity(&self) -> bool {
        matches!(*self, Transform::Affine { scale, offset } if scale == 1.0 && offset == 0.0)
    }

    fn validate(&self) -> std::result::Result<(), &'static str> {
        match *self {
            Transform::Affine { scale, offset } => {
                if !scale.is_finite() || scale == 0.0 {
                    return Err("affine scale must be finite and non-zero");
                }
                if !offset.is_finite() {
                    return Err("affine offset must be finite");
                }
            }
            Transform::Reciprocal { scale } => {
                if !scale.is_finite() || scale == 0.0 {
                    return Err("reciprocal scale must be finite and non-zero");
                }
            }
            Transform::Custom { .. } => {}
        }
        Ok(())
    }
}

/// A single unit of measure within a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    /// Identifier, unique within its category.
    pub id: String,
    /// Human-readable name.
    pub label: String,
    /// Display symbol, e.g. `"km"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Mapping to and from the category's base unit.
    pub transform: Transform,
}

impl Unit {
    /// Creates a unit with an arbitrary transform.
    pub fn new(id: &str, label: &str, symbol: Option<&str>, transform: Transform) -> Self {
        Self {
            id: id.to_owned(),
            label: label.to_owned(),
            symbol: symbol.map(str::to_owned),
            transform,
        }
    }

    /// Creates a unit that is `scale` base units.
    pub fn linear(id: &str, label: &str, symbol: &str, scale: f64) -> Self {
        Self::new(id, label, Some(symbol), Transform::linear(scale))
    }

    #[inline]
    pub fn to_base(&self, x: f64) -> f64 {
        self.transform.to_base(x)
    }

    #[inline]
    pub fn from_base(&self, y: f64) -> f64 {
        self.transform.from_base(y)
    }
}

/// A family of mutually convertible units sharing one base quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionCategory {
    pub id: String,
    pub label: String,
    pub base_unit_id: String,
    pub units: Vec<Unit>,
}

impl ConversionCategory {
    /// Creates a category and validates it.
    ///
    /// # Errors
    /// [`CalcError::InvalidInput`] if the unit list is empty, an id repeats,
    /// the base unit is missing or not an identity transform, or a
    /// transform has a zero/non-finite scale.
    pub fn new(id: &str, label: &str, base_unit_id: &str, units: Vec<Unit>) -> Result<Self> {
        let category = Self {
            id: id.to_owned(),
            label: label.to_owned(),
            base_unit_id: base_unit_id.to_owned(),
            units,
        };
        category.validate()?;
        Ok(category)
    }

    /// Checks the category invariants.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(CalcError::InvalidInput(msg));
        if self.units.is_empty() {
            return invalid(format!("category `{}` has no units", self.id));
        }
        for (i, unit) in self.units.iter().enumerate() {
            if self.units[..i].iter().any(|u| u.id == unit.id) {
                return invalid(format!(
                    "duplicate unit id `{}` in category `{}`",
                    unit.id, self.id
                ));
            }
            if let Err(reason) = unit.transform.validate() {
                return invalid(format!("unit `{}` in `{}`: {reason}", unit.id, self.id));
            }
        }
        match self.units.iter().find(|u| u.id == self.base_unit_id) {
            None => invalid(format!(
                "base unit `{}` missing from category `{}`",
                self.base_unit_id, self.id
            )),
            Some(base) if !base.transform.is_identity() => invalid(format!(
                "base unit `{}` of `{}` must have an identity transform",
                base.id, self.id
            )),
            Some(_) => Ok(()),
        }
    }

    /// Looks up a unit by id.
    pub fn unit(&self, id: &str) -> Result<&Unit> {
        self.units
            .iter()
            .find(|u| u.id == id)
            .ok_or_else(|| CalcError::UnitNotFound {
                category: self.id.clone(),
                unit: id.to_owned(),
            })
    }

    /// The category's base unit.
    pub fn base_unit(&self) -> Result<&Unit> {
        self.unit(&self.base_unit_id)
    }

    /// Converts `value` from `from_id` to `to_id`. See [`convert`].
    pub fn convert(&self, value: f64, from_id: &str, to_id: &str) -> Result<f64> {
        convert(value, self, from_id, to_id)
    }

    /// Converts `value` from `from_id` into every unit of the category,
    /// in table order.
    pub fn convert_all(&self, value: f64, from_id: &str) -> Result<Vec<(&Unit, f64)>> {
        let base = self.unit(from_id)?.to_base(value);
        Ok(self.units.iter().map(|u| (u, u.from_base(base))).collect())
    }

    /// Units whose id, label or symbol contains `query`, ignoring case.
    /// An empty query matches every unit.
    pub fn search(&self, query: &str) -> Vec<&Unit> {
        let needle = query.trim().to_lowercase();
        self.units
            .iter()
            .filter(|u| {
                needle.is_empty()
                    || u.id.to_lowercase().contains(&needle)
                    || u.label.to_lowercase().contains(&needle)
                    || u
                        .symbol
                        .as_deref()
                        .is_some_and(|s| s.to_lowercase().contains(&needle))
            })
            .collect()
    }
}

/// Converts `value` between two units of `category` via the base unit.
///
/// # Errors
/// [`CalcError::UnitNotFound`] if either id is absent from the category.
///
/// # Examples
/// ```
/// use u_calc::units::{convert, tables};
/// let temperature = tables::temperature();
/// let f = convert(100.0, &temperature, "celsius", "fahrenheit").unwrap();
/// assert!((f - 212.0).abs() < 1e-9);
/// ```
pub fn convert(value: f64, category: &ConversionCategory, from_id: &str, to_id: &str) -> Result<f64> {
    let from = category.unit(from_id)?;
    let to = category.unit(to_id)?;
    Ok(to.from_base(from.to_base(value)))
}

/// An ordered collection of conversion categories.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitRegistry {
    categories: Vec<ConversionCategory>,
}

impl UnitRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in table from [`tables`].
    pub fn builtin() -> Self {
        Self {
            categories: tables::all(),
        }
    }

    /// Loads categories from a JSON unit-table document:
    ///
    /// ```json
    /// { "categories": [ { "id": "length", "label": "Length",
    ///   "base_unit_id": "meter", "units": [
    ///     { "id": "meter", "label": "Meter", "symbol": "m",
    ///       "transform": { "affine": { "scale": 1.0 } } } ] } ] }
    /// ```
    ///
    /// # Errors
    /// [`CalcError::Config`] for malformed JSON, [`CalcError::InvalidInput`]
    /// for a category that breaks its invariants or repeats an id.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: UnitRegistry = serde_json::from_str(json).map_err(|e| {
            tracing::warn!(error = %e, "rejected unit table document");
            CalcError::Config(e.to_string())
        })?;
        let mut registry = Self::new();
        for category in document.categories {
            registry.insert(category)?;
        }
        tracing::debug!(
            categories = registry.categories.len(),
            units = registry.categories.iter().map(|c| c.units.len()).sum::<usize>(),
            "loaded unit tables"
        );
        Ok(registry)
    }

    /// Adds a validated category.
    ///
    /// # Errors
    /// [`CalcError::InvalidInput`] if the category is invalid or its id is
    /// already registered.
    pub fn insert(&mut self, category: ConversionCategory) -> Result<()> {
        if let Err(e) = category.validate() {
            tracing::warn!(category = %category.id, error = %e, "rejected unit category");
            return Err(e);
        }
        if self.categories.iter().any(|c| c.id == category.id) {
            tracing::warn!(category = %category.id, "duplicate unit category");
            return Err(CalcError::InvalidInput(format!(
                "duplicate category id `{}`",
                category.id
            )));
        }
        self.categories.push(category);
        Ok(())
    }

    /// Looks up a category by id.
    pub fn category(&self, id: &str) -> Result<&ConversionCategory> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| CalcError::CategoryNotFound(id.to_owned()))
    }

    /// Iterates over the categories in insertion order.
    pub fn categories(&self) -> impl Iterator<Item = &ConversionCategory> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Converts `value` between two units of the category `category_id`.
    pub fn convert(&self, value: f64, category_id: &str, from_id: &str, to_id: &str) -> Result<f64> {
        convert(value, self.category(category_id)?, from_id, to_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn test_celsius_fahrenheit() {
        let reg = UnitRegistry::builtin();
        let f0 = reg.convert(0.0, "temperature", "celsius", "fahrenheit").unwrap();
        let f100 = reg.convert(100.0, "temperature", "celsius", "fahrenheit").unwrap();
        assert!(close(f0, 32.0), "got {f0}");
        assert!(close(f100, 212.0), "got {f100}");
    }

    #[test]
    fn test_temperature_offsets_not_scalar() {
        let reg = UnitRegistry::builtin();
        let k = reg.convert(-40.0, "temperature", "fahrenheit", "kelvin").unwrap();
        assert!(close(k, 233.15), "got {k}");
        let c = reg.convert(-40.0, "temperature", "fahrenheit", "celsius").unwrap();
        assert!(close(c, -40.0));
        let r = reg.convert(0.0, "temperature", "kelvin", "rankine").unwrap();
        assert!(close(r, 0.0));
    }

    #[test]
    fn test_length() {
        let reg = UnitRegistry::builtin();
        let m = reg.convert(1.0, "length", "mile", "meter").unwrap();
        assert!(close(m, 1609.344));
        let inches = reg.convert(1.0, "length", "foot", "inch").unwrap();
        assert!(close(inches, 12.0));
    }

    #[test]
    fn test_reciprocal_zero_is_infinite() {
        let reg = UnitRegistry::builtin();
        let s = reg.convert(0.0, "electrical_resistance", "ohm", "siemens").unwrap();
        assert_eq!(s, f64::INFINITY);
        let ohm = reg.convert(0.5, "electrical_resistance", "siemens", "ohm").unwrap();
        assert!(close(ohm, 2.0));
        let km_per_l = reg.convert(5.0, "fuel_economy", "liter_per_100km", "km_per_liter").unwrap();
        assert!(close(km_per_l, 20.0));
    }

    #[test]
    fn test_logarithmic_decibel() {
        let reg = UnitRegistry::builtin();
        let w = reg.convert(0.0, "sound_intensity", "decibel", "watt_per_m2").unwrap();
        assert!(close(w, 1e-12));
        let db = reg.convert(1.0, "sound_intensity", "watt_per_m2", "decibel").unwrap();
        assert!(close(db, 120.0), "got {db}");
    }

    #[test]
    fn test_unit_not_found() {
        let reg = UnitRegistry::builtin();
        let err = reg.convert(1.0, "length", "furlong", "meter").unwrap_err();
        assert_eq!(
            err,
            CalcError::UnitNotFound {
                category: "length".into(),
                unit: "furlong".into()
            }
        );
        assert!(reg.convert(1.0, "length", "meter", "cubit").is_err());
    }

    #[test]
    fn test_category_not_found() {
        let reg = UnitRegistry::builtin();
        assert_eq!(
            reg.category("luminosity").unwrap_err(),
            CalcError::CategoryNotFound("luminosity".into())
        );
    }

    #[test]
    fn test_builtin_tables_valid() {
        let reg = UnitRegistry::builtin();
        assert!(reg.len() >= 15);
        for c in reg.categories() {
            c.validate().unwrap();
            assert!(c.base_unit().unwrap().transform.is_identity());
        }
    }

    #[test]
    fn test_new_category_rejects_duplicates() {
        let units = vec![
            Unit::linear("a", "A", "a", 1.0),
            Unit::linear("a", "A again", "a", 2.0),
        ];
        assert!(matches!(
            ConversionCategory::new("dup", "Dup", "a", units),
            Err(CalcError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_new_category_rejects_bad_base_and_scale() {
        let units = vec![Unit::linear("a", "A", "a", 2.0)];
        assert!(ConversionCategory::new("c", "C", "a", units).is_err());
        let units = vec![Unit::linear("a", "A", "a", 1.0)];
        assert!(ConversionCategory::new("c", "C", "b", units).is_err());
        let units = vec![
            Unit::linear("a", "A", "a", 1.0),
            Unit::linear("z", "Zero", "z", 0.0),
        ];
        assert!(ConversionCategory::new("c", "C", "a", units).is_err());
        assert!(ConversionCategory::new("c", "C", "a", vec![]).is_err());
    }

    #[test]
    fn test_convert_all_and_search() {
        let length = tables::length();
        let all = length.convert_all(1.0, "kilometer").unwrap();
        assert_eq!(all.len(), length.units.len());
        let (_, m) = all.iter().find(|(u, _)| u.id == "meter").unwrap();
        assert!(close(*m, 1000.0));

        let hits: Vec<&str> = length.search("MIL").iter().map(|u| u.id.as_str()).collect();
        assert!(hits.contains(&"mile"));
        assert!(hits.contains(&"millimeter"));
        assert_eq!(length.search("").len(), length.units.len());
        assert!(length.search("zzz").is_empty());
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "categories": [{
                "id": "length",
                "label": "Length",
                "base_unit_id": "meter",
                "units": [
                    { "id": "meter", "label": "Meter", "symbol": "m",
                      "transform": { "affine": { "scale": 1.0 } } },
                    { "id": "yard", "label": "Yard", "symbol": "yd",
                      "transform": { "affine": { "scale": 0.9144 } } },
                    { "id": "per_meter", "label": "Per meter",
                      "transform": { "reciprocal": { "scale": 1.0 } } }
                ]
            }]
        }"#;
        let reg = UnitRegistry::from_json(json).unwrap();
        assert_eq!(reg.len(), 1);
        let yd = reg.convert(0.9144, "length", "meter", "yard").unwrap();
        assert!(close(yd, 1.0));
        assert!(reg.category("length").unwrap().unit("per_meter").unwrap().symbol.is_none());
    }

    #[test]
    fn test_from_json_errors() {
        assert!(matches!(
            UnitRegistry::from_json("{ \"categories\": 3 }"),
            Err(CalcError::Config(_))
        ));
        let dup = r#"{ "categories": [
            { "id": "x", "label": "X", "base_unit_id": "u",
              "units": [ { "id": "u", "label": "U", "transform": { "affine": { "scale": 1.0 } } } ] },
            { "id": "x", "label": "X", "base_unit_id": "u",
              "units": [ { "id": "u", "label": "U", "transform": { "affine": { "scale": 1.0 } } } ] }
        ] }"#;
        assert!(matches!(
            UnitRegistry::from_json(dup),
            Err(CalcError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_affine_serializes() {
        let unit = Unit::new(
            "fahrenheit",
            "Fahrenheit",
            Some("°F"),
            Transform::Affine {
                scale: 5.0 / 9.0,
                offset: -160.0 / 9.0,
            },
        );
        let json = serde_json::to_string(&unit).unwrap();
        let back: Unit = serde_json::from_str(&json).unwrap();
        assert!(close(back.to_base(212.0), 100.0));
    }

    #[test]
    fn test_custom_does_not_serialize() {
        let unit = tables::sound_intensity().unit("decibel").unwrap().clone();
        assert!(serde_json::to_string(&unit).is_err());
    }
}
