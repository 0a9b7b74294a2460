//! Records: named-field aggregates the codec walks field by field.
//!
//! `#[derive(Record)]` generates the static [`FieldDef`] table and the indexed
//! field accessors. The annotation strings in that table are parsed once per
//! table into a [`Shape`] and kept in a process-wide cache.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

use crate::directive::Directive;
use crate::value::Value;

/// Compile-time description of one struct field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// The field's identifier.
    pub name: &'static str,
    /// The raw `#[strmap("...")]` annotation, if any.
    pub tag: Option<&'static str>,
    /// Whether the field is `pub` (in any form). Private fields are never visited.
    pub visible: bool,
}

/// A struct with named fields, as seen by the codec.
///
/// Field indexes are declaration positions, counting private fields.
/// [`Record::field`] and [`Record::field_mut`] return `None` for private fields.
pub trait Record: Value {
    fn field_defs(&self) -> &'static [FieldDef];

    fn field(&self, index: usize) -> Option<&dyn Value>;

    fn field_mut(&mut self, index: usize) -> Option<&mut dyn Value>;
}

/// A visible field with its parsed directive.
#[derive(Debug, Clone)]
pub struct ShapeField {
    pub index: usize,
    pub name: &'static str,
    pub directive: Directive,
}

impl ShapeField {
    /// The key this field uses, before any inline prefix.
    pub fn key(&self) -> &str {
        self.directive.key_for(self.name)
    }
}

/// The visible fields of a record type, in declaration order, directives parsed.
#[derive(Debug, Clone, Default)]
pub struct Shape {
    fields: Vec<ShapeField>,
}

impl Shape {
    pub fn parse(defs: &[FieldDef]) -> Self {
        let fields = defs
            .iter()
            .enumerate()
            .filter(|(_, def)| def.visible)
            .map(|(index, def)| ShapeField {
                index,
                name: def.name,
                directive: Directive::parse(def.tag),
            })
            .collect();
        Self { fields }
    }

    pub fn fields(&self) -> &[ShapeField] {
        &self.fields
    }
}

/// Shapes keyed by the address and length of the record's `FieldDef` table.
/// Identical tables always produce identical shapes, so a merged table is harmless.
type ShapeKey = (usize, usize);

static SHAPES: Lazy<RwLock<HashMap<ShapeKey, Arc<Shape>>>> = Lazy::new(Default::default);

/// The cached shape of `record`'s type, parsing it on first use.
pub fn shape_of(record: &dyn Record) -> Arc<Shape> {
    let defs = record.field_defs();
    let key = (defs.as_ptr() as usize, defs.len());
    if let Some(shape) = SHAPES.read().get(&key) {
        return Arc::clone(shape);
    }

    let shape = Arc::new(Shape::parse(defs));
    debug!(
        record = record.type_name(),
        fields = shape.fields.len(),
        "cached record shape"
    );
    Arc::clone(SHAPES.write().entry(key).or_insert(shape))
}
