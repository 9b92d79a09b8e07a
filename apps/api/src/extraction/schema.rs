//! The extraction schema — the fixed set of named fields the completion
//! capability is asked to populate.

/// Expected value shape for a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// Scalar text value, rendered as `""` in the prompt placeholder.
    Text,
    /// List of text values, rendered as `[]` in the prompt placeholder.
    TextList,
}

/// A single named field.
#[derive(Debug, Clone)]
pub struct SchemaField {
    pub name: &'static str,
    pub shape: FieldShape,
}

/// Ordered, immutable extraction schema.
///
/// Constructed once at startup and passed explicitly into the field
/// extractor — never read from ambient scope, never mutated.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<SchemaField>,
}

impl Schema {
    pub fn new(fields: Vec<SchemaField>) -> Self {
        Self { fields }
    }

    /// The resume schema served by `/parse-resume`.
    pub fn resume_default() -> Self {
        use FieldShape::{Text, TextList};
        Self::new(vec![
            SchemaField {
                name: "full_name",
                shape: Text,
            },
            SchemaField {
                name: "roll_number",
                shape: Text,
            },
            SchemaField {
                name: "branch",
                shape: Text,
            },
            SchemaField {
                name: "cgpa",
                shape: Text,
            },
            SchemaField {
                name: "email",
                shape: Text,
            },
            SchemaField {
                name: "phone",
                shape: Text,
            },
            SchemaField {
                name: "skills",
                shape: TextList,
            },
        ])
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// Renders the schema as an indented JSON placeholder object preserving
    /// declaration order: `""` marks scalar fields, `[]` marks list fields.
    pub fn placeholder_json(&self) -> String {
        let mut out = String::from("{\n");
        for (i, field) in self.fields.iter().enumerate() {
            out.push_str("  \"");
            out.push_str(field.name);
            out.push_str("\": ");
            out.push_str(match field.shape {
                FieldShape::Text => "\"\"",
                FieldShape::TextList => "[]",
            });
            if i + 1 < self.fields.len() {
                out.push(',');
            }
            out.push('\n');
        }
        out.push('}');
        out
    }
}
