//! Declarative table of the resume sections and the SQL rendered from it.
//!
//! Every section is a child table keyed by `resume_id` whose payload is a flat
//! list of text columns. Adding a section means adding a row to [`SECTIONS`]
//! and a table to the migrations; routes and queries follow automatically.
//! Table and column names in generated SQL only ever come from this table,
//! never from request input.

use serde_json::{Map, Value};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    /// Mirrors the column's NOT NULL constraint.
    pub required: bool,
}

const fn required(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        required: true,
    }
}

const fn optional(name: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        required: false,
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct SectionSpec {
    /// Table name, also the URL segment and the key in the aggregate view.
    pub name: &'static str,
    /// Columns other than `id`, `resume_id` and `created_at`, in bind order.
    pub fields: &'static [FieldSpec],
}

pub static SECTIONS: [SectionSpec; 9] = [
    SectionSpec {
        name: "experience",
        fields: &[
            required("company"),
            required("role"),
            optional("start_date"),
            optional("end_date"),
            optional("description"),
        ],
    },
    SectionSpec {
        name: "education",
        fields: &[
            required("institution"),
            optional("degree"),
            optional("start_date"),
            optional("end_date"),
            optional("description"),
        ],
    },
    SectionSpec {
        name: "skills",
        fields: &[required("skill"), optional("level")],
    },
    SectionSpec {
        name: "projects",
        fields: &[
            required("title"),
            optional("link"),
            optional("description"),
            optional("start_date"),
            optional("end_date"),
        ],
    },
    SectionSpec {
        name: "languages",
        fields: &[required("language"), optional("proficiency")],
    },
    SectionSpec {
        name: "interests",
        fields: &[required("name")],
    },
    SectionSpec {
        name: "activities",
        fields: &[required("description")],
    },
    SectionSpec {
        name: "achievements",
        fields: &[required("title"), optional("description"), optional("date")],
    },
    SectionSpec {
        name: "certifications",
        fields: &[required("name"), optional("issuer"), optional("date")],
    },
];

impl SectionSpec {
    fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// `$1` is the resume id, field values follow in declared order.
    pub fn insert_sql(&self) -> String {
        let columns = self
            .columns()
            .map(|c| format!("\"{c}\""))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = (2..=self.fields.len() + 1)
            .map(|i| format!("${i}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "INSERT INTO \"{}\" (resume_id, {columns}) VALUES ($1, {placeholders}) RETURNING id",
            self.name
        )
    }

    /// Field values bind first, then the item id, then the resume id.
    pub fn update_sql(&self) -> String {
        let n = self.fields.len();
        let assignments = self
            .columns()
            .enumerate()
            .map(|(i, c)| format!("\"{c}\" = ${}", i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "UPDATE \"{}\" SET {assignments} WHERE id = ${} AND resume_id = ${}",
            self.name,
            n + 1,
            n + 2
        )
    }

    /// `$1` is the item id, `$2` the resume id.
    pub fn delete_sql(&self) -> String {
        format!(
            "DELETE FROM \"{}\" WHERE id = $1 AND resume_id = $2",
            self.name
        )
    }

    /// Collects every row of a resume into one JSON array, oldest first.
    pub fn select_sql(&self) -> String {
        format!(
            "SELECT COALESCE(json_agg(t ORDER BY t.created_at, t.id), '[]'::json) \
             FROM \"{}\" t WHERE t.resume_id = $1",
            self.name
        )
    }

    /// Pulls this section's field values out of a request body, in declared order.
    ///
    /// Values must be strings or null. Unknown keys are ignored. A required
    /// field that is absent, null or blank is a validation error.
    pub fn extract_values(&self, body: &Map<String, Value>) -> Result<Vec<Option<String>>, AppError> {
        let mut values = Vec::with_capacity(self.fields.len());
        let mut missing = Vec::new();

        for field in self.fields {
            let value = match body.get(field.name) {
                None | Some(Value::Null) => None,
                Some(Value::String(s)) => Some(s.clone()),
                Some(_) => {
                    return Err(AppError::Validation(format!(
                        "Field '{}' must be a string",
                        field.name
                    )))
                }
            };
            if field.required && value.as_deref().map_or(true, |v| v.trim().is_empty()) {
                missing.push(field.name);
            }
            values.push(value);
        }

        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Missing required fields for {}: {}",
                self.name,
                missing.join(", ")
            )));
        }
        Ok(values)
    }
}
