//! Coercion and schema checks for incoming player payloads.
//!
//! Requests arrive as loose text (multipart parts, query strings) or JSON
//! values. Everything is first collected into a [`PlayerForm`], coerced to
//! typed fields here, then checked with `validator`. The first failing
//! field is reported.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;
use validator::{Validate, ValidationErrors};

use roster_types::{
    Result,
    errors::ApplicationError,
    player::{PlayerChanges, PlayerFields, Role, normalize_team},
};

use crate::repository::{PlayerListQuery, SortField, SortOrder};

/// Order in which failing fields are reported.
const FIELD_ORDER: [&str; 10] = [
    "name", "team", "country", "runs", "salary", "role", "page", "limit", "search", "sortBy",
];

/// Raw player fields, keyed by field name.
#[derive(Debug, Default, Clone)]
pub struct PlayerForm {
    fields: HashMap<String, String>,
}

impl PlayerForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Flattens a JSON object: strings and numbers become text, `null`s are dropped.
    pub fn from_json(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(ApplicationError::validation(
                "body",
                "Request body must be a JSON object",
            ));
        };

        let mut form = PlayerForm::new();
        for (key, value) in map {
            match value {
                Value::Null => {}
                Value::String(s) => form.insert(key, s),
                Value::Number(n) => form.insert(key, n.to_string()),
                Value::Bool(b) => form.insert(key, b.to_string()),
                _ => {
                    let message = format!("{} must be a string or a number", label(&key));
                    return Err(ApplicationError::validation(key, message));
                }
            }
        }
        Ok(form)
    }
}

#[derive(Debug, Validate)]
struct NewPlayerInput {
    #[validate(length(min = 1, max = 100, message = "Name cannot exceed 100 characters"))]
    name: String,
    #[validate(length(min = 1, max = 50, message = "Team cannot exceed 50 characters"))]
    team: String,
    #[validate(length(min = 1, max = 50, message = "Country cannot exceed 50 characters"))]
    country: String,
    #[validate(range(min = 0, message = "Runs cannot be negative"))]
    runs: i64,
    #[validate(range(min = 0.0, message = "Salary cannot be negative"))]
    salary: f64,
    role: Role,
}

#[derive(Debug, Default, Validate)]
struct PlayerPatchInput {
    #[validate(length(min = 1, max = 100, message = "Name cannot exceed 100 characters"))]
    name: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Team cannot exceed 50 characters"))]
    team: Option<String>,
    #[validate(length(min = 1, max = 50, message = "Country cannot exceed 50 characters"))]
    country: Option<String>,
    #[validate(range(min = 0, message = "Runs cannot be negative"))]
    runs: Option<i64>,
    #[validate(range(min = 0.0, message = "Salary cannot be negative"))]
    salary: Option<f64>,
    role: Option<Role>,
}

/// Every field required; used by create and full replace.
pub fn player_fields(form: &PlayerForm) -> Result<PlayerFields> {
    let input = NewPlayerInput {
        name: required_text(form, "name")?,
        team: normalize_team(&required_text(form, "team")?),
        country: required_text(form, "country")?,
        runs: parse_runs(&required_text(form, "runs")?)?,
        salary: parse_salary(&required_text(form, "salary")?)?,
        role: parse_role(&required_text(form, "role")?)?,
    };
    input.validate().map_err(first_error)?;

    Ok(PlayerFields {
        name: input.name,
        team: input.team,
        country: input.country,
        runs: input.runs,
        salary: input.salary,
        role: input.role,
    })
}

/// Only the fields present in the form; used by partial update.
pub fn player_changes(form: &PlayerForm) -> Result<PlayerChanges> {
    let input = PlayerPatchInput {
        name: optional_text(form, "name")?,
        team: optional_text(form, "team")?.map(|t| normalize_team(&t)),
        country: optional_text(form, "country")?,
        runs: optional_text(form, "runs")?
            .map(|r| parse_runs(&r))
            .transpose()?,
        salary: optional_text(form, "salary")?
            .map(|s| parse_salary(&s))
            .transpose()?,
        role: optional_text(form, "role")?
            .map(|r| parse_role(&r))
            .transpose()?,
    };
    input.validate().map_err(first_error)?;

    Ok(PlayerChanges {
        name: input.name,
        team: input.team,
        country: input.country,
        runs: input.runs,
        salary: input.salary,
        role: input.role,
        image: None,
    })
}

/// Query string of the listing endpoint, before coercion.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub team: Option<String>,
    #[serde(rename = "sortBy", alias = "sort")]
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Validate)]
struct ListInput {
    #[validate(length(max = 100, message = "Search term cannot exceed 100 characters"))]
    search: Option<String>,
    #[validate(length(max = 50, message = "Team filter cannot exceed 50 characters"))]
    team: Option<String>,
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    page: i64,
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    limit: i64,
}

pub fn list_query(params: ListParams) -> Result<PlayerListQuery> {
    let sort_by = match non_empty(params.sort_by) {
        Some(s) => SortField::parse(&s).ok_or_else(|| {
            let allowed: Vec<&str> = SortField::ALL.iter().map(|f| f.as_str()).collect();
            ApplicationError::validation(
                "sortBy",
                format!("Sort must be one of: {}", allowed.join(", ")),
            )
        })?,
        None => SortField::default(),
    };

    let order = match non_empty(params.order) {
        Some(o) => SortOrder::parse(&o).ok_or_else(|| {
            ApplicationError::validation("order", "Order must be either asc or desc")
        })?,
        None => SortOrder::default(),
    };

    let input = ListInput {
        search: non_empty(params.search),
        team: non_empty(params.team).map(|t| normalize_team(&t)),
        page: parse_integer("page", non_empty(params.page))?.unwrap_or(1),
        limit: parse_integer("limit", non_empty(params.limit))?
            .unwrap_or(PlayerListQuery::DEFAULT_LIMIT),
    };
    input.validate().map_err(first_error)?;
    if input.page > PlayerListQuery::MAX_PAGE {
        return Err(ApplicationError::validation(
            "page",
            format!("Page cannot exceed {}", PlayerListQuery::MAX_PAGE),
        ));
    }

    Ok(PlayerListQuery {
        search: input.search,
        team: input.team,
        sort_by,
        order,
        page: input.page,
        limit: input.limit,
    })
}

fn label(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required_text(form: &PlayerForm, field: &str) -> Result<String> {
    non_empty(form.get(field).map(str::to_string)).ok_or_else(|| {
        ApplicationError::validation(field, format!("{} is required", label(field)))
    })
}

fn optional_text(form: &PlayerForm, field: &str) -> Result<Option<String>> {
    match form.get(field) {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Err(ApplicationError::validation(
            field,
            format!("{} cannot be empty", label(field)),
        )),
        Some(value) => Ok(Some(value.trim().to_string())),
    }
}

fn parse_integer(field: &str, raw: Option<String>) -> Result<Option<i64>> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    if let Ok(value) = raw.parse::<i64>() {
        return Ok(Some(value));
    }

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 => {
            Ok(Some(value as i64))
        }
        Ok(_) => Err(ApplicationError::validation(
            field,
            format!("{} must be an integer", label(field)),
        )),
        Err(_) => Err(ApplicationError::validation(
            field,
            format!("{} must be a number", label(field)),
        )),
    }
}

fn parse_runs(raw: &str) -> Result<i64> {
    parse_integer("runs", Some(raw.to_string()))?
        .ok_or_else(|| ApplicationError::validation("runs", "Runs is required"))
}

fn parse_salary(raw: &str) -> Result<f64> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ApplicationError::validation(
            "salary",
            "Salary must be a number",
        )),
    }
}

fn parse_role(raw: &str) -> Result<Role> {
    raw.parse::<Role>().map_err(|_| {
        let allowed: Vec<&str> = Role::ALL.iter().map(|r| r.as_str()).collect();
        ApplicationError::validation(
            "role",
            format!("Role must be one of: {}", allowed.join(", ")),
        )
    })
}

fn first_error(errors: ValidationErrors) -> ApplicationError {
    let mut failures: Vec<(String, String)> = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            let field = field.to_string();
            errs.first().map(|e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", label(&field)));
                (field, message)
            })
        })
        .collect();

    failures.sort_by_key(|(field, _)| {
        FIELD_ORDER
            .iter()
            .position(|f| *f == field.as_str())
            .unwrap_or(FIELD_ORDER.len())
    });

    match failures.into_iter().next() {
        Some((field, message)) => ApplicationError::validation(field, message),
        None => ApplicationError::validation("body", "Invalid input"),
    }
}
