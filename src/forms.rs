//! Form intake.
//!
//! Raw form bodies keep every field as an optional string so that bad input
//! turns into field-level messages instead of an extractor rejection. Choice
//! fields are checked against a [`ReferenceSet`] loaded from the store for the
//! request at hand.

use crate::{
    commands::{
        categories::CreateCategoryCommand, items::CreateItemCommand,
        stock::RecordMovementCommand,
    },
    entities::MovementType,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use validator::{Validate, ValidationError, ValidationErrors};

pub const REQUIRED: &str = "This field is required.";
pub const INVALID_FLOAT: &str = "Not a valid float value.";
pub const INVALID_DATE: &str = "Not a valid date value.";
pub const INVALID_CHOICE: &str = "Not a valid choice.";
pub const UNCOERCIBLE_CHOICE: &str = "Invalid Choice: could not coerce.";
pub const DUPLICATE_CATEGORY: &str = "A category with this name already exists.";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One option of a choice field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub id: i32,
    pub label: String,
}

/// Ids accepted by a choice field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceSet {
    ids: BTreeSet<i32>,
}

impl ReferenceSet {
    pub fn from_choices(choices: &[Choice]) -> Self {
        choices.iter().map(|c| c.id).collect()
    }

    pub fn contains(&self, id: i32) -> bool {
        self.ids.contains(&id)
    }
}

impl FromIterator<i32> for ReferenceSet {
    fn from_iter<T: IntoIterator<Item = i32>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryForm {
    pub name: Option<String>,
}

impl CategoryForm {
    pub fn into_command(
        self,
        existing_names: &HashSet<String>,
    ) -> Result<CreateCategoryCommand, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = required_text(&mut errors, "name", self.name);
        if let Some(name) = &name {
            if existing_names.contains(name) {
                errors.add("name", field_error("unique", DUPLICATE_CATEGORY));
            }
        }

        match name {
            Some(name) if no_errors(&errors) => finish(errors, CreateCategoryCommand { name }),
            _ => Err(errors),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemForm {
    pub name: Option<String>,
    pub size: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub unit: Option<String>,
    pub min_level: Option<String>,
    pub rack_no: Option<String>,
}

impl ItemForm {
    pub fn into_command(
        self,
        categories: &ReferenceSet,
    ) -> Result<CreateItemCommand, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = required_text(&mut errors, "name", self.name);
        let category_id = parse_choice(&mut errors, "category_id", self.category_id, categories);
        let min_level = parse_float(&mut errors, "min_level", self.min_level);

        match (name, category_id) {
            (Some(name), Some(category_id)) if no_errors(&errors) => finish(
                errors,
                CreateItemCommand {
                    name,
                    size: self.size,
                    description: self.description,
                    category_id,
                    unit: self.unit,
                    min_level: min_level.flatten(),
                    rack_no: self.rack_no,
                },
            ),
            _ => Err(errors),
        }
    }
}

/// Body of both stock pages; the page decides the movement type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StockMovementForm {
    pub item_id: Option<String>,
    pub date: Option<String>,
    pub quantity: Option<String>,
    pub remarks: Option<String>,
}

impl StockMovementForm {
    pub fn into_command(
        self,
        movement_type: MovementType,
        items: &ReferenceSet,
    ) -> Result<RecordMovementCommand, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let item_id = parse_choice(&mut errors, "item_id", self.item_id, items);
        let date = parse_date(&mut errors, "date", self.date);
        let quantity = parse_quantity(&mut errors, "quantity", self.quantity);

        match (item_id, date, quantity) {
            (Some(item_id), Some(date), Some(quantity)) if no_errors(&errors) => finish(
                errors,
                RecordMovementCommand {
                    item_id,
                    date,
                    movement_type,
                    quantity,
                    remarks: self.remarks,
                },
            ),
            _ => Err(errors),
        }
    }
}

/// Flattens validation errors into `"<field>: <message>"` lines, sorted by field.
pub fn field_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| {
                let text = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                format!("{}: {}", field, text)
            })
        })
        .collect()
}

/// A body the form extractor could not decode at all, reported against the
/// form as a whole.
pub fn undecodable_body(reason: String) -> ValidationErrors {
    let mut err = ValidationError::new("body");
    err.message = Some(reason.into());

    let mut errors = ValidationErrors::new();
    errors.add("form", err);
    errors
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

fn no_errors(errors: &ValidationErrors) -> bool {
    errors.errors().is_empty()
}

/// Runs the command's own field constraints and folds them into `errors`.
fn finish<C: Validate>(mut errors: ValidationErrors, command: C) -> Result<C, ValidationErrors> {
    if let Err(invalid) = command.validate() {
        for (field, errs) in invalid.field_errors() {
            for err in errs {
                errors.add(field, err.clone());
            }
        }
    }

    if no_errors(&errors) {
        Ok(command)
    } else {
        Err(errors)
    }
}

fn is_blank(raw: &Option<String>) -> bool {
    raw.as_deref().map_or(true, |s| s.trim().is_empty())
}

/// Required free text; whitespace-only is missing. The value is kept verbatim.
fn required_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    raw: Option<String>,
) -> Option<String> {
    if is_blank(&raw) {
        errors.add(field, field_error("required", REQUIRED));
        None
    } else {
        raw
    }
}

fn parse_choice(
    errors: &mut ValidationErrors,
    field: &'static str,
    raw: Option<String>,
    references: &ReferenceSet,
) -> Option<i32> {
    let raw = match raw.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => {
            errors.add(field, field_error("required", REQUIRED));
            return None;
        }
    };

    match raw.parse::<i32>() {
        Ok(id) if references.contains(id) => Some(id),
        Ok(_) => {
            errors.add(field, field_error("choice", INVALID_CHOICE));
            None
        }
        Err(_) => {
            errors.add(field, field_error("coerce", UNCOERCIBLE_CHOICE));
            None
        }
    }
}

/// Optional real number: `Some(None)` when blank, `None` when invalid.
fn parse_float(
    errors: &mut ValidationErrors,
    field: &'static str,
    raw: Option<String>,
) -> Option<Option<f64>> {
    let raw = match raw.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => return Some(None),
    };

    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Some(Some(value)),
        _ => {
            errors.add(field, field_error("float", INVALID_FLOAT));
            None
        }
    }
}

/// Required real number. Zero counts as missing.
fn parse_quantity(
    errors: &mut ValidationErrors,
    field: &'static str,
    raw: Option<String>,
) -> Option<f64> {
    match parse_float(errors, field, raw)? {
        Some(value) if value != 0.0 => Some(value),
        _ => {
            errors.add(field, field_error("required", REQUIRED));
            None
        }
    }
}

fn parse_date(
    errors: &mut ValidationErrors,
    field: &'static str,
    raw: Option<String>,
) -> Option<NaiveDate> {
    let raw = match raw.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => {
            errors.add(field, field_error("required", REQUIRED));
            return None;
        }
    };

    match NaiveDate::parse_from_str(&raw, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(field, field_error("date", INVALID_DATE));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn refs(ids: &[i32]) -> ReferenceSet {
        ids.iter().copied().collect()
    }

    fn has_error(errors: &ValidationErrors, field: &str, message: &str) -> bool {
        field_messages(errors).contains(&format!("{}: {}", field, message))
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("   "))]
    fn category_name_is_required(#[case] name: Option<&str>) {
        let form = CategoryForm {
            name: name.map(str::to_string),
        };
        let errors = form.into_command(&HashSet::new()).unwrap_err();
        assert!(has_error(&errors, "name", REQUIRED));
    }

    #[test]
    fn duplicate_category_name_is_a_field_error() {
        let existing: HashSet<String> = ["Paint".to_string()].into_iter().collect();
        let form = CategoryForm {
            name: Some("Paint".into()),
        };
        let errors = form.into_command(&existing).unwrap_err();
        assert!(has_error(&errors, "name", DUPLICATE_CATEGORY));
    }

    #[test]
    fn overlong_category_name_fails_length_check() {
        let form = CategoryForm {
            name: Some("x".repeat(101)),
        };
        let errors = form.into_command(&HashSet::new()).unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn item_form_keeps_optional_text_verbatim() {
        let form = ItemForm {
            name: Some(" Hex bolt ".into()),
            size: Some("M8".into()),
            description: Some("  ".into()),
            category_id: Some(" 3 ".into()),
            unit: Some("".into()),
            min_level: Some("12.5".into()),
            rack_no: None,
        };
        let command = form.into_command(&refs(&[3])).unwrap();
        assert_eq!(command.name, " Hex bolt ");
        assert_eq!(command.size.as_deref(), Some("M8"));
        assert_eq!(command.description.as_deref(), Some("  "));
        assert_eq!(command.category_id, 3);
        assert_eq!(command.unit.as_deref(), Some(""));
        assert_eq!(command.min_level, Some(12.5));
        assert_eq!(command.rack_no, None);
    }

    #[rstest]
    #[case(None, REQUIRED)]
    #[case(Some("abc"), UNCOERCIBLE_CHOICE)]
    #[case(Some("9"), INVALID_CHOICE)]
    fn item_category_must_be_a_known_id(#[case] raw: Option<&str>, #[case] message: &str) {
        let form = ItemForm {
            name: Some("Hex bolt".into()),
            category_id: raw.map(str::to_string),
            ..Default::default()
        };
        let errors = form.into_command(&refs(&[1, 2])).unwrap_err();
        assert!(has_error(&errors, "category_id", message));
    }

    #[rstest]
    #[case("ten")]
    #[case("inf")]
    #[case("NaN")]
    fn item_min_level_must_be_a_number(#[case] raw: &str) {
        let form = ItemForm {
            name: Some("Hex bolt".into()),
            category_id: Some("1".into()),
            min_level: Some(raw.into()),
            ..Default::default()
        };
        let errors = form.into_command(&refs(&[1])).unwrap_err();
        assert!(has_error(&errors, "min_level", INVALID_FLOAT));
    }

    #[test]
    fn item_form_reports_every_failing_field() {
        let errors = ItemForm::default().into_command(&refs(&[])).unwrap_err();
        assert_eq!(
            field_messages(&errors),
            vec![
                format!("category_id: {}", REQUIRED),
                format!("name: {}", REQUIRED),
            ]
        );
    }

    #[test]
    fn stock_form_builds_command_with_page_movement_type() {
        let form = StockMovementForm {
            item_id: Some("4".into()),
            date: Some("2024-06-01".into()),
            quantity: Some("5".into()),
            remarks: Some("opening stock".into()),
        };
        let command = form
            .into_command(MovementType::Outward, &refs(&[4]))
            .unwrap();
        assert_eq!(command.item_id, 4);
        assert_eq!(command.date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(command.movement_type, MovementType::Outward);
        assert_eq!(command.quantity, 5.0);
        assert_eq!(command.remarks.as_deref(), Some("opening stock"));
    }

    #[rstest]
    #[case("date", None, REQUIRED)]
    #[case("date", Some("01/06/2024"), INVALID_DATE)]
    #[case("date", Some("2024-02-30"), INVALID_DATE)]
    #[case("quantity", None, REQUIRED)]
    #[case("quantity", Some("0"), REQUIRED)]
    #[case("quantity", Some("lots"), INVALID_FLOAT)]
    fn stock_form_field_failures(
        #[case] field: &str,
        #[case] raw: Option<&str>,
        #[case] message: &str,
    ) {
        let mut form = StockMovementForm {
            item_id: Some("1".into()),
            date: Some("2024-06-01".into()),
            quantity: Some("1".into()),
            remarks: None,
        };
        match field {
            "date" => form.date = raw.map(str::to_string),
            _ => form.quantity = raw.map(str::to_string),
        }

        let errors = form
            .into_command(MovementType::Inward, &refs(&[1]))
            .unwrap_err();
        assert!(has_error(&errors, field, message));
    }

    #[test]
    fn blank_remarks_are_kept() {
        let form = StockMovementForm {
            item_id: Some("1".into()),
            date: Some("2024-06-01".into()),
            quantity: Some("2".into()),
            remarks: Some(" ".into()),
        };
        let command = form.into_command(MovementType::Inward, &refs(&[1])).unwrap();
        assert_eq!(command.remarks.as_deref(), Some(" "));
    }

    #[test]
    fn undecodable_body_is_reported_against_the_form() {
        let errors = undecodable_body("duplicate field `name`".to_string());
        assert_eq!(
            field_messages(&errors),
            vec!["form: duplicate field `name`".to_string()]
        );
    }

    #[test]
    fn reference_set_from_choices() {
        let set = ReferenceSet::from_choices(&[
            Choice {
                id: 2,
                label: "Paint".into(),
            },
            Choice {
                id: 5,
                label: "Tools".into(),
            },
        ]);
        assert!(set.contains(2));
        assert!(set.contains(5));
        assert!(!set.contains(3));
        assert!(!ReferenceSet::default().contains(2));
    }
}
