//! Registry-driven validation of decoded server responses.
//!
//! Decoders never fail on missing or null fields; this validator is
//! where schema expectations are enforced, at a caller-chosen level.
//! Raising the level only ever adds issues: Basic checks required-field
//! presence, Strict adds type compatibility, constraint, and cross-field
//! checks, Paranoid adds business rules. The validator reads the decoded
//! value and produces a report; it never mutates anything.

use crate::validation::fields::{self, Constraint, FieldSpec, FieldType, ResponseClass};
use crate::validation::{Issue, Severity, ValidationReport};
use serde_json::Value;

/// How much scrutiny to apply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationLevel {
    /// No validation at all.
    None,
    /// Required-field presence.
    #[default]
    Basic,
    /// Basic plus type compatibility, constraints, and cross-field rules.
    Strict,
    /// Strict plus business rules.
    Paranoid,
}

/// Stateless response validator.
pub struct ResponseValidator;

impl ResponseValidator {
    /// Validate a decoded response element against its class's registry.
    pub fn validate(value: &Value, class: ResponseClass, level: ValidationLevel) -> ValidationReport {
        let mut report = ValidationReport::new();

        if level == ValidationLevel::None {
            return report;
        }

        let object = match value.as_object() {
            Some(object) => object,
            None => {
                report.push(
                    Issue::new("", Severity::Critical, "response must be a JSON object")
                        .expected("object")
                        .actual(json_type_name(value)),
                );
                return report;
            }
        };

        let specs = fields::fields(class);

        for (name, field_value) in object {
            let spec = match specs.iter().find(|spec| spec.name == name) {
                Some(spec) => spec,
                None => {
                    report.push(
                        Issue::new(
                            name.clone(),
                            Severity::Warning,
                            "unexpected field found",
                        )
                        .suggestion("this field is not part of the expected schema"),
                    );
                    continue;
                }
            };

            // Null reads as absent; the presence pass below handles it.
            if field_value.is_null() {
                continue;
            }

            if level >= ValidationLevel::Strict {
                validate_field(&mut report, spec, field_value);
            }
        }

        for spec in specs.iter().filter(|spec| spec.required) {
            let missing = match object.get(spec.name) {
                None => true,
                Some(value) => value.is_null(),
            };
            if missing {
                report.push(
                    Issue::new(spec.name, Severity::Error, "required field is missing")
                        .suggestion("ensure this field is present in the response"),
                );
            }
        }

        if level >= ValidationLevel::Strict {
            cross_field_checks(&mut report, class, object);
        }

        if level >= ValidationLevel::Paranoid {
            business_rules(&mut report, class, object);
        }

        report
    }
}

fn validate_field(report: &mut ValidationReport, spec: &FieldSpec, value: &Value) {
    if !type_compatible(spec.field_type, value) {
        report.push(
            Issue::new(spec.name, Severity::Error, "type mismatch")
                .expected(spec.field_type.as_str())
                .actual(json_type_name(value)),
        );
        return;
    }

    let text = value_text(value);

    for constraint in spec.constraints {
        check_constraint(report, spec.name, constraint, &text);
    }

    if spec.field_type == FieldType::Enum && !spec.valid_values.is_empty() {
        if !spec.valid_values.contains(&text.as_str()) {
            report.push(
                Issue::new(spec.name, Severity::Error, "invalid enum value")
                    .expected(spec.valid_values.join(", "))
                    .actual(text.clone())
                    .suggestion("use one of the valid values"),
            );
        }
    }
}

fn check_constraint(report: &mut ValidationReport, field: &str, constraint: &Constraint, text: &str) {
    match constraint {
        Constraint::MinLength(min) => {
            if text.len() < *min {
                report.push(
                    Issue::new(field, Severity::Error, format!("value shorter than {min} characters"))
                        .actual(text.to_string()),
                );
            }
        }
        Constraint::MaxLength(max) => {
            if text.len() > *max {
                report.push(
                    Issue::new(field, Severity::Error, format!("value longer than {max} characters"))
                        .actual(text.to_string()),
                );
            }
        }
        Constraint::MinValue(min) => {
            if let Ok(value) = text.parse::<f64>() {
                if value < *min {
                    report.push(
                        Issue::new(field, Severity::Error, format!("value below minimum {min}"))
                            .expected(format!(">= {min}"))
                            .actual(text.to_string()),
                    );
                }
            }
        }
        Constraint::MaxValue(max) => {
            if let Ok(value) = text.parse::<f64>() {
                if value > *max {
                    report.push(
                        Issue::new(field, Severity::Error, format!("value above maximum {max}"))
                            .expected(format!("<= {max}"))
                            .actual(text.to_string()),
                    );
                }
            }
        }
        // Format checks apply to non-empty values; presence is the
        // required flag's job.
        Constraint::Matches { check, description } => {
            if !text.is_empty() && !check(text) {
                report.push(
                    Issue::new(field, Severity::Error, "value does not match the expected format")
                        .expected(description.to_string())
                        .actual(text.to_string()),
                );
            }
        }
        Constraint::OneOf(allowed) => {
            if !allowed.contains(&text) {
                report.push(
                    Issue::new(field, Severity::Error, "value not in the allowed set")
                        .expected(allowed.join(", "))
                        .actual(text.to_string()),
                );
            }
        }
        Constraint::PositiveNumber => {
            if let Ok(value) = text.parse::<f64>() {
                if value <= 0.0 {
                    report.push(
                        Issue::new(field, Severity::Error, "value must be positive")
                            .actual(text.to_string()),
                    );
                }
            }
        }
        Constraint::NonEmpty => {
            if text.is_empty() {
                report.push(Issue::new(field, Severity::Error, "value must not be empty"));
            }
        }
    }
}

fn cross_field_checks(
    report: &mut ValidationReport,
    class: ResponseClass,
    object: &serde_json::Map<String, Value>,
) {
    if class != ResponseClass::Order {
        return;
    }

    let order_type = object.get("type").and_then(Value::as_str).unwrap_or("");
    let has_price = object.get("price").map(|v| !v.is_null()).unwrap_or(false);
    let has_stop = object.get("stop_price").map(|v| !v.is_null()).unwrap_or(false);

    if matches!(order_type, "limit" | "stop_limit") && !has_price {
        report.push(
            Issue::new("price", Severity::Error, "limit orders must carry a price")
                .expected("a limit price")
                .actual("absent"),
        );
    }
    if matches!(order_type, "stop" | "stop_limit") && !has_stop {
        report.push(
            Issue::new("stop_price", Severity::Error, "stop orders must carry a stop price")
                .expected("a stop price")
                .actual("absent"),
        );
    }
}

fn business_rules(
    report: &mut ValidationReport,
    class: ResponseClass,
    object: &serde_json::Map<String, Value>,
) {
    if class != ResponseClass::Order {
        return;
    }

    let order_type = object.get("type").and_then(Value::as_str).unwrap_or("");
    let duration = object.get("duration").and_then(Value::as_str).unwrap_or("");
    if order_type == "market" && duration != "day" {
        report.push(
            Issue::new("duration", Severity::Warning, "market orders should be day orders")
                .expected("day")
                .actual(duration.to_string()),
        );
    }

    // Quantity reconciliation is a warning, not a decode failure.
    let number = |key: &str| object.get(key).and_then(Value::as_f64);
    if let (Some(quantity), Some(exec), Some(remaining)) = (
        number("quantity"),
        number("exec_quantity"),
        number("remaining_quantity"),
    ) {
        if (exec + remaining - quantity).abs() > 1e-9 {
            report.push(
                Issue::new(
                    "quantity",
                    Severity::Warning,
                    "executed + remaining quantity does not reconcile with quantity",
                )
                .expected(format!("{quantity}"))
                .actual(format!("{}", exec + remaining)),
            );
        }
    }
}

fn type_compatible(field_type: FieldType, value: &Value) -> bool {
    match field_type {
        FieldType::String | FieldType::Date | FieldType::DateTime | FieldType::Enum => {
            value.is_string() || value.is_number()
        }
        // The broker emits numerics both as numbers and as strings.
        FieldType::Integer | FieldType::Double => {
            value.is_number() || value.as_str().map(|s| s.parse::<f64>().is_ok()).unwrap_or(false)
        }
        FieldType::Boolean => value.is_boolean(),
        FieldType::Array => value.is_array() || value.is_object(),
        FieldType::Object => value.is_object(),
        FieldType::Optional => true,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_order() -> Value {
        json!({
            "id": 228175,
            "class": "equity",
            "symbol": "AAPL",
            "side": "buy",
            "quantity": 100.0,
            "type": "limit",
            "duration": "day",
            "status": "open",
            "price": 150.35,
            "exec_quantity": 40.0,
            "remaining_quantity": 60.0
        })
    }

    #[test]
    fn basic_passes_a_complete_order() {
        let report =
            ResponseValidator::validate(&sample_order(), ResponseClass::Order, ValidationLevel::Basic);
        assert!(report.ok(), "{}", report.detailed_report());
    }

    #[test]
    fn basic_flags_missing_required_fields() {
        let mut order = sample_order();
        order.as_object_mut().unwrap().remove("status");
        let report =
            ResponseValidator::validate(&order, ResponseClass::Order, ValidationLevel::Basic);
        assert!(!report.ok());
        assert!(report.issues.iter().any(|i| i.field == "status"));
    }

    #[test]
    fn null_required_field_counts_as_missing() {
        let mut order = sample_order();
        order["symbol"] = Value::Null;
        let report =
            ResponseValidator::validate(&order, ResponseClass::Order, ValidationLevel::Basic);
        assert!(!report.ok());
    }

    #[test]
    fn strict_catches_bad_enum_values() {
        let mut order = sample_order();
        order["status"] = json!("halted");
        let basic =
            ResponseValidator::validate(&order, ResponseClass::Order, ValidationLevel::Basic);
        assert!(basic.ok());

        let strict =
            ResponseValidator::validate(&order, ResponseClass::Order, ValidationLevel::Strict);
        assert!(!strict.ok());
        assert!(strict.issues.iter().any(|i| i.field == "status"));
    }

    #[test]
    fn strict_cross_field_limit_needs_price() {
        let mut order = sample_order();
        order.as_object_mut().unwrap().remove("price");
        let report =
            ResponseValidator::validate(&order, ResponseClass::Order, ValidationLevel::Strict);
        assert!(!report.ok());
        assert!(report.issues.iter().any(|i| i.field == "price"));
    }

    #[test]
    fn paranoid_warns_on_quantity_mismatch() {
        let mut order = sample_order();
        order["exec_quantity"] = json!(10.0);
        let strict =
            ResponseValidator::validate(&order, ResponseClass::Order, ValidationLevel::Strict);
        assert!(strict.ok());

        let paranoid =
            ResponseValidator::validate(&order, ResponseClass::Order, ValidationLevel::Paranoid);
        assert!(paranoid.ok(), "reconciliation is a warning");
        assert!(paranoid
            .issues
            .iter()
            .any(|i| i.field == "quantity" && i.severity == Severity::Warning));
    }

    #[test]
    fn paranoid_warns_on_gtc_market_orders() {
        let mut order = sample_order();
        order["type"] = json!("market");
        order["duration"] = json!("gtc");
        order.as_object_mut().unwrap().remove("price");
        let report =
            ResponseValidator::validate(&order, ResponseClass::Order, ValidationLevel::Paranoid);
        assert!(report
            .issues
            .iter()
            .any(|i| i.field == "duration" && i.severity == Severity::Warning));
    }

    #[test]
    fn unexpected_fields_warn() {
        let mut order = sample_order();
        order["brand_new_field"] = json!("surprise");
        let report =
            ResponseValidator::validate(&order, ResponseClass::Order, ValidationLevel::Basic);
        assert!(report.ok());
        assert!(report.issues.iter().any(|i| i.field == "brand_new_field"));
    }

    #[test]
    fn raising_the_level_never_removes_errors() {
        let mut order = sample_order();
        order.as_object_mut().unwrap().remove("symbol");
        order["status"] = json!("halted");

        let basic =
            ResponseValidator::validate(&order, ResponseClass::Order, ValidationLevel::Basic);
        let strict =
            ResponseValidator::validate(&order, ResponseClass::Order, ValidationLevel::Strict);
        let paranoid =
            ResponseValidator::validate(&order, ResponseClass::Order, ValidationLevel::Paranoid);

        assert!(basic.error_count() <= strict.error_count());
        assert!(strict.error_count() <= paranoid.error_count());

        for issue in basic.issues.iter().filter(|i| i.severity >= Severity::Error) {
            assert!(
                strict
                    .issues
                    .iter()
                    .any(|s| s.field == issue.field && s.severity >= Severity::Error),
                "strict dropped error on {}",
                issue.field
            );
        }
    }

    #[test]
    fn non_object_is_critical() {
        let report = ResponseValidator::validate(
            &json!([1, 2, 3]),
            ResponseClass::Order,
            ValidationLevel::Basic,
        );
        assert!(!report.ok());
        assert_eq!(report.issues[0].severity, Severity::Critical);
    }
}
