use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A semester the portal accepts, as offered in the lookup form.
#[derive(Debug, Clone, Copy)]
pub struct Semester {
    pub label: &'static str,
    pub code: &'static str,
}

/// Semester codes the portal accepts, newest first. The lookup itself treats
/// the code as opaque; this table is what gets offered to the user.
pub const SEMESTERS: &[Semester] = &[
    Semester { label: "Fall-2024", code: "243" },
    Semester { label: "Summer-2024", code: "242" },
    Semester { label: "Spring-2024", code: "241" },
    Semester { label: "Fall-2023", code: "233" },
    Semester { label: "Summer-2023", code: "232" },
    Semester { label: "Spring-2023", code: "231" },
];

/// User input for one lookup. Invalid until both fields are non-empty.
#[derive(Debug, Clone)]
pub struct LookupRequest {
    pub student_id: String,
    pub semester_id: String,
}

/// Student profile as served by the portal. Every field is optional; the
/// portal mixes strings and numbers for ids, so fields are decoded tolerantly
/// and rendered as they arrived.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentInfo {
    #[serde(default, deserialize_with = "de_opt_string")]
    pub student_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub student_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub program_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub prog_short_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub department_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub dept_short_name: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub batch_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub batch_no: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub shift: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub campus_name: Option<String>,
}

/// One completed course from the results endpoint. Row order is response
/// order. Credit and grade point arrive as numbers or numeric strings;
/// missing or non-numeric values count as 0 toward the CGPA.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResult {
    #[serde(default, deserialize_with = "de_opt_string")]
    pub course_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub custom_course_id: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub course_title: Option<String>,
    #[serde(default, deserialize_with = "de_loose_f64")]
    pub total_credit: f64,
    #[serde(default, deserialize_with = "de_opt_string")]
    pub grade_letter: Option<String>,
    #[serde(default, deserialize_with = "de_loose_f64")]
    pub point_equivalent: f64,
}

/// The controller's externally observable state. Exactly one variant holds at
/// a time; every transition replaces the value wholesale.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Idle,
    Loading,
    Success {
        student: StudentInfo,
        courses: Vec<CourseResult>,
    },
    Failure {
        message: String,
    },
}

// Accepts a string or a number, anything else becomes None.
fn de_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

// Accepts a number or a numeric string, anything else becomes 0.
fn de_loose_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}
