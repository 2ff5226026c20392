use std::fmt::Write;

use tabled::settings::object::Rows;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use crate::lookup;
use crate::models::{CourseResult, StudentInfo};

#[derive(Tabled)]
struct CourseRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Course Code")]
    code: String,
    #[tabled(rename = "Course Title")]
    title: String,
    #[tabled(rename = "Credit")]
    credit: String,
    #[tabled(rename = "Grade")]
    grade: String,
    #[tabled(rename = "Grade Point")]
    point: String,
}

fn field(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "-".to_string())
}

/// Builds the student information block, one labelled line per profile field.
pub fn student_info_block(student: &StudentInfo) -> String {
    let mut block = String::new();
    let _ = writeln!(block, "Name:       {}", field(&student.student_name));
    let _ = writeln!(block, "Student ID: {}", field(&student.student_id));
    let _ = writeln!(
        block,
        "Program:    {} ({})",
        field(&student.program_name),
        field(&student.prog_short_name)
    );
    let _ = writeln!(
        block,
        "Department: {} ({})",
        field(&student.department_name),
        field(&student.dept_short_name)
    );
    let _ = writeln!(
        block,
        "Batch:      {} (Batch {})",
        field(&student.batch_id),
        field(&student.batch_no)
    );
    let _ = writeln!(block, "Shift:      {}", field(&student.shift));
    let _ = write!(block, "Campus:     {}", field(&student.campus_name));
    block
}

/// Builds the per-course table with a trailing CGPA line, one row per course
/// in response order.
pub fn results_table(courses: &[CourseResult]) -> String {
    if courses.is_empty() {
        return "No results found".to_string();
    }

    let rows: Vec<CourseRow> = courses
        .iter()
        .enumerate()
        .map(|(idx, course)| CourseRow {
            index: idx + 1,
            code: field(&course.custom_course_id),
            title: field(&course.course_title),
            credit: format!("{}", course.total_credit),
            grade: field(&course.grade_letter),
            point: format!("{:.2}", course.point_equivalent),
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string();

    format!("{table}\nCGPA: {:.2}", lookup::compute_cgpa(courses))
}
