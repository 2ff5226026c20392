use log::info;

use crate::error::LookupError;
use crate::models::{CourseResult, LookupOutcome, LookupRequest, StudentInfo};
use crate::utils::portal::GradeSource;

/// Drives the fetch-and-aggregate flow and owns the single outcome value.
///
/// The outcome moves Idle -> Loading -> Success or Failure, and a later
/// submission starts the cycle over; there is no terminal state. A submission
/// while a lookup is in flight is rejected outright rather than queued.
pub struct LookupController<S> {
    source: S,
    outcome: LookupOutcome,
}

impl<S: GradeSource> LookupController<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            outcome: LookupOutcome::Idle,
        }
    }

    pub fn outcome(&self) -> &LookupOutcome {
        &self.outcome
    }

    /// Runs one lookup: validates the request, then fetches the profile and
    /// the semester results in sequence. Validation failures never touch the
    /// network; any failure lands in the Failure state with no partial
    /// payloads attached.
    pub async fn submit_lookup(&mut self, request: &LookupRequest) -> Result<(), LookupError> {
        if matches!(self.outcome, LookupOutcome::Loading) {
            return Err(LookupError::Busy);
        }

        if request.student_id.is_empty() || request.semester_id.is_empty() {
            let err = LookupError::Validation;
            self.outcome = LookupOutcome::Failure {
                message: err.to_string(),
            };
            return Err(err);
        }

        self.outcome = LookupOutcome::Loading;

        match self.fetch_both(request).await {
            Ok((student, courses)) => {
                info!(
                    "Fetched {} course results for student {}",
                    courses.len(),
                    request.student_id
                );
                self.outcome = LookupOutcome::Success { student, courses };
                Ok(())
            }
            Err(err) => {
                self.outcome = LookupOutcome::Failure {
                    message: err.to_string(),
                };
                Err(err)
            }
        }
    }

    // Profile first, then results. The second call only happens once the
    // first has resolved.
    async fn fetch_both(
        &self,
        request: &LookupRequest,
    ) -> Result<(StudentInfo, Vec<CourseResult>), LookupError> {
        let student = self.source.fetch_student_info(&request.student_id).await?;
        let courses = self
            .source
            .fetch_semester_results(&request.student_id, &request.semester_id)
            .await?;
        Ok((student, courses))
    }
}

/// Credit-weighted mean of grade points, rounded to two decimals. A zero
/// credit total yields 0 rather than a division by zero.
pub fn compute_cgpa(courses: &[CourseResult]) -> f64 {
    if courses.is_empty() {
        return 0.0;
    }

    let mut total_credits = 0.0;
    let mut weighted_points = 0.0;
    for course in courses {
        total_credits += course.total_credit;
        weighted_points += course.total_credit * course.point_equivalent;
    }

    if total_credits > 0.0 {
        (weighted_points / total_credits * 100.0).round() / 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use serde_json::json;

    use super::*;
    use crate::error::Stage;

    #[derive(Default)]
    struct StubSource {
        profile: StudentInfo,
        courses: Vec<CourseResult>,
        profile_status: Cell<Option<u16>>,
        results_status: Cell<Option<u16>>,
        calls: Cell<usize>,
    }

    impl GradeSource for StubSource {
        async fn fetch_student_info(&self, _student_id: &str) -> Result<StudentInfo, LookupError> {
            self.calls.set(self.calls.get() + 1);
            if let Some(status) = self.profile_status.get() {
                return Err(LookupError::Http {
                    stage: Stage::Profile,
                    status,
                });
            }
            Ok(self.profile.clone())
        }

        async fn fetch_semester_results(
            &self,
            _student_id: &str,
            _semester_id: &str,
        ) -> Result<Vec<CourseResult>, LookupError> {
            self.calls.set(self.calls.get() + 1);
            if let Some(status) = self.results_status.get() {
                return Err(LookupError::Http {
                    stage: Stage::Results,
                    status,
                });
            }
            Ok(self.courses.clone())
        }
    }

    fn course(credit: f64, point: f64) -> CourseResult {
        CourseResult {
            total_credit: credit,
            point_equivalent: point,
            ..CourseResult::default()
        }
    }

    fn request(student_id: &str, semester_id: &str) -> LookupRequest {
        LookupRequest {
            student_id: student_id.to_string(),
            semester_id: semester_id.to_string(),
        }
    }

    #[tokio::test]
    async fn empty_student_id_fails_without_network_calls() {
        let mut controller = LookupController::new(StubSource::default());

        let err = controller.submit_lookup(&request("", "243")).await.unwrap_err();
        assert!(matches!(err, LookupError::Validation));
        assert_eq!(controller.source.calls.get(), 0);
        assert_eq!(
            controller.outcome(),
            &LookupOutcome::Failure {
                message: "Both Student ID and Semester ID are required".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn empty_semester_id_fails_without_network_calls() {
        let mut controller = LookupController::new(StubSource::default());

        let err = controller.submit_lookup(&request("123", "")).await.unwrap_err();
        assert!(matches!(err, LookupError::Validation));
        assert_eq!(controller.source.calls.get(), 0);
    }

    #[tokio::test]
    async fn submission_while_loading_is_rejected() {
        let mut controller = LookupController::new(StubSource::default());
        controller.outcome = LookupOutcome::Loading;

        let err = controller.submit_lookup(&request("123", "243")).await.unwrap_err();
        assert!(matches!(err, LookupError::Busy));
        assert_eq!(controller.source.calls.get(), 0);
        assert_eq!(controller.outcome(), &LookupOutcome::Loading);
    }

    #[tokio::test]
    async fn profile_404_leaves_no_student_payload() {
        let source = StubSource::default();
        source.profile_status.set(Some(404));
        let mut controller = LookupController::new(source);

        let err = controller.submit_lookup(&request("123", "243")).await.unwrap_err();
        assert!(matches!(
            err,
            LookupError::Http {
                stage: Stage::Profile,
                status: 404,
            }
        ));
        assert_eq!(controller.source.calls.get(), 1);
        assert_eq!(
            controller.outcome(),
            &LookupOutcome::Failure {
                message: "Error fetching student info: 404".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn results_failure_is_attributed_to_the_second_call() {
        let source = StubSource::default();
        source.results_status.set(Some(500));
        let mut controller = LookupController::new(source);

        let err = controller.submit_lookup(&request("123", "243")).await.unwrap_err();
        assert!(matches!(
            err,
            LookupError::Http {
                stage: Stage::Results,
                status: 500,
            }
        ));
        assert_eq!(controller.source.calls.get(), 2);
    }

    #[tokio::test]
    async fn successful_lookup_carries_both_payloads() {
        let source = StubSource {
            profile: serde_json::from_value(json!({"studentName": "Jane Doe"})).unwrap(),
            courses: vec![serde_json::from_value(json!({
                "customCourseId": "SE 213",
                "totalCredit": "3",
                "gradeLetter": "A",
                "pointEquivalent": "4.00",
            }))
            .unwrap()],
            ..StubSource::default()
        };
        let mut controller = LookupController::new(source);

        controller.submit_lookup(&request("123", "243")).await.unwrap();

        let LookupOutcome::Success { student, courses } = controller.outcome() else {
            panic!("expected a Success outcome");
        };
        assert_eq!(student.student_name.as_deref(), Some("Jane Doe"));
        assert_eq!(courses.len(), 1);
        assert_eq!(format!("{:.2}", compute_cgpa(courses)), "4.00");
    }

    #[tokio::test]
    async fn controller_is_reusable_after_a_failure() {
        let source = StubSource::default();
        source.profile_status.set(Some(404));
        let mut controller = LookupController::new(source);

        controller.submit_lookup(&request("123", "243")).await.unwrap_err();
        assert!(matches!(controller.outcome(), LookupOutcome::Failure { .. }));

        controller.source.profile_status.set(None);
        controller.submit_lookup(&request("123", "243")).await.unwrap();
        assert!(matches!(controller.outcome(), LookupOutcome::Success { .. }));
    }

    #[test]
    fn cgpa_of_no_courses_is_zero() {
        assert_eq!(compute_cgpa(&[]), 0.0);
    }

    #[test]
    fn cgpa_is_the_credit_weighted_mean() {
        let courses = [course(3.0, 4.0), course(3.0, 3.0)];
        assert_eq!(compute_cgpa(&courses), 3.5);
        assert_eq!(format!("{:.2}", compute_cgpa(&courses)), "3.50");
    }

    #[test]
    fn cgpa_weights_unequal_credits() {
        let courses = [course(4.0, 4.0), course(1.0, 2.0)];
        // (16 + 2) / 5 = 3.6
        assert_eq!(compute_cgpa(&courses), 3.6);
    }

    #[test]
    fn all_zero_credits_yield_zero_not_nan() {
        let courses = [course(0.0, 4.0), course(0.0, 3.7)];
        let cgpa = compute_cgpa(&courses);
        assert_eq!(cgpa, 0.0);
        assert!(cgpa.is_finite());
    }

    #[test]
    fn cgpa_rounds_to_two_decimals() {
        let courses = [course(3.0, 3.67), course(3.0, 3.33), course(1.0, 4.0)];
        // 25 / 7 = 3.5714... -> 3.57
        assert_eq!(compute_cgpa(&courses), 3.57);
    }
}
