/// A course as served by the catalog endpoints. Read-only on the client.
///
/// `course_id` is optional because payloads without one do reach the
/// client, and enrollment must refuse them before talking to the backend.
/// Wire shapes are normalized into this struct by the API layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub course_id: Option<String>,
    pub title: String,
    pub fee: f64,
    pub duration: Option<String>,
    pub instructor: Option<String>,
    pub thumbnail_image: Option<String>,
}

impl Course {
    pub fn new(course_id: impl Into<String>, title: impl Into<String>, fee: f64) -> Self {
        Self {
            course_id: Some(course_id.into()),
            title: title.into(),
            fee,
            duration: None,
            instructor: None,
            thumbnail_image: None,
        }
    }

    /// The id, treating a blank string the same as an absent one.
    pub fn id(&self) -> Option<&str> {
        self.course_id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }
}

/// Filter state for the catalog listing. Empty fields match everything.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    pub text: Option<String>,
    pub instructor: Option<String>,
    pub max_fee: Option<f64>,
}

impl CatalogFilter {
    pub fn matches(&self, course: &Course) -> bool {
        let text_ok = self.text.as_deref().map_or(true, |text| {
            course.title.to_lowercase().contains(&text.trim().to_lowercase())
        });
        let instructor_ok = self.instructor.as_deref().map_or(true, |wanted| {
            course
                .instructor
                .as_deref()
                .is_some_and(|name| name.eq_ignore_ascii_case(wanted.trim()))
        });
        let fee_ok = self.max_fee.map_or(true, |max| course.fee <= max);
        text_ok && instructor_ok && fee_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rust_course() -> Course {
        Course {
            instructor: Some("Meera Nair".into()),
            ..Course::new("c1", "Systems Programming in Rust", 4999.0)
        }
    }

    #[test]
    fn test_blank_id_counts_as_missing() {
        let mut course = rust_course();
        course.course_id = Some("  ".into());
        assert_eq!(course.id(), None);
    }

    #[test]
    fn test_filter_combines_all_fields() {
        let course = rust_course();
        let filter = CatalogFilter {
            text: Some("rust".into()),
            instructor: Some("meera nair".into()),
            max_fee: Some(5000.0),
        };
        assert!(filter.matches(&course));

        let too_cheap = CatalogFilter { max_fee: Some(999.0), ..filter };
        assert!(!too_cheap.matches(&course));
        assert!(CatalogFilter::default().matches(&course));
    }
}
