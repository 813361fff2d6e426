use tracing::{debug, instrument, warn};
use crate::domain::Course;
use super::dto::{CourseDto, Envelope};
use super::{ApiClient, ApiError};

impl ApiClient {
    /// Fetches the catalog. Rows that do not decode as a course are logged
    /// and skipped so one malformed entry does not hide the rest.
    #[instrument(skip(self))]
    pub async fn list_courses(&self) -> Result<Vec<Course>, ApiError> {
        let body: Envelope<Vec<serde_json::Value>> = self.get_json("courses").await?;
        let rows = body.into_inner();
        let fetched = rows.len();
        let courses: Vec<Course> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<CourseDto>(row) {
                Ok(dto) => Some(Course::from(dto)),
                Err(e) => {
                    warn!(error = %e, "Skipping malformed course");
                    None
                }
            })
            .collect();
        debug!(fetched, count = courses.len(), "Courses fetched");
        Ok(courses)
    }

    #[instrument(skip(self))]
    pub async fn get_course(&self, course_id: &str) -> Result<Course, ApiError> {
        let url = self.endpoint_with_segment("courses", course_id)?;
        let body: Envelope<CourseDto> = self.get_url(url).await?;
        Ok(body.into_inner().into())
    }
}
