use tracing::{debug, info, instrument, warn};
use crate::actor_framework::{FrameworkError, ResourceClient};
use crate::course_actor::{CourseAction, CourseActionResult, CourseCreate, CourseError, CoursePatch};
use crate::domain::{CatalogFilter, Course, PaymentPlan, PlanQuote};

/// Client for the catalog actor: refreshes, filtered listing, and quotes.
#[derive(Clone)]
pub struct CourseClient {
    inner: ResourceClient<Course>,
}

impl_basic_client!(CourseClient, Course, CourseError, course);

impl CourseClient {
    /// Upserts freshly fetched courses. Courses without an id cannot be
    /// keyed and are skipped. Returns the number stored.
    #[instrument(skip(self, courses), fields(fetched = courses.len()))]
    pub async fn sync_catalog(&self, courses: Vec<Course>) -> Result<usize, CourseError> {
        let mut stored = 0;
        for course in courses {
            let Some(id) = course.id().map(str::to_string) else {
                warn!(title = %course.title, "Skipping course without id");
                continue;
            };
            match self.inner.create(CourseCreate { course: course.clone() }).await {
                Ok(_) => {}
                Err(FrameworkError::AlreadyExists(_)) => {
                    self.inner.update(id, CoursePatch::from(course)).await?;
                }
                Err(e) => return Err(e.into()),
            }
            stored += 1;
        }
        info!(stored, "Catalog synced");
        Ok(stored)
    }

    /// Courses matching `filter`, ordered by title.
    #[instrument(skip(self))]
    pub async fn list_courses(&self, filter: &CatalogFilter) -> Result<Vec<Course>, CourseError> {
        let mut courses: Vec<Course> = self
            .all_courses()
            .await?
            .into_iter()
            .filter(|course| filter.matches(course))
            .collect();
        courses.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(courses)
    }

    #[instrument(skip(self))]
    pub async fn quote(&self, id: String, plan: PaymentPlan) -> Result<PlanQuote, CourseError> {
        debug!("Sending request");
        match self.inner.perform_action(id, CourseAction::Quote(plan)).await? {
            CourseActionResult::Quote(quote) => Ok(quote),
        }
    }
}
