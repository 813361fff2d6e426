use crate::actor_framework::Entity;
use crate::domain::Course;
use super::actions::{CourseAction, CourseActionResult};
use super::dtos::{CourseCreate, CoursePatch};

/// Catalog key for a create request. Courses without an id are filtered out
/// by the client before they get here; `from_create_params` refuses them too.
pub fn catalog_key(params: &CourseCreate) -> String {
    params.course.id().unwrap_or_default().to_string()
}

impl Entity for Course {
    type Id = String;
    type CreateParams = CourseCreate;
    type Patch = CoursePatch;
    type Action = CourseAction;
    type ActionResult = CourseActionResult;

    fn from_create_params(id: String, params: CourseCreate) -> Result<Self, String> {
        if id.is_empty() {
            return Err(format!("course '{}' has no id", params.course.title));
        }
        Ok(Self {
            course_id: Some(id),
            ..params.course
        })
    }

    fn on_update(&mut self, patch: CoursePatch) -> Result<(), String> {
        self.title = patch.title;
        self.fee = patch.fee;
        self.duration = patch.duration;
        self.instructor = patch.instructor;
        self.thumbnail_image = patch.thumbnail_image;
        Ok(())
    }

    fn handle_action(&mut self, action: CourseAction) -> Result<CourseActionResult, String> {
        match action {
            CourseAction::Quote(plan) => Ok(CourseActionResult::Quote(plan.quote(self.fee))),
        }
    }
}
