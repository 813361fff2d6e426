use crate::domain::Course;

#[derive(Debug, Clone)]
pub struct CourseCreate {
    pub course: Course,
}

/// Replacement values taken from a freshly fetched copy of the course.
#[derive(Debug, Clone)]
pub struct CoursePatch {
    pub title: String,
    pub fee: f64,
    pub duration: Option<String>,
    pub instructor: Option<String>,
    pub thumbnail_image: Option<String>,
}

impl From<Course> for CoursePatch {
    fn from(course: Course) -> Self {
        Self {
            title: course.title,
            fee: course.fee,
            duration: course.duration,
            instructor: course.instructor,
            thumbnail_image: course.thumbnail_image,
        }
    }
}
