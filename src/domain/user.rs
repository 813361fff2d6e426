use serde::{Deserialize, Serialize};

/// Represents the signed-in learner.
///
/// Serialized form is the persisted session mirror. API responses go
/// through `api::dto`, which normalizes the backend's id shapes first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    #[serde(default)]
    pub full_name: String,
    pub email: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(rename = "profileComplete", default)]
    pub profile_complete: bool,
    #[serde(rename = "enrolledCourses", default)]
    pub enrolled_courses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

fn default_role() -> String {
    "student".to_string()
}

/// Partial update merged into the current user. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub profile_complete: Option<bool>,
}

impl User {
    /// Creates a user with an incomplete profile and no enrollments.
    pub fn new(user_id: impl Into<String>, full_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            full_name: full_name.into(),
            email: email.into(),
            role: default_role(),
            profile_complete: false,
            enrolled_courses: Vec::new(),
            phone: None,
            city: None,
        }
    }

    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(full_name) = patch.full_name {
            self.full_name = full_name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = Some(phone);
        }
        if let Some(city) = patch.city {
            self.city = Some(city);
        }
        if let Some(complete) = patch.profile_complete {
            self.profile_complete = complete;
        }
    }

    pub fn is_enrolled(&self, course_id: &str) -> bool {
        self.enrolled_courses.iter().any(|id| id == course_id)
    }

    /// Records an enrollment. Returns `false` when the course was already present.
    pub fn enroll(&mut self, course_id: &str) -> bool {
        if self.is_enrolled(course_id) {
            return false;
        }
        self.enrolled_courses.push(course_id.to_string());
        true
    }
}

/// Profile details collected by the first wizard step.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
}

impl ProfileForm {
    /// Names of the required fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("full_name", &self.full_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("city", &self.city),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    /// Converts the form into a patch that also marks the profile complete.
    pub fn into_patch(self) -> UserPatch {
        UserPatch {
            full_name: Some(self.full_name.trim().to_string()),
            email: Some(self.email.trim().to_string()),
            phone: Some(self.phone.trim().to_string()),
            city: Some(self.city.trim().to_string()),
            profile_complete: Some(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enroll_is_idempotent() {
        let mut user = User::new("u1", "Asha", "asha@example.com");
        assert!(user.enroll("c1"));
        assert!(!user.enroll("c1"));
        assert_eq!(user.enrolled_courses, vec!["c1".to_string()]);
    }

    #[test]
    fn test_mirror_shape_uses_camel_case_flags() {
        let user: User = serde_json::from_str(
            r#"{"user_id":"u7","email":"k@example.com","profileComplete":true,"enrolledCourses":["c9"]}"#,
        )
        .unwrap();
        assert_eq!(user.user_id, "u7");
        assert_eq!(user.role, "student");
        assert!(user.profile_complete);
        assert!(user.is_enrolled("c9"));

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["profileComplete"], true);
        assert!(json.get("phone").is_none());
    }

    #[test]
    fn test_profile_form_reports_blank_fields() {
        let form = ProfileForm {
            full_name: "Ravi".into(),
            email: "  ".into(),
            phone: "98450".into(),
            city: String::new(),
        };
        assert_eq!(form.missing_fields(), vec!["email", "city"]);
    }

    #[test]
    fn test_patch_merges_only_present_fields() {
        let mut user = User::new("u1", "Old", "old@example.com");
        user.apply(UserPatch { city: Some("Pune".into()), ..UserPatch::default() });
        assert_eq!(user.full_name, "Old");
        assert_eq!(user.city.as_deref(), Some("Pune"));
        assert!(!user.profile_complete);
    }
}
