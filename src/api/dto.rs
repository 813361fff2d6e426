//! Response shapes as the backend sends them, converted to domain types
//! at this boundary and nowhere else.

use std::fmt;
use serde::Deserialize;
use crate::domain::{Course, PaymentOrder, User, VerifiedPayment};
use super::ApiError;

/// Bodies arrive either bare or wrapped as `{"data": ...}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

/// An id as the backend sends it: a string, or a number from a SQL key.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum IdDto {
    Str(String),
    Num(u64),
}

impl fmt::Display for IdDto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(id) => f.write_str(id.trim()),
            Self::Num(id) => write!(f, "{id}"),
        }
    }
}

/// First non-blank id among the candidates, in order of preference.
fn pick_id<const N: usize>(candidates: [Option<IdDto>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(|id| id.to_string())
        .find(|id| !id.is_empty())
}

#[derive(Debug, Deserialize)]
pub(crate) struct CourseDto {
    #[serde(default)]
    id: Option<IdDto>,
    #[serde(default)]
    course_id: Option<IdDto>,
    #[serde(default, rename = "courseId")]
    course_id_camel: Option<IdDto>,
    title: String,
    fee: f64,
    #[serde(default)]
    duration: Option<String>,
    #[serde(default)]
    instructor: Option<String>,
    #[serde(default)]
    thumbnail_image: Option<String>,
}

impl From<CourseDto> for Course {
    fn from(dto: CourseDto) -> Self {
        Self {
            course_id: pick_id([dto.course_id, dto.course_id_camel, dto.id]),
            title: dto.title,
            fee: dto.fee,
            duration: dto.duration,
            instructor: dto.instructor,
            thumbnail_image: dto.thumbnail_image,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserRecordDto {
    #[serde(default)]
    id: Option<IdDto>,
    #[serde(default)]
    user_id: Option<IdDto>,
    #[serde(default)]
    full_name: String,
    email: String,
    #[serde(default)]
    role: Option<String>,
    #[serde(default, rename = "profileComplete")]
    profile_complete: bool,
    #[serde(default, rename = "enrolledCourses")]
    enrolled_courses: Vec<IdDto>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    city: Option<String>,
}

/// A user, possibly nested one level as `{"user": {...}}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum UserDto {
    Nested { user: UserRecordDto },
    Flat(UserRecordDto),
}

impl UserDto {
    /// Normalizes either shape into a `User`. A user without any id cannot
    /// own a session and is refused.
    pub(crate) fn into_user(self) -> Result<User, ApiError> {
        let (Self::Nested { user: record } | Self::Flat(record)) = self;
        let user_id = pick_id([record.user_id, record.id])
            .ok_or_else(|| ApiError::Decode(format!("user {} has no id", record.email)))?;
        let mut user = User::new(user_id, record.full_name, record.email);
        if let Some(role) = record.role.filter(|role| !role.trim().is_empty()) {
            user.role = role;
        }
        user.profile_complete = record.profile_complete;
        for course_id in record.enrolled_courses {
            user.enroll(&course_id.to_string());
        }
        user.phone = record.phone;
        user.city = record.city;
        Ok(user)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginDto {
    pub token: String,
    pub user: UserDto,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OrderDto {
    pub id: String,
    pub amount: u64,
    pub currency: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateOrderData {
    pub order: OrderDto,
    pub key_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateOrderResponse {
    #[serde(default)]
    pub success: bool,
    pub data: Option<CreateOrderData>,
    pub message: Option<String>,
}

impl CreateOrderResponse {
    pub(crate) fn into_order(self) -> Result<PaymentOrder, ApiError> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(PaymentOrder {
                order_id: data.order.id,
                amount: data.order.amount,
                currency: data.order.currency,
                key_id: data.key_id,
            }),
            _ => Err(ApiError::Rejected(
                self.message.unwrap_or_else(|| "Failed to create payment order".to_string()),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct VerifyPaymentResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(rename = "paymentId")]
    pub payment_id: Option<String>,
    pub message: Option<String>,
}

impl VerifyPaymentResponse {
    pub(crate) fn into_verified(self) -> Result<VerifiedPayment, ApiError> {
        if self.success {
            Ok(VerifiedPayment { payment_id: self.payment_id })
        } else {
            Err(ApiError::Rejected(
                self.message.unwrap_or_else(|| "Payment verification failed".to_string()),
            ))
        }
    }
}
