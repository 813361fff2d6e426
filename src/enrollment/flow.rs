use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use crate::api::PaymentsApi;
use crate::clients::PaymentClient;
use crate::domain::{
    new_receipt, to_paise, Course, CreateOrderRequest, EnrollmentData, OrderNotes, PaymentAttemptCreate,
    PaymentOrder, PaymentPlan, PlanQuote, ProfileForm, User, VerifyPaymentRequest, CURRENCY,
};
use crate::gateway::{
    CheckoutHandle, CheckoutOptions, CheckoutOutcome, CheckoutSuccess, PaymentGateway, Prefill, Theme,
};
use crate::payment_actor::PaymentError;
use crate::session::SessionStore;
use super::{EnrollmentError, WizardStep};

/// Merchant details shown inside the checkout widget.
#[derive(Debug, Clone)]
pub struct CheckoutBranding {
    pub merchant_name: String,
    pub theme_color: String,
}

impl Default for CheckoutBranding {
    fn default() -> Self {
        Self {
            merchant_name: "Course Academy".to_string(),
            theme_color: "#3399cc".to_string(),
        }
    }
}

/// Services the wizard talks to, injected so tests can substitute them.
#[derive(Clone)]
pub struct FlowDeps {
    pub session: Arc<dyn SessionStore>,
    pub payments: Arc<dyn PaymentsApi>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub ledger: PaymentClient,
    pub branding: CheckoutBranding,
}

/// What an open checkout ended in, when it did not end in an error.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    Enrolled(User),
    Dismissed,
}

/// The checkout attempt currently in flight.
struct PendingPayment {
    receipt: String,
    amount: u64,
    order: Option<PaymentOrder>,
    handle: Option<CheckoutHandle>,
}

/// Walks one user through enrolling in one course.
///
/// The course is added to the user's enrollments only after the widget
/// reports success and the backend verifies the payment signature.
pub struct EnrollmentFlow {
    deps: FlowDeps,
    course: Course,
    user: User,
    step: WizardStep,
    data: EnrollmentData,
    quote: Option<PlanQuote>,
    payment_processing: bool,
    pending: Option<PendingPayment>,
    /// Set once the backend accepts a payment; no further order is offered.
    verified_payment: Option<String>,
}

impl EnrollmentFlow {
    /// Opens the wizard for the signed-in user.
    #[instrument(skip(deps, course), fields(course_id = ?course.course_id))]
    pub async fn open(deps: FlowDeps, course: Course) -> Result<Self, EnrollmentError> {
        let user = deps.session.current_user().await?;
        let step = WizardStep::initial(user.profile_complete);
        info!(user_id = %user.user_id, %step, "Enrollment opened");
        let data = EnrollmentData {
            course_id: course.id().map(str::to_string),
            payment_plan: PaymentPlan::default(),
            profile_complete: user.profile_complete,
        };
        Ok(Self {
            deps,
            course,
            user,
            step,
            data,
            quote: None,
            payment_processing: false,
            pending: None,
            verified_payment: None,
        })
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn payment_processing(&self) -> bool {
        self.payment_processing
    }

    pub fn data(&self) -> &EnrollmentData {
        &self.data
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    fn ensure_step(&self, expected: WizardStep, action: &'static str) -> Result<(), EnrollmentError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(EnrollmentError::InvalidStep { action, step: self.step })
        }
    }

    /// Saves the profile and moves on to plan selection.
    #[instrument(skip(self, form))]
    pub async fn submit_profile(&mut self, form: ProfileForm) -> Result<&User, EnrollmentError> {
        self.ensure_step(WizardStep::Profile, "submit the profile")?;
        let missing = form.missing_fields();
        if !missing.is_empty() {
            return Err(EnrollmentError::IncompleteProfile(missing));
        }
        self.user = self.deps.session.update_user(form.into_patch()).await?;
        self.data.profile_complete = true;
        self.step = WizardStep::Plan;
        info!("Profile completed");
        Ok(&self.user)
    }

    /// Prices the course under `plan` and remembers the choice.
    #[instrument(skip(self))]
    pub fn select_plan(&mut self, plan: PaymentPlan) -> Result<PlanQuote, EnrollmentError> {
        self.ensure_step(WizardStep::Plan, "select a plan")?;
        let quote = plan.quote(self.course.fee);
        self.data.payment_plan = plan;
        self.quote = Some(quote);
        Ok(quote)
    }

    pub fn proceed_to_payment(&mut self) -> Result<(), EnrollmentError> {
        self.ensure_step(WizardStep::Plan, "continue to payment")?;
        if self.quote.is_none() {
            return Err(EnrollmentError::NoPlanSelected);
        }
        self.step = WizardStep::Payment;
        Ok(())
    }

    pub fn back(&mut self) -> Result<WizardStep, EnrollmentError> {
        if self.payment_processing {
            return Err(EnrollmentError::PaymentInProgress);
        }
        let previous = self
            .step
            .previous()
            .ok_or(EnrollmentError::InvalidStep { action: "go back", step: self.step })?;
        self.step = previous;
        Ok(previous)
    }

    /// Creates an order and opens the checkout widget for it.
    ///
    /// Preconditions are checked before any request is made. On failure
    /// `payment_processing` is cleared and nothing is retried.
    #[instrument(skip(self))]
    pub async fn initiate_payment(&mut self) -> Result<PaymentOrder, EnrollmentError> {
        let Some(course_id) = self.course.id().map(str::to_string) else {
            warn!(title = %self.course.title, "Refusing payment for course without id");
            return Err(EnrollmentError::MissingCourseId);
        };
        self.ensure_step(WizardStep::Payment, "start payment")?;
        if self.verified_payment.is_some() {
            return Err(EnrollmentError::AlreadyPaid);
        }
        if self.payment_processing {
            return Err(EnrollmentError::PaymentInProgress);
        }
        self.payment_processing = true;

        match self.start_checkout(course_id).await {
            Ok(order) => Ok(order),
            Err(e) => {
                error!(error = %e, "Payment initiation failed");
                self.abandon_pending(e.to_string()).await;
                Err(e)
            }
        }
    }

    async fn start_checkout(&mut self, course_id: String) -> Result<PaymentOrder, EnrollmentError> {
        let amount = to_paise(self.course.fee);
        let receipt = new_receipt();
        let notes = OrderNotes {
            course_id: course_id.clone(),
            user_id: self.user.user_id.clone(),
            payment_plan: self.data.payment_plan,
        };
        self.pending = Some(PendingPayment { receipt: receipt.clone(), amount, order: None, handle: None });
        log_ledger(
            self.deps
                .ledger
                .record_attempt(PaymentAttemptCreate {
                    receipt: receipt.clone(),
                    user_id: self.user.user_id.clone(),
                    course_id: course_id.clone(),
                    plan: self.data.payment_plan,
                    amount_paise: amount,
                    currency: CURRENCY.to_string(),
                })
                .await,
        );

        let order = self
            .deps
            .payments
            .create_order(CreateOrderRequest {
                amount,
                currency: CURRENCY.to_string(),
                receipt: receipt.clone(),
                course_id,
                notes: notes.clone(),
            })
            .await
            .map_err(EnrollmentError::OrderCreation)?;
        log_ledger(self.deps.ledger.attach_order(receipt, order.order_id.clone()).await);

        let options = CheckoutOptions {
            key: order.key_id.clone(),
            amount: order.amount,
            currency: order.currency.clone(),
            order_id: order.order_id.clone(),
            name: self.deps.branding.merchant_name.clone(),
            description: self.course.title.clone(),
            prefill: Prefill {
                name: self.user.full_name.clone(),
                email: self.user.email.clone(),
                contact: self.user.phone.clone().unwrap_or_default(),
            },
            notes,
            theme: Theme { color: self.deps.branding.theme_color.clone() },
        };
        let handle = self.deps.gateway.create_checkout_session(options).await?;
        if let Some(pending) = self.pending.as_mut() {
            pending.order = Some(order.clone());
            pending.handle = Some(handle);
        }
        Ok(order)
    }

    /// Waits for the open checkout to end and applies its outcome.
    pub async fn await_payment_result(&mut self) -> Result<PaymentOutcome, EnrollmentError> {
        let handle = self
            .pending
            .as_mut()
            .and_then(|pending| pending.handle.take())
            .ok_or(EnrollmentError::NoOpenCheckout)?;
        debug!(order_id = %handle.order_id(), "Waiting for checkout outcome");
        match handle.on_result().await {
            CheckoutOutcome::Success(response) => {
                self.on_payment_widget_success(response).await.map(PaymentOutcome::Enrolled)
            }
            CheckoutOutcome::Failed { description } => Err(self.on_payment_failed(description).await),
            CheckoutOutcome::Dismissed => {
                self.on_widget_dismiss().await;
                Ok(PaymentOutcome::Dismissed)
            }
        }
    }

    /// Verifies a payment the widget reported as successful, then records
    /// the enrollment.
    #[instrument(skip(self, response), fields(order_id = %response.razorpay_order_id))]
    pub async fn on_payment_widget_success(&mut self, response: CheckoutSuccess) -> Result<User, EnrollmentError> {
        if self.step == WizardStep::Confirmation {
            warn!("Ignoring repeated payment success callback");
            return Ok(self.user.clone());
        }
        self.ensure_step(WizardStep::Payment, "confirm a payment")?;
        let (receipt, amount, expected_order) = match &self.pending {
            Some(pending) => (
                pending.receipt.clone(),
                pending.amount,
                pending.order.as_ref().map(|order| order.order_id.clone()),
            ),
            None => return Err(EnrollmentError::NoOpenCheckout),
        };
        let course_id = self.course.id().map(str::to_string).ok_or(EnrollmentError::MissingCourseId)?;
        if expected_order.as_deref() != Some(response.razorpay_order_id.as_str()) {
            warn!(expected = ?expected_order, "Widget reported a different order id");
        }

        let request = VerifyPaymentRequest {
            razorpay_order_id: response.razorpay_order_id,
            razorpay_payment_id: response.razorpay_payment_id.clone(),
            razorpay_signature: response.razorpay_signature,
            course_id: course_id.clone(),
            user_id: self.user.user_id.clone(),
            amount,
            payment_plan: self.data.payment_plan,
        };
        let verified = match self.deps.payments.verify_payment(request).await {
            Ok(verified) => verified,
            Err(e) => {
                let e = EnrollmentError::Verification(e);
                error!(error = %e, "Payment verification failed");
                self.abandon_pending(e.to_string()).await;
                return Err(e);
            }
        };

        self.payment_processing = false;
        self.pending = None;
        let payment_id = verified.payment_id.unwrap_or(response.razorpay_payment_id);
        log_ledger(self.deps.ledger.mark_verified(receipt, payment_id.clone()).await);
        self.verified_payment = Some(payment_id);

        self.record_enrollment(course_id).await
    }

    /// Records the enrollment again after a verified payment whose
    /// enrollment could not be saved.
    #[instrument(skip(self))]
    pub async fn retry_enrollment(&mut self) -> Result<User, EnrollmentError> {
        if self.step == WizardStep::Confirmation {
            return Ok(self.user.clone());
        }
        if self.verified_payment.is_none() {
            return Err(EnrollmentError::NoVerifiedPayment);
        }
        let course_id = self.course.id().map(str::to_string).ok_or(EnrollmentError::MissingCourseId)?;
        self.record_enrollment(course_id).await
    }

    async fn record_enrollment(&mut self, course_id: String) -> Result<User, EnrollmentError> {
        match self.deps.session.enroll(course_id).await {
            Ok(user) => {
                self.user = user;
                self.step = WizardStep::Confirmation;
                info!("Enrollment confirmed");
                Ok(self.user.clone())
            }
            Err(e) => {
                error!(error = %e, payment_id = ?self.verified_payment, "Payment verified but enrollment not saved");
                Err(EnrollmentError::EnrollmentNotRecorded(e))
            }
        }
    }

    /// The widget closed without a payment. The user stays on the payment
    /// step and may start again.
    #[instrument(skip(self))]
    pub async fn on_widget_dismiss(&mut self) {
        self.payment_processing = false;
        if let Some(pending) = self.pending.take() {
            info!(receipt = %pending.receipt, "Checkout dismissed");
            log_ledger(self.deps.ledger.mark_dismissed(pending.receipt).await);
        }
    }

    /// The widget's failure event. Returns the error to show the user.
    #[instrument(skip(self))]
    pub async fn on_payment_failed(&mut self, description: String) -> EnrollmentError {
        error!("Payment failed in checkout");
        self.abandon_pending(description.clone()).await;
        EnrollmentError::PaymentFailed(description)
    }

    /// Discards the wizard. In-flight work is not cancelled.
    pub fn close(self) -> EnrollmentData {
        if self.payment_processing {
            warn!("Enrollment closed while a payment was processing");
        }
        if self.verified_payment.is_some() && self.step != WizardStep::Confirmation {
            warn!(payment_id = ?self.verified_payment, "Enrollment closed with a paid but unrecorded enrollment");
        }
        info!(step = %self.step, "Enrollment closed");
        self.data
    }

    async fn abandon_pending(&mut self, reason: String) {
        self.payment_processing = false;
        if let Some(pending) = self.pending.take() {
            log_ledger(self.deps.ledger.mark_failed(pending.receipt, reason).await);
        }
    }
}

fn log_ledger<T>(result: Result<T, PaymentError>) {
    if let Err(e) = result {
        warn!(error = %e, "Payment ledger not updated");
    }
}
