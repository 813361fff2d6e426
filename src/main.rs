mod domain;
mod clients;

mod app_system;

#[cfg(test)]
mod mock_framework;

mod actor_framework;
mod api;
mod course_actor;
mod enrollment;
mod gateway;
mod payment_actor;
mod session;

use clap::Parser;
use tokio::io::BufReader;
use tracing::{error, info, warn, Instrument};
use crate::app_system::{setup_tracing, AppConfig, EnrollmentSystem, SystemError};
use crate::domain::ProfileForm;
use crate::enrollment::{EnrollmentError, EnrollmentFlow, PaymentOutcome, WizardStep};
use crate::gateway::run_terminal_host;

#[tokio::main]
async fn main() -> Result<(), SystemError> {
    let config = AppConfig::parse();
    setup_tracing(config.log_json);

    info!(course_id = %config.course_id, "Starting enrollment");

    // The terminal acts as the checkout widget's host
    let (system, checkouts) = EnrollmentSystem::start(&config).await?;
    let host = tokio::spawn(run_terminal_host(
        checkouts,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    ));

    let span = tracing::info_span!("enrollment", course_id = %config.course_id);
    let result = enroll(&system, &config).instrument(span).await;
    if let Err(e) = &result {
        error!(error = %e, "Enrollment failed");
    }

    // Shutdown system gracefully; the host stops once the gateway is gone
    system.shutdown().await?;
    match host.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "Checkout host stopped early"),
        Err(e) => return Err(SystemError::ActorTask(e.to_string())),
    }

    result
}

async fn enroll(system: &EnrollmentSystem, config: &AppConfig) -> Result<(), SystemError> {
    if let (Some(email), Some(password)) = (&config.email, &config.password) {
        let user = system.login(email, password).await?;
        info!(user_id = %user.user_id, "Signed in");
    }

    match system.refresh_catalog().await {
        Ok(count) => info!(count, "Catalog refreshed"),
        Err(e) => warn!(error = %e, "Catalog refresh failed"),
    }
    let course = system.load_course(&config.course_id).await?;

    let mut flow = system.open_enrollment(course).await?;
    let result = if flow.user().is_enrolled(&config.course_id) {
        info!("Already enrolled in this course");
        Ok(())
    } else {
        walk(&mut flow, config).await
    };
    flow.close();
    result
}

async fn walk(flow: &mut EnrollmentFlow, config: &AppConfig) -> Result<(), SystemError> {
    info!(title = %flow.course().title, fee = flow.course().fee, step = %flow.step(), "Enrollment opened");
    if flow.step() == WizardStep::Profile {
        let user = flow.user().clone();
        let form = ProfileForm {
            full_name: config.full_name.clone().unwrap_or(user.full_name),
            email: user.email,
            phone: config.phone.clone().or(user.phone).unwrap_or_default(),
            city: config.city.clone().or(user.city).unwrap_or_default(),
        };
        flow.submit_profile(form).await?;
    }

    let quote = flow.select_plan(config.plan)?;
    info!(
        plan = %quote.plan,
        total = quote.total,
        monthly = ?quote.monthly,
        installments = quote.installments,
        "Plan selected"
    );
    flow.proceed_to_payment()?;

    let order = flow.initiate_payment().await?;
    info!(order_id = %order.order_id, amount = order.amount, "Order created, waiting for checkout");

    match flow.await_payment_result().await {
        Ok(PaymentOutcome::Enrolled(user)) => {
            info!(enrolled = user.enrolled_courses.len(), "Enrollment complete")
        }
        Ok(PaymentOutcome::Dismissed) => info!("Checkout dismissed, nothing was charged"),
        Err(EnrollmentError::EnrollmentNotRecorded(e)) => {
            warn!(error = %e, "Payment verified, retrying enrollment");
            let user = flow.retry_enrollment().await?;
            info!(enrolled = user.enrolled_courses.len(), "Enrollment complete")
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
