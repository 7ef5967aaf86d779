use crate::{
    db::SubmissionStore,
    error::{AppError, AppResult},
    models::submission::{ContactMessage, ContactSchema, Subscriber},
    utils::validation::{length_between, normalize_email, required},
};

pub async fn subscribe(store: &dyn SubmissionStore, email: &str) -> AppResult<Subscriber> {
    let email = normalize_email(email)?;
    store
        .add_subscriber(&email)
        .await?
        .ok_or_else(|| AppError::Conflict("Este email ya está suscrito".to_string()))
}

pub async fn submit_contact(
    store: &dyn SubmissionStore,
    body: ContactSchema,
) -> AppResult<ContactMessage> {
    let message = ContactSchema {
        name: required(&body.name, "name")?,
        email: normalize_email(&body.email)?,
        subject: body
            .subject
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        message: length_between(&body.message, "message", 10, 5000)?,
    };

    let saved = store.add_contact_message(message).await?;
    tracing::info!(id = %saved.id, "Mensaje de contacto recibido");
    Ok(saved)
}
