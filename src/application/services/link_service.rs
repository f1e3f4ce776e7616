//! Link registry: creation and lookup of short links.

use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, validate_custom_alias};
use crate::utils::url_validator::validate_destination_url;

/// Generated-code draws before creation gives up.
const MAX_CODE_ATTEMPTS: usize = 16;

/// Optional attributes accepted by [`LinkService::create_link`].
#[derive(Debug, Clone, Default)]
pub struct CreateLinkOptions {
    pub custom_alias: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub lead_capture_enabled: bool,
}

/// Service owning link creation, lookup, and short URL construction.
pub struct LinkService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
    base_url: String,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service publishing short URLs under `base_url`.
    pub fn new(link_repository: Arc<L>, base_url: impl Into<String>) -> Self {
        Self {
            link_repository,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Creates a short link for `owner_id`.
    ///
    /// # Code Allocation
    ///
    /// - A custom alias is validated, checked against every existing code, and
    ///   used as-is. A taken alias fails immediately.
    /// - Otherwise 6-character codes are drawn until one is free. A draw that
    ///   loses an insert race to a concurrent creation is retried as well.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a malformed URL, alias, or a past
    /// expiry. Returns [`AppError::AliasTaken`] if the custom alias exists.
    pub async fn create_link(
        &self,
        owner_id: &str,
        destination_url: &str,
        options: CreateLinkOptions,
    ) -> Result<Link, AppError> {
        let destination_url = validate_destination_url(destination_url)?;

        if let Some(expires_at) = options.expires_at
            && expires_at <= Utc::now()
        {
            return Err(AppError::bad_request(
                "Expiry must be in the future",
                json!({ "field": "expires_at", "expires_at": expires_at }),
            ));
        }

        let template = NewLink {
            owner_id: owner_id.to_string(),
            short_code: String::new(),
            destination_url,
            custom_alias: None,
            title: non_empty(options.title),
            description: non_empty(options.description),
            expires_at: options.expires_at,
            lead_capture_enabled: options.lead_capture_enabled,
        };

        match non_empty(options.custom_alias) {
            Some(alias) => self.create_with_alias(template, alias).await,
            None => self.create_with_generated_code(template).await,
        }
    }

    async fn create_with_alias(&self, template: NewLink, alias: String) -> Result<Link, AppError> {
        validate_custom_alias(&alias)?;

        if self.link_repository.find_by_code(&alias).await?.is_some() {
            return Err(alias_taken(&alias));
        }

        let new_link = NewLink {
            short_code: alias.clone(),
            custom_alias: Some(alias),
            ..template
        };

        self.link_repository.create(new_link).await
    }

    async fn create_with_generated_code(&self, template: NewLink) -> Result<Link, AppError> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = generate_code();

            if self.link_repository.find_by_code(&code).await?.is_some() {
                debug!(attempt, "Generated code already in use, drawing again");
                continue;
            }

            let new_link = NewLink {
                short_code: code,
                ..template.clone()
            };

            match self.link_repository.create(new_link).await {
                Ok(link) => return Ok(link),
                Err(AppError::AliasTaken { .. }) => {
                    debug!(attempt, "Lost insert race for generated code, drawing again");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions", "attempts": MAX_CODE_ATTEMPTS }),
        ))
    }

    /// Retrieves a link by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this id.
    pub async fn get_link(&self, id: Uuid) -> Result<Link, AppError> {
        self.link_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Link not found", json!({ "id": id })))
    }

    /// Retrieves a link and checks that `owner_id` owns it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if missing and [`AppError::Forbidden`]
    /// if it belongs to someone else.
    pub async fn get_owned_link(&self, id: Uuid, owner_id: &str) -> Result<Link, AppError> {
        let link = self.get_link(id).await?;

        if link.owner_id != owner_id {
            return Err(AppError::forbidden(
                "Link belongs to another user",
                json!({ "id": id }),
            ));
        }

        Ok(link)
    }

    /// Looks up an active link by short code.
    ///
    /// Deactivated links are treated as absent. Expiry is not checked here so
    /// callers can distinguish an expired link from a missing one.
    pub async fn get_by_short_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self
            .link_repository
            .find_by_code(code)
            .await?
            .filter(|link| link.is_active))
    }

    /// Looks up a link by short code in any state.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        self.link_repository.find_by_code(code).await
    }

    /// Lists an owner's links, newest first.
    pub async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<Link>, AppError> {
        self.link_repository.list_by_owner(owner_id).await
    }

    /// Public short URL for a link.
    pub fn short_url(&self, link: &Link) -> String {
        link.short_url(&self.base_url)
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.link_repository.ping().await
    }
}

fn alias_taken(alias: &str) -> AppError {
    AppError::alias_taken("Custom alias is already taken", json!({ "alias": alias }))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
