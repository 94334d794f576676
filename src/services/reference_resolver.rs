//! # Reference Resolver
//!
//! Resolves the LDN service and repository item a message refers to into
//! display names. Both lookups run concurrently; a missing reference issues no
//! lookup, and a failed lookup degrades to the fallback name with a notice on
//! the notification sink instead of an error.

use std::fmt::Display;
use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::collaborators::{ItemDirectory, NotificationSink, ServiceDirectory};
use crate::config::HydrationConfig;
use crate::constants::references;
use crate::error::NotifyError;

/// Display names resolved for one message
///
/// The `*_degraded` flags mark names that fell back because a lookup failed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedReferences {
    pub service_name: String,
    pub item_name: String,
    pub service_degraded: bool,
    pub item_degraded: bool,
}

pub struct ReferenceResolver {
    services: Arc<dyn ServiceDirectory>,
    items: Arc<dyn ItemDirectory>,
    notifications: Arc<dyn NotificationSink>,
    fallback_name: String,
    notify_on_failure: bool,
}

impl std::fmt::Debug for ReferenceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReferenceResolver")
            .field("fallback_name", &self.fallback_name)
            .field("notify_on_failure", &self.notify_on_failure)
            .finish_non_exhaustive()
    }
}

impl ReferenceResolver {
    pub fn new(
        services: Arc<dyn ServiceDirectory>,
        items: Arc<dyn ItemDirectory>,
        notifications: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            services,
            items,
            notifications,
            fallback_name: references::FALLBACK_NAME.to_string(),
            notify_on_failure: true,
        }
    }

    pub fn with_config(mut self, config: &HydrationConfig) -> Self {
        self.fallback_name = config.fallback_name.clone();
        self.notify_on_failure = config.notify_on_lookup_failure;
        self
    }

    /// Resolve both references; completes once every issued lookup has completed
    pub async fn resolve(
        &self,
        service_ref: Option<i64>,
        item_ref: Option<Uuid>,
    ) -> ResolvedReferences {
        let service_name = async {
            match service_ref {
                Some(id) => match self.services.find_by_id(id).await {
                    Ok(service) => (service.name, false),
                    Err(error) => (self.degrade(references::LDN_SERVICE_DIRECTORY, id, &error), true),
                },
                None => (self.fallback_name.clone(), false),
            }
        };
        let item_name = async {
            match item_ref {
                Some(id) => match self.items.find_by_id(id).await {
                    Ok(item) => (item.name, false),
                    Err(error) => (self.degrade(references::ITEM_DIRECTORY, id, &error), true),
                },
                None => (self.fallback_name.clone(), false),
            }
        };

        let ((service_name, service_degraded), (item_name, item_degraded)) =
            futures::join!(service_name, item_name);
        debug!(
            service_ref = ?service_ref,
            item_ref = ?item_ref,
            service_name = %service_name,
            item_name = %item_name,
            "Resolved message references"
        );

        ResolvedReferences {
            service_name,
            item_name,
            service_degraded,
            item_degraded,
        }
    }

    fn degrade(&self, directory: &str, reference: impl Display, error: &NotifyError) -> String {
        warn!(
            directory = %directory,
            reference = %reference,
            error = %error,
            "Reference lookup failed, using fallback name"
        );
        if self.notify_on_failure {
            self.notifications.warning(
                &format!("Could not resolve {directory} reference {reference}"),
                &error.to_string(),
            );
        }
        self.fallback_name.clone()
    }
}
