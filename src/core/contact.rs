//! Supplier contact form - Simulated inquiry submission.
//!
//! There is no real delivery. A submission is validated, held for a short
//! artificial delay, and then always succeeds.

use crate::errors::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

/// Default artificial delay before a submission succeeds.
pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(1500);

/// A bulk-quote request from a grower.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inquiry {
    /// Sender's name
    pub name: String,
    /// Reply address
    pub email: String,
    /// Free-text inquiry
    pub message: String,
}

impl Inquiry {
    /// Checks that every field is filled in and the email looks like one.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInquiry`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidInquiry { field: "name" });
        }
        if !is_plausible_email(self.email.trim()) {
            return Err(Error::InvalidInquiry { field: "email" });
        }
        if self.message.trim().is_empty() {
            return Err(Error::InvalidInquiry { field: "message" });
        }
        Ok(())
    }
}

fn is_plausible_email(email: &str) -> bool {
    email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty())
}

/// Acknowledgement for an accepted inquiry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InquiryReceipt {
    /// Short reference shown to the sender
    pub reference: String,
    /// When the submission completed
    pub submitted_at: DateTime<Utc>,
}

/// Submission progress of the form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContactStatus {
    /// Ready for input
    #[default]
    Idle,
    /// Waiting out the simulated delay
    Sending,
    /// Submission accepted; the form has been cleared
    Success,
}

/// The contact form and its submission status.
#[derive(Debug, Default, Clone)]
pub struct ContactForm {
    /// Current field values
    pub draft: Inquiry,
    status: ContactStatus,
}

impl ContactForm {
    /// An idle form holding `draft`.
    #[must_use]
    pub fn new(draft: Inquiry) -> Self {
        Self {
            draft,
            status: ContactStatus::Idle,
        }
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> ContactStatus {
        self.status
    }

    /// Validates and "sends" the draft, waiting `delay` before succeeding.
    ///
    /// On success the draft is cleared and the status is [`ContactStatus::Success`]
    /// until [`ContactForm::reset`] is called.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInquiry`] without changing status if the draft is
    /// incomplete.
    pub async fn submit(&mut self, delay: Duration) -> Result<InquiryReceipt> {
        self.draft.validate()?;
        self.status = ContactStatus::Sending;

        tokio::time::sleep(delay).await;

        let submitted_at = Utc::now();
        let receipt = InquiryReceipt {
            reference: format!("FG-{}", submitted_at.format("%Y%m%d%H%M%S")),
            submitted_at,
        };
        info!(
            "Inquiry from {} accepted as {}",
            self.draft.name.trim(),
            receipt.reference
        );

        self.draft = Inquiry::default();
        self.status = ContactStatus::Success;
        Ok(receipt)
    }

    /// Returns a completed form to [`ContactStatus::Idle`].
    pub fn reset(&mut self) {
        if self.status == ContactStatus::Success {
            self.status = ContactStatus::Idle;
        }
    }
}
