//! Supplier contact command - `/contact`.
//!
//! Submission is simulated: after a short delay it always succeeds.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::contact::{ContactForm, Inquiry},
        errors::{Error, Result},
    };

    /// Requests a bulk quote; we'll connect you with trusted local vendors.
    #[poise::command(slash_command)]
    pub async fn contact(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Your name"] name: String,
        #[description = "Email for the vendor to reply to"] email: String,
        #[description = "What you need a quote for"] message: String,
    ) -> Result<()> {
        let mut form = ContactForm::new(Inquiry {
            name,
            email,
            message,
        });

        if let Err(e) = form.draft.validate() {
            ctx.send(
                poise::CreateReply::default()
                    .content(format!("❌ {e}"))
                    .ephemeral(true),
            )
            .await?;
            return Ok(());
        }

        ctx.defer_ephemeral().await?;
        let receipt = form.submit(ctx.data().settings.contact.delay()).await?;

        ctx.say(format!(
            "✅ Message sent! We'll be in touch shortly. Reference: `{}`",
            receipt.reference
        ))
        .await?;
        Ok(())
    }
}

pub use inner::*;
